//! Retained view model of the dashboard.
//!
//! The [`Document`] is what front ends draw: a GPS panel, the camera table,
//! the event table and the camera-control panel. Renderers mutate it in
//! place; front ends only read it.

use std::fmt;

use super::row_cache::RowCache;
use crate::api::dto::UNAVAILABLE;
use crate::domain::{CameraField, EntityKey, RowId};

/// Number of columns of the camera table.
pub const CAMERA_COLUMNS: usize = 3 + CameraField::CAPABILITIES.len();
/// Number of columns of the event table.
pub const EVENT_COLUMNS: usize = 3;
/// Number of columns of a camera-control table.
pub const CONTROL_COLUMNS: usize = 6;
/// Header shown before any event file is loaded.
pub const NO_EVENT_FILE: &str = "Click to Select File";
/// Status shown while no camera sequence is loaded.
pub const NO_SEQUENCE: &str = "No sequence loaded";

/// Status icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    /// 3D fix.
    GpsConnected,
    /// 2D fix.
    GpsDegraded,
    /// No receiver or no fix.
    GpsDisconnected,
    /// Camera reachable.
    CameraConnected,
    /// Camera unreachable.
    CameraDisconnected,
    /// No sequence running.
    ControlIdle,
    /// A sequence is loaded.
    ControlActive,
}

impl Icon {
    /// Static asset path served by the backend.
    #[must_use]
    pub const fn asset(self) -> &'static str {
        match self {
            Self::GpsConnected => "/static/gps-connected.svg",
            Self::GpsDegraded => "/static/gps-degraded.svg",
            Self::GpsDisconnected => "/static/gps-disconnected.svg",
            Self::CameraConnected => "/static/cam-connected.svg",
            Self::CameraDisconnected => "/static/cam-disconnected.svg",
            Self::ControlIdle => "/static/control-idle.svg",
            Self::ControlActive => "/static/control-active.svg",
        }
    }

    /// Single-character stand-in for terminals.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::GpsConnected | Self::CameraConnected | Self::ControlActive => '●',
            Self::GpsDegraded => '◐',
            Self::GpsDisconnected | Self::CameraDisconnected | Self::ControlIdle => '○',
        }
    }
}

/// Transient cell decoration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Highlight {
    /// Plain cell.
    #[default]
    None,
    /// An edit was submitted and is awaiting the backend.
    Pending,
    /// An edit was confirmed recently.
    Confirmed,
}

/// One table cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    /// Displayed text.
    pub text: String,
    /// Optional leading icon.
    pub icon: Option<Icon>,
    /// Edit decoration.
    pub highlight: Highlight,
    /// Number of columns spanned; `1` for ordinary cells.
    pub col_span: usize,
    /// Entity whose value the cell edits, if clicking it opens a dialog.
    pub editable: Option<EntityKey>,
}

impl Cell {
    /// Plain text cell.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            col_span: 1,
            ..Self::default()
        }
    }

    /// Icon-only cell.
    #[must_use]
    pub fn icon(icon: Icon) -> Self {
        Self {
            icon: Some(icon),
            col_span: 1,
            ..Self::default()
        }
    }

    /// Cell bound to an editable entity.
    #[must_use]
    pub fn editable(text: impl Into<String>, key: EntityKey) -> Self {
        Self {
            editable: Some(key),
            ..Self::text(text)
        }
    }

    /// Sets the column span.
    #[must_use]
    pub fn spanning(mut self, col_span: usize) -> Self {
        self.col_span = col_span;
        self
    }
}

/// A table row with a stable id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    id: RowId,
    cells: Vec<Cell>,
}

impl Row {
    /// Creates a row of `width` empty cells.
    #[must_use]
    pub fn new(id: RowId, width: usize) -> Self {
        Self {
            id,
            cells: vec![Cell::text(""); width],
        }
    }

    /// Creates a row from prepared cells.
    #[must_use]
    pub fn with_cells(id: RowId, cells: Vec<Cell>) -> Self {
        Self { id, cells }
    }

    /// Row id.
    #[must_use]
    pub fn id(&self) -> &RowId {
        &self.id
    }

    /// All cells in column order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at `column`.
    #[must_use]
    pub fn cell(&self, column: usize) -> Option<&Cell> {
        self.cells.get(column)
    }

    /// Mutable cell at `column`.
    pub fn cell_mut(&mut self, column: usize) -> Option<&mut Cell> {
        self.cells.get_mut(column)
    }

    /// Text of the cell at `column`.
    #[must_use]
    pub fn text(&self, column: usize) -> Option<&str> {
        self.cell(column).map(|c| c.text.as_str())
    }

    /// Overwrites the text of the cell at `column`. Out-of-range columns are
    /// ignored.
    pub fn set_text(&mut self, column: usize, text: impl Into<String>) {
        if let Some(cell) = self.cell_mut(column) {
            cell.text = text.into();
        }
    }
}

/// GPS status panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpsPanel {
    /// Fix indicator.
    pub icon: Icon,
    /// Fix mode text.
    pub mode: String,
    /// Time in the current mode.
    pub mode_time: String,
    /// `"<used>/<seen>"`.
    pub satellites: String,
    /// GPS time.
    pub time: String,
    /// Latitude, 4 decimals.
    pub latitude: String,
    /// Longitude, 4 decimals.
    pub longitude: String,
    /// Altitude, 1 decimal.
    pub altitude: String,
}

impl Default for GpsPanel {
    fn default() -> Self {
        let na = || UNAVAILABLE.to_string();
        Self {
            icon: Icon::GpsDisconnected,
            mode: na(),
            mode_time: na(),
            satellites: na(),
            time: na(),
            latitude: na(),
            longitude: na(),
            altitude: na(),
        }
    }
}

/// Camera table, rebuilt each cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CameraTable {
    /// Body rows.
    pub rows: Vec<Row>,
}

impl CameraTable {
    /// Column of a camera property.
    #[must_use]
    pub fn column_of(field: CameraField) -> usize {
        CameraField::CAPABILITIES
            .iter()
            .position(|f| *f == field)
            .map_or(2, |i| i + 3)
    }

    /// Row id of a camera.
    #[must_use]
    pub fn row_id(serial: &str) -> RowId {
        RowId::new("camera_row_", serial)
    }

    /// Row of a camera.
    #[must_use]
    pub fn row(&self, serial: &str) -> Option<&Row> {
        let id = Self::row_id(serial);
        self.rows.iter().find(|r| *r.id() == id)
    }

    /// Cell displaying a camera property.
    #[must_use]
    pub fn cell(&self, key: &EntityKey) -> Option<&Cell> {
        let EntityKey::CameraField { serial, field } = key else {
            return None;
        };
        self.row(serial)?.cell(Self::column_of(*field))
    }

    /// Mutable cell displaying a camera property.
    pub fn cell_mut(&mut self, key: &EntityKey) -> Option<&mut Cell> {
        let EntityKey::CameraField { serial, field } = key else {
            return None;
        };
        let id = Self::row_id(serial);
        self.rows
            .iter_mut()
            .find(|r| *r.id() == id)?
            .cell_mut(Self::column_of(*field))
    }
}

/// Event table with its file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTable {
    /// Loaded event file, or [`NO_EVENT_FILE`].
    pub filename: String,
    /// `"Loading details for X..."` while a file loads.
    pub loading: Option<String>,
    /// Rows keyed by event id.
    pub rows: RowCache,
}

impl Default for EventTable {
    fn default() -> Self {
        Self {
            filename: NO_EVENT_FILE.to_string(),
            loading: None,
            rows: RowCache::new(EVENT_COLUMNS),
        }
    }
}

/// Sequence table of one camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlTable {
    /// Camera the sequence drives.
    pub camera_id: String,
    /// Total events in the sequence.
    pub num_events: u64,
    /// Upcoming events.
    pub rows: Vec<Row>,
}

/// Camera-control panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlPanel {
    /// Idle or active indicator.
    pub icon: Icon,
    /// Backend state string.
    pub status: String,
    /// Loaded sequence file.
    pub sequence_filename: Option<String>,
    /// One table per camera.
    pub tables: Vec<ControlTable>,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            icon: Icon::ControlIdle,
            status: UNAVAILABLE.to_string(),
            sequence_filename: None,
            tables: Vec::new(),
        }
    }
}

/// The whole dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// GPS panel.
    pub gps: GpsPanel,
    /// Camera table.
    pub cameras: CameraTable,
    /// Event table.
    pub events: EventTable,
    /// Camera-control panel.
    pub control: ControlPanel,
    /// Incremented on every applied snapshot.
    pub revision: u64,
}

fn write_row(f: &mut fmt::Formatter<'_>, row: &Row) -> fmt::Result {
    let cells: Vec<String> = row
        .cells()
        .iter()
        .map(|cell| {
            let mark = match cell.highlight {
                Highlight::None => "",
                Highlight::Pending => "*",
                Highlight::Confirmed => "+",
            };
            match cell.icon {
                Some(icon) if cell.text.is_empty() => icon.glyph().to_string(),
                Some(icon) => format!("{} {}{mark}", icon.glyph(), cell.text),
                None => format!("{}{mark}", cell.text),
            }
        })
        .collect();
    writeln!(f, "  {}", cells.join(" | "))
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gps = &self.gps;
        writeln!(f, "GPS {} {} ({})", gps.icon.glyph(), gps.mode, gps.mode_time)?;
        writeln!(
            f,
            "  sats {}  time {}  lat {}  long {}  alt {}",
            gps.satellites, gps.time, gps.latitude, gps.longitude, gps.altitude
        )?;

        let headers: Vec<&str> = ["", "Serial"]
            .into_iter()
            .chain(std::iter::once(CameraField::Description.label()))
            .chain(CameraField::CAPABILITIES.iter().map(|c| c.label()))
            .collect();
        writeln!(f, "Cameras")?;
        writeln!(f, "  {}", headers.join(" | "))?;
        for row in &self.cameras.rows {
            write_row(f, row)?;
        }

        writeln!(f, "Events: {}", self.events.filename)?;
        if let Some(loading) = &self.events.loading {
            writeln!(f, "  {loading}")?;
        }
        for row in self.events.rows.iter() {
            write_row(f, row)?;
        }

        let control = &self.control;
        writeln!(
            f,
            "Camera control {} {} {}",
            control.icon.glyph(),
            control.status,
            control.sequence_filename.as_deref().unwrap_or(NO_SEQUENCE)
        )?;
        for table in &control.tables {
            writeln!(f, "  {} ({} events)", table.camera_id, table.num_events)?;
            for row in &table.rows {
                write_row(f, row)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_layout() {
        assert_eq!(CAMERA_COLUMNS, 12);
        assert_eq!(CameraTable::column_of(CameraField::Description), 2);
        assert_eq!(CameraTable::column_of(CameraField::Battery), 3);
        assert_eq!(CameraTable::column_of(CameraField::BurstCount), 11);
    }

    #[test]
    fn set_text_ignores_out_of_range() {
        let mut row = Row::new(RowId::new("r_", "x"), 2);
        row.set_text(5, "lost");
        row.set_text(1, "kept");
        assert_eq!(row.text(1), Some("kept"));
        assert_eq!(row.cells().len(), 2);
    }

    #[test]
    fn camera_cell_lookup() {
        let mut table = CameraTable::default();
        let mut row = Row::new(CameraTable::row_id("A1"), CAMERA_COLUMNS);
        row.set_text(CameraTable::column_of(CameraField::Iso), "400");
        table.rows.push(row);

        let key = EntityKey::camera("A1", CameraField::Iso);
        assert_eq!(table.cell(&key).map(|c| c.text.as_str()), Some("400"));
        assert!(table.cell(&EntityKey::camera("B2", CameraField::Iso)).is_none());
        assert!(table.cell(&EntityKey::event("C1")).is_none());
    }

    #[test]
    fn empty_document_renders() {
        let text = Document::default().to_string();
        assert!(text.contains(NO_EVENT_FILE));
        assert!(text.starts_with("GPS"));
    }
}
