//! View model: the retained document, its row cache and dialog state.

pub mod dialog;
pub mod document;
pub mod row_cache;

pub use dialog::{DialogAction, DialogKind, DialogState, FileTarget};
pub use document::{
    Cell, CameraTable, ControlPanel, ControlTable, Document, EventTable, GpsPanel, Highlight,
    Icon, Row,
};
pub use row_cache::RowCache;
