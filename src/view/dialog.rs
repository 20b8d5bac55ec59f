//! Modal dialog state and its reducer.
//!
//! Only one dialog is open at a time. Every transition goes through
//! [`DialogState::reduce`].

use crate::api::dto::SimulationParams;
use crate::domain::CameraField;

/// Which file list a file dialog selects from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileTarget {
    /// Event files.
    Event,
    /// Camera sequence files.
    Sequence,
}

/// Content of an open dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogKind {
    /// Rename a camera.
    Rename {
        /// Camera serial.
        serial: String,
        /// Description when the dialog opened.
        current: String,
    },
    /// Pick a value for a camera property.
    Choice {
        /// Camera serial.
        serial: String,
        /// Property being set.
        field: CameraField,
        /// Value when the dialog opened.
        current: String,
        /// Selectable values; empty until `read_choices` answers.
        choices: Vec<String>,
    },
    /// Pick a file.
    FileSelect {
        /// Event or sequence files.
        target: FileTarget,
        /// Listed files.
        files: Vec<String>,
    },
    /// Edit simulation parameters.
    Simulation {
        /// Parameters prefilled from the backend defaults.
        params: SimulationParams,
    },
}

/// Dialog transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogAction {
    /// Open a dialog, replacing any open one.
    Open(DialogKind),
    /// Fill in the choices of an open choice dialog.
    SetChoices(Vec<String>),
    /// Close whatever is open.
    Close,
}

/// Current dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DialogState {
    /// Nothing open.
    #[default]
    Closed,
    /// A dialog is showing.
    Open(DialogKind),
}

impl DialogState {
    /// Applies `action` and returns the next state.
    #[must_use]
    pub fn reduce(self, action: DialogAction) -> Self {
        match (self, action) {
            (_, DialogAction::Open(kind)) => Self::Open(kind),
            (_, DialogAction::Close) => Self::Closed,
            (
                Self::Open(DialogKind::Choice {
                    serial,
                    field,
                    current,
                    ..
                }),
                DialogAction::SetChoices(choices),
            ) => Self::Open(DialogKind::Choice {
                serial,
                field,
                current,
                choices,
            }),
            (state, DialogAction::SetChoices(_)) => {
                tracing::debug!("choices arrived with no choice dialog open");
                state
            }
        }
    }

    /// Returns `true` if a dialog is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// Returns the open dialog, if any.
    #[must_use]
    pub const fn kind(&self) -> Option<&DialogKind> {
        match self {
            Self::Open(kind) => Some(kind),
            Self::Closed => None,
        }
    }
}
