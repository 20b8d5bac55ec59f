//! Service layer: dashboard orchestration.
//!
//! [`Dashboard`] runs poll cycles and user operations against the backend,
//! [`EditCoordinator`] tracks optimistic edits, and [`Poller`] drives the
//! periodic refresh.

pub mod dashboard;
pub mod edit_coordinator;
pub mod poller;

pub use dashboard::{CycleOutcome, Dashboard};
pub use edit_coordinator::{EditCoordinator, EditOutcome, EditPhase, PendingEdit};
pub use poller::{PollStats, Poller};
