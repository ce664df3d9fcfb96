//! Structured events emitted by a materialization run.
//!
//! The core never formats user-facing text; it emits these values and leaves
//! presentation to the receiver (see `app::messages`).

use super::error::BuildError;

/// What happened at the point a progress event was emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressMessage {
    /// The output root exists and line processing is about to begin.
    Starting,
    DirectoryCreated { name: String },
    FileCreated { name: String },
    /// Cancellation was observed at a line boundary.
    StoppedByUser,
    /// Every line was handled.
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Percentage of input lines handled, 0 to 100.
    pub percent: u8,
    pub message: ProgressMessage,
}

/// A single notification from a run, delivered in emission order.
#[derive(Debug)]
pub enum BuildEvent {
    Progress(ProgressEvent),
    Error(BuildError),
    /// Terminal event. Emitted exactly once per run.
    Complete,
}

impl BuildEvent {
    pub fn progress(percent: u8, message: ProgressMessage) -> Self {
        BuildEvent::Progress(ProgressEvent { percent, message })
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, BuildEvent::Complete)
    }
}

/// Integer percentage of `done` out of `total`, clamped to 100.
///
/// An empty input counts as fully handled.
pub fn percent_of(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (done.saturating_mul(100) / total).min(100) as u8
}
