//! Execution outcome and final verdict

use chrono::{DateTime, Local};

use crate::status::ExecutionStatus;

/// Latest view of a remote execution record
///
/// Updated by every poll; the caller reads the final value once polling stops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub status: ExecutionStatus,
    /// When the record was written, in local time
    pub completed_at: Option<DateTime<Local>>,
    /// Free-form message attached to the record, if any
    pub raw_message: Option<String>,
}

/// How a launch ended, from the caller's point of view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunVerdict {
    /// Accepted by the atom; the caller chose not to wait
    Submitted,
    /// Ran to `COMPLETE`
    Completed { completed_at: Option<DateTime<Local>> },
    /// Reached a non-successful status
    Failed {
        status: ExecutionStatus,
        message: Option<String>,
    },
    /// Polling gave up before a terminal status was seen
    Unresolved { status: ExecutionStatus },
}

impl RunVerdict {
    pub fn is_success(&self) -> bool {
        matches!(self, RunVerdict::Submitted | RunVerdict::Completed { .. })
    }
}
