//! Execution status classification
//!
//! The remote system reports run state as an untyped string. Known values are
//! mapped onto [`ExecutionStatus`]; anything else is kept verbatim in
//! [`ExecutionStatus::Unrecognized`] so it can still be reported.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// State of a single execution record
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ExecutionStatus {
    /// Local sentinel before any status has been observed
    #[default]
    Pending,
    Aborted,
    Complete,
    CompleteWarn,
    Discarded,
    Error,
    InProcess,
    Started,
    Unknown,
    Unrecognized(String),
}

impl ExecutionStatus {
    /// Parse a remote status string
    pub fn parse(value: &str) -> Self {
        match value {
            "ABORTED" => Self::Aborted,
            "COMPLETE" => Self::Complete,
            "COMPLETE_WARN" => Self::CompleteWarn,
            "DISCARDED" => Self::Discarded,
            "ERROR" => Self::Error,
            "INPROCESS" => Self::InProcess,
            "STARTED" => Self::Started,
            "UNKNOWN" => Self::Unknown,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "STATUS PENDING",
            Self::Aborted => "ABORTED",
            Self::Complete => "COMPLETE",
            Self::CompleteWarn => "COMPLETE_WARN",
            Self::Discarded => "DISCARDED",
            Self::Error => "ERROR",
            Self::InProcess => "INPROCESS",
            Self::Started => "STARTED",
            Self::Unknown => "UNKNOWN",
            Self::Unrecognized(value) => value.as_str(),
        }
    }

    /// Terminal states that end a polling loop
    pub fn is_known(&self) -> bool {
        matches!(
            self,
            Self::Aborted
                | Self::Complete
                | Self::CompleteWarn
                | Self::Discarded
                | Self::Error
                | Self::Started
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Complete | Self::CompleteWarn)
    }

    /// Failure outcomes
    pub fn is_terminated(&self) -> bool {
        matches!(
            self,
            Self::Unknown | Self::Aborted | Self::Discarded | Self::Error
        )
    }

    /// Still running on the atom
    pub fn is_processing(&self) -> bool {
        matches!(self, Self::InProcess)
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ExecutionStatus {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl Serialize for ExecutionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ExecutionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_values() {
        assert_eq!(ExecutionStatus::parse("COMPLETE"), ExecutionStatus::Complete);
        assert_eq!(
            ExecutionStatus::parse("COMPLETE_WARN"),
            ExecutionStatus::CompleteWarn
        );
        assert_eq!(ExecutionStatus::parse("INPROCESS"), ExecutionStatus::InProcess);
        assert_eq!(
            ExecutionStatus::parse("QUEUED"),
            ExecutionStatus::Unrecognized("QUEUED".to_string())
        );
    }

    #[test]
    fn test_classification_sets() {
        for status in ["ABORTED", "COMPLETE", "COMPLETE_WARN", "DISCARDED", "ERROR", "STARTED"] {
            assert!(ExecutionStatus::parse(status).is_known(), "{status}");
        }
        assert!(!ExecutionStatus::InProcess.is_known());
        assert!(!ExecutionStatus::Unknown.is_known());
        assert!(!ExecutionStatus::Pending.is_known());

        assert!(ExecutionStatus::Complete.is_success());
        assert!(ExecutionStatus::CompleteWarn.is_success());
        assert!(!ExecutionStatus::Started.is_success());

        for status in ["UNKNOWN", "ABORTED", "DISCARDED", "ERROR"] {
            assert!(ExecutionStatus::parse(status).is_terminated(), "{status}");
        }
        assert!(!ExecutionStatus::Complete.is_terminated());
        assert!(!ExecutionStatus::Pending.is_terminated());

        assert!(ExecutionStatus::InProcess.is_processing());
        assert!(!ExecutionStatus::Started.is_processing());
    }

    #[test]
    fn test_pending_sentinel_display() {
        assert_eq!(ExecutionStatus::default().to_string(), "STATUS PENDING");
    }

    #[test]
    fn test_serde_uses_wire_strings() {
        let status: ExecutionStatus = serde_json::from_str("\"ERROR\"").unwrap();
        assert_eq!(status, ExecutionStatus::Error);

        let unknown: ExecutionStatus = serde_json::from_str("\"PAUSED\"").unwrap();
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"PAUSED\"");
    }
}
