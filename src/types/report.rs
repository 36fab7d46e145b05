use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Outcome of writing a single injection sink
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SinkOutcome {
    Written,
    Failed(String),
}

impl SinkOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, SinkOutcome::Written)
    }

    /// Collapse a sink write result into an outcome, keeping the error text.
    pub fn from_result(result: Result<()>) -> Self {
        match result {
            Ok(()) => SinkOutcome::Written,
            Err(err) => SinkOutcome::Failed(err.to_string()),
        }
    }
}

impl fmt::Display for SinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkOutcome::Written => write!(f, "written"),
            SinkOutcome::Failed(msg) => write!(f, "failed: {}", msg),
        }
    }
}

/// Per-sink outcomes of one injection pass
///
/// An injection always runs every sink; a failed sink is recorded here
/// rather than aborting the pass.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InjectionReport {
    pub mock_flag: SinkOutcome,
    pub location_mirror: SinkOutcome,
    pub record_file: SinkOutcome,
    pub sentence_file: SinkOutcome,
}

impl InjectionReport {
    pub fn all_written(&self) -> bool {
        self.outcomes().iter().all(|(_, outcome)| outcome.is_written())
    }

    pub fn any_written(&self) -> bool {
        self.outcomes().iter().any(|(_, outcome)| outcome.is_written())
    }

    /// Sinks in the order they are written during injection.
    pub fn outcomes(&self) -> [(&'static str, &SinkOutcome); 4] {
        [
            ("mock-flag", &self.mock_flag),
            ("location-mirror", &self.location_mirror),
            ("record-file", &self.record_file),
            ("sentence-file", &self.sentence_file),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_all_written() {
        let report = InjectionReport {
            mock_flag: SinkOutcome::Written,
            location_mirror: SinkOutcome::Written,
            record_file: SinkOutcome::Written,
            sentence_file: SinkOutcome::Written,
        };
        assert!(report.all_written());
    }

    #[test]
    fn test_report_one_failed_sink() {
        let report = InjectionReport {
            mock_flag: SinkOutcome::Written,
            location_mirror: SinkOutcome::Failed("setprop exited with 1".to_string()),
            record_file: SinkOutcome::Written,
            sentence_file: SinkOutcome::Written,
        };
        assert!(!report.all_written());
        assert!(report.any_written());
        assert!(report.mock_flag.is_written());
        assert!(!report.location_mirror.is_written());
    }

    #[test]
    fn test_report_every_sink_failed() {
        let failed = SinkOutcome::Failed("device offline".to_string());
        let report = InjectionReport {
            mock_flag: failed.clone(),
            location_mirror: failed.clone(),
            record_file: failed.clone(),
            sentence_file: failed,
        };
        assert!(!report.all_written());
        assert!(!report.any_written());
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(SinkOutcome::Written.to_string(), "written");
        assert_eq!(
            SinkOutcome::Failed("no such file".to_string()).to_string(),
            "failed: no such file"
        );
    }
}
