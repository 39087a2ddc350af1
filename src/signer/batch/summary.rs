//! Batch progress events and aggregated results.

use crate::signer::job::JobResult;
use serde::Serialize;
use std::fmt;

/// Progress reported while a batch runs, in emission order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchEvent {
    /// Free-text progress line
    Log(String),
    /// Non-blocking warning, e.g. an empty password
    Warning(String),
    /// One artifact finished; emitted in worklist order
    Job(JobResult),
    /// Batch finished; always the last event
    Finished(BatchSummary),
}

/// How a finished batch went overall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchVerdict {
    AllSigned,
    Partial,
    AllFailed,
}

/// Success and failure counts for a batch.
///
/// `success_count + failure_count` always equals the number of artifacts
/// processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub success_count: usize,
    pub failure_count: usize,
}

impl BatchSummary {
    /// Folds job results into counts.
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a JobResult>) -> Self {
        results.into_iter().fold(Self::default(), |mut summary, result| {
            summary.record(result);
            summary
        })
    }

    /// Adds one result to the counts.
    pub fn record(&mut self, result: &JobResult) {
        if result.is_success() {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.success_count + self.failure_count
    }

    pub fn verdict(&self) -> BatchVerdict {
        match (self.success_count, self.failure_count) {
            (_, 0) => BatchVerdict::AllSigned,
            (0, _) => BatchVerdict::AllFailed,
            _ => BatchVerdict::Partial,
        }
    }

    /// Closing notification for the operator.
    pub fn notification(&self) -> String {
        match self.verdict() {
            BatchVerdict::AllSigned => {
                format!("All {} file(s) signed successfully!", self.success_count)
            }
            BatchVerdict::Partial => format!(
                "Signed {} file(s) successfully. {} file(s) failed.",
                self.success_count, self.failure_count
            ),
            BatchVerdict::AllFailed => {
                format!("All {} file(s) failed to sign.", self.failure_count)
            }
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Complete: {} succeeded, {} failed",
            self.success_count, self.failure_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::job::JobOutcome;

    #[test]
    fn counts_cover_every_result() {
        let results = vec![
            JobResult::new("a.exe", JobOutcome::Signed),
            JobResult::new("b.dll", JobOutcome::NotFound),
            JobResult::new("c.msi", JobOutcome::Timeout),
            JobResult::new("d.sys", JobOutcome::ToolFailure("bad".into())),
        ];
        let summary = BatchSummary::from_results(&results);
        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.failure_count, 3);
        assert_eq!(summary.total(), results.len());
        assert_eq!(summary.verdict(), BatchVerdict::Partial);
    }

    #[test]
    fn verdicts() {
        let all = BatchSummary {
            success_count: 3,
            failure_count: 0,
        };
        assert_eq!(all.verdict(), BatchVerdict::AllSigned);
        assert_eq!(all.notification(), "All 3 file(s) signed successfully!");

        let none = BatchSummary {
            success_count: 0,
            failure_count: 2,
        };
        assert_eq!(none.verdict(), BatchVerdict::AllFailed);
        assert_eq!(none.to_string(), "Complete: 0 succeeded, 2 failed");
    }
}
