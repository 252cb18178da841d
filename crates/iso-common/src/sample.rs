//! Travel-duration samples collected over the sampling grid.

use serde::{Deserialize, Serialize};

/// Result of asking the duration source about one grid point.
///
/// Fatal source failures never become an outcome; they abort the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleOutcome {
    /// Travel duration in seconds.
    Duration(u64),
    /// Non-fatal failure, tagged with the source's status (e.g. `ZERO_RESULTS`).
    Failed(String),
}

/// One grid coordinate paired with its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub outcome: SampleOutcome,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64, outcome: SampleOutcome) -> Self {
        Self { x, y, outcome }
    }

    /// Duration in seconds, if the sample succeeded.
    pub fn duration_secs(&self) -> Option<u64> {
        match self.outcome {
            SampleOutcome::Duration(secs) => Some(secs),
            SampleOutcome::Failed(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.duration_secs().is_some()
    }
}
