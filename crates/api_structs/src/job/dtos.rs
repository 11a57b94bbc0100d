use serde::{Deserialize, Serialize};

/// Outcome of one job tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReportDTO {
    /// Appointments returned by the selection query
    pub matched: usize,
    pub sent: usize,
    /// Lost the claim to another actor or no longer eligible
    pub skipped: usize,
    pub failed: usize,
}
