//! Probe outcome types

use serde::Serialize;
use strum::{AsRefStr, Display};

use super::ChannelRecord;

/// Outcome class of a single endpoint check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// Endpoint answered with a status below 400
    Working,
    /// Endpoint unreachable or answered with an error status
    Failed,
    /// Endpoint is not a usable URL; no request was made
    Invalid,
}

impl ProbeStatus {
    pub fn is_working(self) -> bool {
        self == Self::Working
    }
}

/// Result of checking one channel record
///
/// Borrows the record it describes; `index` is the record's position in the
/// probed input so callers can restore input order.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult<'a> {
    pub record: &'a ChannelRecord,
    pub index: usize,
    pub status: ProbeStatus,
    pub http_status: Option<u16>,
    pub error_detail: Option<String>,
}

/// Results partitioned by outcome class
#[derive(Debug, Default)]
pub struct ProbeSummary<'r, 'a> {
    pub working: Vec<&'r ProbeResult<'a>>,
    pub failed: Vec<&'r ProbeResult<'a>>,
    pub invalid: Vec<&'r ProbeResult<'a>>,
}

impl<'r, 'a> ProbeSummary<'r, 'a> {
    pub fn from_results(results: &'r [ProbeResult<'a>]) -> Self {
        let mut summary = Self::default();
        for result in results {
            match result.status {
                ProbeStatus::Working => summary.working.push(result),
                ProbeStatus::Failed => summary.failed.push(result),
                ProbeStatus::Invalid => summary.invalid.push(result),
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.working.len() + self.failed.len() + self.invalid.len()
    }

    /// Failed plus invalid
    pub fn not_working_count(&self) -> usize {
        self.failed.len() + self.invalid.len()
    }

    /// Share of `count` in the total, as a percentage; zero for an empty run
    pub fn percent(&self, count: usize) -> f64 {
        match self.total() {
            0 => 0.0,
            total => count as f64 / total as f64 * 100.0,
        }
    }

    /// Each class sorted by channel name, for reports
    pub fn sorted_by_name(&self) -> (Vec<&'r ProbeResult<'a>>, Vec<&'r ProbeResult<'a>>, Vec<&'r ProbeResult<'a>>) {
        let sort = |items: &[&'r ProbeResult<'a>]| {
            let mut items = items.to_vec();
            items.sort_by(|a, b| a.record.name().cmp(b.record.name()));
            items
        };
        (sort(&self.working), sort(&self.failed), sort(&self.invalid))
    }
}
