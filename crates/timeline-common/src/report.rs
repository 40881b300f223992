//! Typed per-substep outcomes aggregated into a run report.
//!
//! The batch never aborts on a substep failure; instead each substep
//! records what happened so a run can be inspected programmatically
//! rather than by scraping console output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of one substep (imagery or network) for one year.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The substep produced its output file.
    Completed {
        /// Substep-specific summary, e.g. "12/16 tiles placed (4x4)".
        detail: String,
    },
    /// A required input was absent; nothing was attempted.
    Skipped { reason: String },
    /// The substep raised an unexpected fault; its output is omitted
    /// for the year, siblings are unaffected.
    Failed { error: String },
}

impl StepOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, StepOutcome::Completed { .. })
    }
}

/// Outcomes of both substeps for a single year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearReport {
    pub year: i32,
    pub imagery: StepOutcome,
    pub network: StepOutcome,
}

impl YearReport {
    /// A year counts as successful when either substep produced output.
    pub fn any_completed(&self) -> bool {
        self.imagery.is_completed() || self.network.is_completed()
    }
}

/// Full record of one region's batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionReport {
    pub region_id: String,
    pub tile_id: String,
    pub started_at: DateTime<Utc>,
    pub years: Vec<YearReport>,
}

impl RegionReport {
    pub fn new(region_id: impl Into<String>, tile_id: impl Into<String>) -> Self {
        Self {
            region_id: region_id.into(),
            tile_id: tile_id.into(),
            started_at: Utc::now(),
            years: Vec::new(),
        }
    }

    /// Years where at least one substep completed, descending.
    pub fn available_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self
            .years
            .iter()
            .filter(|y| y.any_completed())
            .map(|y| y.year)
            .collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years
    }

    /// Years where neither substep completed.
    pub fn failed_years(&self) -> Vec<i32> {
        self.years
            .iter()
            .filter(|y| !y.any_completed())
            .map(|y| y.year)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed() -> StepOutcome {
        StepOutcome::Completed {
            detail: "ok".to_string(),
        }
    }

    fn skipped() -> StepOutcome {
        StepOutcome::Skipped {
            reason: "missing".to_string(),
        }
    }

    #[test]
    fn test_available_years_descending() {
        let mut report = RegionReport::new("hudson_yards", "hudson_yards_tile_0");
        report.years.push(YearReport {
            year: 2016,
            imagery: completed(),
            network: skipped(),
        });
        report.years.push(YearReport {
            year: 2024,
            imagery: skipped(),
            network: completed(),
        });
        report.years.push(YearReport {
            year: 2020,
            imagery: skipped(),
            network: skipped(),
        });

        assert_eq!(report.available_years(), vec![2024, 2016]);
        assert_eq!(report.failed_years(), vec![2020]);
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = StepOutcome::Failed {
            error: "decode error".to_string(),
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"status\":\"failed\""));
    }
}
