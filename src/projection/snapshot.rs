//! Output structures for projections

use serde::{Deserialize, Serialize};

use crate::assumptions::ProjectionAssumptions;
use super::metrics::{self, round_currency};

/// Projected position at the end of one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySnapshot {
    /// 0-based offset from the start
    pub year_index: u32,

    /// start_year + year_index
    pub calendar_year: i32,

    /// Total account value
    pub balance: f64,

    /// Initial balance plus all contributions up to and including this year
    pub cumulative_contributions: f64,

    /// balance - cumulative_contributions
    pub growth: f64,
}

impl YearlySnapshot {
    /// Whole-currency copy for display. Each amount is rounded from its
    /// unrounded value, so growth may differ by one from the rounded
    /// balance minus rounded contributions.
    pub fn rounded(&self) -> Self {
        Self {
            year_index: self.year_index,
            calendar_year: self.calendar_year,
            balance: round_currency(self.balance),
            cumulative_contributions: round_currency(self.cumulative_contributions),
            growth: round_currency(self.growth),
        }
    }
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    /// Assumptions the trajectory was computed from
    pub assumptions: ProjectionAssumptions,

    /// One snapshot per year, year 0 first
    pub snapshots: Vec<YearlySnapshot>,
}

impl ProjectionResult {
    pub fn new(assumptions: ProjectionAssumptions) -> Self {
        Self {
            assumptions,
            snapshots: Vec::with_capacity(assumptions.horizon_years as usize + 1),
        }
    }

    pub fn add_snapshot(&mut self, snapshot: YearlySnapshot) {
        self.snapshots.push(snapshot);
    }

    /// Every `every`-th year plus the final year, as a breakdown table shows
    /// them. `every` of 0 or 1 keeps every year.
    pub fn milestones(&self, every: u32) -> Vec<&YearlySnapshot> {
        let every = every.max(1);
        let last = self.snapshots.len().saturating_sub(1);
        self.snapshots
            .iter()
            .enumerate()
            .filter(|(i, s)| s.year_index % every == 0 || *i == last)
            .map(|(_, s)| s)
            .collect()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        ProjectionSummary {
            years: self.assumptions.horizon_years,
            final_value: metrics::final_value(&self.snapshots),
            total_contributions: metrics::total_contributions(&self.snapshots),
            total_growth: metrics::total_growth(&self.snapshots),
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub years: u32,
    pub final_value: f64,
    pub total_contributions: f64,
    pub total_growth: f64,
}

impl ProjectionSummary {
    /// Monthly income available from the final value at the given withdrawal rate
    pub fn monthly_retirement_income(&self, withdrawal_rate: f64) -> f64 {
        metrics::monthly_retirement_income(self.final_value, withdrawal_rate)
    }
}
