//! Running state of a projection between monthly steps

use crate::assumptions::ProjectionAssumptions;
use super::snapshot::YearlySnapshot;

/// Months in a projection year
pub const MONTHS_PER_YEAR: u32 = 12;

/// State of the account at a point in time during projection.
///
/// All amounts stay unrounded; rounding belongs to presentation.
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Completed projection years (0 before the first month is applied)
    pub year_index: u32,

    /// Account balance
    pub balance: f64,

    /// Initial balance plus every contribution paid so far
    pub cumulative_contributions: f64,

    /// Contribution paid at the end of each month of the current year
    pub monthly_contribution: f64,

    /// Simple monthly rate: annual rate / 12, not the compounded equivalent
    pub monthly_return_rate: f64,

    /// Contribution escalation applied at each anniversary
    pub contribution_growth_rate: f64,
}

impl ProjectionState {
    /// Initialize state at year 0, before any growth or contribution
    pub fn from_assumptions(assumptions: &ProjectionAssumptions) -> Self {
        Self {
            year_index: 0,
            balance: assumptions.initial_balance,
            cumulative_contributions: assumptions.initial_balance,
            monthly_contribution: assumptions.monthly_contribution,
            monthly_return_rate: assumptions.annual_return_rate / f64::from(MONTHS_PER_YEAR),
            contribution_growth_rate: assumptions.annual_contribution_growth_rate,
        }
    }

    /// Apply one month: grow the balance, then pay the end-of-month contribution
    pub fn advance_month(&mut self) {
        self.balance = self.balance * (1.0 + self.monthly_return_rate) + self.monthly_contribution;
        self.cumulative_contributions += self.monthly_contribution;
    }

    /// Run the twelve months of the next year and close it out.
    ///
    /// The contribution increase happens after the year completes, so it
    /// only affects contributions paid in the following year.
    pub fn advance_year(&mut self) {
        for _ in 0..MONTHS_PER_YEAR {
            self.advance_month();
        }
        self.monthly_contribution *= 1.0 + self.contribution_growth_rate;
        self.year_index += 1;
    }

    /// Investment return accumulated so far
    pub fn growth(&self) -> f64 {
        self.balance - self.cumulative_contributions
    }

    /// Capture the current year-end position
    pub fn snapshot(&self, start_year: i32) -> YearlySnapshot {
        YearlySnapshot {
            year_index: self.year_index,
            calendar_year: start_year.saturating_add_unsigned(self.year_index),
            balance: self.balance,
            cumulative_contributions: self.cumulative_contributions,
            growth: self.growth(),
        }
    }
}
