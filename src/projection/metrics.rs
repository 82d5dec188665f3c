//! Summary metrics derived from a computed trajectory
//!
//! Stateless helpers over already-computed snapshots. An empty slice yields 0.0.

use super::snapshot::YearlySnapshot;

/// Annual withdrawal rate of the "4% rule"
pub const DEFAULT_WITHDRAWAL_RATE: f64 = 0.04;

/// Balance of the last snapshot
pub fn final_value(snapshots: &[YearlySnapshot]) -> f64 {
    snapshots.last().map(|s| s.balance).unwrap_or(0.0)
}

/// Cumulative contributions of the last snapshot
pub fn total_contributions(snapshots: &[YearlySnapshot]) -> f64 {
    snapshots.last().map(|s| s.cumulative_contributions).unwrap_or(0.0)
}

/// Final value minus total contributions
pub fn total_growth(snapshots: &[YearlySnapshot]) -> f64 {
    final_value(snapshots) - total_contributions(snapshots)
}

/// Monthly income from drawing `withdrawal_rate` of `final_value` per year
pub fn monthly_retirement_income(final_value: f64, withdrawal_rate: f64) -> f64 {
    final_value * withdrawal_rate / 12.0
}

/// Express `value`, reached after `years`, in start-year dollars
pub fn inflation_adjusted(value: f64, inflation_rate: f64, years: u32) -> f64 {
    value / (1.0 + inflation_rate).powf(f64::from(years))
}

/// Round to whole currency units, halves away from zero
pub fn round_currency(value: f64) -> f64 {
    value.round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn snap(year_index: u32, balance: f64, cumulative_contributions: f64) -> YearlySnapshot {
        YearlySnapshot {
            year_index,
            calendar_year: 2025 + year_index as i32,
            balance,
            cumulative_contributions,
            growth: balance - cumulative_contributions,
        }
    }

    #[test]
    fn test_summary_helpers_use_last_snapshot() {
        let snaps = [snap(0, 100.0, 100.0), snap(1, 250.0, 200.0)];
        assert_eq!(final_value(&snaps), 250.0);
        assert_eq!(total_contributions(&snaps), 200.0);
        assert_eq!(total_growth(&snaps), 50.0);
    }

    #[test]
    fn test_empty_snapshots() {
        assert_eq!(final_value(&[]), 0.0);
        assert_eq!(total_contributions(&[]), 0.0);
        assert_eq!(total_growth(&[]), 0.0);
    }

    #[test]
    fn test_four_percent_rule_income() {
        let income = monthly_retirement_income(920_000.0, DEFAULT_WITHDRAWAL_RATE);
        assert_relative_eq!(income, 3066.666_666_666_666_5, epsilon = 1e-9);
        assert_eq!((income * 100.0).round() / 100.0, 3066.67);
    }

    #[test]
    fn test_inflation_adjusted() {
        assert_relative_eq!(inflation_adjusted(1_000.0, 0.0, 30), 1_000.0);
        assert_relative_eq!(inflation_adjusted(1_102.5, 0.05, 2), 1_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_round_currency() {
        assert_eq!(round_currency(57_860.5), 57_861.0);
        assert_eq!(round_currency(1_861.49), 1_861.0);
        assert_eq!(round_currency(-2.5), -3.0);
    }
}
