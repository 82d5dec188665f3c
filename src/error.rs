//! Error types for assumption validation, scenario runs and file I/O

use std::fmt;

use thiserror::Error;

/// Identifies which assumption failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssumptionField {
    InitialBalance,
    MonthlyContribution,
    AnnualReturnRate,
    AnnualContributionGrowthRate,
    HorizonYears,
    StartYear,
    WithdrawalRate,
    InflationRate,
}

impl AssumptionField {
    /// Field name as it appears in form input and serialized assumptions
    pub fn name(self) -> &'static str {
        match self {
            AssumptionField::InitialBalance => "initialBalance",
            AssumptionField::MonthlyContribution => "monthlyContribution",
            AssumptionField::AnnualReturnRate => "annualReturnRate",
            AssumptionField::AnnualContributionGrowthRate => "annualContributionGrowthRate",
            AssumptionField::HorizonYears => "horizonYears",
            AssumptionField::StartYear => "startYear",
            AssumptionField::WithdrawalRate => "withdrawalRate",
            AssumptionField::InflationRate => "inflationRate",
        }
    }
}

impl fmt::Display for AssumptionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An input violated its constraint. Carries the offending field and value.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid assumption {field}: {value}")]
pub struct InvalidAssumptionError {
    pub field: AssumptionField,
    pub value: f64,
}

impl InvalidAssumptionError {
    pub fn new(field: AssumptionField, value: f64) -> Self {
        Self { field, value }
    }
}

/// A single scenario in a comparison batch could not be projected
#[derive(Debug, Clone, PartialEq, Error)]
#[error("scenario '{label}' rejected: {source}")]
pub struct ScenarioError {
    pub label: String,
    #[source]
    pub source: InvalidAssumptionError,
}

/// Crate-level error for the surfaces that touch files and formats
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidAssumption(#[from] InvalidAssumptionError),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_assumption_names_field() {
        let err = InvalidAssumptionError::new(AssumptionField::InitialBalance, -1.0);
        assert_eq!(err.to_string(), "invalid assumption initialBalance: -1");
    }

    #[test]
    fn test_scenario_error_keeps_source() {
        use std::error::Error as _;

        let err = ScenarioError {
            label: "Bear".to_string(),
            source: InvalidAssumptionError::new(AssumptionField::AnnualReturnRate, f64::NAN),
        };
        assert!(err.to_string().starts_with("scenario 'Bear' rejected"));
        assert!(err.source().is_some());
    }
}
