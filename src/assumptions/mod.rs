//! Projection assumptions and their validation
//!
//! `ProjectionAssumptions` is the strictly-typed record the engine runs on.
//! `AssumptionInput` is the loose shape that arrives from form fields or JSON,
//! where every number (the horizon included) is an `f64`; converting it
//! checks every constraint once.

pub mod loader;

pub use loader::{
    load_default_scenarios, load_scenarios, read_scenarios, resolve_scenarios, DEFAULT_SCENARIOS_PATH,
};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::{AssumptionField, InvalidAssumptionError};

/// Default starting balance used by the forecasting form
pub const DEFAULT_INITIAL_BALANCE: f64 = 50_000.0;

/// Default monthly contribution used by the forecasting form
pub const DEFAULT_MONTHLY_CONTRIBUTION: f64 = 500.0;

/// Default nominal annual return (moderate scenario)
pub const DEFAULT_ANNUAL_RETURN_RATE: f64 = 0.075;

/// Default annual increase applied to the monthly contribution
pub const DEFAULT_CONTRIBUTION_GROWTH_RATE: f64 = 0.03;

/// Default horizon: age 30 to retirement at 65
pub const DEFAULT_HORIZON_YEARS: u32 = 35;

/// Current calendar year, used as the year-0 label when none is given
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Validated inputs for a single projection run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionAssumptions {
    /// Starting account balance
    pub initial_balance: f64,

    /// Contribution paid at the end of every month of year 1
    pub monthly_contribution: f64,

    /// Nominal annual return as a decimal fraction (0.075 = 7.5%)
    pub annual_return_rate: f64,

    /// Increase applied to the monthly contribution at each anniversary
    pub annual_contribution_growth_rate: f64,

    /// Years to project; year 0 is the starting point
    pub horizon_years: u32,

    /// Calendar label for year 0 (display only)
    #[serde(default = "current_year")]
    pub start_year: i32,
}

impl Default for ProjectionAssumptions {
    fn default() -> Self {
        Self {
            initial_balance: DEFAULT_INITIAL_BALANCE,
            monthly_contribution: DEFAULT_MONTHLY_CONTRIBUTION,
            annual_return_rate: DEFAULT_ANNUAL_RETURN_RATE,
            annual_contribution_growth_rate: DEFAULT_CONTRIBUTION_GROWTH_RATE,
            horizon_years: DEFAULT_HORIZON_YEARS,
            start_year: current_year(),
        }
    }
}

impl ProjectionAssumptions {
    /// Build and validate a set of assumptions
    pub fn new(
        initial_balance: f64,
        monthly_contribution: f64,
        annual_return_rate: f64,
        annual_contribution_growth_rate: f64,
        horizon_years: u32,
        start_year: i32,
    ) -> Result<Self, InvalidAssumptionError> {
        let assumptions = Self {
            initial_balance,
            monthly_contribution,
            annual_return_rate,
            annual_contribution_growth_rate,
            horizon_years,
            start_year,
        };
        assumptions.validate()?;
        Ok(assumptions)
    }

    /// Check every field against its constraint, in declaration order.
    ///
    /// Monetary amounts must be finite and non-negative. Rates may be
    /// negative (contraction) but must be finite. Contribution growth below
    /// -100% would turn contributions negative, so it is bounded at -1.0.
    /// The horizon is already a non-negative integer by type.
    pub fn validate(&self) -> Result<(), InvalidAssumptionError> {
        non_negative_amount(AssumptionField::InitialBalance, self.initial_balance)?;
        non_negative_amount(AssumptionField::MonthlyContribution, self.monthly_contribution)?;
        finite_rate(AssumptionField::AnnualReturnRate, self.annual_return_rate)?;
        contribution_growth_rate(self.annual_contribution_growth_rate)?;
        Ok(())
    }
}

/// Loosely-typed assumptions as entered in a form or posted as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssumptionInput {
    pub initial_balance: f64,
    pub monthly_contribution: f64,
    pub annual_return_rate: f64,
    #[serde(default)]
    pub annual_contribution_growth_rate: f64,
    pub horizon_years: f64,
    #[serde(default)]
    pub start_year: Option<i32>,
}

impl TryFrom<AssumptionInput> for ProjectionAssumptions {
    type Error = InvalidAssumptionError;

    fn try_from(input: AssumptionInput) -> Result<Self, Self::Error> {
        let horizon = input.horizon_years;
        if !horizon.is_finite() || horizon < 0.0 || horizon.fract() != 0.0 || horizon > f64::from(u32::MAX) {
            return Err(InvalidAssumptionError::new(AssumptionField::HorizonYears, horizon));
        }

        ProjectionAssumptions::new(
            input.initial_balance,
            input.monthly_contribution,
            input.annual_return_rate,
            input.annual_contribution_growth_rate,
            horizon as u32,
            input.start_year.unwrap_or_else(current_year),
        )
    }
}

pub(crate) fn non_negative_amount(
    field: AssumptionField,
    value: f64,
) -> Result<(), InvalidAssumptionError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(InvalidAssumptionError::new(field, value))
    }
}

fn contribution_growth_rate(value: f64) -> Result<(), InvalidAssumptionError> {
    if value.is_finite() && value >= -1.0 {
        Ok(())
    } else {
        Err(InvalidAssumptionError::new(AssumptionField::AnnualContributionGrowthRate, value))
    }
}

pub(crate) fn finite_rate(field: AssumptionField, value: f64) -> Result<(), InvalidAssumptionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InvalidAssumptionError::new(field, value))
    }
}
