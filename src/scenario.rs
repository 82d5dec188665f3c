//! Scenario comparison over a shared set of base assumptions
//!
//! A scenario is a label plus a partial override merged onto the base
//! assumptions. Each scenario is projected with the same engine used for a
//! single trajectory, and its final snapshot is turned into a retirement
//! income estimate.
//!
//! Failures are isolated per scenario: a batch always returns one entry per
//! input scenario, in input order, and an invalid override only affects its
//! own entry.

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assumptions::{non_negative_amount, ProjectionAssumptions};
use crate::error::{AssumptionField, InvalidAssumptionError, ScenarioError};
use crate::projection::{
    inflation_adjusted, monthly_retirement_income, ProjectionEngine, YearlySnapshot,
    DEFAULT_WITHDRAWAL_RATE,
};

/// Partial override merged onto the base assumptions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOverride {
    /// Nominal annual return for this scenario
    pub annual_return_rate: f64,

    /// Replaces the base contribution growth rate when set
    #[serde(default)]
    pub annual_contribution_growth_rate: Option<f64>,

    /// Annual inflation used to express the final balance in start-year dollars
    #[serde(default)]
    pub inflation_rate: Option<f64>,
}

impl ScenarioOverride {
    pub fn apply(&self, base: &ProjectionAssumptions) -> ProjectionAssumptions {
        ProjectionAssumptions {
            annual_return_rate: self.annual_return_rate,
            annual_contribution_growth_rate: self
                .annual_contribution_growth_rate
                .unwrap_or(base.annual_contribution_growth_rate),
            ..*base
        }
    }

    fn validate_inflation(&self) -> Result<(), InvalidAssumptionError> {
        match self.inflation_rate {
            Some(rate) if !rate.is_finite() || rate <= -1.0 => {
                Err(InvalidAssumptionError::new(AssumptionField::InflationRate, rate))
            }
            _ => Ok(()),
        }
    }
}

/// A named scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub label: String,
    #[serde(flatten)]
    pub overrides: ScenarioOverride,
}

impl Scenario {
    pub fn new(label: impl Into<String>, annual_return_rate: f64) -> Self {
        Self {
            label: label.into(),
            overrides: ScenarioOverride {
                annual_return_rate,
                annual_contribution_growth_rate: None,
                inflation_rate: None,
            },
        }
    }

    pub fn with_inflation(mut self, inflation_rate: f64) -> Self {
        self.overrides.inflation_rate = Some(inflation_rate);
        self
    }

    pub fn with_contribution_growth(mut self, growth_rate: f64) -> Self {
        self.overrides.annual_contribution_growth_rate = Some(growth_rate);
        self
    }

    /// Illustrative presets: Conservative 5.5%, Moderate 7.5%, Optimistic 9.5%
    pub fn presets() -> Vec<Scenario> {
        vec![
            Scenario::new("Conservative", 0.055).with_inflation(0.030),
            Scenario::new("Moderate", 0.075).with_inflation(0.025),
            Scenario::new("Optimistic", 0.095).with_inflation(0.020),
        ]
    }
}

/// Outcome of one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub label: String,

    /// Last snapshot of the projected trajectory
    pub final_snapshot: YearlySnapshot,

    /// Withdrawal rate the income estimate is based on
    pub withdrawal_rate: f64,

    /// final balance * withdrawal_rate / 12
    pub monthly_retirement_income: f64,

    /// Final balance in start-year dollars, when the scenario carries inflation
    pub inflation_adjusted_balance: Option<f64>,
}

impl ScenarioResult {
    pub fn final_value(&self) -> f64 {
        self.final_snapshot.balance
    }
}

/// Runner holding the shared base assumptions and withdrawal rate
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(base);
/// for outcome in runner.compare(&Scenario::presets()) {
///     match outcome {
///         Ok(result) => println!("{}: {:.0}", result.label, result.final_value()),
///         Err(err) => eprintln!("{err}"),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_assumptions: ProjectionAssumptions,
    withdrawal_rate: f64,
}

impl ScenarioRunner {
    /// Create runner using the 4% withdrawal rule
    pub fn new(base_assumptions: ProjectionAssumptions) -> Self {
        Self {
            base_assumptions,
            withdrawal_rate: DEFAULT_WITHDRAWAL_RATE,
        }
    }

    /// Replace the withdrawal rate; it must be finite and non-negative
    pub fn with_withdrawal_rate(mut self, withdrawal_rate: f64) -> Result<Self, InvalidAssumptionError> {
        non_negative_amount(AssumptionField::WithdrawalRate, withdrawal_rate)?;
        self.withdrawal_rate = withdrawal_rate;
        Ok(self)
    }

    /// Run a single scenario to completion
    pub fn run(&self, scenario: &Scenario) -> Result<ScenarioResult, ScenarioError> {
        let rejected = |source: InvalidAssumptionError| ScenarioError {
            label: scenario.label.clone(),
            source,
        };

        scenario.overrides.validate_inflation().map_err(rejected)?;
        let merged = scenario.overrides.apply(&self.base_assumptions);
        let final_snapshot = ProjectionEngine::new(merged).map_err(rejected)?.final_snapshot();

        let result = ScenarioResult {
            label: scenario.label.clone(),
            final_snapshot,
            withdrawal_rate: self.withdrawal_rate,
            monthly_retirement_income: monthly_retirement_income(
                final_snapshot.balance,
                self.withdrawal_rate,
            ),
            inflation_adjusted_balance: scenario
                .overrides
                .inflation_rate
                .map(|rate| inflation_adjusted(final_snapshot.balance, rate, merged.horizon_years)),
        };

        debug!(
            "Scenario '{}' at {:.2}%: final {:.2}, income {:.2}/month",
            result.label,
            merged.annual_return_rate * 100.0,
            result.final_value(),
            result.monthly_retirement_income,
        );

        Ok(result)
    }

    /// Run every scenario, in parallel, returning outcomes in input order
    pub fn compare(&self, scenarios: &[Scenario]) -> Vec<Result<ScenarioResult, ScenarioError>> {
        scenarios.par_iter().map(|scenario| self.run(scenario)).collect()
    }

    pub fn assumptions(&self) -> &ProjectionAssumptions {
        &self.base_assumptions
    }

    pub fn assumptions_mut(&mut self) -> &mut ProjectionAssumptions {
        &mut self.base_assumptions
    }

    pub fn withdrawal_rate(&self) -> f64 {
        self.withdrawal_rate
    }
}

/// Compare `scenarios` against `base_assumptions` at the given withdrawal rate.
///
/// An invalid withdrawal rate fails the whole call; invalid scenario
/// overrides fail only their own entry.
pub fn compare_scenarios(
    base_assumptions: &ProjectionAssumptions,
    scenarios: &[Scenario],
    withdrawal_rate: f64,
) -> Result<Vec<Result<ScenarioResult, ScenarioError>>, InvalidAssumptionError> {
    let runner = ScenarioRunner::new(*base_assumptions).with_withdrawal_rate(withdrawal_rate)?;
    Ok(runner.compare(scenarios))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::project;
    use approx::assert_relative_eq;

    fn base() -> ProjectionAssumptions {
        ProjectionAssumptions {
            initial_balance: 50_000.0,
            monthly_contribution: 500.0,
            annual_return_rate: 0.075,
            annual_contribution_growth_rate: 0.03,
            horizon_years: 35,
            start_year: 2025,
        }
    }

    #[test]
    fn test_presets_increase_with_return() {
        let runner = ScenarioRunner::new(base());
        let results: Vec<ScenarioResult> = runner
            .compare(&Scenario::presets())
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].label, "Conservative");
        assert_eq!(results[2].label, "Optimistic");
        assert!(results[0].final_value() < results[1].final_value());
        assert!(results[1].final_value() < results[2].final_value());
        assert_relative_eq!(results[1].final_value(), 2_103_000.517_899_088, epsilon = 1e-4);
    }

    #[test]
    fn test_order_is_preserved() {
        let scenarios = vec![
            Scenario::new("High", 0.10),
            Scenario::new("Low", 0.02),
            Scenario::new("Mid", 0.06),
        ];
        let labels: Vec<String> = ScenarioRunner::new(base())
            .compare(&scenarios)
            .into_iter()
            .map(|r| r.unwrap().label)
            .collect();
        assert_eq!(labels, vec!["High", "Low", "Mid"]);
    }

    #[test]
    fn test_final_snapshot_matches_projection() {
        let scenario = Scenario::new("Moderate", 0.075);
        let result = ScenarioRunner::new(base()).run(&scenario).unwrap();
        let projection = project(&base()).unwrap();
        assert_eq!(&result.final_snapshot, projection.snapshots.last().unwrap());
        assert_relative_eq!(
            result.monthly_retirement_income,
            result.final_value() * 0.04 / 12.0
        );
    }

    #[test]
    fn test_contribution_growth_override() {
        let runner = ScenarioRunner::new(base());
        let flat = runner
            .run(&Scenario::new("Flat", 0.075).with_contribution_growth(0.0))
            .unwrap();
        let default = runner.run(&Scenario::new("Default", 0.075)).unwrap();
        assert!(flat.final_value() < default.final_value());
        assert_relative_eq!(
            flat.final_snapshot.cumulative_contributions,
            50_000.0 + 500.0 * 12.0 * 35.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_invalid_scenario_isolated() {
        let scenarios = vec![
            Scenario::new("Good", 0.05),
            Scenario::new("Broken", f64::NAN),
            Scenario::new("Deflation", 0.05).with_inflation(-1.5),
            Scenario::new("AlsoGood", 0.07),
        ];
        let outcomes = ScenarioRunner::new(base()).compare(&scenarios);
        assert_eq!(outcomes.len(), 4);
        assert!(outcomes[0].is_ok());
        assert!(outcomes[3].is_ok());

        let broken = outcomes[1].as_ref().unwrap_err();
        assert_eq!(broken.label, "Broken");
        assert_eq!(broken.source.field, AssumptionField::AnnualReturnRate);

        let deflation = outcomes[2].as_ref().unwrap_err();
        assert_eq!(deflation.source.field, AssumptionField::InflationRate);
    }

    #[test]
    fn test_invalid_base_fails_every_scenario() {
        let mut runner = ScenarioRunner::new(base());
        runner.assumptions_mut().initial_balance = -10.0;
        let outcomes = runner.compare(&Scenario::presets());
        assert!(outcomes.iter().all(|o| matches!(
            o,
            Err(ScenarioError { source, .. }) if source.field == AssumptionField::InitialBalance
        )));
    }

    #[test]
    fn test_withdrawal_rate() {
        let results = compare_scenarios(&base(), &[Scenario::new("Moderate", 0.075)], 0.05).unwrap();
        let result = results[0].as_ref().unwrap();
        assert_eq!(result.withdrawal_rate, 0.05);
        assert_relative_eq!(result.monthly_retirement_income, result.final_value() * 0.05 / 12.0);

        let err = compare_scenarios(&base(), &Scenario::presets(), -0.01).unwrap_err();
        assert_eq!(err.field, AssumptionField::WithdrawalRate);
        assert!(ScenarioRunner::new(base()).with_withdrawal_rate(f64::NAN).is_err());
    }

    #[test]
    fn test_inflation_adjusted_balance() {
        let runner = ScenarioRunner::new(base());
        let nominal = runner.run(&Scenario::new("Nominal", 0.075)).unwrap();
        assert_eq!(nominal.inflation_adjusted_balance, None);

        let real = runner.run(&Scenario::new("Real", 0.075).with_inflation(0.025)).unwrap();
        let adjusted = real.inflation_adjusted_balance.unwrap();
        assert_relative_eq!(adjusted, real.final_value() / 1.025_f64.powi(35), max_relative = 1e-12);
        assert!(adjusted < real.final_value());
    }

    #[test]
    fn test_empty_batch() {
        assert!(ScenarioRunner::new(base()).compare(&[]).is_empty());
    }

    #[test]
    fn test_scenario_json_shape() {
        let json = r#"{"label":"Custom","annualReturnRate":0.08,"inflationRate":0.02}"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.overrides.annual_return_rate, 0.08);
        assert_eq!(scenario.overrides.annual_contribution_growth_rate, None);
        assert_eq!(scenario.overrides.inflation_rate, Some(0.02));
    }
}
