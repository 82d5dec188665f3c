//! Super Forecast CLI
//!
//! Command-line interface for running balance projections and scenario comparisons

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::warn;
use serde::Serialize;

use super_forecast::{
    assumptions::{self, AssumptionInput},
    export,
    projection::{round_currency, ProjectionSummary, DEFAULT_WITHDRAWAL_RATE},
    project, AssumptionField, InvalidAssumptionError, ProjectionAssumptions, ProjectionResult,
    ScenarioError, ScenarioResult, ScenarioRunner,
};

#[derive(Parser)]
#[command(name = "super_forecast", about = "Project superannuation balances and compare scenarios")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Project a single year-by-year trajectory
    Project {
        #[command(flatten)]
        base: BaseArgs,

        /// Nominal annual return in percent
        #[arg(long, default_value_t = assumptions::DEFAULT_ANNUAL_RETURN_RATE * 100.0)]
        annual_return: f64,

        /// Annual withdrawal rate in percent (falls back to FORECAST_WITHDRAWAL_RATE, then 4)
        #[arg(long)]
        withdrawal_rate: Option<f64>,

        /// Show every nth year in the table, plus the final year
        #[arg(long, default_value_t = 1)]
        every: u32,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Compare named return scenarios on the same base assumptions
    Compare {
        #[command(flatten)]
        base: BaseArgs,

        /// Scenario presets CSV (label,annual_return_rate,annual_contribution_growth_rate,inflation_rate).
        /// Defaults to data/scenarios.csv when present, else the built-in presets.
        #[arg(long)]
        scenarios: Option<PathBuf>,

        /// Annual withdrawal rate in percent (falls back to FORECAST_WITHDRAWAL_RATE, then 4)
        #[arg(long)]
        withdrawal_rate: Option<f64>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct BaseArgs {
    /// Starting balance
    #[arg(long, default_value_t = assumptions::DEFAULT_INITIAL_BALANCE)]
    initial_balance: f64,

    /// Contribution paid at the end of each month
    #[arg(long, default_value_t = assumptions::DEFAULT_MONTHLY_CONTRIBUTION)]
    monthly_contribution: f64,

    /// Annual increase in the monthly contribution, in percent
    #[arg(long, default_value_t = assumptions::DEFAULT_CONTRIBUTION_GROWTH_RATE * 100.0)]
    contribution_growth: f64,

    /// Years to forecast
    #[arg(long, default_value_t = f64::from(assumptions::DEFAULT_HORIZON_YEARS))]
    years: f64,

    /// Calendar year of year 0 (defaults to the current year)
    #[arg(long)]
    start_year: Option<i32>,
}

impl BaseArgs {
    fn to_assumptions(&self, annual_return_rate: f64) -> Result<ProjectionAssumptions> {
        let input = AssumptionInput {
            initial_balance: self.initial_balance,
            monthly_contribution: self.monthly_contribution,
            annual_return_rate,
            annual_contribution_growth_rate: self.contribution_growth / 100.0,
            horizon_years: self.years,
            start_year: self.start_year,
        };
        Ok(ProjectionAssumptions::try_from(input)?)
    }
}

#[derive(Args)]
struct OutputArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Also write results to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionResponse<'a> {
    #[serde(flatten)]
    result: &'a ProjectionResult,
    summary: ProjectionSummary,
    withdrawal_rate: f64,
    monthly_retirement_income: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ComparisonResponse<'a> {
    base_assumptions: &'a ProjectionAssumptions,
    withdrawal_rate: f64,
    results: Vec<ComparisonEntry<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ComparisonEntry<'a> {
    Ok(&'a ScenarioResult),
    Rejected { label: &'a str, error: String },
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Project { base, annual_return, withdrawal_rate, every, output } => {
            let base_assumptions = base.to_assumptions(annual_return / 100.0)?;
            let withdrawal_rate = resolve_withdrawal_rate(withdrawal_rate)?;
            non_negative_rate(withdrawal_rate)?;
            let result = project(&base_assumptions)?;

            if let Some(path) = &output.csv {
                export::write_trajectory_file(path, &result)
                    .with_context(|| format!("writing {}", path.display()))?;
            }

            if output.json {
                let summary = result.summary();
                let response = ProjectionResponse {
                    result: &result,
                    summary,
                    withdrawal_rate,
                    monthly_retirement_income: summary.monthly_retirement_income(withdrawal_rate),
                };
                println!("{}", serde_json::to_string(&response)?);
            } else {
                print_trajectory(&result, withdrawal_rate, every);
            }
        }
        Command::Compare { base, scenarios, withdrawal_rate, output } => {
            let base_assumptions = base.to_assumptions(assumptions::DEFAULT_ANNUAL_RETURN_RATE)?;
            let scenarios = assumptions::resolve_scenarios(scenarios.as_deref()).with_context(|| {
                let path = scenarios.as_deref().unwrap_or(Path::new(assumptions::DEFAULT_SCENARIOS_PATH));
                format!("loading scenarios from {}", path.display())
            })?;

            let withdrawal_rate = resolve_withdrawal_rate(withdrawal_rate)?;
            let runner = ScenarioRunner::new(base_assumptions).with_withdrawal_rate(withdrawal_rate)?;
            let outcomes = runner.compare(&scenarios);

            for err in outcomes.iter().filter_map(|o| o.as_ref().err()) {
                warn!("{err}");
            }

            if let Some(path) = &output.csv {
                export::write_scenarios_file(path, &outcomes)
                    .with_context(|| format!("writing {}", path.display()))?;
            }

            if output.json {
                let response = ComparisonResponse {
                    base_assumptions: runner.assumptions(),
                    withdrawal_rate: runner.withdrawal_rate(),
                    results: outcomes.iter().map(comparison_entry).collect(),
                };
                println!("{}", serde_json::to_string(&response)?);
            } else {
                print_comparison(&runner, &outcomes);
            }
        }
    }

    Ok(())
}

/// Flag (percent) wins over FORECAST_WITHDRAWAL_RATE (decimal), then the 4% rule
fn resolve_withdrawal_rate(flag_pct: Option<f64>) -> Result<f64> {
    if let Some(pct) = flag_pct {
        return Ok(pct / 100.0);
    }
    match env::var("FORECAST_WITHDRAWAL_RATE") {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .with_context(|| format!("FORECAST_WITHDRAWAL_RATE is not a number: {raw}")),
        Err(_) => Ok(DEFAULT_WITHDRAWAL_RATE),
    }
}

/// Same constraint the scenario runner applies to its withdrawal rate
fn non_negative_rate(withdrawal_rate: f64) -> Result<()> {
    if withdrawal_rate.is_finite() && withdrawal_rate >= 0.0 {
        Ok(())
    } else {
        Err(InvalidAssumptionError::new(AssumptionField::WithdrawalRate, withdrawal_rate).into())
    }
}

fn comparison_entry(outcome: &std::result::Result<ScenarioResult, ScenarioError>) -> ComparisonEntry<'_> {
    match outcome {
        Ok(result) => ComparisonEntry::Ok(result),
        Err(err) => ComparisonEntry::Rejected {
            label: &err.label,
            error: err.source.to_string(),
        },
    }
}

fn print_trajectory(result: &ProjectionResult, withdrawal_rate: f64, every: u32) {
    let a = &result.assumptions;
    println!("Super Forecast v0.1.0");
    println!("=====================\n");
    println!("  Initial Balance:      ${:.2}", a.initial_balance);
    println!("  Monthly Contribution: ${:.2}", a.monthly_contribution);
    println!("  Annual Return:        {:.2}%", a.annual_return_rate * 100.0);
    println!("  Contribution Growth:  {:.2}%", a.annual_contribution_growth_rate * 100.0);
    println!("  Years:                {}", a.horizon_years);
    println!();

    println!("{:>5} {:>6} {:>16} {:>16} {:>16}", "Year", "Cal", "Balance", "Contributions", "Growth");
    println!("{}", "-".repeat(63));
    for snap in result.milestones(every).into_iter().map(|s| s.rounded()) {
        println!(
            "{:>5} {:>6} {:>16.0} {:>16.0} {:>16.0}",
            snap.year_index, snap.calendar_year, snap.balance, snap.cumulative_contributions, snap.growth,
        );
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Final Value:          ${:.0}", round_currency(summary.final_value));
    println!("  Total Contributions:  ${:.0}", round_currency(summary.total_contributions));
    println!("  Total Growth:         ${:.0}", round_currency(summary.total_growth));
    let income_label = format!("Monthly Income ({:.2}%):", withdrawal_rate * 100.0);
    println!(
        "  {:<22}${:.0}",
        income_label,
        round_currency(summary.monthly_retirement_income(withdrawal_rate))
    );
}

fn print_comparison(
    runner: &ScenarioRunner,
    outcomes: &[std::result::Result<ScenarioResult, ScenarioError>],
) {
    println!(
        "Scenario Comparison ({} years, {:.2}% withdrawal rate)",
        runner.assumptions().horizon_years,
        runner.withdrawal_rate() * 100.0,
    );
    println!("{:<16} {:>16} {:>14} {:>18}", "Scenario", "Final Value", "Monthly Inc", "Today's Dollars");
    println!("{}", "-".repeat(67));
    for outcome in outcomes {
        match outcome {
            Ok(result) => {
                let real = result
                    .inflation_adjusted_balance
                    .map(|v| format!("{:.0}", round_currency(v)))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<16} {:>16.0} {:>14.0} {:>18}",
                    result.label,
                    round_currency(result.final_value()),
                    round_currency(result.monthly_retirement_income),
                    real,
                );
            }
            Err(err) => println!("{:<16} rejected: {}", err.label, err.source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_flags() {
        let cli = Cli::try_parse_from(["super_forecast", "project", "--withdrawal-rate", "3.5", "--every", "5"]).unwrap();
        match cli.command {
            Command::Project { withdrawal_rate, every, .. } => {
                assert_eq!(withdrawal_rate, Some(3.5));
                assert_eq!(every, 5);
            }
            Command::Compare { .. } => panic!("expected project"),
        }

        let cli = Cli::try_parse_from(["super_forecast", "project"]).unwrap();
        assert!(matches!(cli.command, Command::Project { withdrawal_rate: None, every: 1, .. }));
    }

    #[test]
    fn test_withdrawal_flag_is_percent() {
        assert_eq!(resolve_withdrawal_rate(Some(5.0)).unwrap(), 0.05);
    }

    #[test]
    fn test_withdrawal_rate_bounds() {
        assert!(non_negative_rate(0.0).is_ok());
        assert!(non_negative_rate(0.035).is_ok());
        assert!(non_negative_rate(-0.01).is_err());
        assert!(non_negative_rate(f64::NAN).is_err());
    }
}
