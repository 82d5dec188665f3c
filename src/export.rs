//! CSV export of projection trajectories and scenario comparisons
//!
//! Amounts are written rounded to whole currency units, the same way they
//! are presented on screen.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::error::{Result, ScenarioError};
use crate::projection::{round_currency, ProjectionResult};
use crate::scenario::ScenarioResult;

#[derive(Serialize)]
struct TrajectoryRow {
    #[serde(rename = "Year")]
    year_index: u32,
    #[serde(rename = "CalendarYear")]
    calendar_year: i32,
    #[serde(rename = "Balance")]
    balance: f64,
    #[serde(rename = "Contributions")]
    cumulative_contributions: f64,
    #[serde(rename = "Growth")]
    growth: f64,
}

#[derive(Serialize)]
struct ScenarioRow<'a> {
    #[serde(rename = "Scenario")]
    label: &'a str,
    #[serde(rename = "FinalValue")]
    final_value: Option<f64>,
    #[serde(rename = "TotalContributions")]
    total_contributions: Option<f64>,
    #[serde(rename = "TotalGrowth")]
    total_growth: Option<f64>,
    #[serde(rename = "MonthlyIncome")]
    monthly_income: Option<f64>,
    #[serde(rename = "InflationAdjustedValue")]
    inflation_adjusted_value: Option<f64>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// Write one row per yearly snapshot
pub fn write_trajectory<W: Write>(writer: W, result: &ProjectionResult) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for snapshot in result.snapshots.iter().map(|s| s.rounded()) {
        csv_writer.serialize(TrajectoryRow {
            year_index: snapshot.year_index,
            calendar_year: snapshot.calendar_year,
            balance: snapshot.balance,
            cumulative_contributions: snapshot.cumulative_contributions,
            growth: snapshot.growth,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write one row per scenario outcome; rejected scenarios carry the error text
pub fn write_scenarios<W: Write>(
    writer: W,
    outcomes: &[std::result::Result<ScenarioResult, ScenarioError>],
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for outcome in outcomes {
        let row = match outcome {
            Ok(result) => {
                let last = result.final_snapshot.rounded();
                ScenarioRow {
                    label: &result.label,
                    final_value: Some(last.balance),
                    total_contributions: Some(last.cumulative_contributions),
                    total_growth: Some(last.growth),
                    monthly_income: Some(round_currency(result.monthly_retirement_income)),
                    inflation_adjusted_value: result.inflation_adjusted_balance.map(round_currency),
                    error: None,
                }
            }
            Err(err) => ScenarioRow {
                label: &err.label,
                final_value: None,
                total_contributions: None,
                total_growth: None,
                monthly_income: None,
                inflation_adjusted_value: None,
                error: Some(err.source.to_string()),
            },
        };
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write a trajectory to a CSV file
pub fn write_trajectory_file(path: &Path, result: &ProjectionResult) -> Result<()> {
    write_trajectory(File::create(path)?, result)?;
    info!("Trajectory written to {}", path.display());
    Ok(())
}

/// Write a scenario comparison to a CSV file
pub fn write_scenarios_file(
    path: &Path,
    outcomes: &[std::result::Result<ScenarioResult, ScenarioError>],
) -> Result<()> {
    write_scenarios(File::create(path)?, outcomes)?;
    info!("Scenario comparison written to {}", path.display());
    Ok(())
}
