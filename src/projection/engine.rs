//! Core projection engine for yearly balance trajectories

use log::debug;

use crate::assumptions::ProjectionAssumptions;
use crate::error::InvalidAssumptionError;
use super::snapshot::{ProjectionResult, YearlySnapshot};
use super::state::ProjectionState;

/// Main projection engine.
///
/// Holds a validated copy of the assumptions; construction is the single
/// point where inputs are checked, so `project` itself cannot fail.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    assumptions: ProjectionAssumptions,
}

impl ProjectionEngine {
    /// Create a new projection engine, validating the assumptions
    pub fn new(assumptions: ProjectionAssumptions) -> Result<Self, InvalidAssumptionError> {
        assumptions.validate()?;
        Ok(Self { assumptions })
    }

    pub fn assumptions(&self) -> &ProjectionAssumptions {
        &self.assumptions
    }

    /// Run the projection: year 0 as given, then one snapshot per year
    /// of twelve monthly steps.
    pub fn project(&self) -> ProjectionResult {
        let start_year = self.assumptions.start_year;
        let mut result = ProjectionResult::new(self.assumptions);
        let state = self.roll_forward(|state| result.add_snapshot(state.snapshot(start_year)));

        debug!(
            "Projected {} years from {:.2}: final balance {:.2}, contributions {:.2}",
            self.assumptions.horizon_years,
            self.assumptions.initial_balance,
            state.balance,
            state.cumulative_contributions,
        );

        result
    }

    /// Position at the end of the horizon, without keeping the trajectory
    pub fn final_snapshot(&self) -> YearlySnapshot {
        self.roll_forward(|_| {}).snapshot(self.assumptions.start_year)
    }

    /// Walk the horizon year by year, calling `on_year_end` for year 0 and
    /// after every completed year. Returns the state at the end of the horizon.
    fn roll_forward(&self, mut on_year_end: impl FnMut(&ProjectionState)) -> ProjectionState {
        let mut state = ProjectionState::from_assumptions(&self.assumptions);
        on_year_end(&state);

        for _year in 1..=self.assumptions.horizon_years {
            state.advance_year();
            on_year_end(&state);
        }

        state
    }
}

/// Validate `assumptions` and compute the yearly trajectory.
///
/// Returns `horizon_years + 1` snapshots in ascending year order. Identical
/// inputs always produce bit-identical output.
pub fn project(assumptions: &ProjectionAssumptions) -> Result<ProjectionResult, InvalidAssumptionError> {
    Ok(ProjectionEngine::new(*assumptions)?.project())
}
