//! Projection engine for yearly balance trajectories

mod state;
mod engine;
mod snapshot;
pub mod metrics;

pub use state::{ProjectionState, MONTHS_PER_YEAR};
pub use engine::{project, ProjectionEngine};
pub use snapshot::{ProjectionResult, ProjectionSummary, YearlySnapshot};
pub use metrics::{
    final_value, inflation_adjusted, monthly_retirement_income, round_currency,
    total_contributions, total_growth, DEFAULT_WITHDRAWAL_RATE,
};
