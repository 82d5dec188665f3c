//! Super Forecast - deterministic retirement balance projections
//!
//! This library provides:
//! - Year-by-year compound growth trajectories with escalating contributions
//! - Scenario comparison across return/inflation assumptions
//! - Summary metrics and 4%-rule retirement income estimates
//! - CSV scenario presets and CSV export of results

pub mod error;
pub mod assumptions;
pub mod projection;
pub mod scenario;
pub mod export;

// Re-export commonly used types
pub use error::{AssumptionField, Error, InvalidAssumptionError, Result, ScenarioError};
pub use assumptions::{AssumptionInput, ProjectionAssumptions};
pub use projection::{project, ProjectionEngine, ProjectionResult, YearlySnapshot};
pub use scenario::{compare_scenarios, Scenario, ScenarioOverride, ScenarioResult, ScenarioRunner};
