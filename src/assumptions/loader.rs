//! CSV-based scenario preset loader
//!
//! Loads named return/inflation scenarios from data/scenarios.csv

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::scenario::{Scenario, ScenarioOverride};

/// Default path to the scenario presets file
pub const DEFAULT_SCENARIOS_PATH: &str = "data/scenarios.csv";

/// Raw CSV row. Empty optional columns mean "keep the base assumption".
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    label: String,
    annual_return_rate: f64,
    #[serde(default)]
    annual_contribution_growth_rate: Option<f64>,
    #[serde(default)]
    inflation_rate: Option<f64>,
}

impl CsvRow {
    fn into_scenario(self) -> Result<Scenario> {
        let label = self.label.trim();
        if label.is_empty() {
            return Err(Error::Config("scenario label must not be empty".to_string()));
        }

        Ok(Scenario {
            label: label.to_string(),
            overrides: ScenarioOverride {
                annual_return_rate: self.annual_return_rate,
                annual_contribution_growth_rate: self.annual_contribution_growth_rate,
                inflation_rate: self.inflation_rate,
            },
        })
    }
}

/// Load scenarios from a CSV file, keeping file order
pub fn load_scenarios(path: &Path) -> Result<Vec<Scenario>> {
    let file = File::open(path)?;
    let scenarios = read_scenarios(file)?;
    debug!("Loaded {} scenarios from {}", scenarios.len(), path.display());
    Ok(scenarios)
}

/// Load scenarios from the default location
pub fn load_default_scenarios() -> Result<Vec<Scenario>> {
    load_scenarios(Path::new(DEFAULT_SCENARIOS_PATH))
}

/// Scenarios for a comparison run: the explicit file when given, else the
/// default presets file when it exists, else the built-in presets.
pub fn resolve_scenarios(path: Option<&Path>) -> Result<Vec<Scenario>> {
    match path {
        Some(path) => load_scenarios(path),
        None if Path::new(DEFAULT_SCENARIOS_PATH).is_file() => load_default_scenarios(),
        None => {
            debug!("{} not found, using built-in presets", DEFAULT_SCENARIOS_PATH);
            Ok(Scenario::presets())
        }
    }
}

/// Parse scenarios from any CSV source with a header row
pub fn read_scenarios<R: Read>(source: R) -> Result<Vec<Scenario>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut scenarios = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        scenarios.push(row?.into_scenario()?);
    }

    if scenarios.is_empty() {
        return Err(Error::Config("no scenarios found".to_string()));
    }

    Ok(scenarios)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_scenarios_keeps_order_and_blanks() {
        let data = "\
label,annual_return_rate,annual_contribution_growth_rate,inflation_rate
Conservative,0.055,,0.03
Moderate,0.075,0.02,
Optimistic,0.095,,
";
        let scenarios = read_scenarios(data.as_bytes()).unwrap();
        assert_eq!(scenarios.len(), 3);
        assert_eq!(scenarios[0].label, "Conservative");
        assert_eq!(scenarios[0].overrides.annual_contribution_growth_rate, None);
        assert_eq!(scenarios[0].overrides.inflation_rate, Some(0.03));
        assert_eq!(scenarios[1].overrides.annual_contribution_growth_rate, Some(0.02));
        assert_eq!(scenarios[2].overrides.annual_return_rate, 0.095);
    }

    #[test]
    fn test_read_scenarios_rejects_bad_rate() {
        let data = "label,annual_return_rate\nBroken,abc\n";
        assert!(matches!(read_scenarios(data.as_bytes()), Err(Error::Csv(_))));
    }

    #[test]
    fn test_read_scenarios_rejects_empty_file() {
        let data = "label,annual_return_rate\n";
        assert!(matches!(read_scenarios(data.as_bytes()), Err(Error::Config(_))));
    }

    #[test]
    fn test_bundled_file_matches_builtin_presets() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_SCENARIOS_PATH);
        assert_eq!(resolve_scenarios(Some(&path)).unwrap(), Scenario::presets());
    }

    #[test]
    fn test_resolve_without_path_yields_presets() {
        // Either the bundled file (when run from the crate root) or the built-in copy
        assert_eq!(resolve_scenarios(None).unwrap(), Scenario::presets());
    }

    #[test]
    fn test_resolve_explicit_missing_file_is_error() {
        let missing = Path::new("no/such/scenarios.csv");
        assert!(matches!(resolve_scenarios(Some(missing)), Err(Error::Io(_))));
    }

    #[test]
    fn test_read_scenarios_rejects_blank_label() {
        let data = "label,annual_return_rate\n  ,0.05\n";
        assert!(matches!(read_scenarios(data.as_bytes()), Err(Error::Config(_))));
    }
}
