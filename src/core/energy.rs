//! Energy result types shared by the runner, the history store and the API.
//!
//! Every run reports consumption for the same five categories. The
//! `energy_breakdown` list is derived from `energy_by_type` so the two can
//! never disagree.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One of the fixed consumption categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyCategory {
    /// Space cooling
    Cooling,
    /// Space heating
    Heating,
    /// Interior lighting
    Lighting,
    /// Plug loads and equipment
    Equipment,
    /// Fans and ventilation
    Ventilation,
}

impl EnergyCategory {
    /// All categories, in presentation order.
    pub const ALL: [Self; 5] = [
        Self::Cooling,
        Self::Heating,
        Self::Lighting,
        Self::Equipment,
        Self::Ventilation,
    ];

    /// Key used in `energy_by_type`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Cooling => "cooling",
            Self::Heating => "heating",
            Self::Lighting => "lighting",
            Self::Equipment => "equipment",
            Self::Ventilation => "ventilation",
        }
    }

    /// Display name used in `energy_breakdown`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cooling => "Cooling",
            Self::Heating => "Heating",
            Self::Lighting => "Lighting",
            Self::Equipment => "Equipment",
            Self::Ventilation => "Ventilation",
        }
    }

    /// Chart color for the category.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Cooling => "#22d3ee",
            Self::Heating => "#ef4444",
            Self::Lighting => "#f59e0b",
            Self::Equipment => "#8b5cf6",
            Self::Ventilation => "#10b981",
        }
    }
}

/// Consumption per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyByType {
    /// Cooling consumption
    pub cooling: f64,
    /// Heating consumption
    pub heating: f64,
    /// Lighting consumption
    pub lighting: f64,
    /// Equipment consumption
    pub equipment: f64,
    /// Ventilation consumption
    pub ventilation: f64,
}

impl EnergyByType {
    /// Value recorded for `category`.
    #[must_use]
    pub const fn get(&self, category: EnergyCategory) -> f64 {
        match category {
            EnergyCategory::Cooling => self.cooling,
            EnergyCategory::Heating => self.heating,
            EnergyCategory::Lighting => self.lighting,
            EnergyCategory::Equipment => self.equipment,
            EnergyCategory::Ventilation => self.ventilation,
        }
    }

    /// Sum over all categories.
    #[must_use]
    pub fn total(&self) -> f64 {
        EnergyCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }

    /// Chart-oriented view, one entry per category in presentation order.
    #[must_use]
    pub fn breakdown(&self) -> Vec<BreakdownEntry> {
        EnergyCategory::ALL
            .iter()
            .map(|c| BreakdownEntry {
                name: c.label().to_string(),
                value: self.get(*c),
                color: c.color().to_string(),
            })
            .collect()
    }
}

/// A single `{name, value, color}` entry of `energy_breakdown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    /// Category label
    pub name: String,
    /// Consumption
    pub value: f64,
    /// Chart color
    pub color: String,
}

/// Why a run ended up with synthesized figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FallbackReason {
    /// No locator strategy found an executable
    ExecutableNotFound,
    /// The simulator did not finish within the timeout
    TimedOut {
        /// Configured limit
        after_secs: u64,
    },
    /// The process could not be spawned or awaited
    LaunchFailed {
        /// OS error text
        message: String,
    },
    /// Non-zero exit and nothing written to the output directory
    ExitedWithoutOutput {
        /// Exit code, if the process was not killed by a signal
        exit_code: Option<i32>,
    },
    /// Output files exist but none yielded energy figures
    NoUsableOutput {
        /// Number of candidate files inspected
        artifacts: usize,
    },
}

impl FallbackReason {
    /// Human-readable note stored alongside mock results.
    #[must_use]
    pub fn note(&self) -> String {
        match self {
            Self::ExecutableNotFound => "Mock data - EnergyPlus not installed".to_string(),
            Self::TimedOut { after_secs } => {
                format!("Mock data - EnergyPlus timed out after {after_secs}s")
            }
            Self::LaunchFailed { message } => {
                format!("Mock data - EnergyPlus could not be started: {message}")
            }
            Self::ExitedWithoutOutput { exit_code: Some(code) } => {
                format!("Mock data - EnergyPlus exited with code {code} and produced no output")
            }
            Self::ExitedWithoutOutput { exit_code: None } => {
                "Mock data - EnergyPlus was terminated and produced no output".to_string()
            }
            Self::NoUsableOutput { artifacts } => {
                format!("Mock data - no energy figures found in {artifacts} output file(s)")
            }
        }
    }
}

/// Where the figures of a run came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    /// Parsed from simulator output
    Simulator {
        /// Executable that produced the output
        executable: PathBuf,
    },
    /// Synthesized because the simulator could not deliver
    MockFallback {
        /// Why the fallback happened
        #[serde(flatten)]
        reason: FallbackReason,
    },
}

impl DataSource {
    /// True for any mock fallback.
    #[must_use]
    pub const fn is_mock(&self) -> bool {
        matches!(self, Self::MockFallback { .. })
    }
}

/// Complete outcome of a run, as returned to clients and written to `results.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    /// Always `"success"` for a completed run
    pub status: String,
    /// External id of the run
    pub simulation_id: String,
    /// Input definition file used
    pub idf_file: String,
    /// Whether the figures are synthesized
    pub used_mock_data: bool,
    /// Sum of `energy_by_type`
    pub total_energy: f64,
    /// Consumption per category
    pub energy_by_type: EnergyByType,
    /// Chart-oriented duplicate of `energy_by_type`
    pub energy_breakdown: Vec<BreakdownEntry>,
    /// Free-form details, absent when nothing was computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<serde_json::Value>,
    /// Explanation shown when mock data was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Tagged origin of the figures
    pub data_source: DataSource,
}

impl SimulationResults {
    /// Assembles a result, deriving the total, the breakdown and the mock flag.
    #[must_use]
    pub fn new(
        simulation_id: String,
        idf_file: String,
        energy_by_type: EnergyByType,
        additional_info: Option<serde_json::Value>,
        data_source: DataSource,
    ) -> Self {
        let note = match &data_source {
            DataSource::MockFallback { reason } => Some(reason.note()),
            DataSource::Simulator { .. } => None,
        };

        Self {
            status: "success".to_string(),
            simulation_id,
            idf_file,
            used_mock_data: data_source.is_mock(),
            total_energy: energy_by_type.total(),
            energy_breakdown: energy_by_type.breakdown(),
            energy_by_type,
            additional_info,
            note,
            data_source,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    fn sample() -> EnergyByType {
        EnergyByType {
            cooling: 20_000.0,
            heating: 15_000.0,
            lighting: 9_000.0,
            equipment: 6_000.0,
            ventilation: 4_000.0,
        }
    }

    #[test]
    fn test_total_is_sum_of_categories() {
        assert_eq!(sample().total(), 54_000.0);
    }

    #[test]
    fn test_breakdown_matches_by_type() {
        let by_type = sample();
        let breakdown = by_type.breakdown();
        assert_eq!(breakdown.len(), 5);
        for (entry, category) in breakdown.iter().zip(EnergyCategory::ALL) {
            assert_eq!(entry.name, category.label());
            assert_eq!(entry.value, by_type.get(category));
            assert_eq!(entry.color, category.color());
        }
    }

    #[test]
    fn test_by_type_serializes_with_category_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        for category in EnergyCategory::ALL {
            assert!(value.get(category.key()).is_some());
        }
    }

    #[test]
    fn test_mock_result_carries_note_and_flag() {
        let results = SimulationResults::new(
            "sim_00000000".to_string(),
            "default.idf".to_string(),
            sample(),
            None,
            DataSource::MockFallback {
                reason: FallbackReason::ExecutableNotFound,
            },
        );
        assert!(results.used_mock_data);
        assert_eq!(
            results.note.as_deref(),
            Some("Mock data - EnergyPlus not installed")
        );

        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json["data_source"]["kind"], "mock_fallback");
        assert_eq!(json["data_source"]["reason"], "executable_not_found");
        assert!(json.get("additional_info").is_none());
    }

    #[test]
    fn test_simulator_result_has_no_note() {
        let results = SimulationResults::new(
            "sim_00000001".to_string(),
            "in.idf".to_string(),
            sample(),
            None,
            DataSource::Simulator {
                executable: PathBuf::from("/usr/bin/energyplus"),
            },
        );
        assert!(!results.used_mock_data);
        assert!(results.note.is_none());
    }

    #[test]
    fn test_timeout_note_mentions_limit() {
        let note = FallbackReason::TimedOut { after_secs: 300 }.note();
        assert!(note.contains("300s"));
    }
}
