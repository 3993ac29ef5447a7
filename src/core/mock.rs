//! Synthesized energy figures used when no real simulator output is available.

use crate::core::energy::{EnergyByType, EnergyCategory};
use rand::Rng;
use serde_json::{Value, json};
use std::ops::RangeInclusive;

/// Floor area the mock building is assumed to have, in square meters.
pub const MOCK_FLOOR_AREA_M2: u64 = 4_500;

/// Divisor used for the energy-use intensity figure.
const EUI_DIVISOR: f64 = 45.0;

/// Inclusive sampling range for a category.
#[must_use]
pub const fn category_range(category: EnergyCategory) -> RangeInclusive<u32> {
    match category {
        EnergyCategory::Cooling => 15_000..=25_000,
        EnergyCategory::Heating => 10_000..=20_000,
        EnergyCategory::Lighting => 7_000..=15_000,
        EnergyCategory::Equipment => 5_000..=12_000,
        EnergyCategory::Ventilation => 3_000..=8_000,
    }
}

/// Whole-kWh readings, one per category in [`EnergyCategory::ALL`] order.
pub type MockReadings = [u32; 5];

/// Samples every category independently from its range.
pub fn sample_readings<R: Rng>(rng: &mut R) -> MockReadings {
    EnergyCategory::ALL.map(|category| rng.random_range(category_range(category)))
}

/// Sum of the readings. Range maxima add up to well under `u32::MAX`.
#[must_use]
pub fn readings_total(readings: &MockReadings) -> u32 {
    readings.iter().sum()
}

/// Converts readings into per-category figures.
#[must_use]
pub fn readings_to_energy(readings: &MockReadings) -> EnergyByType {
    let [cooling, heating, lighting, equipment, ventilation] = readings.map(f64::from);
    EnergyByType {
        cooling,
        heating,
        lighting,
        equipment,
        ventilation,
    }
}

/// Descriptive details attached to mock results.
pub fn mock_additional_info<R: Rng>(rng: &mut R, total_kwh: u32) -> Value {
    let eui = (f64::from(total_kwh) / EUI_DIVISOR * 100.0).round() / 100.0;
    json!({
        "floor_area": format!("{} m²", format_thousands(MOCK_FLOOR_AREA_M2)),
        "total_consumption": format!("{} kWh", format_thousands(u64::from(total_kwh))),
        "eui": eui,
        "simulation_hours": rng.random_range(8_000..=8_760),
    })
}

/// Produces a full set of mock figures plus their additional info.
#[must_use]
pub fn generate_mock_energy() -> (EnergyByType, Value) {
    let mut rng = rand::rng();
    let readings = sample_readings(&mut rng);
    let info = mock_additional_info(&mut rng, readings_total(&readings));
    (readings_to_energy(&readings), info)
}

/// Formats an integer with comma thousands separators (`54321` -> `54,321`).
#[must_use]
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_samples_stay_in_range() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let readings = sample_readings(&mut rng);
            let energy = readings_to_energy(&readings);
            for (category, reading) in EnergyCategory::ALL.into_iter().zip(readings) {
                let range = category_range(category);
                assert!(
                    range.contains(&reading),
                    "{} = {reading} outside {range:?}",
                    category.key()
                );
                assert_eq!(energy.get(category), f64::from(reading));
            }
            assert_eq!(energy.total(), f64::from(readings_total(&readings)));
        }
    }

    #[test]
    fn test_generated_info_matches_total() {
        let (energy, info) = generate_mock_energy();
        let total = energy.total();
        assert_eq!(info["floor_area"], "4,500 m²");
        let shown = info["total_consumption"].as_str().unwrap();
        let digits: String = shown.trim_end_matches(" kWh").replace(',', "");
        assert_eq!(digits.parse::<f64>().unwrap(), total);
        let eui = info["eui"].as_f64().unwrap();
        assert!((eui - total / 45.0).abs() < 0.01);
        let hours = info["simulation_hours"].as_u64().unwrap();
        assert!((8_000..=8_760).contains(&hours));
    }

    #[test]
    fn test_additional_info_for_fixed_total() {
        let info = mock_additional_info(&mut rand::rng(), 54_321);
        assert_eq!(info["total_consumption"], "54,321 kWh");
        assert_eq!(info["eui"].as_f64().unwrap(), 1207.13);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(54_321), "54,321");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }
}
