//! Runtime configuration for a generation run.
//!
//! Mirrors the project's layered config story: the CLI composes flags, a
//! project file, and these defaults (via the `config` crate) into one
//! [WorldConfig] before a single stage or the full pipeline runs. Validation
//! happens once, up front, via [validator::Validate], so a malformed config
//! surfaces as a category-1 user error before any stage does real work.

mod seed;

pub use seed::Seed;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Extent and density inputs to Mesh construction (spec §4.1).
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MeshConfig {
    #[validate(range(min = 1.0))]
    pub width: f64,
    #[validate(range(min = 1.0))]
    pub height: f64,
    /// Target cell count; point placement jitters a grid sized to approximate
    /// this density over the extent.
    #[validate(range(min = 4))]
    pub cell_count: usize,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            cell_count: 10_000,
        }
    }
}

/// Climate stage tunables (spec §4.3).
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ClimateConfig {
    #[validate(range(min = -128.0, max = 127.0))]
    pub temperature_equator: f64,
    #[validate(range(min = -128.0, max = 127.0))]
    pub temperature_pole: f64,
    /// Exponent `k` in the adiabatic cooling formula.
    #[validate(range(min = 0.1, max = 10.0))]
    pub height_exponent: f64,
    #[validate(range(min = 0.0))]
    pub precipitation_modifier: f64,
    #[validate(range(min = 0.0))]
    pub max_precipitation: f64,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            temperature_equator: 25.0,
            temperature_pole: -30.0,
            height_exponent: 1.0,
            precipitation_modifier: 1.0,
            max_precipitation: 100.0,
        }
    }
}

/// Hydrology stage tunables (spec §4.4).
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct HydrologyConfig {
    #[validate(range(min = 0))]
    pub min_flux_to_form_river: u32,
    #[validate(range(min = 0.0, max = 100.0))]
    pub max_passable_elevation: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub lake_elevation_limit: f64,
    #[validate(range(min = 0.0))]
    pub max_downcut: f64,
    #[validate(range(min = 1, max = 10_000))]
    pub max_depression_iterations: u32,
    pub erosion_enabled: bool,
}

impl Default for HydrologyConfig {
    fn default() -> Self {
        Self {
            min_flux_to_form_river: 30,
            max_passable_elevation: 85.0,
            lake_elevation_limit: 35.0,
            max_downcut: 3.0,
            max_depression_iterations: 250,
            erosion_enabled: false,
        }
    }
}

/// Habitability scoring tunables (spec §4.7).
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct HabitabilityConfig {
    #[validate(range(min = 0))]
    pub estuary_threshold: u32,
}

impl Default for HabitabilityConfig {
    fn default() -> Self {
        Self {
            estuary_threshold: 20,
        }
    }
}

/// Culture seeding and expansion tunables (spec §4.8).
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CultureConfig {
    #[validate(range(min = 0))]
    pub culture_count: usize,
    #[validate(range(min = 0.01, max = 10.0))]
    pub neutral_rate: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub power_input: f64,
}

impl Default for CultureConfig {
    fn default() -> Self {
        Self {
            culture_count: 12,
            neutral_rate: 1.0,
            power_input: 1.0,
        }
    }
}

/// Top-level configuration for a single pipeline invocation.
///
/// Assembled by the CLI from layered sources (flags > project file >
/// defaults) and validated as a whole before any stage runs.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: Seed,
    #[validate(nested)]
    pub mesh: MeshConfig,
    #[validate(nested)]
    pub climate: ClimateConfig,
    #[validate(nested)]
    pub hydrology: HydrologyConfig,
    #[validate(nested)]
    pub habitability: HabitabilityConfig,
    #[validate(nested)]
    pub culture: CultureConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: Seed::default(),
            mesh: MeshConfig::default(),
            climate: ClimateConfig::default(),
            hydrology: HydrologyConfig::default(),
            habitability: HabitabilityConfig::default(),
            culture: CultureConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        WorldConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_degenerate_mesh() {
        let mut config = WorldConfig::default();
        config.mesh.cell_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_temperature_is_allowed_but_bounds_enforced() {
        let mut config = WorldConfig::default();
        config.climate.temperature_equator = 1000.0;
        assert!(config.validate().is_err());
    }
}
