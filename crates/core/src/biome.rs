//! Biome classification (spec §4.5): deterministic lookup on (moisture,
//! temperature, elevation), driven by a configurable 5x26 matrix plus
//! wetland/permafrost special cases.

use crate::cell::{Biome, CellStore};
use crate::error::{WorldError, WorldResult};
use crate::progress::ProgressObserver;
use serde::{Deserialize, Serialize};

pub const MOISTURE_BANDS: usize = 5;
pub const TEMPERATURE_BANDS: usize = 26;

const MARINE_KEY: &str = "Marine";
const PERMAFROST_KEY: &str = "Permafrost";
const WETLAND_KEY: &str = "Wetland";

/// The biome catalog plus the moisture/temperature lookup matrix. Both are
/// configuration (spec §4.5), loaded by the CLI from the biomes JSON
/// document; the core crate only validates structure and classifies.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BiomeTable {
    pub catalog: Vec<Biome>,
    /// `matrix[moisture_band][temperature_band] = key_name`.
    pub matrix: Vec<Vec<String>>,
}

impl BiomeTable {
    pub fn validate(&self) -> WorldResult<()> {
        if self.matrix.len() != MOISTURE_BANDS {
            return Err(WorldError::InvalidConfig(format!(
                "biome matrix must have {MOISTURE_BANDS} moisture bands, found {}",
                self.matrix.len()
            )));
        }
        for row in &self.matrix {
            if row.len() != TEMPERATURE_BANDS {
                return Err(WorldError::InvalidConfig(format!(
                    "biome matrix rows must have {TEMPERATURE_BANDS} temperature bands, found {}",
                    row.len()
                )));
            }
            for key in row {
                if self.find(key).is_none() {
                    return Err(WorldError::InvalidConfig(format!(
                        "biome matrix references unknown key `{key}`"
                    )));
                }
            }
        }
        for required in [MARINE_KEY, PERMAFROST_KEY, WETLAND_KEY] {
            if self.find(required).is_none() {
                return Err(WorldError::InvalidConfig(format!(
                    "biome catalog is missing the required `{required}` entry"
                )));
            }
        }
        Ok(())
    }

    pub fn find(&self, key: &str) -> Option<usize> {
        self.catalog.iter().position(|b| b.key_name == key)
    }

    fn require(&self, key: &str) -> usize {
        self.find(key)
            .unwrap_or_else(|| panic!("biome catalog missing required `{key}` entry; validate() should have caught this"))
    }
}

impl Default for BiomeTable {
    /// A self-consistent reference catalog, standing in for the data a real
    /// deployment would load from its biomes JSON document.
    fn default() -> Self {
        let names = [
            "Marine", "Permafrost", "Wetland", "Tundra", "Taiga", "Grassland", "Savanna",
            "Desert", "TemperateForest", "TropicalForest", "Rainforest", "Steppe", "Shrubland",
            "AlpineMeadow", "HotDesert", "ColdDesert", "Chaparral", "BorealForest", "Mangrove",
            "Prairie", "Badlands", "Highland", "Glacier", "SaltFlat", "Woodland", "Plains",
        ];
        let catalog = names
            .iter()
            .map(|&key_name| Biome {
                key_name: key_name.to_string(),
                habitability: match key_name {
                    "Marine" | "Glacier" | "SaltFlat" => 0,
                    "Desert" | "HotDesert" | "ColdDesert" | "Badlands" | "Permafrost" => 5,
                    "Tundra" | "Steppe" | "Shrubland" | "Chaparral" => 20,
                    "Grassland" | "Savanna" | "Prairie" | "Plains" | "Woodland" => 60,
                    "TemperateForest" | "Taiga" | "BorealForest" | "Highland" | "AlpineMeadow" => 45,
                    "TropicalForest" | "Rainforest" | "Mangrove" | "Wetland" => 35,
                    _ => 30,
                },
                movement_cost: match key_name {
                    "Marine" => 100,
                    "Rainforest" | "Mangrove" | "Wetland" | "Highland" => 50,
                    "Desert" | "HotDesert" | "ColdDesert" | "Badlands" | "SaltFlat" => 40,
                    _ => 20,
                },
                is_nomadic: matches!(
                    key_name,
                    "Steppe" | "Savanna" | "Grassland" | "Tundra" | "Prairie" | "Plains"
                ),
                is_huntable: matches!(
                    key_name,
                    "Taiga" | "BorealForest" | "TemperateForest" | "TropicalForest" | "Rainforest"
                        | "Tundra" | "Mangrove"
                ),
            })
            .collect();

        let band = |moisture: usize, temp: usize| -> String {
            if temp < 5 {
                "Tundra".into()
            } else if temp < 9 {
                if moisture < 2 { "Steppe".into() } else { "Taiga".into() }
            } else if temp < 17 {
                match moisture {
                    0 => "Desert".into(),
                    1 => "Shrubland".into(),
                    2 => "Grassland".into(),
                    3 => "Woodland".into(),
                    _ => "TemperateForest".into(),
                }
            } else {
                match moisture {
                    0 => "HotDesert".into(),
                    1 => "Savanna".into(),
                    2 => "Prairie".into(),
                    3 => "TropicalForest".into(),
                    _ => "Rainforest".into(),
                }
            }
        };
        let matrix = (0..MOISTURE_BANDS)
            .map(|m| (0..TEMPERATURE_BANDS).map(|t| band(m, t)).collect())
            .collect();

        Self { catalog, matrix }
    }
}

/// Land-neighbor-smoothed moisture input for cell `i` (spec §4.5 step 3).
fn moisture_for(store: &CellStore, i: usize) -> f64 {
    let river_bonus = if store.river_id[i].is_some() {
        (store.water_flow[i] / 20.0).max(2.0)
    } else {
        0.0
    };
    let base = store.precipitation[i] as f64 + river_bonus;

    let cell_id = crate::cell::CellId(i as u32);
    let neighbor_mean = {
        let land_neighbors: Vec<f64> = store
            .neighbors(cell_id)
            .iter()
            .filter(|&&n| !store.is_ocean[n.index()])
            .map(|&n| store.precipitation[n.index()] as f64)
            .collect();
        if land_neighbors.is_empty() {
            base
        } else {
            land_neighbors.iter().sum::<f64>() / land_neighbors.len() as f64
        }
    };
    (base + neighbor_mean) / 2.0 + 2.0
}

fn moisture_band(moisture: f64) -> usize {
    ((moisture / 20.0).floor() as isize).clamp(0, MOISTURE_BANDS as isize - 1) as usize
}

const TEMP_BAND_MIN: f64 = -30.0;
const TEMP_BAND_MAX: f64 = 40.0;

fn temperature_band(temperature: i32) -> usize {
    let frac = ((temperature as f64 - TEMP_BAND_MIN) / (TEMP_BAND_MAX - TEMP_BAND_MIN)).clamp(0.0, 1.0);
    ((frac * (TEMPERATURE_BANDS - 1) as f64).round() as usize).min(TEMPERATURE_BANDS - 1)
}

pub fn classify<P: ProgressObserver>(
    store: &mut CellStore,
    table: &BiomeTable,
    progress: &mut P,
) -> WorldResult<()> {
    table.validate()?;
    let marine = table.require(MARINE_KEY);
    let permafrost = table.require(PERMAFROST_KEY);
    let wetland = table.require(WETLAND_KEY);

    progress.start(Some(store.len()), || "classifying biomes".to_string());
    for i in 0..store.len() {
        let biome = if store.is_ocean[i] {
            marine
        } else if store.temperature[i] < -5 {
            permafrost
        } else {
            let moisture = moisture_for(store, i);
            let elevation = store.elevation[i];
            let is_wetland = (moisture > 40.0 && store.temperature[i] > -2 && elevation < 25)
                || (moisture > 24.0 && elevation > 24 && elevation < 60);
            if is_wetland {
                wetland
            } else {
                let m_band = moisture_band(moisture);
                let t_band = temperature_band(store.temperature[i]);
                let key = &table.matrix[m_band][t_band];
                table.require(key)
            }
        };
        store.biome_id[i] = Some(biome);
        progress.update(i + 1);
    }
    progress.finish(|| "biomes classified".to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoOpProgress;

    #[test]
    fn ocean_cells_are_always_marine() {
        let mut store = crate::cell::test_store(1);
        store.is_ocean[0] = true;
        let table = BiomeTable::default();
        let mut progress = NoOpProgress;
        classify(&mut store, &table, &mut progress).unwrap();
        assert_eq!(
            table.catalog[store.biome_id[0].unwrap()].key_name,
            "Marine"
        );
    }

    #[test]
    fn very_cold_land_is_permafrost() {
        let mut store = crate::cell::test_store(1);
        store.temperature[0] = -20;
        let table = BiomeTable::default();
        let mut progress = NoOpProgress;
        classify(&mut store, &table, &mut progress).unwrap();
        assert_eq!(
            table.catalog[store.biome_id[0].unwrap()].key_name,
            "Permafrost"
        );
    }

    #[test]
    fn uniform_temperate_land_is_classified_consistently() {
        let mut store = crate::cell::test_store(4);
        for i in 0..4 {
            store.temperature[i] = 15;
            store.precipitation[i] = 30;
            store.elevation[i] = 50;
        }
        let table = BiomeTable::default();
        let mut progress = NoOpProgress;
        classify(&mut store, &table, &mut progress).unwrap();
        let first = store.biome_id[0];
        assert!(store.biome_id.iter().all(|&b| b == first));
    }

    #[test]
    fn default_table_validates() {
        BiomeTable::default().validate().unwrap();
    }
}
