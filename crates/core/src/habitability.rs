//! Habitability scoring and population (spec §4.7).

use crate::biome::BiomeTable;
use crate::cell::{CellStore, Lake, LakeGroup};
use crate::config::HabitabilityConfig;
use crate::progress::ProgressObserver;

fn lake_shore_bonus(group: LakeGroup) -> i32 {
    match group {
        LakeGroup::Freshwater => 30,
        LakeGroup::Salt => 10,
        LakeGroup::Frozen => 1,
        LakeGroup::Dry => -5,
        LakeGroup::Sinkhole => -5,
        LakeGroup::Pluvial => 0,
    }
}

pub fn score_habitability<P: ProgressObserver>(
    store: &mut CellStore,
    lakes: &[Lake],
    biomes: &BiomeTable,
    config: &HabitabilityConfig,
    progress: &mut P,
) {
    let land_flux: Vec<f64> = store
        .land_ids()
        .map(|id| store.water_flow[id.index()] + store.confluence_flux[id.index()])
        .collect();
    let mean_flux = if land_flux.is_empty() {
        0.0
    } else {
        land_flux.iter().sum::<f64>() / land_flux.len() as f64
    };
    let max_flux = land_flux.iter().cloned().fold(0.0, f64::max);
    let mean_area = store.mean_area();

    progress.start(Some(store.len()), || "scoring habitability".to_string());
    for i in 0..store.len() {
        if store.is_ocean[i] {
            store.habitability[i] = 0;
            store.population[i] = 0.0;
            continue;
        }
        let Some(biome_idx) = store.biome_id[i] else {
            store.habitability[i] = 0;
            store.population[i] = 0.0;
            continue;
        };
        let base = biomes.catalog[biome_idx].habitability;
        if base == 0 {
            store.habitability[i] = 0;
            store.population[i] = 0.0;
            continue;
        }

        let mut s = base as f64;
        let flux = store.water_flow[i] + store.confluence_flux[i];
        if mean_flux > 0.0 && max_flux > mean_flux {
            let normalized = ((flux - mean_flux) / (max_flux - mean_flux)).clamp(0.0, 1.0);
            s += normalized * 250.0;
        }
        s -= (store.elevation[i] as f64 - 50.0) / 5.0;

        if store.shore_distance[i] == 1 {
            if flux > config.estuary_threshold as f64 {
                s += 15.0;
            }
            if let Some(water_id) = store.closest_water[i] {
                let w = water_id.index();
                if let Some(lake_idx) = store.lake_id[w] {
                    s += lake_shore_bonus(lakes[lake_idx].group) as f64;
                } else if store.is_ocean[w] {
                    s += 5.0;
                    if store.water_count[i] == 1 {
                        s += 20.0;
                    }
                }
            }
        }

        let habitability = (s / 5.0).round() as i32;
        store.habitability[i] = habitability;
        store.population[i] = if habitability > 0 {
            habitability as f64 * store.area[i] / mean_area.max(f64::EPSILON)
        } else {
            0.0
        };
        progress.update(i + 1);
    }
    progress.finish(|| "habitability scored".to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoOpProgress;

    #[test]
    fn zero_habitability_biome_yields_zero_population() {
        let mut store = crate::cell::test_store(1);
        let biomes = BiomeTable::default();
        let marine_idx = biomes.find("Marine").unwrap();
        store.biome_id[0] = Some(marine_idx);
        store.is_ocean[0] = true;
        let config = HabitabilityConfig::default();
        let mut progress = NoOpProgress;
        score_habitability(&mut store, &[], &biomes, &config, &mut progress);
        assert_eq!(store.population[0], 0.0);
    }

    #[test]
    fn grassland_land_cell_gets_positive_population() {
        let mut store = crate::cell::test_store(1);
        let biomes = BiomeTable::default();
        let grassland = biomes.find("Grassland").unwrap();
        store.biome_id[0] = Some(grassland);
        store.elevation[0] = 40;
        let config = HabitabilityConfig::default();
        let mut progress = NoOpProgress;
        score_habitability(&mut store, &[], &biomes, &config, &mut progress);
        assert!(store.population[0] > 0.0);
    }
}
