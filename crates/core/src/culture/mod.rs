//! Cultures: seeding and cost-field expansion (spec §4.8).

mod expansion;
pub mod preference;
pub mod seeding;

pub use preference::{Preference, PreferenceContext};
pub use seeding::{Culture, CultureSeed, CultureType};

use crate::biome::BiomeTable;
use crate::cell::{CellStore, Lake};
use crate::config::CultureConfig;
use crate::progress::ProgressObserver;
use crate::rng::WorldRng;
use log::{info, warn};

/// Runs culture seeding and expansion against a fresh (unlocked) world. A
/// zero-length `cultures` result means every cell stays `culture_id = 0`:
/// the spec's "Wildlands" fallback is the absence of any accepted culture,
/// not a distinguished culture entry.
pub fn run_cultures<P: ProgressObserver>(
    store: &mut CellStore,
    biomes: &BiomeTable,
    lakes: &[Lake],
    candidates: Vec<CultureSeed>,
    config: &CultureConfig,
    width: f64,
    height: f64,
    rng: &mut WorldRng,
    progress: &mut P,
) -> Vec<Culture> {
    let populated = store.population.iter().filter(|&&p| p > 0.0).count();

    progress.start_unknown_endpoint(|| "selecting cultures".to_string());
    let selected = seeding::select_cultures(candidates, populated, config.culture_count, rng);
    if selected.is_empty() {
        warn!("no habitable land for any requested culture; emitting Wildlands");
        progress.finish(|| "no cultures placed (Wildlands)".to_string());
        return Vec::new();
    }
    progress.finish(|| format!("{} cultures selected", selected.len()));

    let mut lake_cells_by_id = vec![0usize; lakes.len()];
    for (idx, lake) in lakes.iter().enumerate() {
        lake_cells_by_id[idx] = lake.cells.len();
    }

    progress.start(Some(selected.len()), || "placing culture centers".to_string());
    let cultures = seeding::place_centers(
        store,
        biomes,
        &lake_cells_by_id,
        selected,
        width,
        height,
        config.power_input,
        rng,
    );
    progress.finish(|| format!("{} culture centers placed", cultures.len()));

    progress.start_unknown_endpoint(|| "expanding cultures".to_string());
    expansion::expand_cultures(store, biomes, &cultures, config.neutral_rate);
    progress.finish(|| "culture expansion complete".to_string());

    let claimed = store.culture_id.iter().filter(|&&c| c != 0).count();
    info!(
        "cultures: {} placed, {} of {} cells claimed",
        cultures.len(),
        claimed,
        store.len()
    );

    debug_assert!(store.culture_id.iter().all(|&c| c <= cultures.len()));

    cultures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellId;
    use crate::progress::NoOpProgress;

    #[test]
    fn evenly_spaced_grid_partitions_with_no_unclaimed_cells() {
        let mut store = crate::cell::test_store(100);
        let adjacency: Vec<Vec<CellId>> = (0..100)
            .map(|i| {
                let mut v = Vec::new();
                if i > 0 {
                    v.push(CellId((i - 1) as u32));
                }
                if i < 99 {
                    v.push(CellId((i + 1) as u32));
                }
                v
            })
            .collect();
        store.set_neighbors(adjacency);
        for i in 0..100 {
            store.population[i] = 10.0;
            store.elevation[i] = 40;
        }
        let biomes = BiomeTable::default();
        let config = CultureConfig {
            culture_count: 5,
            neutral_rate: 1.0,
            power_input: 1.0,
        };
        let seeds: Vec<CultureSeed> = (0..5)
            .map(|i| CultureSeed {
                name: format!("culture-{i}"),
                base: 0,
                odd: 1.0,
                preference: Preference::Habitability,
            })
            .collect();
        let mut rng = WorldRng::from_seed(9543572450198918714);
        let mut progress = NoOpProgress;
        let cultures = run_cultures(&mut store, &biomes, &[], seeds, &config, 100.0, 1.0, &mut rng, &mut progress);
        assert_eq!(cultures.len(), 5);
        assert!(store.culture_id.iter().all(|&c| c != 0));
    }

    #[test]
    fn sparse_population_falls_back_to_wildlands() {
        let mut store = crate::cell::test_store(10);
        store.set_neighbors(vec![Vec::new(); 10]);
        let biomes = BiomeTable::default();
        let config = CultureConfig::default();
        let seeds = vec![CultureSeed {
            name: "only".to_string(),
            base: 0,
            odd: 1.0,
            preference: Preference::Habitability,
        }];
        let mut rng = WorldRng::from_seed(1);
        let mut progress = NoOpProgress;
        let cultures = run_cultures(&mut store, &biomes, &[], seeds, &config, 10.0, 1.0, &mut rng, &mut progress);
        assert!(cultures.is_empty());
        assert!(store.culture_id.iter().all(|&c| c == 0));
    }
}
