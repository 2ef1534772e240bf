//! Pipeline driver (spec §9 "Global mutable state"): threads an explicit
//! context through Mesh → Terrain → Climate → Hydrology → Shore → Biome →
//! Features → Habitability → Cultures instead of relying on module-level
//! state, and checks a cooperative cancellation flag between stages (spec
//! §5).

use crate::biome::{self, BiomeTable};
use crate::cell::{CellStore, Lake, River};
use crate::config::WorldConfig;
use crate::culture::{self, Culture, CultureSeed};
use crate::error::{WorldError, WorldResult};
use crate::features::{self, TerrainFeature};
use crate::habitability;
use crate::hydrology;
use crate::mesh;
use crate::progress::ProgressObserver;
use crate::rng::WorldRng;
use crate::shore;
use crate::terrain::{self, ElevationSource, OceanMaskSource};

/// Everything a full `genesis` run produces beyond the cell attribute
/// columns, which live directly on [CellStore].
#[derive(Default)]
pub struct World {
    pub store: CellStore,
    pub lakes: Vec<Lake>,
    pub rivers: Vec<River>,
    pub features: Vec<TerrainFeature>,
    pub cultures: Vec<Culture>,
}

/// A cooperative cancellation check consulted between stages. Each stage's
/// own inner loops are uninterruptible once started (spec §5: "no stage
/// suspends mid-computation").
pub trait CancellationToken {
    fn is_cancelled(&self) -> bool;
}

impl CancellationToken for () {
    fn is_cancelled(&self) -> bool {
        false
    }
}

fn check<C: CancellationToken>(token: &C) -> WorldResult<()> {
    if token.is_cancelled() {
        Err(WorldError::Cancelled)
    } else {
        Ok(())
    }
}

/// Runs Mesh + Terrain: the `convert-heightmap` command's scope (spec §6).
pub fn run_mesh_and_terrain<P: ProgressObserver, C: CancellationToken>(
    config: &WorldConfig,
    elevation: &dyn ElevationSource,
    mask: Option<&dyn OceanMaskSource>,
    min_raw: f64,
    max_raw: f64,
    rng: &mut WorldRng,
    progress: &mut P,
    token: &C,
) -> WorldResult<CellStore> {
    let mut store = mesh::build_mesh(&config.mesh, rng, progress)?;
    check(token)?;
    terrain::attach_terrain(&mut store, elevation, mask, min_raw, max_raw);
    Ok(store)
}

/// Runs Climate over an existing store (the `gen-climate` command's scope).
pub fn run_climate<P: ProgressObserver, C: CancellationToken>(
    store: &mut CellStore,
    config: &WorldConfig,
    progress: &mut P,
    token: &C,
) -> WorldResult<()> {
    crate::climate::run_climate(store, &config.climate, &config.hydrology, progress);
    check(token)
}

/// Runs Hydrology + Shore (the `gen-water` command's scope).
pub fn run_water<P: ProgressObserver, C: CancellationToken>(
    store: &mut CellStore,
    config: &WorldConfig,
    rng: &mut WorldRng,
    progress: &mut P,
    token: &C,
) -> WorldResult<(Vec<Lake>, Vec<River>)> {
    let (lakes, rivers) = hydrology::run_hydrology(store, &config.hydrology, rng, progress);
    check(token)?;
    shore::compute_shore(store);
    Ok((lakes, rivers))
}

/// Runs Biome classification (the `gen-biome` command's scope).
pub fn run_biome<P: ProgressObserver, C: CancellationToken>(
    store: &mut CellStore,
    table: &BiomeTable,
    progress: &mut P,
    token: &C,
) -> WorldResult<()> {
    biome::classify(store, table, progress)?;
    check(token)
}

/// Runs Terrain-Feature labeling. Not independently CLI-exposed, but cheap
/// enough to always run as part of `gen-people-population` since
/// Habitability doesn't strictly require it; kept here so `genesis` can
/// still call it as its own named step.
pub fn run_features(store: &mut CellStore) -> Vec<TerrainFeature> {
    features::label_features(store)
}

/// Runs Habitability & population scoring (the `gen-people-population`
/// command's scope).
pub fn run_habitability<P: ProgressObserver, C: CancellationToken>(
    store: &mut CellStore,
    lakes: &[Lake],
    biomes: &BiomeTable,
    config: &WorldConfig,
    progress: &mut P,
    token: &C,
) -> WorldResult<()> {
    habitability::score_habitability(store, lakes, biomes, &config.habitability, progress);
    check(token)
}

/// Runs Culture seeding + expansion (the `gen-cultures` command's scope).
#[allow(clippy::too_many_arguments)]
pub fn run_cultures<P: ProgressObserver, C: CancellationToken>(
    store: &mut CellStore,
    biomes: &BiomeTable,
    lakes: &[Lake],
    candidates: Vec<CultureSeed>,
    config: &WorldConfig,
    rng: &mut WorldRng,
    progress: &mut P,
    token: &C,
) -> WorldResult<Vec<Culture>> {
    let cultures = culture::run_cultures(
        store,
        biomes,
        lakes,
        candidates,
        &config.culture,
        config.mesh.width,
        config.mesh.height,
        rng,
        progress,
    );
    check(token)?;
    Ok(cultures)
}

/// Runs the entire pipeline end to end (the `genesis` command's scope).
#[allow(clippy::too_many_arguments)]
pub fn genesis<P: ProgressObserver, C: CancellationToken>(
    config: &WorldConfig,
    elevation: &dyn ElevationSource,
    mask: Option<&dyn OceanMaskSource>,
    min_raw: f64,
    max_raw: f64,
    biomes: &BiomeTable,
    culture_candidates: Vec<CultureSeed>,
    progress: &mut P,
    token: &C,
) -> WorldResult<World> {
    let mut rng = WorldRng::from_seed((&config.seed).into());

    let mut store = run_mesh_and_terrain(config, elevation, mask, min_raw, max_raw, &mut rng, progress, token)?;
    run_climate(&mut store, config, progress, token)?;
    let (lakes, rivers) = run_water(&mut store, config, &mut rng, progress, token)?;
    run_biome(&mut store, biomes, progress, token)?;
    let features = run_features(&mut store);
    check(token)?;
    run_habitability(&mut store, &lakes, biomes, config, progress, token)?;
    let cultures = run_cultures(&mut store, biomes, &lakes, culture_candidates, config, &mut rng, progress, token)?;

    Ok(World {
        store,
        lakes,
        rivers,
        features,
        cultures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::culture::Preference;
    use crate::geometry::Point;
    use crate::progress::NoOpProgress;
    use crate::terrain::PeakTemplate;

    #[test]
    fn full_pipeline_runs_uniform_land_with_no_rivers_or_ocean() {
        let config = WorldConfig {
            mesh: crate::config::MeshConfig {
                width: 30.0,
                height: 30.0,
                cell_count: 36,
            },
            ..WorldConfig::default()
        };
        let flat = PeakTemplate {
            base: 50.0,
            peaks: vec![],
        };
        let biomes = BiomeTable::default();
        let seeds = vec![CultureSeed {
            name: "solitude".to_string(),
            base: 0,
            odd: 1.0,
            preference: Preference::Habitability,
        }];
        let mut progress = NoOpProgress;
        let world = genesis(&config, &flat, None, 0.0, 100.0, &biomes, seeds, &mut progress, &()).unwrap();
        assert!(world.store.len() > 0);
        assert!(world.store.is_ocean.iter().all(|&o| !o));
        assert!(world.rivers.is_empty());
    }

    #[test]
    fn cancellation_token_stops_the_pipeline_early() {
        struct AlreadyCancelled;
        impl CancellationToken for AlreadyCancelled {
            fn is_cancelled(&self) -> bool {
                true
            }
        }
        let config = WorldConfig {
            mesh: crate::config::MeshConfig {
                width: 10.0,
                height: 10.0,
                cell_count: 16,
            },
            ..WorldConfig::default()
        };
        let flat = PeakTemplate {
            base: 50.0,
            peaks: vec![(Point::new(5.0, 5.0), 0.0, 1.0)],
        };
        let biomes = BiomeTable::default();
        let result = genesis(&config, &flat, None, 0.0, 100.0, &biomes, Vec::new(), &mut NoOpProgress, &AlreadyCancelled);
        assert!(matches!(result, Err(WorldError::Cancelled)));
    }
}
