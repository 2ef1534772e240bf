//! Subcommand implementations (spec §6 "CLI surface"). Every command
//! composes config, replays whatever deterministic prefix of the pipeline
//! its stage depends on (cheap and exactly reproducible given the same
//! persisted seed and config, per spec §8's determinism property), runs its
//! own stage, and persists both the GeoPackage and the `project.json`
//! sidecar.

pub mod convert_heightmap;
pub mod genesis;
pub mod gen_biome;
pub mod gen_climate;
pub mod gen_cultures;
pub mod gen_people_population;
pub mod gen_water;

use crate::config_file::ConfigOverrides;
use crate::project::{Project, ProjectState};
use anyhow::{Context, Result};
use std::path::Path;
use worldforge::biome::BiomeTable;
use worldforge::cell::{CellStore, Lake, River};
use worldforge::progress::ProgressObserver;
use worldforge::rng::WorldRng;
use worldforge::terrain::{ElevationSource, OceanMaskSource};
use worldforge::world;
use worldforge::WorldConfig;

pub struct GlobalArgs {
    pub overwrite: bool,
    pub seed: Option<u64>,
    pub config: Option<std::path::PathBuf>,
}

impl GlobalArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            seed: self.seed,
            cells: None,
            culture_count: None,
        }
    }
}

/// Loads the project's persisted state, requiring that it already exists
/// (every command but `convert-heightmap` needs a prior stage's output).
pub fn require_state(project: &Project) -> Result<ProjectState> {
    project
        .load_state()?
        .context("project has no prior stage output; run `convert-heightmap` first")
}

fn elevation_source_for(state: &ProjectState) -> Result<crate::io::raster::HeightmapSource> {
    let path = state
        .heightmap_path
        .as_ref()
        .context("project sidecar has no recorded heightmap path")?;
    crate::io::raster::HeightmapSource::load(path)
}

fn mask_source_for(state: &ProjectState) -> Result<Option<crate::io::raster::MaskSource>> {
    match &state.mask_path {
        Some(path) => Ok(Some(crate::io::raster::MaskSource::load(path)?)),
        None => Ok(None),
    }
}

/// Replays Mesh + Terrain from the persisted config and heightmap (the
/// deterministic prefix every later stage depends on).
pub fn rebuild_mesh_and_terrain<P: ProgressObserver>(
    state: &ProjectState,
    rng: &mut WorldRng,
    progress: &mut P,
) -> Result<CellStore> {
    let elevation = elevation_source_for(state)?;
    let mask = mask_source_for(state)?;
    let (min_raw, max_raw) = elevation.min_max();
    let store = world::run_mesh_and_terrain(
        &state.config,
        &elevation,
        mask.as_ref().map(|m| m as &dyn OceanMaskSource),
        min_raw,
        max_raw,
        rng,
        progress,
        &(),
    )
    .context("replaying mesh + terrain")?;
    Ok(store)
}

pub fn rebuild_through_climate<P: ProgressObserver>(
    state: &ProjectState,
    rng: &mut WorldRng,
    progress: &mut P,
) -> Result<CellStore> {
    let mut store = rebuild_mesh_and_terrain(state, rng, progress)?;
    world::run_climate(&mut store, &state.config, progress, &()).context("replaying climate")?;
    Ok(store)
}

pub fn rebuild_through_water<P: ProgressObserver>(
    state: &ProjectState,
    rng: &mut WorldRng,
    progress: &mut P,
) -> Result<(CellStore, Vec<Lake>, Vec<River>)> {
    let mut store = rebuild_through_climate(state, rng, progress)?;
    let (lakes, rivers) =
        world::run_water(&mut store, &state.config, rng, progress, &()).context("replaying hydrology")?;
    Ok((store, lakes, rivers))
}

pub fn rebuild_through_biome<P: ProgressObserver>(
    state: &ProjectState,
    biomes: &BiomeTable,
    rng: &mut WorldRng,
    progress: &mut P,
) -> Result<(CellStore, Vec<Lake>, Vec<River>)> {
    let (mut store, lakes, rivers) = rebuild_through_water(state, rng, progress)?;
    world::run_biome(&mut store, biomes, progress, &()).context("replaying biome classification")?;
    world::run_features(&mut store);
    Ok((store, lakes, rivers))
}

pub fn rebuild_through_habitability<P: ProgressObserver>(
    state: &ProjectState,
    biomes: &BiomeTable,
    rng: &mut WorldRng,
    progress: &mut P,
) -> Result<(CellStore, Vec<Lake>, Vec<River>)> {
    let (mut store, lakes, rivers) = rebuild_through_biome(state, biomes, rng, progress)?;
    world::run_habitability(&mut store, &lakes, biomes, &state.config, progress, &())
        .context("replaying habitability scoring")?;
    Ok((store, lakes, rivers))
}

pub fn project_config(project: &Project, global: &GlobalArgs) -> Result<WorldConfig> {
    let local = project.local_config_file();
    crate::config_file::load_world_config(
        Some(local.as_path()),
        global.config.as_deref(),
        &global.overrides(),
    )
}

pub fn open_project(path: &Path, overwrite: bool) -> Result<Project> {
    let project = Project::at(path.to_path_buf());
    project.ensure_dir(overwrite)?;
    Ok(project)
}
