//! `genesis`: the entire pipeline in one invocation, starting from a raster
//! heightmap rather than a pre-existing project.

use super::GlobalArgs;
use crate::catalogs;
use crate::io::raster::{HeightmapSource, MaskSource};
use crate::io::vector;
use crate::progress::ConsoleProgress;
use crate::project::ProjectState;
use anyhow::Result;
use std::path::PathBuf;
use worldforge::terrain::OceanMaskSource;
use worldforge::world;

pub struct Args {
    pub raster: PathBuf,
    pub mask: Option<PathBuf>,
    pub project: PathBuf,
    pub biome_catalog: Option<PathBuf>,
    pub culture_catalog: Option<PathBuf>,
}

pub fn run(args: Args, global: &GlobalArgs) -> Result<()> {
    let project = super::open_project(&args.project, global.overwrite)?;
    let config = super::project_config(&project, global)?;
    let biomes = catalogs::load_biome_table(args.biome_catalog.as_deref())?;
    let candidates = catalogs::load_culture_set(args.culture_catalog.as_deref())?;

    let elevation = HeightmapSource::load(&args.raster)?;
    let mask = args.mask.as_deref().map(MaskSource::load).transpose()?;
    let (min_raw, max_raw) = elevation.min_max();

    let mut progress = ConsoleProgress::new();
    let world = world::genesis(
        &config,
        &elevation,
        mask.as_ref().map(|m| m as &dyn OceanMaskSource),
        min_raw,
        max_raw,
        &biomes,
        candidates,
        &mut progress,
        &(),
    )?;

    let mut dataset = vector::create_geopackage(&project.geopackage_path())?;
    vector::write_cells(&mut dataset, &world.store)?;
    vector::write_rivers(&mut dataset, &world.store, &world.rivers)?;
    vector::write_lakes(&mut dataset, &world.store, &world.lakes)?;
    project.save_state(&ProjectState {
        config,
        last_stage: "genesis".to_string(),
        heightmap_path: Some(args.raster.clone()),
        mask_path: args.mask.clone(),
    })?;

    log::info!(
        "genesis complete: {} cells, {} lakes, {} rivers, {} cultures",
        world.store.len(),
        world.lakes.len(),
        world.rivers.len(),
        world.cultures.len()
    );
    Ok(())
}
