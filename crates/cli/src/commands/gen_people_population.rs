//! `gen-people-population`: replays through Biome and runs Habitability &
//! population scoring.

use super::GlobalArgs;
use crate::catalogs;
use crate::io::vector;
use crate::progress::ConsoleProgress;
use crate::project::ProjectState;
use anyhow::Result;
use std::path::PathBuf;
use worldforge::rng::WorldRng;
use worldforge::world;

pub struct Args {
    pub project: PathBuf,
    pub biome_catalog: Option<PathBuf>,
}

pub fn run(args: Args, global: &GlobalArgs) -> Result<()> {
    let project = super::open_project(&args.project, false)?;
    let state = super::require_state(&project)?;
    let config = super::project_config(&project, global)?;
    let biomes = catalogs::load_biome_table(args.biome_catalog.as_deref())?;

    let mut rng = WorldRng::from_seed((&config.seed).into());
    let mut progress = ConsoleProgress::new();
    let (mut store, lakes, rivers) = super::rebuild_through_biome(&state, &biomes, &mut rng, &mut progress)?;
    world::run_habitability(&mut store, &lakes, &biomes, &config, &mut progress, &())?;

    let mut dataset = vector::open_geopackage(&project.geopackage_path())?;
    vector::write_cells(&mut dataset, &store)?;
    vector::write_rivers(&mut dataset, &store, &rivers)?;
    vector::write_lakes(&mut dataset, &store, &lakes)?;
    project.save_state(&ProjectState {
        config,
        last_stage: "gen-people-population".to_string(),
        ..state
    })?;
    log::info!("habitability scored");
    Ok(())
}
