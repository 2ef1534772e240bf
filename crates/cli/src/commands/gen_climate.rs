//! `gen-climate`: replays Mesh + Terrain and runs Climate.

use super::GlobalArgs;
use crate::io::vector;
use crate::progress::ConsoleProgress;
use crate::project::ProjectState;
use anyhow::Result;
use std::path::PathBuf;
use worldforge::rng::WorldRng;
use worldforge::world;

pub struct Args {
    pub project: PathBuf,
}

pub fn run(args: Args, global: &GlobalArgs) -> Result<()> {
    let project = super::open_project(&args.project, false)?;
    let state = super::require_state(&project)?;
    let config = super::project_config(&project, global)?;

    let mut rng = WorldRng::from_seed((&config.seed).into());
    let mut progress = ConsoleProgress::new();
    let mut store = super::rebuild_mesh_and_terrain(&state, &mut rng, &mut progress)?;
    world::run_climate(&mut store, &config, &mut progress, &())?;

    let mut dataset = vector::open_geopackage(&project.geopackage_path())?;
    vector::write_cells(&mut dataset, &store)?;
    project.save_state(&ProjectState {
        config,
        last_stage: "gen-climate".to_string(),
        ..state
    })?;
    log::info!("climate attached to {} cells", store.len());
    Ok(())
}
