//! `gen-water`: replays Mesh + Terrain + Climate and runs Hydrology + Shore.

use super::GlobalArgs;
use crate::io::vector;
use crate::progress::ConsoleProgress;
use crate::project::ProjectState;
use anyhow::Result;
use std::path::PathBuf;
use worldforge::rng::WorldRng;

pub struct Args {
    pub project: PathBuf,
}

pub fn run(args: Args, global: &GlobalArgs) -> Result<()> {
    let project = super::open_project(&args.project, false)?;
    let state = super::require_state(&project)?;
    let config = super::project_config(&project, global)?;

    let mut rng = WorldRng::from_seed((&config.seed).into());
    let mut progress = ConsoleProgress::new();
    let (store, lakes, rivers) = super::rebuild_through_water(&state, &mut rng, &mut progress)?;

    let mut dataset = vector::open_geopackage(&project.geopackage_path())?;
    vector::write_cells(&mut dataset, &store)?;
    vector::write_rivers(&mut dataset, &store, &rivers)?;
    vector::write_lakes(&mut dataset, &store, &lakes)?;
    project.save_state(&ProjectState {
        config,
        last_stage: "gen-water".to_string(),
        ..state
    })?;
    log::info!("{} lakes, {} rivers", lakes.len(), rivers.len());
    Ok(())
}
