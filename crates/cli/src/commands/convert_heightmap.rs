//! `convert-heightmap`: the entry point into a project. Samples a raster
//! heightmap (and optional ocean mask) onto a fresh mesh and persists the
//! result as the project's `cells` layer.

use super::GlobalArgs;
use crate::io::raster::{HeightmapSource, MaskSource};
use crate::io::vector;
use crate::progress::ConsoleProgress;
use crate::project::{Project, ProjectState};
use anyhow::Result;
use std::path::{Path, PathBuf};
use worldforge::rng::WorldRng;
use worldforge::terrain::OceanMaskSource;
use worldforge::world;

pub struct Args {
    pub raster: PathBuf,
    pub mask: Option<PathBuf>,
    pub project: PathBuf,
}

pub fn run(args: Args, global: &GlobalArgs) -> Result<()> {
    let project = super::open_project(&args.project, global.overwrite)?;
    let config = super::project_config(&project, global)?;

    let elevation = HeightmapSource::load(&args.raster)?;
    let mask = args.mask.as_deref().map(MaskSource::load).transpose()?;
    let (min_raw, max_raw) = elevation.min_max();

    let mut rng = WorldRng::from_seed((&config.seed).into());
    let mut progress = ConsoleProgress::new();
    let store = world::run_mesh_and_terrain(
        &config,
        &elevation,
        mask.as_ref().map(|m| m as &dyn OceanMaskSource),
        min_raw,
        max_raw,
        &mut rng,
        &mut progress,
        &(),
    )?;

    persist(&project, &store, &config, &args.raster, args.mask.as_deref())?;
    log::info!("wrote {} cells to `{}`", store.len(), project.geopackage_path().display());
    Ok(())
}

fn persist(
    project: &Project,
    store: &worldforge::cell::CellStore,
    config: &worldforge::WorldConfig,
    raster: &Path,
    mask: Option<&Path>,
) -> Result<()> {
    let mut dataset = vector::create_geopackage(&project.geopackage_path())?;
    vector::write_cells(&mut dataset, store)?;
    project.save_state(&ProjectState {
        config: config.clone(),
        last_stage: "convert-heightmap".to_string(),
        heightmap_path: Some(raster.to_path_buf()),
        mask_path: mask.map(Path::to_path_buf),
    })
}
