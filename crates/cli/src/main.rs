//! `worldforge`: command-line driver for the world generation pipeline
//! (spec §6). Each subcommand corresponds to one pipeline stage (or the
//! full run, `genesis`), operating against a project directory that holds a
//! GeoPackage and a small JSON sidecar recording the config in effect.

mod catalogs;
mod commands;
mod config_file;
mod io;
mod progress;
mod project;

use clap::{Parser, Subcommand};
use commands::GlobalArgs;
use std::path::PathBuf;
use std::process::ExitCode;
use worldforge::WorldError;

#[derive(Parser)]
#[command(name = "worldforge", version, about = "Procedural fantasy world map generator")]
struct Cli {
    /// Replace an existing project directory instead of refusing to touch it.
    #[arg(long, global = true)]
    overwrite: bool,

    /// Overrides the seed recorded in the project/config.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// An explicit config file layered on top of the project's own.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the mesh and attach terrain from a heightmap raster.
    ConvertHeightmap {
        raster: PathBuf,
        #[arg(long)]
        mask: Option<PathBuf>,
        project: PathBuf,
    },
    /// Run Climate over an existing project.
    GenClimate { project: PathBuf },
    /// Run Hydrology + Shore over an existing project.
    GenWater { project: PathBuf },
    /// Run Biome classification + Terrain-Feature labeling.
    GenBiome {
        project: PathBuf,
        #[arg(long = "biomes")]
        biome_catalog: Option<PathBuf>,
    },
    /// Run Habitability & population scoring.
    GenPeoplePopulation {
        project: PathBuf,
        #[arg(long = "biomes")]
        biome_catalog: Option<PathBuf>,
    },
    /// Run Culture seeding + expansion.
    GenCultures {
        project: PathBuf,
        #[arg(long = "biomes")]
        biome_catalog: Option<PathBuf>,
        #[arg(long = "cultures")]
        culture_catalog: Option<PathBuf>,
    },
    /// Run the entire pipeline from a raster heightmap in one invocation.
    Genesis {
        raster: PathBuf,
        #[arg(long)]
        mask: Option<PathBuf>,
        project: PathBuf,
        #[arg(long = "biomes")]
        biome_catalog: Option<PathBuf>,
        #[arg(long = "cultures")]
        culture_catalog: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    if let Err(err) = simple_logger::SimpleLogger::new().with_level(level).init() {
        eprintln!("failed to initialize logger: {err}");
    }

    let global = GlobalArgs {
        overwrite: cli.overwrite,
        seed: cli.seed,
        config: cli.config,
    };

    let result = match cli.command {
        Commands::ConvertHeightmap { raster, mask, project } => {
            commands::convert_heightmap::run(commands::convert_heightmap::Args { raster, mask, project }, &global)
        }
        Commands::GenClimate { project } => commands::gen_climate::run(commands::gen_climate::Args { project }, &global),
        Commands::GenWater { project } => commands::gen_water::run(commands::gen_water::Args { project }, &global),
        Commands::GenBiome { project, biome_catalog } => {
            commands::gen_biome::run(commands::gen_biome::Args { project, biome_catalog }, &global)
        }
        Commands::GenPeoplePopulation { project, biome_catalog } => commands::gen_people_population::run(
            commands::gen_people_population::Args { project, biome_catalog },
            &global,
        ),
        Commands::GenCultures {
            project,
            biome_catalog,
            culture_catalog,
        } => commands::gen_cultures::run(
            commands::gen_cultures::Args {
                project,
                biome_catalog,
                culture_catalog,
            },
            &global,
        ),
        Commands::Genesis {
            raster,
            mask,
            project,
            biome_catalog,
            culture_catalog,
        } => commands::genesis::run(
            commands::genesis::Args {
                raster,
                mask,
                project,
                biome_catalog,
                culture_catalog,
            },
            &global,
        ),
    };

    match result {
        Ok(()) => ExitCode::from(0),
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

/// Maps a failure to the pipeline's four error categories (config/missing
/// input, missing attribute, internal invariant violation, everything
/// else falling back to a generic user error).
fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<WorldError>() {
        Some(WorldError::InvalidConfig(_)) => 1,
        Some(WorldError::MissingAttribute { .. }) | Some(WorldError::CellOutOfBounds(_)) => 2,
        Some(WorldError::InvariantViolation(_)) | Some(WorldError::EmptyMesh) => 3,
        Some(WorldError::Cancelled) => 3,
        None => 1,
    }
}
