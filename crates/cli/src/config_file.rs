//! Layered configuration loading (spec §6 "Runtime config", §10
//! "Configuration"): CLI flags over a project-local `worldforge.toml` (or an
//! explicit `--config` file) over compiled-in defaults, composed with the
//! `config` crate and validated once as a whole.

use anyhow::{Context, Result};
use config::{Config, File, FileFormat};
use std::path::Path;
use worldforge::WorldConfig;

/// Per-invocation overrides a user may pass on the command line (spec §6
/// "Runtime config"), applied on top of whatever the project file and
/// defaults already established.
#[derive(Default)]
pub struct ConfigOverrides {
    pub seed: Option<u64>,
    pub cells: Option<usize>,
    pub culture_count: Option<usize>,
}

pub fn load_world_config(
    project_config_file: Option<&Path>,
    explicit_config: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<WorldConfig> {
    let defaults_json = serde_json::to_string(&WorldConfig::default())
        .context("serializing built-in config defaults")?;

    let mut builder =
        Config::builder().add_source(File::from_str(&defaults_json, FileFormat::Json));

    if let Some(path) = project_config_file {
        if path.exists() {
            builder = builder.add_source(File::from(path).required(false));
        }
    }
    if let Some(path) = explicit_config {
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => FileFormat::Json,
            _ => FileFormat::Toml,
        };
        builder = builder.add_source(File::new(path.to_string_lossy().as_ref(), format));
    }

    if let Some(seed) = overrides.seed {
        builder = builder.set_override("seed", seed.to_string())?;
    }
    if let Some(cells) = overrides.cells {
        builder = builder.set_override("mesh.cell_count", cells as i64)?;
    }
    if let Some(count) = overrides.culture_count {
        builder = builder.set_override("culture.culture_count", count as i64)?;
    }

    let built = builder.build().context("composing layered configuration")?;
    let config: WorldConfig = built
        .try_deserialize()
        .context("deserializing composed configuration")?;

    use validator::Validate;
    config.validate().context("invalid configuration")?;
    Ok(config)
}
