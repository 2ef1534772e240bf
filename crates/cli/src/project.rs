//! On-disk project layout (spec §6 "Persisted layers"): a directory holding
//! the GeoPackage plus a `project.json` sidecar recording the config used
//! for the last successful stage, so a later command can recover the seed
//! and overrides a `genesis` run started with.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use worldforge::WorldConfig;

const SIDECAR_NAME: &str = "project.json";
const GEOPACKAGE_NAME: &str = "world.gpkg";

#[derive(Serialize, Deserialize)]
struct Sidecar {
    config: WorldConfig,
    last_stage: String,
    heightmap_path: Option<PathBuf>,
    mask_path: Option<PathBuf>,
}

pub struct ProjectState {
    pub config: WorldConfig,
    pub last_stage: String,
    pub heightmap_path: Option<PathBuf>,
    pub mask_path: Option<PathBuf>,
}

pub struct Project {
    pub root: PathBuf,
}

impl Project {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn geopackage_path(&self) -> PathBuf {
        self.root.join(GEOPACKAGE_NAME)
    }

    fn sidecar_path(&self) -> PathBuf {
        self.root.join(SIDECAR_NAME)
    }

    pub fn ensure_dir(&self, overwrite: bool) -> Result<()> {
        if self.root.exists() {
            if !overwrite && self.geopackage_path().exists() {
                anyhow::bail!(
                    "project `{}` already exists; pass --overwrite to replace it",
                    self.root.display()
                );
            }
        } else {
            fs::create_dir_all(&self.root)
                .with_context(|| format!("creating project directory `{}`", self.root.display()))?;
        }
        Ok(())
    }

    pub fn load_state(&self) -> Result<Option<ProjectState>> {
        let path = self.sidecar_path();
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading project sidecar `{}`", path.display()))?;
        let sidecar: Sidecar =
            serde_json::from_str(&text).with_context(|| format!("parsing `{}`", path.display()))?;
        Ok(Some(ProjectState {
            config: sidecar.config,
            last_stage: sidecar.last_stage,
            heightmap_path: sidecar.heightmap_path,
            mask_path: sidecar.mask_path,
        }))
    }

    pub fn save_state(&self, state: &ProjectState) -> Result<()> {
        let sidecar = Sidecar {
            config: state.config.clone(),
            last_stage: state.last_stage.clone(),
            heightmap_path: state.heightmap_path.clone(),
            mask_path: state.mask_path.clone(),
        };
        let text = serde_json::to_string_pretty(&sidecar)?;
        fs::write(self.sidecar_path(), text)
            .with_context(|| format!("writing project sidecar in `{}`", self.root.display()))?;
        Ok(())
    }

    /// A project-local `worldforge.toml`, if present, for config layering.
    pub fn local_config_file(&self) -> PathBuf {
        self.root.join("worldforge.toml")
    }

    pub fn exists(&self) -> bool {
        self.geopackage_path().exists()
    }
}

pub fn default_project_path(path: &Path) -> Project {
    Project::at(path.to_path_buf())
}
