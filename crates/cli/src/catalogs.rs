//! Data-catalog loading (spec §6): the biome table and culture set are JSON
//! documents, not tunable parameters, so they're loaded and structurally
//! validated independently of the layered [crate::config_file] machinery.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use worldforge::biome::BiomeTable;
use worldforge::culture::CultureSeed;

pub fn load_biome_table(path: Option<&Path>) -> Result<BiomeTable> {
    let table = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading biome catalog `{}`", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing biome catalog `{}`", path.display()))?
        }
        None => BiomeTable::default(),
    };
    table.validate().context("biome catalog failed validation")?;
    Ok(table)
}

pub fn load_culture_set(path: Option<&Path>) -> Result<Vec<CultureSeed>> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading culture set `{}`", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing culture set `{}`", path.display()))
        }
        None => Ok(default_culture_set()),
    }
}

/// A plausible default culture set, standing in for the JSON document a
/// real deployment ships (spec §6). Preferences span the primitives
/// described in spec §9 so a fresh project has something to expand.
fn default_culture_set() -> Vec<CultureSeed> {
    use worldforge::Preference::*;
    let generic = |name: &str| CultureSeed {
        name: name.to_string(),
        base: 0,
        odd: 0.7,
        preference: Add {
            lhs: Box::new(NormalizedHabitability),
            rhs: Box::new(Mul {
                lhs: Box::new(SeaCoast { fee: 0.3 }),
                rhs: Box::new(Habitability),
            }),
        },
    };
    vec![
        generic("Aldric"),
        generic("Vesha"),
        generic("Orrin"),
        generic("Kethra"),
        generic("Brannoc"),
        generic("Ithel"),
        generic("Maren"),
        generic("Doran"),
        generic("Sable"),
        generic("Wrenna"),
        generic("Tolvan"),
        generic("Imric"),
    ]
}
