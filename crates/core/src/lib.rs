//! World generation pipeline engine.
//!
//! Transforms a bare cell mesh into a fully attributed world through five
//! subsystems run in dependency order: Mesh → Terrain → Climate → Hydrology
//! → Biome → Terrain-Features → Habitability → Cultures. See [world] for the
//! pipeline driver and [cell::CellStore] for the shared data model.

pub mod biome;
pub mod cell;
pub mod climate;
pub mod config;
pub mod culture;
pub mod error;
pub mod features;
pub mod geometry;
pub mod habitability;
pub mod hydrology;
pub mod mesh;
pub mod pathfinding;
pub mod progress;
pub mod rng;
pub mod shore;
pub mod terrain;
pub mod world;

pub use cell::{Biome, CellId, CellStore, Lake, LakeGroup, River};
pub use config::{Seed, WorldConfig};
pub use culture::{Culture, CultureSeed, CultureType, Preference};
pub use error::{WorldError, WorldResult};
pub use rng::WorldRng;
pub use world::{genesis, CancellationToken, World};
