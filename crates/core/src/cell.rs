//! The cell graph: a struct-of-arrays store of every per-cell attribute from
//! the data model, indexed by dense [CellId]. Per spec §9, this replaces the
//! original's parallel-array-with-ad-hoc-fields approach with one owning
//! struct, and represents neighbor adjacency as a flat CSR table instead of
//! per-cell owned vectors.
//!
//! Topology (`site`, `polygon`, `area`, `neighbors`) is fixed by Mesh and
//! never changes afterward; every later stage only mutates attribute
//! columns.

use crate::error::{WorldError, WorldResult};
use crate::geometry::{Point, Polygon};
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Dense index into every column of a [CellStore]. Stable for the lifetime
/// of a mesh; never reused after Mesh finishes (cells are only ever dropped
/// during Mesh's own degenerate-geometry healing, before ids are handed out
/// to later stages).
#[derive(
    Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Serialize, Deserialize,
)]
pub struct CellId(pub u32);

impl CellId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Sea level on the `[0, 100]` elevation scale (spec §4.2).
pub const SEA_LEVEL: i32 = 20;

/// One river segment (spec §3 River).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct River {
    pub id: usize,
    pub cells: Vec<CellId>,
    pub parent: Option<usize>,
    pub basin: usize,
    pub polyline: Vec<Point>,
    pub flux_at_vertex: Vec<f64>,
}

impl River {
    pub fn length(&self) -> usize {
        self.cells.len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum LakeGroup {
    Freshwater,
    Salt,
    Frozen,
    Dry,
    Sinkhole,
    Pluvial,
}

/// One lake component (spec §3 Lake).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Lake {
    pub id: usize,
    pub cells: Vec<CellId>,
    pub group: LakeGroup,
    pub surface_elevation: f64,
    pub flux: f64,
    pub evaporation: f64,
    pub outlet_cell: Option<CellId>,
    pub inlets: Vec<CellId>,
}

/// A row of the biome catalog (spec §3 Biome, §4.5).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Biome {
    pub key_name: String,
    pub habitability: i32,
    pub movement_cost: i32,
    pub is_nomadic: bool,
    pub is_huntable: bool,
}

/// Every per-cell attribute column, struct-of-arrays style. All columns are
/// always the same length (`self.len()`); index `i` across every column
/// describes one cell.
#[derive(Clone, Debug, Default)]
pub struct CellStore {
    pub site: Vec<Point>,
    pub polygon: Vec<Polygon>,
    pub area: Vec<f64>,
    pub latitude: Vec<f64>,
    pub elevation: Vec<i32>,
    pub is_ocean: Vec<bool>,
    pub temperature: Vec<i32>,
    pub precipitation: Vec<u32>,
    pub wind_tier: Vec<u8>,
    pub water_flow: Vec<f64>,
    pub lake_depth: Vec<f64>,
    pub lake_id: Vec<Option<usize>>,
    pub river_id: Vec<Option<usize>>,
    pub confluence_flux: Vec<f64>,
    pub shore_distance: Vec<i32>,
    pub closest_water: Vec<Option<CellId>>,
    pub water_count: Vec<u8>,
    pub biome_id: Vec<Option<usize>>,
    pub terrain_feature_id: Vec<Option<usize>>,
    pub habitability: Vec<i32>,
    pub population: Vec<f64>,
    pub culture_id: Vec<usize>,

    /// CSR adjacency: cell `i`'s neighbors are
    /// `neighbor_ids[neighbor_offsets[i]..neighbor_offsets[i + 1]]`.
    neighbor_offsets: Vec<u32>,
    neighbor_ids: Vec<CellId>,
}

impl CellStore {
    pub fn len(&self) -> usize {
        self.site.len()
    }

    pub fn is_empty(&self) -> bool {
        self.site.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = CellId> {
        (0..self.len() as u32).map(CellId)
    }

    pub fn neighbors(&self, id: CellId) -> &[CellId] {
        let i = id.index();
        let start = self.neighbor_offsets[i] as usize;
        let end = self.neighbor_offsets[i + 1] as usize;
        &self.neighbor_ids[start..end]
    }

    pub fn check_bounds(&self, id: CellId) -> WorldResult<()> {
        if id.index() < self.len() {
            Ok(())
        } else {
            Err(WorldError::CellOutOfBounds(id.index()))
        }
    }

    /// Builds CSR adjacency from a per-cell adjacency list. `adjacency[i]`
    /// must already be deduplicated and need not be sorted (callers sort for
    /// deterministic iteration, per spec §4.3's tie-break-by-id rule).
    pub fn set_neighbors(&mut self, mut adjacency: Vec<Vec<CellId>>) {
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
        }
        let mut offsets = Vec::with_capacity(adjacency.len() + 1);
        let mut flat = Vec::new();
        offsets.push(0u32);
        for neighbors in adjacency {
            flat.extend(neighbors);
            offsets.push(flat.len() as u32);
        }
        self.neighbor_offsets = offsets;
        self.neighbor_ids = flat;
    }

    /// Verifies `j in neighbors(i) <=> i in neighbors(j)` for every pair
    /// (spec §8 invariant). `O(N * avg_degree)`; intended for tests and
    /// stage-boundary assertions, not hot loops.
    pub fn assert_neighbor_symmetry(&self) -> WorldResult<()> {
        for i in self.ids() {
            for &j in self.neighbors(i) {
                if !self.neighbors(j).contains(&i) {
                    return Err(WorldError::InvariantViolation(format!(
                        "neighbor asymmetry: {i} lists {j} but not vice versa"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn land_ids(&self) -> impl Iterator<Item = CellId> + '_ {
        self.ids().filter(|&id| !self.is_ocean[id.index()])
    }

    pub fn mean_area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.area.iter().sum::<f64>() / self.len() as f64
    }
}

/// Builds an otherwise-blank `n`-cell store with no neighbors, flat sites
/// along the x axis, and land-everywhere defaults. Shared by unit tests
/// across modules so each one doesn't hand-roll the same boilerplate.
#[cfg(test)]
pub(crate) fn test_store(n: usize) -> CellStore {
    let mut store = CellStore::default();
    for i in 0..n {
        store.site.push(Point::new(i as f64, 0.0));
        store
            .polygon
            .push(Polygon::new(geo::LineString(vec![]), vec![]));
        store.area.push(1.0);
        store.latitude.push(0.0);
        store.elevation.push(50);
        store.is_ocean.push(false);
        store.temperature.push(20);
        store.precipitation.push(0);
        store.wind_tier.push(0);
        store.water_flow.push(0.0);
        store.lake_depth.push(0.0);
        store.lake_id.push(None);
        store.river_id.push(None);
        store.confluence_flux.push(0.0);
        store.shore_distance.push(0);
        store.closest_water.push(None);
        store.water_count.push(0);
        store.biome_id.push(None);
        store.terrain_feature_id.push(None);
        store.habitability.push(0);
        store.population.push(0.0);
        store.culture_id.push(0);
    }
    store.set_neighbors(vec![Vec::new(); n]);
    store
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_store(n: usize) -> CellStore {
        let mut store = CellStore::default();
        for i in 0..n {
            store.site.push(Point::new(i as f64, 0.0));
            store.polygon.push(Polygon::new(
                geo::LineString(vec![]),
                vec![],
            ));
            store.area.push(1.0);
            store.latitude.push(0.0);
            store.elevation.push(50);
            store.is_ocean.push(false);
            store.temperature.push(20);
            store.precipitation.push(0);
            store.wind_tier.push(0);
            store.water_flow.push(0.0);
            store.lake_depth.push(0.0);
            store.lake_id.push(None);
            store.river_id.push(None);
            store.confluence_flux.push(0.0);
            store.shore_distance.push(0);
            store.closest_water.push(None);
            store.water_count.push(0);
            store.biome_id.push(None);
            store.terrain_feature_id.push(None);
            store.habitability.push(0);
            store.population.push(0.0);
            store.culture_id.push(0);
        }
        store
    }

    #[test]
    fn symmetric_adjacency_passes() {
        let mut store = empty_store(3);
        store.set_neighbors(vec![
            vec![CellId(1), CellId(2)],
            vec![CellId(0)],
            vec![CellId(0)],
        ]);
        store.assert_neighbor_symmetry().unwrap();
    }

    #[test]
    fn asymmetric_adjacency_fails() {
        let mut store = empty_store(2);
        store.set_neighbors(vec![vec![CellId(1)], vec![]]);
        assert!(store.assert_neighbor_symmetry().is_err());
    }
}
