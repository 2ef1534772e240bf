//! Terrain-feature connected-component labeling (spec §4.6): continents,
//! islands, oceans, and lakes via BFS over the neighbor graph.

use crate::cell::{CellId, CellStore};
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum FeatureKind {
    Ocean,
    Continent,
    Island,
    LakeIsland,
    Lake,
}

#[derive(Clone, Debug)]
pub struct TerrainFeature {
    pub id: usize,
    pub kind: FeatureKind,
    pub cells: Vec<CellId>,
}

/// Component-size bands separating a small "island" from a "continent"
/// (spec §4.6); a reasonable fraction-of-map-size split rather than a fixed
/// constant, since map scale varies with configured cell count.
const ISLAND_FRACTION: f64 = 0.02;

pub fn label_features(store: &mut CellStore) -> Vec<TerrainFeature> {
    let n = store.len();
    let mut visited = vec![false; n];
    let mut features = Vec::new();

    for start in store.ids() {
        if visited[start.index()] {
            continue;
        }
        let is_water = store.is_ocean[start.index()] || store.lake_id[start.index()].is_some();
        let mut cells = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);
        visited[start.index()] = true;
        while let Some(current) = queue.pop_front() {
            cells.push(current);
            for &neighbor in store.neighbors(current) {
                if visited[neighbor.index()] {
                    continue;
                }
                let neighbor_is_water =
                    store.is_ocean[neighbor.index()] || store.lake_id[neighbor.index()].is_some();
                if neighbor_is_water != is_water {
                    continue;
                }
                visited[neighbor.index()] = true;
                queue.push_back(neighbor);
            }
        }

        let touches_border = cells.iter().any(|&c| store.neighbors(c).len() < 3);
        let kind = if is_water {
            if cells.iter().any(|&c| store.is_ocean[c.index()]) {
                FeatureKind::Ocean
            } else {
                FeatureKind::Lake
            }
        } else if !touches_border && (cells.len() as f64) < (n as f64 * ISLAND_FRACTION).max(4.0) {
            let adjacent_to_lake = cells.iter().any(|&c| {
                store
                    .neighbors(c)
                    .iter()
                    .any(|&nbr| store.lake_id[nbr.index()].is_some())
            });
            if adjacent_to_lake {
                FeatureKind::LakeIsland
            } else {
                FeatureKind::Island
            }
        } else {
            FeatureKind::Continent
        };

        let id = features.len();
        for &c in &cells {
            store.terrain_feature_id[c.index()] = Some(id);
        }
        features.push(TerrainFeature { id, kind, cells });
    }

    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellId;

    #[test]
    fn a_lone_land_cell_surrounded_by_ocean_is_an_island() {
        // Star topology: cell 0 is land with 4 ocean neighbors.
        let mut store = crate::cell::test_store(5);
        store.is_ocean = vec![false, true, true, true, true];
        store.set_neighbors(vec![
            vec![CellId(1), CellId(2), CellId(3), CellId(4)],
            vec![CellId(0)],
            vec![CellId(0)],
            vec![CellId(0)],
            vec![CellId(0)],
        ]);
        let features = label_features(&mut store);
        let land_feature = features.iter().find(|f| f.cells.contains(&CellId(0))).unwrap();
        assert_eq!(land_feature.kind, FeatureKind::Island);
    }

    #[test]
    fn every_cell_gets_assigned_a_feature() {
        let mut store = crate::cell::test_store(3);
        store.set_neighbors(vec![vec![CellId(1)], vec![CellId(0), CellId(2)], vec![CellId(1)]]);
        label_features(&mut store);
        assert!(store.terrain_feature_id.iter().all(|f| f.is_some()));
    }
}
