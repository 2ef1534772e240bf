//! Cost-field Dijkstra expansion over the cell graph (spec §4.8 "Expansion"
//! and sub-cost tables in §4.8a), built on the shared [crate::pathfinding::expand]
//! routine.

use super::seeding::{Culture, CultureType};
use crate::biome::BiomeTable;
use crate::cell::{CellId, CellStore};
use crate::pathfinding::{self, Claims};
use fnv::FnvHashSet;

const NATIVE_BIOME_COST: f64 = 10.0;
const BIOME_CHANGE_COST: f64 = 5.0;

fn biome_cost(store: &CellStore, biomes: &BiomeTable, culture_type: CultureType, native_biome: Option<usize>, to: usize) -> f64 {
    let Some(to_biome) = store.biome_id[to] else {
        return 0.0;
    };
    let movement_cost = biomes.catalog[to_biome].movement_cost as f64;
    if Some(to_biome) == native_biome {
        return NATIVE_BIOME_COST;
    }
    match culture_type {
        CultureType::Hunting if !biomes.catalog[to_biome].is_huntable => movement_cost * 5.0,
        CultureType::Nomadic if biomes.catalog[to_biome].is_huntable => movement_cost * 10.0,
        _ => movement_cost * 2.0,
    }
}

fn is_water(store: &CellStore, i: usize) -> bool {
    store.is_ocean[i] || store.lake_id[i].is_some()
}

/// Elevation-band cost (spec §4.8a "heightCost").
fn height_cost(store: &CellStore, culture_type: CultureType, to: usize) -> f64 {
    let water = is_water(store, to);
    let area = store.area[to];
    if water {
        return match culture_type {
            CultureType::Lake if store.lake_id[to].is_some() => 10.0,
            CultureType::Naval => area * 2.0,
            CultureType::Nomadic => area * 50.0,
            _ => area * 6.0,
        };
    }
    let elevation = store.elevation[to];
    if culture_type == CultureType::Highland {
        return if elevation < 30 {
            3000.0
        } else if elevation < 60 {
            200.0
        } else {
            0.0
        };
    }
    if elevation >= 70 {
        200.0
    } else if elevation >= 40 {
        30.0
    } else {
        0.0
    }
}

/// River-crossing cost (spec §4.8a "riverCost").
fn river_cost(store: &CellStore, culture_type: CultureType, to: usize) -> f64 {
    let on_river = store.river_id[to].is_some();
    if culture_type == CultureType::River {
        if on_river {
            0.0
        } else {
            100.0
        }
    } else if on_river {
        let flux = store.water_flow[to] + store.confluence_flux[to];
        (flux / 10.0).clamp(20.0, 100.0)
    } else {
        0.0
    }
}

/// Coastline and type-affinity cost (spec §4.8a "typeCost"). A small fixed
/// matrix rather than the original's inline conditionals: each type either
/// favors or is indifferent to a coastal cell.
fn type_cost(store: &CellStore, culture_type: CultureType, to: usize) -> f64 {
    let coastal = store.shore_distance[to] == 1;
    match culture_type {
        CultureType::Naval if coastal => 0.0,
        CultureType::Naval => 15.0,
        CultureType::Nomadic if coastal => 25.0,
        CultureType::Lake if store.lake_id[to].is_some() => 0.0,
        _ => 0.0,
    }
}

struct CultureCosts<'a> {
    store: &'a CellStore,
    biomes: &'a BiomeTable,
    cultures: &'a [Culture],
    native_biome: Vec<Option<usize>>,
}

impl<'a> CultureCosts<'a> {
    fn new(store: &'a CellStore, biomes: &'a BiomeTable, cultures: &'a [Culture]) -> Self {
        let native_biome = cultures
            .iter()
            .map(|c| store.biome_id[c.center_cell.index()])
            .collect();
        Self {
            store,
            biomes,
            cultures,
            native_biome,
        }
    }

    fn edge_cost(&self, owner: usize, from: CellId, to: CellId) -> f64 {
        let culture = &self.cultures[owner];
        let to_i = to.index();
        let from_i = from.index();
        let biome = biome_cost(self.store, self.biomes, culture.culture_type, self.native_biome[owner], to_i);
        let change = if self.store.biome_id[from_i] != self.store.biome_id[to_i] {
            BIOME_CHANGE_COST
        } else {
            0.0
        };
        let height = height_cost(self.store, culture.culture_type, to_i);
        let river = river_cost(self.store, culture.culture_type, to_i);
        let affinity = type_cost(self.store, culture.culture_type, to_i);
        (biome + change + height + river + affinity) / culture.expansionism.max(0.01)
    }
}

/// Runs cost-field expansion for every unlocked culture simultaneously and
/// writes the winning `culture_id` into every reached cell with nonzero
/// population (spec §4.8: "assign culture to the neighbor only if its
/// population > 0"). Locked cultures' existing cells are preserved.
pub fn expand_cultures(
    store: &mut CellStore,
    biomes: &BiomeTable,
    cultures: &[Culture],
    neutral_rate: f64,
) {
    if cultures.is_empty() {
        return;
    }
    let max_cost = store.len() as f64 * 0.6 * neutral_rate;

    let locked_cells: FnvHashSet<CellId> = store
        .ids()
        .filter(|&id| {
            let culture_idx = store.culture_id[id.index()];
            culture_idx > 0
                && cultures
                    .get(culture_idx - 1)
                    .map(|c| c.locked)
                    .unwrap_or(false)
        })
        .collect();

    let sources: Vec<(CellId, usize, f64)> = cultures
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.locked)
        .map(|(i, c)| (c.center_cell, i, 0.0))
        .collect();
    if sources.is_empty() {
        return;
    }

    let costs = CultureCosts::new(store, biomes, cultures);
    let claims: Claims = pathfinding::expand(store, sources, max_cost, &locked_cells, |owner, from, to| {
        costs.edge_cost(owner, from, to)
    });

    for (cell, (owner, _cost)) in claims {
        let i = cell.index();
        if store.population[i] > 0.0 && !cultures[owner].locked {
            store.culture_id[i] = owner + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::culture::preference::Preference;
    use crate::culture::seeding::CultureType;

    fn culture(name: &str, center: CellId) -> Culture {
        Culture {
            name: name.to_string(),
            center_cell: center,
            culture_type: CultureType::Generic,
            expansionism: 1.0,
            name_base_id: 0,
            preference: Preference::Habitability,
            locked: false,
        }
    }

    #[test]
    fn every_populated_cell_gets_claimed_by_nearest_center() {
        let mut store = crate::cell::test_store(10);
        for i in 0..10 {
            store.population[i] = 10.0;
            store.elevation[i] = 40;
        }
        let adjacency: Vec<Vec<CellId>> = (0..10)
            .map(|i| {
                let mut v = Vec::new();
                if i > 0 {
                    v.push(CellId((i - 1) as u32));
                }
                if i < 9 {
                    v.push(CellId((i + 1) as u32));
                }
                v
            })
            .collect();
        store.set_neighbors(adjacency);
        let biomes = BiomeTable::default();
        let cultures = vec![culture("west", CellId(0)), culture("east", CellId(9))];
        expand_cultures(&mut store, &biomes, &cultures, 1.0);
        assert!(store.culture_id.iter().all(|&c| c != 0));
        assert_eq!(store.culture_id[0], 1);
        assert_eq!(store.culture_id[9], 2);
    }

    #[test]
    fn locked_culture_cells_are_not_reassigned() {
        let mut store = crate::cell::test_store(3);
        store.set_neighbors(vec![vec![CellId(1)], vec![CellId(0), CellId(2)], vec![CellId(1)]]);
        for i in 0..3 {
            store.population[i] = 5.0;
        }
        store.culture_id[0] = 1;
        let biomes = BiomeTable::default();
        let mut locked = culture("old", CellId(0));
        locked.locked = true;
        let cultures = vec![locked, culture("new", CellId(2))];
        expand_cultures(&mut store, &biomes, &cultures, 1.0);
        assert_eq!(store.culture_id[0], 1);
    }
}
