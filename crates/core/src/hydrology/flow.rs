//! Flow accumulation, lake flood-filling, and river assignment (spec §4.4).

use super::lake;
use crate::cell::{CellId, CellStore, Lake, River};
use crate::config::HydrologyConfig;
use crate::rng::WorldRng;
use fnv::{FnvHashMap, FnvHashSet};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

pub struct HydrologyOutput {
    pub lakes: Vec<Lake>,
    pub rivers: Vec<River>,
}

const OCEAN_ELEVATION: f64 = -1.0e9;
const BASE_EVAPORATION_RATE: f64 = 0.4;

/// Flood-fills a lake starting from a land-locked sink, using a priority
/// flood (frontier ordered by ascending elevation) so the water level rises
/// exactly enough to overtop the lowest rim cell, which becomes the outlet.
fn flood_fill(
    store: &CellStore,
    start: CellId,
    assigned: &mut [bool],
) -> (Vec<CellId>, f64, Option<CellId>) {
    let mut in_lake = FnvHashSet::default();
    let mut members = Vec::new();
    let mut frontier: BinaryHeap<Reverse<(OrderedFloat<f64>, u32)>> = BinaryHeap::new();
    let mut queued = FnvHashSet::default();

    in_lake.insert(start);
    members.push(start);
    let mut surface = store.elevation[start.index()] as f64;

    let push_neighbors = |cell: CellId,
                           in_lake: &FnvHashSet<CellId>,
                           queued: &mut FnvHashSet<CellId>,
                           frontier: &mut BinaryHeap<Reverse<(OrderedFloat<f64>, u32)>>| {
        for &n in store.neighbors(cell) {
            if in_lake.contains(&n) || queued.contains(&n) || assigned[n.index()] {
                continue;
            }
            let elev = if store.is_ocean[n.index()] {
                OCEAN_ELEVATION
            } else {
                store.elevation[n.index()] as f64
            };
            frontier.push(Reverse((OrderedFloat(elev), n.0)));
            queued.insert(n);
        }
    };
    push_neighbors(start, &in_lake, &mut queued, &mut frontier);

    loop {
        let Some(Reverse((OrderedFloat(elev), id))) = frontier.pop() else {
            // Flood reached every reachable neighbor without finding a rim
            // lower than the current surface: a fully enclosed basin with no
            // possible outlet within the graph.
            return (members, surface, None);
        };
        let cell = CellId(id);
        queued.remove(&cell);

        if store.is_ocean[cell.index()] {
            return (members, surface, Some(cell));
        }
        if elev <= surface {
            in_lake.insert(cell);
            members.push(cell);
            push_neighbors(cell, &in_lake, &mut queued, &mut frontier);
            continue;
        }
        // `elev` is the lowest remaining rim cell and it's higher than the
        // current surface: overtopping happens here.
        surface = elev;
        return (members, surface, Some(cell));
    }
}

/// Runs flow accumulation over every land cell in descending elevation
/// order, forming lakes at sinks and rivers wherever flux crosses the
/// configured threshold.
pub fn accumulate_flow(
    store: &mut CellStore,
    config: &HydrologyConfig,
    rng: &mut WorldRng,
) -> HydrologyOutput {
    let n = store.len();
    let mean_area = store.mean_area().max(f64::EPSILON);
    let mut flux = vec![0.0f64; n];
    let mut assigned = vec![false; n];
    // Cell a lake member redirects its "downhill push" through, so upstream
    // cells that drain into a lake effectively push straight to its outlet.
    let mut redirect: FnvHashMap<usize, usize> = FnvHashMap::default();
    let mut lake_surface: FnvHashMap<usize, f64> = FnvHashMap::default();
    let mut lake_inflow: FnvHashMap<usize, f64> = FnvHashMap::default();

    let mut lakes: Vec<Lake> = Vec::new();
    let mut rivers: Vec<River> = Vec::new();
    let mut river_flux: FnvHashMap<usize, f64> = FnvHashMap::default();

    let mut order: Vec<CellId> = store.land_ids().collect();
    order.sort_unstable_by(|&a, &b| {
        store.elevation[b.index()]
            .cmp(&store.elevation[a.index()])
            .then(a.cmp(&b))
    });

    for id in order {
        let i = id.index();
        if assigned[i] {
            continue;
        }
        let own_contribution = store.precipitation[i] as f64 * (store.area[i] / mean_area);
        let total = flux[i] + own_contribution;
        store.water_flow[i] = total;

        let effective_elev = |cell: usize| -> f64 {
            if store.is_ocean[cell] {
                OCEAN_ELEVATION
            } else if let Some(&surface) = lake_surface.get(&cell) {
                surface
            } else {
                store.elevation[cell] as f64
            }
        };

        let lowest = store
            .neighbors(id)
            .iter()
            .map(|&nbr| (nbr, effective_elev(nbr.index())))
            .min_by(|(a_id, a_elev), (b_id, b_elev)| {
                a_elev
                    .partial_cmp(b_elev)
                    .unwrap()
                    .then(a_id.cmp(b_id))
            });

        let Some((lowest_id, lowest_elev)) = lowest else {
            continue;
        };

        if lowest_elev < store.elevation[i] as f64 {
            // Downhill path exists: push flux onward.
            let target = redirect
                .get(&lowest_id.index())
                .map(|&t| CellId(t as u32))
                .unwrap_or(lowest_id);

            if lake_surface.contains_key(&lowest_id.index()) {
                // Draining into a lake: track inflow by the lake's outlet
                // redirection target (set when the lake was created).
                if let Some(&outlet_idx) = redirect.get(&lowest_id.index()) {
                    *lake_inflow.entry(outlet_idx).or_insert(0.0) += total;
                }
            } else if !store.is_ocean[target.index()] {
                flux[target.index()] += total;
            }

            assign_river(store, &mut rivers, &mut river_flux, id, target, total, config);
        } else if !store.is_ocean[i] {
            // Sink: flood-fill a lake here.
            let (members, surface, outlet) = flood_fill(store, id, &mut assigned);
            for &m in &members {
                assigned[m.index()] = true;
                store.lake_id[m.index()] = Some(lakes.len());
                store.lake_depth[m.index()] = (surface - store.elevation[m.index()] as f64).max(0.0);
            }
            let outlet_is_ocean = outlet.map(|o| store.is_ocean[o.index()]).unwrap_or(false);
            let redirect_target = outlet.filter(|_| !outlet_is_ocean);
            for &m in &members {
                redirect.insert(m.index(), redirect_target.map(|o| o.index()).unwrap_or(m.index()));
                lake_surface.insert(m.index(), surface);
            }

            let inflow = total + lake_inflow.remove(&i).unwrap_or(0.0);
            let mean_temp = members
                .iter()
                .map(|&m| store.temperature[m.index()] as f64)
                .sum::<f64>()
                / members.len().max(1) as f64;
            let temp_factor = ((mean_temp + 10.0) / 30.0).clamp(0.05, 2.0);
            let evaporation = members.len() as f64 * BASE_EVAPORATION_RATE * temp_factor;

            let lake_id = lakes.len();
            let mut new_lake = Lake {
                id: lake_id,
                cells: members.clone(),
                group: crate::cell::LakeGroup::Freshwater,
                surface_elevation: surface,
                flux: inflow,
                evaporation,
                outlet_cell: redirect_target,
                inlets: Vec::new(),
            };
            new_lake.group = lake::classify(&new_lake, store, rng);
            lakes.push(new_lake);

            if let Some(outlet_cell) = redirect_target {
                let outflow = (inflow - evaporation).max(0.0);
                flux[outlet_cell.index()] += outflow;
                assign_river(store, &mut rivers, &mut river_flux, id, outlet_cell, outflow, config);
            }
        }
    }

    HydrologyOutput { lakes, rivers }
}

fn assign_river(
    store: &mut CellStore,
    rivers: &mut Vec<River>,
    river_flux: &mut FnvHashMap<usize, f64>,
    from: CellId,
    to: CellId,
    flux_amount: f64,
    config: &HydrologyConfig,
) {
    if flux_amount < config.min_flux_to_form_river as f64 {
        return;
    }
    let from_river = store.river_id[from.index()];
    let existing_at_to = store.river_id[to.index()];

    let river_id = match from_river {
        Some(r) => r,
        None => {
            let id = rivers.len();
            rivers.push(River {
                id,
                cells: vec![from],
                parent: None,
                basin: id,
                polyline: Vec::new(),
                flux_at_vertex: Vec::new(),
            });
            store.river_id[from.index()] = Some(id);
            id
        }
    };
    river_flux.insert(river_id, flux_amount);

    match existing_at_to {
        None => {
            rivers[river_id].cells.push(to);
            store.river_id[to.index()] = Some(river_id);
        }
        Some(other) if other == river_id => {
            // Already extended (shouldn't normally happen given processing
            // order, but idempotent is safer than panicking).
        }
        Some(other) => {
            let other_flux = *river_flux.get(&other).unwrap_or(&0.0);
            let (dominant, tributary, dominant_flux) = if flux_amount >= other_flux {
                (river_id, other, flux_amount)
            } else {
                (other, river_id, other_flux)
            };
            rivers[tributary].parent = Some(dominant);
            let dominant_basin = rivers[dominant].basin;
            rivers[tributary].basin = dominant_basin;
            rivers[dominant].cells.push(to);
            store.river_id[to.index()] = Some(dominant);
            store.confluence_flux[to.index()] = (flux_amount + other_flux - dominant_flux).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellId;

    fn chain_store(elevations: &[i32], precipitation: &[u32]) -> CellStore {
        let n = elevations.len();
        let mut store = crate::cell::test_store(n);
        store.elevation = elevations.to_vec();
        store.precipitation = precipitation.to_vec();
        let adjacency: Vec<Vec<CellId>> = (0..n)
            .map(|i| {
                let mut v = Vec::new();
                if i > 0 {
                    v.push(CellId((i - 1) as u32));
                }
                if i < n - 1 {
                    v.push(CellId((i + 1) as u32));
                }
                v
            })
            .collect();
        store.set_neighbors(adjacency);
        store
    }

    #[test]
    fn single_downslope_forms_one_river_above_threshold() {
        let mut store = chain_store(&[50, 40, 30, 20, 10], &[100, 100, 100, 100, 100]);
        let mut config = HydrologyConfig::default();
        config.min_flux_to_form_river = 30;
        let mut rng = WorldRng::from_seed(1);
        let output = accumulate_flow(&mut store, &config, &mut rng);
        assert_eq!(output.rivers.len(), 1);
        assert!(output.rivers[0].length() >= 3);
    }

    #[test]
    fn low_precipitation_below_threshold_forms_no_river() {
        let mut store = chain_store(&[50, 40, 30, 20, 10], &[20, 20, 20, 20, 20]);
        let mut config = HydrologyConfig::default();
        config.min_flux_to_form_river = 30;
        let mut rng = WorldRng::from_seed(1);
        let output = accumulate_flow(&mut store, &config, &mut rng);
        assert!(output.rivers.is_empty());
        assert!(store.water_flow[0] > 0.0);
    }

    #[test]
    fn enclosed_basin_forms_a_lake() {
        let mut store = crate::cell::test_store(3);
        store.elevation = vec![80, 10, 80];
        store.precipitation = vec![50, 50, 50];
        store.set_neighbors(vec![vec![CellId(1)], vec![CellId(0), CellId(2)], vec![CellId(1)]]);
        let config = HydrologyConfig::default();
        let mut rng = WorldRng::from_seed(1);
        let output = accumulate_flow(&mut store, &config, &mut rng);
        assert_eq!(output.lakes.len(), 1);
        assert!(store.lake_id[1].is_some());
    }
}
