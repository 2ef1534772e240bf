//! Shore-distance derivation (spec §3: `shore_distance`, `closest_water`,
//! `water_count`). Not one of spec §4's five named subsystems, but data the
//! Habitability stage depends on, so it runs as a small pass right after
//! Hydrology once lake membership is final.

use crate::cell::{CellId, CellStore};
use std::collections::VecDeque;

const MAX_SHORE_HOPS: i32 = 2;

pub fn compute_shore(store: &mut CellStore) {
    let n = store.len();
    let is_water = |i: usize| store.is_ocean[i] || store.lake_id[i].is_some();

    for id in store.ids() {
        let i = id.index();
        store.water_count[i] = store
            .neighbors(id)
            .iter()
            .filter(|&&nbr| is_water(nbr.index()))
            .count() as u8;
    }

    let mut distance = vec![i32::MAX; n];
    let mut nearest_opposite: Vec<Option<CellId>> = vec![None; n];
    let mut queue = VecDeque::new();

    for id in store.ids() {
        let i = id.index();
        let water_neighbor = store
            .neighbors(id)
            .iter()
            .find(|&&nbr| is_water(nbr.index()) != is_water(i));
        if let Some(&opposite) = water_neighbor {
            distance[i] = 1;
            nearest_opposite[i] = Some(opposite);
            queue.push_back(id);
        }
    }

    while let Some(current) = queue.pop_front() {
        let i = current.index();
        if distance[i] >= MAX_SHORE_HOPS {
            continue;
        }
        for &neighbor in store.neighbors(current) {
            let n_idx = neighbor.index();
            if is_water(n_idx) != is_water(i) {
                continue; // opposite-type neighbors are handled by seeding above
            }
            if distance[n_idx] > distance[i] + 1 {
                distance[n_idx] = distance[i] + 1;
                nearest_opposite[n_idx] = nearest_opposite[i];
                queue.push_back(neighbor);
            }
        }
    }

    for id in store.ids() {
        let i = id.index();
        let hops = if distance[i] == i32::MAX {
            0
        } else {
            distance[i].min(MAX_SHORE_HOPS)
        };
        store.shore_distance[i] = if is_water(i) { -hops } else { hops };
        store.closest_water[i] = if is_water(i) {
            Some(CellId(i as u32))
        } else {
            nearest_opposite[i]
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coastal_land_gets_distance_one() {
        let mut store = crate::cell::test_store(2);
        store.is_ocean = vec![true, false];
        store.set_neighbors(vec![vec![CellId(1)], vec![CellId(0)]]);
        compute_shore(&mut store);
        assert_eq!(store.shore_distance[1], 1);
        assert_eq!(store.shore_distance[0], -1);
        assert_eq!(store.closest_water[1], Some(CellId(0)));
    }

    #[test]
    fn deep_interior_land_is_zero() {
        let mut store = crate::cell::test_store(5);
        store.is_ocean = vec![true, false, false, false, false];
        store.set_neighbors(vec![
            vec![CellId(1)],
            vec![CellId(0), CellId(2)],
            vec![CellId(1), CellId(3)],
            vec![CellId(2), CellId(4)],
            vec![CellId(3)],
        ]);
        compute_shore(&mut store);
        assert_eq!(store.shore_distance[4], 0);
    }
}
