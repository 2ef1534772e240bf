//! Cost-field Dijkstra (spec §9 "Priority-queue abstraction"): the one
//! routine every expansion algorithm (culture now; province, religion, and
//! state labeling later) shares, parameterized by a per-edge cost function,
//! a per-source starting cost, and a global cost ceiling.

use crate::cell::{CellId, CellStore};
use fnv::FnvHashSet;
use ordered_float::OrderedFloat;
use priority_queue::PriorityQueue;
use std::cmp::Reverse;

/// Result of expansion: for every reached cell, which source claimed it and
/// at what accumulated cost.
pub type Claims = fnv::FnvHashMap<CellId, (usize, f64)>;

/// Runs a multi-source Dijkstra over `store`'s neighbor graph. `sources`
/// pairs a starting cell with an owner id and an initial cost. `cost_fn`
/// computes the edge cost of moving from `owner`'s frontier into `to`;
/// returning `f64::INFINITY` makes an edge impassable. `locked` cells are
/// seeded as already-claimed sinks: they can be used to reach further cells,
/// but are never themselves reassigned to a different owner.
pub fn expand<F>(
    store: &CellStore,
    sources: impl IntoIterator<Item = (CellId, usize, f64)>,
    max_cost: f64,
    locked: &FnvHashSet<CellId>,
    mut cost_fn: F,
) -> Claims
where
    F: FnMut(usize, CellId, CellId) -> f64,
{
    let mut best: Claims = fnv::FnvHashMap::default();
    let mut queue: PriorityQueue<CellId, Reverse<OrderedFloat<f64>>> = PriorityQueue::new();

    for (cell, owner, cost) in sources {
        if locked.contains(&cell) {
            continue;
        }
        let better = best
            .get(&cell)
            .map(|&(_, existing)| cost < existing)
            .unwrap_or(true);
        if better {
            best.insert(cell, (owner, cost));
            queue.push_increase(cell, Reverse(OrderedFloat(cost)));
        }
    }

    while let Some((cell, Reverse(OrderedFloat(cost)))) = queue.pop() {
        let Some(&(owner, recorded_cost)) = best.get(&cell) else {
            continue;
        };
        if (cost - recorded_cost).abs() > f64::EPSILON {
            continue; // stale entry; a cheaper claim has already superseded it
        }
        for &neighbor in store.neighbors(cell) {
            if locked.contains(&neighbor) {
                continue;
            }
            let edge_cost = cost_fn(owner, cell, neighbor);
            if !edge_cost.is_finite() {
                continue;
            }
            let total = cost + edge_cost;
            if total > max_cost {
                continue;
            }
            let improved = best
                .get(&neighbor)
                .map(|&(_, existing)| total < existing)
                .unwrap_or(true);
            if improved {
                best.insert(neighbor, (owner, total));
                queue.push_increase(neighbor, Reverse(OrderedFloat(total)));
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellId;

    #[test]
    fn closer_source_wins_on_a_line() {
        let mut store = crate::cell::test_store(5);
        let adjacency: Vec<Vec<CellId>> = (0..5)
            .map(|i| {
                let mut v = Vec::new();
                if i > 0 {
                    v.push(CellId((i - 1) as u32));
                }
                if i < 4 {
                    v.push(CellId((i + 1) as u32));
                }
                v
            })
            .collect();
        store.set_neighbors(adjacency);

        let sources = vec![(CellId(0), 0usize, 0.0), (CellId(4), 1usize, 0.0)];
        let locked = FnvHashSet::default();
        let claims = expand(&store, sources, 100.0, &locked, |_, _, _| 1.0);

        assert_eq!(claims.get(&CellId(1)).unwrap().0, 0);
        assert_eq!(claims.get(&CellId(3)).unwrap().0, 1);
    }

    #[test]
    fn max_cost_bounds_reach() {
        let mut store = crate::cell::test_store(3);
        store.set_neighbors(vec![vec![CellId(1)], vec![CellId(0), CellId(2)], vec![CellId(1)]]);
        let sources = vec![(CellId(0), 0usize, 0.0)];
        let locked = FnvHashSet::default();
        let claims = expand(&store, sources, 1.0, &locked, |_, _, _| 1.0);
        assert!(claims.contains_key(&CellId(1)));
        assert!(!claims.contains_key(&CellId(2)));
    }
}
