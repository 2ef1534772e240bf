//! Depression resolution (spec §4.4): before flow accumulation runs, raise
//! land-locked sinks so they don't trap flow outside a declared lake.

use crate::cell::CellStore;
use log::warn;

const RAISE_STEP: f64 = 0.1;

/// Returns the number of depressions still unresolved after
/// `max_iterations`. On non-convergence, elevation is rolled back to what it
/// was before this call (spec §7 category 3: convergence-failure is
/// recovered, not fatal — residual sinks are left for lakes to absorb).
pub fn resolve_depressions(store: &mut CellStore, max_iterations: u32) -> usize {
    let original: Vec<i32> = store.elevation.clone();
    let mut heights: Vec<f64> = original.iter().map(|&e| e as f64).collect();

    let mut iterations = 0;
    loop {
        let mut depressed = Vec::new();
        for id in store.land_ids() {
            let i = id.index();
            let neighbors = store.neighbors(id);
            if neighbors.is_empty() {
                continue;
            }
            let lowest = neighbors
                .iter()
                .map(|&nbr| heights[nbr.index()])
                .fold(f64::INFINITY, f64::min);
            if heights[i] <= lowest {
                depressed.push((i, lowest));
            }
        }
        if depressed.is_empty() {
            for (i, h) in heights.into_iter().enumerate() {
                store.elevation[i] = h.round().clamp(0.0, 100.0) as i32;
            }
            return 0;
        }
        if iterations >= max_iterations {
            warn!(
                "depression resolution did not converge after {iterations} iterations, {} cells remain depressed; reverting",
                depressed.len()
            );
            store.elevation = original;
            return depressed.len();
        }
        for (i, lowest) in depressed {
            heights[i] = lowest + RAISE_STEP;
        }
        iterations += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellId;

    #[test]
    fn interior_sink_gets_raised_above_its_rim() {
        // A 3-cell chain: rim - sink - rim, both rims higher than the sink.
        let mut store = crate::cell::test_store(3);
        store.elevation = vec![50, 10, 50];
        store.set_neighbors(vec![vec![CellId(1)], vec![CellId(0), CellId(2)], vec![CellId(1)]]);

        let remaining = resolve_depressions(&mut store, 10_000);
        assert_eq!(remaining, 0);
        assert!(store.elevation[1] > 10);
    }

    #[test]
    fn flat_terrain_has_no_depressions() {
        let mut store = crate::cell::test_store(3);
        store.elevation = vec![30, 30, 30];
        store.set_neighbors(vec![vec![CellId(1)], vec![CellId(0), CellId(2)], vec![CellId(1)]]);
        let remaining = resolve_depressions(&mut store, 100);
        assert_eq!(remaining, 0);
    }
}
