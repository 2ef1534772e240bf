//! Hydrology (spec §4.4): depression resolution, flow accumulation, lake
//! flood-filling, river formation and rendering, and optional erosion.

mod depression;
mod flow;
mod lake;
pub mod river;

pub use flow::HydrologyOutput;

use crate::cell::{CellStore, Lake, River};
use crate::config::HydrologyConfig;
use crate::progress::ProgressObserver;
use crate::rng::WorldRng;
use log::info;

pub fn run_hydrology<P: ProgressObserver>(
    store: &mut CellStore,
    config: &HydrologyConfig,
    rng: &mut WorldRng,
    progress: &mut P,
) -> (Vec<Lake>, Vec<River>) {
    progress.start_unknown_endpoint(|| "resolving depressions".to_string());
    let remaining = depression::resolve_depressions(store, config.max_depression_iterations);
    progress.finish(|| format!("depressions resolved ({remaining} residual)"));

    progress.start(Some(store.len()), || "accumulating flow".to_string());
    let HydrologyOutput { lakes, mut rivers } = flow::accumulate_flow(store, config, rng);
    progress.finish(|| format!("flow accumulated: {} lakes, {} river candidates", lakes.len(), rivers.len()));

    progress.start(Some(rivers.len()), || "rendering rivers".to_string());
    river::render_rivers(store, &mut rivers);
    progress.finish(|| format!("{} rivers rendered", rivers.len()));

    if config.erosion_enabled {
        erode(store, &rivers, config.max_downcut);
    }

    info!(
        "hydrology: {} lakes, {} rivers ({} residual depressions)",
        lakes.len(),
        rivers.len(),
        remaining
    );
    (lakes, rivers)
}

/// Optional downcut pass (spec §4.4 "Erosion"): land above elevation 35 with
/// at least one higher, flux-carrying neighbor is worn down proportional to
/// its flux relative to the mean flux among its upstream neighbors.
fn erode(store: &mut CellStore, _rivers: &[River], max_downcut: f64) {
    let mut downcut = vec![0.0f64; store.len()];
    for id in store.land_ids() {
        let i = id.index();
        if store.elevation[i] < 35 {
            continue;
        }
        let higher_with_flux: Vec<f64> = store
            .neighbors(id)
            .iter()
            .filter(|&&n| store.elevation[n.index()] > store.elevation[i] && store.water_flow[n.index()] > 0.0)
            .map(|&n| store.water_flow[n.index()])
            .collect();
        if higher_with_flux.is_empty() {
            continue;
        }
        let upstream_mean = higher_with_flux.iter().sum::<f64>() / higher_with_flux.len() as f64;
        if upstream_mean <= 0.0 {
            continue;
        }
        downcut[i] = (store.water_flow[i] / upstream_mean).min(max_downcut);
    }
    for i in 0..store.len() {
        store.elevation[i] = (store.elevation[i] as f64 - downcut[i]).round().max(0.0) as i32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellId;
    use crate::progress::NoOpProgress;

    #[test]
    fn two_peaks_with_a_saddle_produce_a_connected_river() {
        // peaks at both ends, a saddle dipping toward the middle - monotone
        // descent on both sides feeding a single channel.
        let elevations = [90, 60, 40, 30, 40, 60, 90];
        let mut store = crate::cell::test_store(elevations.len());
        store.elevation = elevations.to_vec();
        store.precipitation = vec![100; elevations.len()];
        let n = elevations.len();
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

        let config = HydrologyConfig::default();
        let mut rng = WorldRng::from_seed(9543572450198918714);
        let mut progress = NoOpProgress;
        let (_lakes, rivers) = run_hydrology(&mut store, &config, &mut rng, &mut progress);
        assert!(!rivers.is_empty());
        assert!(rivers.iter().any(|r| r.length() >= 3));
        for id in store.land_ids() {
            assert!(store.water_flow[id.index()] > 0.0);
        }
    }
}
