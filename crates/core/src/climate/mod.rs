//! Climate simulation (spec §4.3): temperature, prevailing wind tiers, and
//! directional precipitation advection.

mod precipitation;
mod temperature;
mod wind;

pub use wind::{prevailing_wind, PrevailingWind};

use crate::cell::CellStore;
use crate::config::{ClimateConfig, HydrologyConfig};
use crate::progress::ProgressObserver;
use log::info;

pub fn run_climate<P: ProgressObserver>(
    store: &mut CellStore,
    climate: &ClimateConfig,
    hydrology: &HydrologyConfig,
    progress: &mut P,
) {
    progress.start(Some(store.len()), || "assigning temperature".to_string());
    temperature::assign_temperature(store, climate);
    progress.finish(|| "temperature assigned".to_string());

    progress.start(Some(store.len()), || "assigning wind tiers".to_string());
    wind::assign_wind_tiers(store);
    progress.finish(|| "wind tiers assigned".to_string());

    progress.start_unknown_endpoint(|| "advecting precipitation".to_string());
    precipitation::run_precipitation(store, climate, hydrology.max_passable_elevation);
    progress.finish(|| "precipitation advected".to_string());

    info!(
        "climate: mean temperature {:.1}, mean precipitation {:.1}",
        store.temperature.iter().map(|&t| t as f64).sum::<f64>() / store.len().max(1) as f64,
        store.precipitation.iter().map(|&p| p as f64).sum::<f64>() / store.len().max(1) as f64,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoOpProgress;

    #[test]
    fn latitude_strip_cools_poleward_and_rains_unevenly() {
        let mut store = crate::cell::test_store(18);
        for i in 0..18 {
            store.latitude[i] = i as f64 * 5.0;
            store.elevation[i] = 30;
        }
        let adjacency: Vec<Vec<crate::cell::CellId>> = (0..18)
            .map(|i| {
                let mut v = Vec::new();
                if i > 0 {
                    v.push(crate::cell::CellId((i - 1) as u32));
                }
                if i < 17 {
                    v.push(crate::cell::CellId((i + 1) as u32));
                }
                v
            })
            .collect();
        store.set_neighbors(adjacency);

        let climate = ClimateConfig::default();
        let hydrology = HydrologyConfig::default();
        let mut progress = NoOpProgress;
        run_climate(&mut store, &climate, &hydrology, &mut progress);

        for i in 1..18 {
            assert!(store.temperature[i] <= store.temperature[i - 1]);
        }
    }
}
