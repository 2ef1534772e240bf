//! Temperature assignment (spec §4.3).

use crate::cell::CellStore;
use crate::config::ClimateConfig;
use crate::geometry::round_to;

/// Smootherstep easing: flat near 0, steepest through the middle, flat again
/// near 1. Used so temperature falls off slowly right at the equator and
/// most of the drop happens through the mid-latitudes.
fn ease(x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    x * x * x * (x * (x * 6.0 - 15.0) + 10.0)
}

/// Adiabatic cooling for a land cell at `elevation` (0-100 scale), per the
/// configured exponent `k`. Elevations at or below the 18-unit reference
/// plane contribute no cooling.
fn adiabatic(elevation: i32, exponent: f64) -> f64 {
    let diff = (elevation as f64 - 18.0).max(0.0);
    round_to((diff.powf(exponent) / 1000.0) * 6.5, 0)
}

pub fn assign_temperature(store: &mut CellStore, config: &ClimateConfig) {
    for i in 0..store.len() {
        let lat_frac = (store.latitude[i].abs() / 90.0).clamp(0.0, 1.0);
        let base = config.temperature_equator
            - ease(lat_frac) * (config.temperature_equator - config.temperature_pole);
        let cooling = if store.is_ocean[i] {
            0.0
        } else {
            adiabatic(store.elevation[i], config.height_exponent)
        };
        let temp = (base - cooling).round().clamp(-128.0, 127.0) as i32;
        store.temperature[i] = temp;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equator_is_warmer_than_pole_at_equal_elevation() {
        let mut store = crate::cell::test_store(2);
        store.latitude = vec![0.0, 85.0];
        store.elevation = vec![30, 30];

        let config = ClimateConfig::default();
        assign_temperature(&mut store, &config);
        assert!(store.temperature[0] > store.temperature[1]);
    }

    #[test]
    fn high_elevation_land_is_colder_than_sea_level_at_same_latitude() {
        assert!(adiabatic(90, 1.0) > adiabatic(18, 1.0));
    }
}
