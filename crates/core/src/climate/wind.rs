//! Prevailing-wind tiers (spec §4.3): latitude banded into 15° tiers `[0,
//! 5]`, each with a configured prevailing angle from which the four
//! direction booleans are derived.

use crate::cell::CellStore;

/// Degrees, measured counter-clockwise from +x (east), the direction air
/// moves *towards* in each tier, equator (tier 0) to pole (tier 5). Mirrors
/// the classic trade/westerly/polar banding: easterlies near the equator,
/// westerlies in the mid-latitudes, easterlies again near the poles.
const TIER_ANGLES_DEG: [f64; 6] = [180.0, 200.0, 45.0, 30.0, 200.0, 160.0];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrevailingWind {
    pub to_west: bool,
    pub to_east: bool,
    pub to_north: bool,
    pub to_south: bool,
}

impl PrevailingWind {
    fn from_angle_deg(angle_deg: f64) -> Self {
        let rad = angle_deg.to_radians();
        let (dy, dx) = rad.sin_cos();
        Self {
            to_west: dx < -0.1,
            to_east: dx > 0.1,
            // increasing latitude index runs equator -> pole (south in our
            // `y` convention), so a positive `dy` component blows "south".
            to_south: dy > 0.1,
            to_north: dy < -0.1,
        }
    }
}

pub fn tier_for_latitude(abs_latitude: f64) -> usize {
    ((abs_latitude / 15.0).floor() as usize).min(5)
}

pub fn prevailing_wind(tier: usize) -> PrevailingWind {
    PrevailingWind::from_angle_deg(TIER_ANGLES_DEG[tier.min(5)])
}

pub fn assign_wind_tiers(store: &mut CellStore) {
    for i in 0..store.len() {
        store.wind_tier[i] = tier_for_latitude(store.latitude[i].abs()) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_bands_are_monotonic_with_latitude() {
        assert_eq!(tier_for_latitude(0.0), 0);
        assert_eq!(tier_for_latitude(89.9), 5);
        assert!(tier_for_latitude(10.0) <= tier_for_latitude(40.0));
    }

    #[test]
    fn every_tier_has_a_defined_wind() {
        for tier in 0..6 {
            let wind = prevailing_wind(tier);
            assert!(wind.to_west || wind.to_east || wind.to_north || wind.to_south);
        }
    }
}
