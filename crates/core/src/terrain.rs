//! Terrain attribution (spec §4.2): attaches `elevation` and `is_ocean` to
//! every cell produced by Mesh.
//!
//! Raster sampling itself is an external collaborator (§1 scope) — the CLI
//! crate reads a heightmap with `gdal` and adapts it to [ElevationSource].
//! This module also ships [PeakTemplate], a small procedural generator used
//! by tests and by CLI's template-based world creation path, since spec
//! §4.2 calls out "computing from template" as a supported alternative to
//! raster sampling.

use crate::cell::{CellStore, SEA_LEVEL};
use crate::geometry::Point;

/// Adapts any heightmap (raster-backed or procedural) to raw elevation
/// samples at arbitrary cell sites.
pub trait ElevationSource {
    /// Raw sample at `site`, in the source's native units (not yet
    /// normalized to the `[0, 100]` scale).
    fn sample(&self, site: Point) -> f64;
}

/// Adapts a boolean ocean mask to arbitrary cell sites.
pub trait OceanMaskSource {
    fn is_ocean(&self, site: Point) -> bool;
}

/// Normalizes `[min_raw, max_raw]` to `[0, 100]` and writes `elevation` +
/// `is_ocean` for every cell. When `mask` is absent, `is_ocean` falls back to
/// an elevation threshold at [SEA_LEVEL] (spec §4.2).
pub fn attach_terrain(
    store: &mut CellStore,
    source: &dyn ElevationSource,
    mask: Option<&dyn OceanMaskSource>,
    min_raw: f64,
    max_raw: f64,
) {
    let span = (max_raw - min_raw).max(f64::EPSILON);
    for i in 0..store.len() {
        let site = store.site[i];
        let raw = source.sample(site);
        let normalized = (((raw - min_raw) / span) * 100.0).round().clamp(0.0, 100.0) as i32;
        store.elevation[i] = normalized;
        store.is_ocean[i] = match mask {
            Some(mask) => mask.is_ocean(site),
            None => normalized < SEA_LEVEL,
        };
    }
}

/// Procedural elevation source: a flat base elevation plus a sum of radial
/// Gaussian-ish peaks. Used by tests (e.g. the two-peak hydrology scenario)
/// and by the CLI's `genesis --template` path when no raster is supplied.
pub struct PeakTemplate {
    pub base: f64,
    pub peaks: Vec<(Point, f64, f64)>, // (center, height, radius)
}

impl ElevationSource for PeakTemplate {
    fn sample(&self, site: Point) -> f64 {
        let mut value = self.base;
        for (center, height, radius) in &self.peaks {
            let d = site.distance(center);
            let falloff = (-(d * d) / (2.0 * radius * radius)).exp();
            value += height * falloff;
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MeshConfig;
    use crate::mesh::build_mesh;
    use crate::progress::NoOpProgress;
    use crate::rng::WorldRng;

    #[test]
    fn uniform_source_yields_uniform_elevation() {
        let config = MeshConfig {
            width: 20.0,
            height: 20.0,
            cell_count: 25,
        };
        let mut rng = WorldRng::from_seed(7);
        let mut progress = NoOpProgress;
        let mut store = build_mesh(&config, &mut rng, &mut progress).unwrap();

        struct Flat;
        impl ElevationSource for Flat {
            fn sample(&self, _site: Point) -> f64 {
                50.0
            }
        }
        attach_terrain(&mut store, &Flat, None, 0.0, 100.0);
        assert!(store.elevation.iter().all(|&e| e == 50));
        assert!(store.is_ocean.iter().all(|&o| !o));
    }

    #[test]
    fn two_peak_template_has_higher_elevation_near_peaks() {
        let template = PeakTemplate {
            base: 10.0,
            peaks: vec![
                (Point::new(2.0, 2.0), 80.0, 1.5),
                (Point::new(7.0, 7.0), 80.0, 1.5),
            ],
        };
        let near_peak = template.sample(Point::new(2.0, 2.0));
        let far = template.sample(Point::new(0.0, 9.0));
        assert!(near_peak > far);
    }
}
