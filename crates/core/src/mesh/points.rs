//! Point placement (spec §4.1): a jittered grid over the extent, blue-noise
//! -like without the cost of full Poisson-disc sampling.

use crate::geometry::{Extent, Point};
use crate::rng::WorldRng;
use rand::Rng;

/// Produces `cell_count` generator points jittered within a grid sized to
/// approximate that density over `extent`, plus the four infinity anchors
/// (spec §4.1) appended at the end so callers can triangulate with them and
/// then discard anchor-generated cells.
pub fn jittered_grid(extent: Extent, cell_count: usize, rng: &mut WorldRng) -> Vec<Point> {
    if cell_count == 0 {
        return extent.infinity_anchors().to_vec();
    }
    let aspect = extent.width / extent.height;
    let rows = ((cell_count as f64) / aspect).sqrt().round().max(1.0) as usize;
    let cols = (cell_count + rows - 1) / rows.max(1);
    let cell_w = extent.width / cols as f64;
    let cell_h = extent.height / rows.max(1) as f64;

    let mut points = Vec::with_capacity(rows * cols + 4);
    for row in 0..rows {
        for col in 0..cols {
            let cx = (col as f64 + 0.5) * cell_w;
            let cy = (row as f64 + 0.5) * cell_h;
            let jitter_x = rng.inner_mut().gen_range(-0.4..0.4) * cell_w;
            let jitter_y = rng.inner_mut().gen_range(-0.4..0.4) * cell_h;
            points.push(extent.clamp(Point::new(cx + jitter_x, cy + jitter_y)));
        }
    }
    points.extend(extent.infinity_anchors());
    points
}

/// Nudges `p` by a tiny epsilon in a deterministic direction derived from
/// `salt`, used to break generator coincidence (spec §4.1 failure mode).
pub fn perturb(p: Point, salt: u32) -> Point {
    const EPS: f64 = 1e-6;
    let angle = (salt as f64) * 2.399_963_229_728_653; // golden-angle spacing
    Point::new(p.x + EPS * angle.cos(), p.y + EPS * angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_stays_within_extent_excluding_anchors() {
        let extent = Extent::new(100.0, 60.0);
        let mut rng = WorldRng::from_seed(1);
        let points = jittered_grid(extent, 200, &mut rng);
        for p in &points[..points.len() - 4] {
            assert!(extent.contains(*p));
        }
    }

    #[test]
    fn anchors_are_well_outside_extent() {
        let extent = Extent::new(10.0, 10.0);
        let mut rng = WorldRng::from_seed(1);
        let points = jittered_grid(extent, 16, &mut rng);
        for anchor in &points[points.len() - 4..] {
            assert!(!extent.contains(*anchor));
        }
    }
}
