//! Voronoi tessellation by circumcenter-duality of a Delaunay triangulation
//! (spec §4.1), clipped to the map extent.

use super::delaunay::Delaunay;
use crate::geometry::{signed_area, Extent, Point, Polygon};
use geo::{Area, BooleanOps};

/// One raw (pre-healing) Voronoi cell: the generator point plus its clipped
/// boundary. `None` polygon means clipping produced nothing usable and the
/// cell should be dropped.
pub struct RawCell {
    pub site: Point,
    pub polygon: Option<Polygon>,
}

/// Builds one raw cell per *non-anchor* point (`anchor_count` trailing points
/// in `delaunay.points` are assumed to be the infinity anchors and are
/// skipped).
pub fn tessellate(delaunay: &Delaunay, extent: Extent, anchor_count: usize) -> Vec<RawCell> {
    let generator_count = delaunay.points.len() - anchor_count;
    let mut cells = Vec::with_capacity(generator_count);
    for p in 0..generator_count {
        let site = delaunay.points[p];
        let triangles = delaunay.triangles_around_point(p);
        if triangles.len() < 3 {
            cells.push(RawCell { site, polygon: None });
            continue;
        }
        let ring: Vec<Point> = triangles.iter().map(|&t| delaunay.circumcenter(t)).collect();
        let polygon = clip_ring(&ring, extent);
        cells.push(RawCell { site, polygon });
    }
    cells
}

fn clip_ring(ring: &[Point], extent: Extent) -> Option<Polygon> {
    if ring.len() < 3 {
        return None;
    }
    let mut coords: Vec<(f64, f64)> = ring.iter().map(|p| (p.x, p.y)).collect();
    if signed_area(ring) < 0.0 {
        coords.reverse();
    }
    coords.push(coords[0]);
    let raw = Polygon::new(coords.into(), vec![]);

    let bounds = Polygon::new(
        vec![
            (0.0, 0.0),
            (extent.width, 0.0),
            (extent.width, extent.height),
            (0.0, extent.height),
            (0.0, 0.0),
        ]
        .into(),
        vec![],
    );

    let clipped = raw.intersection(&bounds);
    let exterior = clipped.0.into_iter().max_by(|a, b| {
        a.unsigned_area()
            .partial_cmp(&b.unsigned_area())
            .unwrap_or(std::cmp::Ordering::Equal)
    })?;
    if exterior.unsigned_area() <= f64::EPSILON {
        return None;
    }
    Some(exterior)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::delaunay::Delaunay;

    #[test]
    fn single_interior_point_with_anchors_yields_one_cell() {
        let extent = Extent::new(10.0, 10.0);
        let mut points = vec![Point::new(5.0, 5.0)];
        points.extend(extent.infinity_anchors());
        let delaunay = Delaunay::build(&points).unwrap();
        let cells = tessellate(&delaunay, extent, 4);
        assert_eq!(cells.len(), 1);
        let polygon = cells[0].polygon.as_ref().unwrap();
        assert!(polygon.unsigned_area() > 90.0);
    }
}
