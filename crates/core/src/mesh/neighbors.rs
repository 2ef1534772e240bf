//! Neighbor graph computation (spec §4.1).
//!
//! Two surviving Voronoi cells are neighbors exactly when their generator
//! points share a Delaunay edge — the standard Voronoi/Delaunay duality,
//! which is exact (no epsilon tolerance needed) and cheaper than a spatial
//! boundary-intersection scan. Edges touching a dropped cell or an infinity
//! anchor are skipped, which is the "healing" step spec §4.1 asks for.

use super::delaunay::Delaunay;
use fnv::FnvHashSet;

/// Builds per-generator adjacency lists. `kept[p]` must be `true` iff
/// generator `p` survived clipping; anchors are the points at index
/// `>= generator_count` and are always excluded.
pub fn build_adjacency(
    delaunay: &Delaunay,
    generator_count: usize,
    kept: &[bool],
) -> Vec<Vec<u32>> {
    let mut edges: Vec<FnvHashSet<u32>> = vec![FnvHashSet::default(); generator_count];
    let triangles = delaunay.triangulation.triangles.len() / 3;
    for t in 0..triangles {
        let tri = delaunay.triangle_points(t);
        for i in 0..3 {
            let a = tri[i];
            let b = tri[(i + 1) % 3];
            if a >= generator_count || b >= generator_count {
                continue;
            }
            if !kept[a] || !kept[b] {
                continue;
            }
            edges[a].insert(b as u32);
            edges[b].insert(a as u32);
        }
    }
    edges
        .into_iter()
        .map(|set| set.into_iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Extent, Point};

    #[test]
    fn adjacency_is_symmetric() {
        let extent = Extent::new(10.0, 10.0);
        let mut points = vec![
            Point::new(3.0, 3.0),
            Point::new(7.0, 3.0),
            Point::new(5.0, 7.0),
        ];
        points.extend(extent.infinity_anchors());
        let delaunay = Delaunay::build(&points).unwrap();
        let kept = vec![true; 3];
        let adjacency = build_adjacency(&delaunay, 3, &kept);
        for (i, neighbors) in adjacency.iter().enumerate() {
            for &j in neighbors {
                assert!(adjacency[j as usize].contains(&(i as u32)));
            }
        }
    }
}
