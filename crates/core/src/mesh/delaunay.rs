//! Thin wrapper around `delaunator` producing a triangulation we can walk by
//! half-edge, plus circumcenter computation feeding Voronoi tessellation.

use crate::geometry::Point;
use delaunator::{triangulate, Triangulation};

pub struct Delaunay {
    pub points: Vec<Point>,
    pub triangulation: Triangulation,
}

impl Delaunay {
    pub fn build(points: &[Point]) -> Option<Self> {
        let raw: Vec<delaunator::Point> = points.iter().map(|p| (*p).into()).collect();
        let triangulation = triangulate(&raw);
        if triangulation.triangles.is_empty() {
            return None;
        }
        Some(Self {
            points: points.to_vec(),
            triangulation,
        })
    }

    pub fn num_triangles(&self) -> usize {
        self.triangulation.triangles.len() / 3
    }

    /// The three point indices of triangle `t`.
    pub fn triangle_points(&self, t: usize) -> [usize; 3] {
        [
            self.triangulation.triangles[t * 3],
            self.triangulation.triangles[t * 3 + 1],
            self.triangulation.triangles[t * 3 + 2],
        ]
    }

    pub fn circumcenter(&self, t: usize) -> Point {
        let [a, b, c] = self.triangle_points(t);
        circumcenter(self.points[a], self.points[b], self.points[c])
    }

    /// Triangles that share an edge with `t`, indexed by the half-edge slot
    /// (0, 1, or 2); `None` means that edge is on the hull.
    pub fn adjacent_triangles(&self, t: usize) -> [Option<usize>; 3] {
        let mut out = [None; 3];
        for side in 0..3 {
            let e = t * 3 + side;
            let opp = self.triangulation.halfedges[e];
            out[side] = if opp == delaunator::EMPTY {
                None
            } else {
                Some(opp / 3)
            };
        }
        out
    }

    /// All triangles incident to point `p`, in order around the point,
    /// by walking half-edges. Returns `None` if `p` sits on the hull and the
    /// walk can't close (caller should fall back to a linear scan).
    pub fn triangles_around_point(&self, p: usize) -> Vec<usize> {
        let mut triangles = Vec::new();
        let start = self.triangulation.inedges[p];
        if start == delaunator::EMPTY {
            // Hull point with no recorded incoming edge; scan linearly.
            return (0..self.num_triangles())
                .filter(|&t| self.triangle_points(t).contains(&p))
                .collect();
        }
        let mut incoming = start;
        loop {
            let t = incoming / 3;
            triangles.push(t);
            let outgoing = delaunator::next_halfedge(incoming);
            match self.triangulation.halfedges.get(outgoing) {
                Some(&h) if h != delaunator::EMPTY => {
                    incoming = h;
                    if incoming == start {
                        break;
                    }
                }
                _ => break,
            }
        }
        triangles
    }
}

fn circumcenter(a: Point, b: Point, c: Point) -> Point {
    let ax = a.x;
    let ay = a.y;
    let bx = b.x - ax;
    let by = b.y - ay;
    let cx = c.x - ax;
    let cy = c.y - ay;
    let d = 2.0 * (bx * cy - by * cx);
    if d.abs() < f64::EPSILON {
        // Degenerate (collinear) triangle; fall back to centroid rather than
        // dividing by zero.
        return Point::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0);
    }
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (cy * b2 - by * c2) / d;
    let uy = (bx * c2 - cx * b2) / d;
    Point::new(ax + ux, ay + uy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_triangle_circumcenter_is_midpoint_of_hypotenuse() {
        let center = circumcenter(
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(0.0, 2.0),
        );
        assert_approx_eq::assert_approx_eq!(center.x, 1.0);
        assert_approx_eq::assert_approx_eq!(center.y, 1.0);
    }

    #[test]
    fn build_returns_none_for_fewer_than_three_points() {
        let points = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        assert!(Delaunay::build(&points).is_none());
    }
}
