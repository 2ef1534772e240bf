//! River polyline rendering (spec §4.4): meandering offsets and width
//! progression along each river's cell chain.

use crate::cell::{CellStore, River};
use crate::geometry::Point;

const MIN_RIVER_LENGTH: usize = 3;
const MEANDER_BASE: f64 = 0.25;
const MEANDER_DECAY: f64 = 0.85;
const WIDTH_SCALE: f64 = 6.0;

/// Drops rivers shorter than [MIN_RIVER_LENGTH] (spec §4.4), then renders a
/// polyline with decaying perpendicular meander offsets for the rest.
pub fn render_rivers(store: &CellStore, rivers: &mut Vec<River>) {
    rivers.retain(|r| r.length() >= MIN_RIVER_LENGTH);
    for river in rivers.iter_mut() {
        render_one(store, river);
    }
}

fn render_one(store: &CellStore, river: &mut River) {
    let sites: Vec<Point> = river.cells.iter().map(|&id| store.site[id.index()]).collect();
    let mut polyline = Vec::with_capacity(sites.len() * 2);
    let mut flux_at_vertex = Vec::with_capacity(sites.len() * 2);
    let mut meander = MEANDER_BASE;

    polyline.push(sites[0]);
    flux_at_vertex.push(store.water_flow[river.cells[0].index()]);

    for window in sites.windows(2).enumerate() {
        let (step, pair) = window;
        let a = pair[0];
        let b = pair[1];
        let dir = b - a;
        let len = dir.length().max(f64::EPSILON);
        let perp = Point::new(-dir.y / len, dir.x / len);
        let offset_sign = if step % 2 == 0 { 1.0 } else { -1.0 };

        let mid = a + dir * 0.5;
        let offset = perp * (meander * len * offset_sign);
        polyline.push(mid + offset);
        flux_at_vertex.push(store.water_flow[river.cells[(step + 1).min(river.cells.len() - 1)].index()]);

        polyline.push(b);
        flux_at_vertex.push(store.water_flow[river.cells[(step + 1).min(river.cells.len() - 1)].index()]);

        meander *= MEANDER_DECAY;
    }

    river.polyline = polyline;
    river.flux_at_vertex = flux_at_vertex;
}

/// Width at a vertex given its flux, following a Fibonacci-like progression
/// for the first few segments before settling on the flux-driven formula
/// (spec §4.4).
pub fn width_at(vertex_index: usize, flux: f64) -> f64 {
    const FIBONACCI_LIKE: [f64; 5] = [1.0, 1.0, 2.0, 3.0, 5.0];
    let base = flux.max(0.0).powf(0.9) / WIDTH_SCALE;
    match FIBONACCI_LIKE.get(vertex_index) {
        Some(&step) => base + step * 0.1,
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellId;

    #[test]
    fn short_rivers_are_dropped() {
        let store = crate::cell::test_store(2);
        let mut rivers = vec![River {
            id: 0,
            cells: vec![CellId(0), CellId(1)],
            parent: None,
            basin: 0,
            polyline: vec![],
            flux_at_vertex: vec![],
        }];
        render_rivers(&store, &mut rivers);
        assert!(rivers.is_empty());
    }

    #[test]
    fn surviving_river_gets_a_polyline_longer_than_its_cell_chain() {
        let mut store = crate::cell::test_store(4);
        for i in 0..4 {
            store.site[i] = Point::new(i as f64, 0.0);
            store.water_flow[i] = 40.0;
        }
        let mut rivers = vec![River {
            id: 0,
            cells: vec![CellId(0), CellId(1), CellId(2), CellId(3)],
            parent: None,
            basin: 0,
            polyline: vec![],
            flux_at_vertex: vec![],
        }];
        render_rivers(&store, &mut rivers);
        assert_eq!(rivers.len(), 1);
        assert!(rivers[0].polyline.len() > rivers[0].cells.len());
    }
}
