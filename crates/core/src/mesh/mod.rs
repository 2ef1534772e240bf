//! Mesh construction (spec §4.1): point sampling → Delaunay triangulation →
//! Voronoi tessellation clipped to the extent → neighbor graph. This is the
//! only stage that creates cells; every later stage only mutates attribute
//! columns on the [CellStore] this produces.

mod delaunay;
mod neighbors;
mod points;
mod voronoi;

use crate::cell::CellStore;
use crate::config::MeshConfig;
use crate::error::{WorldError, WorldResult};
use crate::geometry::Extent;
use crate::progress::ProgressObserver;
use crate::rng::WorldRng;
use delaunay::Delaunay;
use geo::Area;
use log::{debug, warn};

const MAX_COINCIDENCE_RETRIES: usize = 8;

pub fn build_mesh<P: ProgressObserver>(
    config: &MeshConfig,
    rng: &mut WorldRng,
    progress: &mut P,
) -> WorldResult<CellStore> {
    let extent = Extent::new(config.width, config.height);
    let mut points = points::jittered_grid(extent, config.cell_count, rng);
    let generator_count = points.len() - 4;

    progress.start_unknown_endpoint(|| "triangulating mesh".to_string());
    let mut delaunay = Delaunay::build(&points);
    for attempt in 0..MAX_COINCIDENCE_RETRIES {
        if delaunay.is_some() {
            break;
        }
        warn!("degenerate triangulation on attempt {attempt}, perturbing coincident points");
        for (i, p) in points.iter_mut().enumerate().take(generator_count) {
            *p = points::perturb(*p, i as u32 + attempt as u32 * 7919);
        }
        delaunay = Delaunay::build(&points);
    }
    let delaunay = delaunay.ok_or(WorldError::EmptyMesh)?;

    let raw_cells = voronoi::tessellate(&delaunay, extent, 4);
    let kept: Vec<bool> = raw_cells.iter().map(|c| c.polygon.is_some()).collect();
    let dropped = kept.iter().filter(|k| !**k).count();
    if dropped > 0 {
        warn!("{dropped} cells dropped during clipping (degenerate geometry)");
    }

    let adjacency = neighbors::build_adjacency(&delaunay, generator_count, &kept);

    // Remap surviving generators to dense ids [0, N).
    let mut new_index = vec![u32::MAX; generator_count];
    let mut next = 0u32;
    for (old, &is_kept) in kept.iter().enumerate() {
        if is_kept {
            new_index[old] = next;
            next += 1;
        }
    }
    if next == 0 {
        return Err(WorldError::EmptyMesh);
    }

    let mut store = CellStore::default();
    let mut dense_adjacency = Vec::with_capacity(next as usize);
    for (old, raw_cell) in raw_cells.into_iter().enumerate() {
        if !kept[old] {
            continue;
        }
        let polygon = raw_cell.polygon.expect("kept cells always have a polygon");
        let area = polygon.unsigned_area();
        let site = raw_cell.site;
        let latitude = extent.latitude_of(site.y);

        store.site.push(site);
        store.polygon.push(polygon);
        store.area.push(area);
        store.latitude.push(latitude);
        store.elevation.push(0);
        store.is_ocean.push(false);
        store.temperature.push(0);
        store.precipitation.push(0);
        store.wind_tier.push(0);
        store.water_flow.push(0.0);
        store.lake_depth.push(0.0);
        store.lake_id.push(None);
        store.river_id.push(None);
        store.confluence_flux.push(0.0);
        store.shore_distance.push(0);
        store.closest_water.push(None);
        store.water_count.push(0);
        store.biome_id.push(None);
        store.terrain_feature_id.push(None);
        store.habitability.push(0);
        store.population.push(0.0);
        store.culture_id.push(0);

        let remapped: Vec<crate::cell::CellId> = adjacency[old]
            .iter()
            .map(|&n| crate::cell::CellId(new_index[n as usize]))
            .collect();
        dense_adjacency.push(remapped);
    }
    store.set_neighbors(dense_adjacency);
    store.assert_neighbor_symmetry()?;

    debug!(
        "mesh built: {} cells from {} generator candidates",
        store.len(),
        generator_count
    );
    progress.finish(|| format!("mesh: {} cells", store.len()));
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoOpProgress;

    #[test]
    fn small_grid_produces_symmetric_connected_mesh() {
        let config = MeshConfig {
            width: 50.0,
            height: 50.0,
            cell_count: 64,
        };
        let mut rng = WorldRng::from_seed(42);
        let mut progress = NoOpProgress;
        let store = build_mesh(&config, &mut rng, &mut progress).unwrap();
        assert!(store.len() > 0);
        store.assert_neighbor_symmetry().unwrap();
        for id in store.ids() {
            assert!(!store.neighbors(id).is_empty(), "cell {id} has no neighbors");
        }
    }
}
