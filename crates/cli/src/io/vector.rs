//! Cell/river/lake persistence through `gdal`'s vector (OGR) API against a
//! GeoPackage datasource (spec §6 "Persisted layers"). Each stage command
//! rewrites these layers wholesale with its result; a later command doesn't
//! read them back to resume, it rebuilds the store by deterministic replay
//! from the project sidecar (see `project.rs`) and overwrites the layers
//! again, so the GeoPackage is always a faithful snapshot of the last stage
//! run without doubling as this crate's internal state format.

use anyhow::{Context, Result};
use gdal::vector::{Feature, LayerAccess, LayerOptions, OGRwkbGeometryType};
use gdal::{Dataset, DatasetOptions, DriverManager, GdalOpenFlags};
use geo::Geometry as GeoGeometry;
use std::path::Path;
use worldforge::cell::{CellId, CellStore, Lake, River};
use worldforge::hydrology::river;

const CELLS_LAYER: &str = "cells";
const RIVERS_LAYER: &str = "rivers";
const LAKES_LAYER: &str = "lakes";

pub fn create_geopackage(path: &Path) -> Result<Dataset> {
    let driver = DriverManager::get_driver_by_name("GPKG").context("loading GPKG driver")?;
    driver
        .create_vector_only(path)
        .with_context(|| format!("creating GeoPackage `{}`", path.display()))
}

pub fn open_geopackage(path: &Path) -> Result<Dataset> {
    Dataset::open_ex(
        path,
        DatasetOptions {
            open_flags: GdalOpenFlags::GDAL_OF_UPDATE | GdalOpenFlags::GDAL_OF_VECTOR,
            ..Default::default()
        },
    )
    .with_context(|| format!("opening GeoPackage `{}` for update", path.display()))
}

/// Writes every cell's polygon and attribute columns to the `cells` layer,
/// replacing it if it already exists (each stage command rewrites the whole
/// layer rather than patching individual features, matching the pipeline's
/// "read whole layer, mutate, write whole layer" contract from §2).
pub fn write_cells(dataset: &mut Dataset, store: &CellStore) -> Result<()> {
    let _ = dataset.delete_layer(CELLS_LAYER);
    let mut layer = dataset
        .create_layer(LayerOptions {
            name: CELLS_LAYER,
            ty: OGRwkbGeometryType::wkbPolygon,
            ..Default::default()
        })
        .context("creating cells layer")?;

    for (field, ty) in cell_field_schema() {
        layer
            .create_defn_fields(&[(field, ty)])
            .with_context(|| format!("defining field `{field}`"))?;
    }

    for id in store.ids() {
        let i = id.index();
        let geometry = gdal::vector::Geometry::from_geo(GeoGeometry::Polygon(store.polygon[i].clone()))
            .context("converting cell polygon to OGR geometry")?;
        let mut feature = Feature::new(layer.defn())?;
        feature.set_geometry(geometry)?;
        feature.set_field_integer64("cell_id", i as i64)?;
        feature.set_field_double("area", store.area[i])?;
        feature.set_field_double("latitude", store.latitude[i])?;
        feature.set_field_integer("elevation", store.elevation[i])?;
        feature.set_field_string("is_ocean", if store.is_ocean[i] { "1" } else { "0" })?;
        feature.set_field_integer("temperature", store.temperature[i])?;
        feature.set_field_integer64("precipitation", store.precipitation[i] as i64)?;
        feature.set_field_integer("wind_tier", store.wind_tier[i] as i32)?;
        feature.set_field_double("water_flow", store.water_flow[i])?;
        feature.set_field_integer("shore_distance", store.shore_distance[i])?;
        feature.set_field_integer("habitability", store.habitability[i])?;
        feature.set_field_double("population", store.population[i])?;
        feature.set_field_integer64("culture_id", store.culture_id[i] as i64)?;
        if let Some(biome) = store.biome_id[i] {
            feature.set_field_integer64("biome_id", biome as i64)?;
        }
        if let Some(river) = store.river_id[i] {
            feature.set_field_integer64("river_id", river as i64)?;
        }
        if let Some(lake) = store.lake_id[i] {
            feature.set_field_integer64("lake_id", lake as i64)?;
        }
        feature.create(&layer).context("writing cell feature")?;
    }
    Ok(())
}

fn cell_field_schema() -> Vec<(&'static str, u32)> {
    use gdal::vector::OGRFieldType::*;
    vec![
        ("cell_id", OFTInteger64),
        ("area", OFTReal),
        ("latitude", OFTReal),
        ("elevation", OFTInteger),
        ("is_ocean", OFTString),
        ("temperature", OFTInteger),
        ("precipitation", OFTInteger64),
        ("wind_tier", OFTInteger),
        ("water_flow", OFTReal),
        ("shore_distance", OFTInteger),
        ("habitability", OFTInteger),
        ("population", OFTReal),
        ("culture_id", OFTInteger64),
        ("biome_id", OFTInteger64),
        ("river_id", OFTInteger64),
        ("lake_id", OFTInteger64),
    ]
}

/// Writes the rivers layer (spec §6: `id, parent, basin, length, width,
/// discharge`). `width` is the rendered width at the mouth vertex (spec
/// §4.4's per-vertex flux-to-width progression, [river::width_at]);
/// `discharge` is the mouth cell's total outflow (its own flux plus
/// whatever joined it at confluence).
pub fn write_rivers(dataset: &mut Dataset, store: &CellStore, rivers: &[River]) -> Result<()> {
    let _ = dataset.delete_layer(RIVERS_LAYER);
    let mut layer = dataset
        .create_layer(LayerOptions {
            name: RIVERS_LAYER,
            ty: OGRwkbGeometryType::wkbLineString,
            ..Default::default()
        })
        .context("creating rivers layer")?;
    layer.create_defn_fields(&[
        ("river_id", gdal::vector::OGRFieldType::OFTInteger64),
        ("parent", gdal::vector::OGRFieldType::OFTInteger64),
        ("basin", gdal::vector::OGRFieldType::OFTInteger64),
        ("length", gdal::vector::OGRFieldType::OFTInteger),
        ("width", gdal::vector::OGRFieldType::OFTReal),
        ("discharge", gdal::vector::OGRFieldType::OFTReal),
    ])?;

    for r in rivers {
        let line = geo::LineString(r.polyline.iter().map(|p| geo::coord! { x: p.x, y: p.y }).collect());
        let geometry =
            gdal::vector::Geometry::from_geo(GeoGeometry::LineString(line)).context("converting river polyline to OGR geometry")?;
        let mut feature = Feature::new(layer.defn())?;
        feature.set_geometry(geometry)?;
        feature.set_field_integer64("river_id", r.id as i64)?;
        feature.set_field_integer64("parent", r.parent.map(|p| p as i64).unwrap_or(-1))?;
        feature.set_field_integer64("basin", r.basin as i64)?;
        feature.set_field_integer("length", r.length() as i32)?;

        let mouth_vertex = r.flux_at_vertex.len().saturating_sub(1);
        let mouth_flux = r.flux_at_vertex.last().copied().unwrap_or(0.0);
        feature.set_field_double("width", river::width_at(mouth_vertex, mouth_flux))?;

        let discharge = r
            .cells
            .last()
            .map(|&mouth| store.water_flow[mouth.index()] + store.confluence_flux[mouth.index()])
            .unwrap_or(0.0);
        feature.set_field_double("discharge", discharge)?;

        feature.create(&layer).context("writing river feature")?;
    }
    Ok(())
}

pub fn write_lakes(dataset: &mut Dataset, store: &CellStore, lakes: &[Lake]) -> Result<()> {
    let _ = dataset.delete_layer(LAKES_LAYER);
    let mut layer = dataset
        .create_layer(LayerOptions {
            name: LAKES_LAYER,
            ty: OGRwkbGeometryType::wkbMultiPolygon,
            ..Default::default()
        })
        .context("creating lakes layer")?;
    layer.create_defn_fields(&[
        ("lake_id", gdal::vector::OGRFieldType::OFTInteger64),
        ("group", gdal::vector::OGRFieldType::OFTString),
        ("surface_elevation", gdal::vector::OGRFieldType::OFTReal),
        ("area", gdal::vector::OGRFieldType::OFTReal),
        ("flux", gdal::vector::OGRFieldType::OFTReal),
        ("evaporation", gdal::vector::OGRFieldType::OFTReal),
    ])?;

    for lake in lakes {
        let polygons: Vec<geo::Polygon<f64>> = lake
            .cells
            .iter()
            .map(|&CellId(idx)| store.polygon[idx as usize].clone())
            .collect();
        let area: f64 = lake.cells.iter().map(|&CellId(idx)| store.area[idx as usize]).sum();
        let geometry = gdal::vector::Geometry::from_geo(GeoGeometry::MultiPolygon(geo::MultiPolygon(polygons)))
            .context("converting lake cells to OGR geometry")?;
        let mut feature = Feature::new(layer.defn())?;
        feature.set_geometry(geometry)?;
        feature.set_field_integer64("lake_id", lake.id as i64)?;
        feature.set_field_string("group", &lake.group.to_string())?;
        feature.set_field_double("surface_elevation", lake.surface_elevation)?;
        feature.set_field_double("area", area)?;
        feature.set_field_double("flux", lake.flux)?;
        feature.set_field_double("evaporation", lake.evaporation)?;
        feature.create(&layer).context("writing lake feature")?;
    }
    Ok(())
}
