//! GIS I/O collaborators (spec §10 "GIS I/O"): raster sampling and GeoPackage
//! vector read/write, both `gdal`-backed. The core crate never depends on
//! `gdal` directly; it only sees [worldforge::terrain::ElevationSource] and
//! [worldforge::terrain::OceanMaskSource].

pub mod raster;
pub mod vector;
