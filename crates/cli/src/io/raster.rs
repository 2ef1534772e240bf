//! Heightmap and ocean-mask sampling via `gdal`'s raster API (spec §4.2,
//! §10 "GIS I/O"). The core crate only sees the [ElevationSource] /
//! [OceanMaskSource] traits; this module is the concrete adapter that reads
//! an actual raster file.

use anyhow::{Context, Result};
use gdal::raster::GdalDataType;
use gdal::Dataset;
use worldforge::geometry::Point;
use worldforge::terrain::{ElevationSource, OceanMaskSource};

/// A raster band sampled at arbitrary world-space points via nearest-pixel
/// lookup, with the raster's own geotransform mapping mesh coordinates
/// (extent-space, not geographic) onto pixel rows/columns.
pub struct HeightmapSource {
    data: Vec<f64>,
    width: usize,
    height: usize,
    origin_x: f64,
    origin_y: f64,
    pixel_width: f64,
    pixel_height: f64,
}

impl HeightmapSource {
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let dataset = Dataset::open(path)
            .with_context(|| format!("opening heightmap raster `{}`", path.display()))?;
        let band = dataset.rasterband(1).context("reading raster band 1")?;
        let (width, height) = band.size();
        let buffer = band
            .read_as::<f64>((0, 0), (width, height), (width, height), None)
            .context("reading raster pixel data")?;
        let transform = dataset
            .geo_transform()
            .context("reading raster geotransform")?;

        Ok(Self {
            data: buffer.data().to_vec(),
            width,
            height,
            origin_x: transform[0],
            origin_y: transform[3],
            pixel_width: transform[1],
            pixel_height: transform[5],
        })
    }

    fn pixel_at(&self, site: Point) -> (usize, usize) {
        let col = ((site.x - self.origin_x) / self.pixel_width).round();
        let row = ((site.y - self.origin_y) / self.pixel_height).round();
        (
            (col.max(0.0) as usize).min(self.width.saturating_sub(1)),
            (row.max(0.0) as usize).min(self.height.saturating_sub(1)),
        )
    }

    pub fn min_max(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}

impl ElevationSource for HeightmapSource {
    fn sample(&self, site: Point) -> f64 {
        let (col, row) = self.pixel_at(site);
        self.data[row * self.width + col]
    }
}

/// An ocean mask raster, band 1 interpreted as nonzero = ocean. Reuses the
/// same pixel-addressing logic as [HeightmapSource]; a real deployment often
/// ships the mask as a second band of the same file, but a standalone
/// dataset is just as valid input to `gdal`.
pub struct MaskSource {
    inner: HeightmapSource,
}

impl MaskSource {
    pub fn load(path: &std::path::Path) -> Result<Self> {
        Ok(Self {
            inner: HeightmapSource::load(path)?,
        })
    }
}

impl OceanMaskSource for MaskSource {
    fn is_ocean(&self, site: Point) -> bool {
        self.inner.sample(site) != 0.0
    }
}

/// Reports the band's GDAL pixel type for diagnostics shown to the user
/// when a raster has an unexpected data type.
pub fn describe_band_type(path: &std::path::Path) -> Result<GdalDataType> {
    let dataset = Dataset::open(path)?;
    let band = dataset.rasterband(1)?;
    Ok(band.band_type())
}
