use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Map resolution in meters per pixel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapResolution {
    resolution: f64,
}

impl MapResolution {
    pub fn new(resolution: f64) -> Self {
        Self { resolution }
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn is_valid(&self) -> bool {
        self.resolution.is_finite() && self.resolution > 0.0
    }

    /// Converts a pixel distance to meters
    pub fn from_px(&self, distance_px: f64) -> f64 {
        distance_px * self.resolution
    }

    /// Converts a distance in meters to pixels
    pub fn to_px(&self, distance: f64) -> f64 {
        distance / self.resolution
    }
}

/// The parameters of a tile pyramid: projected map size in meters and the
/// provider's square tile size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TilePyramid {
    map_size: f64,
    tile_size: u32,
}

impl TilePyramid {
    pub fn new(map_size: f64, tile_size: u32) -> Self {
        Self {
            map_size,
            tile_size,
        }
    }

    pub fn map_size(&self) -> f64 {
        self.map_size
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Resolution of the pyramid at the given zoom level, in meters per pixel
    pub fn resolution_at(&self, zoom_level: u32) -> f64 {
        self.map_size / (self.tile_size as f64 * (1u64 << zoom_level) as f64)
    }

    /// Side length of the whole map in pixels at the given zoom level
    pub fn map_size_px(&self, zoom_level: u32) -> f64 {
        self.tile_size as f64 * (1u64 << zoom_level) as f64
    }
}

/// A resolution derived from a tile pyramid at an integer zoom level.
///
/// The pyramid parameters and the zoom level are the identity; the floating
/// resolution is derived from them and never compared directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TiledZoomLevel {
    pyramid: TilePyramid,
    zoom_level: u32,
}

impl TiledZoomLevel {
    pub fn new(pyramid: TilePyramid, zoom_level: u32) -> Self {
        Self {
            pyramid,
            zoom_level,
        }
    }

    pub fn pyramid(&self) -> &TilePyramid {
        &self.pyramid
    }

    pub fn map_size(&self) -> f64 {
        self.pyramid.map_size()
    }

    pub fn tile_size(&self) -> u32 {
        self.pyramid.tile_size()
    }

    pub fn zoom_level(&self) -> u32 {
        self.zoom_level
    }

    /// Sets the zoom level; negative levels are unrepresentable by type,
    /// which is this crate's explicit policy for the "negative zoom" case.
    pub fn set_zoom_level(&mut self, zoom_level: u32) {
        self.zoom_level = zoom_level;
    }

    pub fn resolution(&self) -> f64 {
        self.pyramid.resolution_at(self.zoom_level)
    }

    pub fn map_resolution(&self) -> MapResolution {
        MapResolution::new(self.resolution())
    }

    pub fn from_px(&self, distance_px: f64) -> f64 {
        distance_px * self.resolution()
    }

    pub fn to_px(&self, distance: f64) -> f64 {
        distance / self.resolution()
    }

    pub fn vector_from_px(&self, distance_px: Point) -> Point {
        distance_px * self.resolution()
    }

    pub fn vector_to_px(&self, distance: Point) -> Point {
        distance / self.resolution()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{EQUATORIAL_PERIMETER, TILE_SIZE};

    fn web_mercator_pyramid() -> TilePyramid {
        TilePyramid::new(EQUATORIAL_PERIMETER, TILE_SIZE)
    }

    #[test]
    fn test_resolution_halves_per_zoom_level() {
        let pyramid = web_mercator_pyramid();
        for zoom in 0..20 {
            let coarse = pyramid.resolution_at(zoom);
            let fine = pyramid.resolution_at(zoom + 1);
            assert!((coarse / fine - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_worked_example_resolution() {
        // 40 075 016 m / (256 px * 2^2) ~ 39135.8 m/px
        let level = TiledZoomLevel::new(TilePyramid::new(40_075_016.0, 256), 2);
        assert!((level.resolution() - 39_135.7578125).abs() < 1e-6);
    }

    #[test]
    fn test_px_round_trip() {
        let level = TiledZoomLevel::new(web_mercator_pyramid(), 7);
        let distance = level.from_px(123.5);
        assert!((level.to_px(distance) - 123.5).abs() < 1e-9);
    }

    #[test]
    fn test_equality_is_exact_on_parameters() {
        let a = TiledZoomLevel::new(web_mercator_pyramid(), 3);
        let mut b = a;
        assert_eq!(a, b);
        b.set_zoom_level(4);
        assert_ne!(a, b);
        let c = TiledZoomLevel::new(TilePyramid::new(EQUATORIAL_PERIMETER, 512), 3);
        assert_ne!(a, c);
    }

    #[test]
    fn test_map_resolution_validity() {
        assert!(MapResolution::new(10.0).is_valid());
        assert!(!MapResolution::new(0.0).is_valid());
        assert!(!MapResolution::new(f64::NAN).is_valid());
    }
}
