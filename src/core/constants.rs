//! Core constants derived from Web-Mercator conventions and common tile pyramids.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// WGS84 equatorial radius in meters (EPSG:3857 sphere).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Equatorial perimeter in meters: the projected map width and height.
pub const EQUATORIAL_PERIMETER: f64 = 2.0 * std::f64::consts::PI * EARTH_RADIUS;

/// Latitude at which the square Web-Mercator map is cut off.
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;

/// Finest zoom level the engine will resolve; keeps `2^zoom` comfortably
/// inside f64 integer precision.
pub const MAX_ZOOM_LEVEL: u32 = 30;
