use crate::core::constants::{EARTH_RADIUS, EQUATORIAL_PERIMETER};
use crate::core::geo::{GeoCoordinate, Point};
use crate::core::interval::{Interval, Interval2D};
use std::f64::consts::PI;

/// Converts between geographic and projected planar coordinates.
///
/// The projected plane uses the map's north-west corner as origin, with x
/// growing eastward and y growing southward, which keeps the screen
/// transform free of axis flips. Implementations are read-only from the
/// viewport's perspective; the caller owns the projection and may swap it at
/// runtime via [`crate::Viewport::set_projection`].
pub trait Projection {
    fn to_projected(&self, coordinate: GeoCoordinate) -> Point;
    fn from_projected(&self, point: Point) -> GeoCoordinate;

    /// Projected width of one world copy in meters
    fn map_width(&self) -> f64;

    /// Projected height of the map in meters
    fn map_height(&self) -> f64;

    fn x_interval(&self) -> Interval {
        Interval::new(0.0, self.map_width())
    }

    fn y_interval(&self) -> Interval {
        Interval::new(0.0, self.map_height())
    }

    fn domain(&self) -> Interval2D {
        Interval2D::new(self.x_interval(), self.y_interval())
    }
}

/// Pseudo/Web-Mercator projection (EPSG:3857) on a square map of side
/// [`EQUATORIAL_PERIMETER`] meters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WebMercator;

impl Projection for WebMercator {
    fn to_projected(&self, coordinate: GeoCoordinate) -> Point {
        let longitude = GeoCoordinate::wrap_longitude(coordinate.longitude);
        let latitude = GeoCoordinate::clamp_latitude(coordinate.latitude);

        let x = (longitude.to_radians() + PI) * EARTH_RADIUS;
        let mercator_y = (PI / 4.0 + latitude.to_radians() / 2.0).tan().ln() * EARTH_RADIUS;
        let y = PI * EARTH_RADIUS - mercator_y;

        Point::new(x, y)
    }

    fn from_projected(&self, point: Point) -> GeoCoordinate {
        let longitude = (point.x / EARTH_RADIUS - PI).to_degrees();
        let mercator_y = PI - point.y / EARTH_RADIUS;
        let latitude = (2.0 * mercator_y.exp().atan() - PI / 2.0).to_degrees();

        GeoCoordinate::new(GeoCoordinate::wrap_longitude(longitude), latitude)
    }

    fn map_width(&self) -> f64 {
        EQUATORIAL_PERIMETER
    }

    fn map_height(&self) -> f64 {
        EQUATORIAL_PERIMETER
    }
}
