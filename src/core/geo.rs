use crate::core::constants::MAX_LATITUDE;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Represents a geographic coordinate with longitude and latitude in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoCoordinate {
    /// Creates a new coordinate; no normalization is applied
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.longitude >= -180.0
            && self.longitude <= 180.0
            && self.latitude >= -90.0
            && self.latitude <= 90.0
    }

    /// Wraps longitude to the [-180, 180] range
    pub fn wrap_longitude(longitude: f64) -> f64 {
        let wrapped = longitude % 360.0;
        if wrapped > 180.0 {
            wrapped - 360.0
        } else if wrapped < -180.0 {
            wrapped + 360.0
        } else {
            wrapped
        }
    }

    /// Clamps latitude to the square Web-Mercator domain
    pub fn clamp_latitude(latitude: f64) -> f64 {
        latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Returns the coordinate with its longitude wrapped to [-180, 180]
    pub fn normalized(&self) -> Self {
        Self::new(Self::wrap_longitude(self.longitude), self.latitude)
    }
}

impl Default for GeoCoordinate {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in screen (pixel) or projected (meter) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (*other - *self).length()
    }

    pub fn floor(&self) -> Point {
        Point::new(self.x.floor(), self.y.floor())
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Rotates the vector by the given angle in degrees
    pub fn rotated_deg(&self, angle_deg: f64) -> Point {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        Point::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, other: Point) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, other: Point) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }
}

impl Div<f64> for Point {
    type Output = Point;
    fn div(self, scalar: f64) -> Point {
        Point::new(self.x / scalar, self.y / scalar)
    }
}
