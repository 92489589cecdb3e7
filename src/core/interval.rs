use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// A closed 1-D interval [inf, sup] over f64
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub inf: f64,
    pub sup: f64,
}

impl Interval {
    pub fn new(inf: f64, sup: f64) -> Self {
        Self { inf, sup }
    }

    /// Creates an interval centered on `center` with the given length
    pub fn from_center_and_length(center: f64, length: f64) -> Self {
        let half = length / 2.0;
        Self::new(center - half, center + half)
    }

    /// Creates an empty interval that can be extended
    pub fn empty() -> Self {
        Self::new(f64::INFINITY, f64::NEG_INFINITY)
    }

    pub fn is_empty(&self) -> bool {
        self.sup < self.inf
    }

    pub fn length(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.sup - self.inf
        }
    }

    pub fn center(&self) -> f64 {
        (self.inf + self.sup) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.inf && value <= self.sup
    }

    pub fn intersects(&self, other: &Interval) -> bool {
        !(other.sup < self.inf || other.inf > self.sup)
    }

    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        if !self.intersects(other) {
            return None;
        }
        Some(Interval::new(self.inf.max(other.inf), self.sup.min(other.sup)))
    }

    pub fn translated(&self, delta: f64) -> Interval {
        Interval::new(self.inf + delta, self.sup + delta)
    }

    pub fn extend(&mut self, value: f64) {
        self.inf = self.inf.min(value);
        self.sup = self.sup.max(value);
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.inf, self.sup)
    }
}

/// A closed 1-D interval over i32, used for zoom-level ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalInt {
    pub inf: i32,
    pub sup: i32,
}

impl IntervalInt {
    pub fn new(inf: i32, sup: i32) -> Self {
        Self { inf, sup }
    }

    pub fn is_empty(&self) -> bool {
        self.sup < self.inf
    }

    pub fn contains(&self, value: i32) -> bool {
        value >= self.inf && value <= self.sup
    }

    pub fn intersection(&self, other: &IntervalInt) -> IntervalInt {
        IntervalInt::new(self.inf.max(other.inf), self.sup.min(other.sup))
    }

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.inf, self.sup)
    }
}

/// An axis-aligned 2-D interval (rectangle) over f64
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval2D {
    pub x: Interval,
    pub y: Interval,
}

impl Interval2D {
    pub fn new(x: Interval, y: Interval) -> Self {
        Self { x, y }
    }

    /// Creates a rectangle centered on `center` with the given size
    pub fn from_center_and_size(center: Point, size: Point) -> Self {
        Self::new(
            Interval::from_center_and_length(center.x, size.x),
            Interval::from_center_and_length(center.y, size.y),
        )
    }

    /// Creates an empty rectangle that can be extended
    pub fn empty() -> Self {
        Self::new(Interval::empty(), Interval::empty())
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty()
    }

    pub fn size(&self) -> Point {
        Point::new(self.x.length(), self.y.length())
    }

    pub fn center(&self) -> Point {
        Point::new(self.x.center(), self.y.center())
    }

    /// The minimal corner (inf, inf)
    pub fn inf(&self) -> Point {
        Point::new(self.x.inf, self.y.inf)
    }

    /// The maximal corner (sup, sup)
    pub fn sup(&self) -> Point {
        Point::new(self.x.sup, self.y.sup)
    }

    pub fn contains(&self, point: Point) -> bool {
        self.x.contains(point.x) && self.y.contains(point.y)
    }

    pub fn intersects(&self, other: &Interval2D) -> bool {
        self.x.intersects(&other.x) && self.y.intersects(&other.y)
    }

    pub fn intersection(&self, other: &Interval2D) -> Option<Interval2D> {
        Some(Interval2D::new(
            self.x.intersection(&other.x)?,
            self.y.intersection(&other.y)?,
        ))
    }

    pub fn translated(&self, delta: Point) -> Interval2D {
        Interval2D::new(self.x.translated(delta.x), self.y.translated(delta.y))
    }

    pub fn extend(&mut self, point: Point) {
        self.x.extend(point.x);
        self.y.extend(point.y);
    }

    /// Clamps a point to lie within the rectangle
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(self.x.clamp(point.x), self.y.clamp(point.y))
    }

    /// The four corner points, counter-clockwise from the minimal corner
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x.inf, self.y.inf),
            Point::new(self.x.sup, self.y.inf),
            Point::new(self.x.sup, self.y.sup),
            Point::new(self.x.inf, self.y.sup),
        ]
    }
}
