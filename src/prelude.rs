//! Prelude module for common cartoview types
//!
//! This module re-exports the most commonly used types and functions
//! for easy importing with `use cartoview::prelude::*;`

pub use crate::core::{
    geo::{GeoCoordinate, Point},
    interval::{Interval, Interval2D, IntervalInt},
    polygon::Polygon,
    projection::{Projection, WebMercator},
    resolution::{MapResolution, TilePyramid, TiledZoomLevel},
    scale::MapScale,
    state::ViewportState,
    viewport::{PartPosition, Viewport, ViewportEvent, ViewportPart},
};

pub use crate::{Result, ViewportError};
