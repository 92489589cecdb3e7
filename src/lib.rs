//! # Cartoview
//!
//! A viewport/projection engine for tiled-pyramid map renderers.
//!
//! This library owns the mapping between geographic coordinates, a projected
//! planar coordinate system, and on-screen pixel space, at a given zoom level
//! and bearing. It resolves tile/zoom-level resolution and decomposes the
//! visible screen rectangle into one or more viewport parts so that maps
//! which wrap around the antimeridian, or are narrower than the screen,
//! render correctly.
//!
//! The GUI front-end (gesture handling, drawing) and the tile-fetch layer are
//! external collaborators: they mutate the [`Viewport`] and consume its parts.

pub mod core;
pub mod prelude;

pub use crate::core::constants;

// Re-export public API
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

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, ViewportError>;

/// Common error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewportError {
    /// A coordinate transform was requested before a projection was attached.
    #[error("no projection configured")]
    NotConfigured,

    #[error("invalid zoom: {0}")]
    InvalidZoom(String),

    #[error("invalid bearing: {0} (expected [-180, 180] degrees)")]
    InvalidBearing(f64),

    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),
}

/// Error type alias for convenience
pub type Error = ViewportError;
