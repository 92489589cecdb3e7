use crate::core::geo::GeoCoordinate;
use crate::core::resolution::TiledZoomLevel;
use crate::{Result, ViewportError};
use serde::{Deserialize, Serialize};

/// A snapshot of the viewport's observable state: center coordinate, tiled
/// zoom level, and bearing.
///
/// Bearing policy: values outside [-180, 180] degrees are rejected with
/// [`ViewportError::InvalidBearing`] rather than normalized; gesture code is
/// expected to wrap angles before handing them over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    coordinate: GeoCoordinate,
    tiled_zoom_level: TiledZoomLevel,
    bearing: f64,
}

impl ViewportState {
    pub fn is_valid_bearing(bearing: f64) -> bool {
        (-180.0..=180.0).contains(&bearing)
    }

    pub fn new(
        coordinate: GeoCoordinate,
        tiled_zoom_level: TiledZoomLevel,
        bearing: f64,
    ) -> Result<Self> {
        if !Self::is_valid_bearing(bearing) {
            return Err(ViewportError::InvalidBearing(bearing));
        }
        Ok(Self {
            coordinate,
            tiled_zoom_level,
            bearing,
        })
    }

    pub fn coordinate(&self) -> GeoCoordinate {
        self.coordinate
    }

    pub fn set_coordinate(&mut self, coordinate: GeoCoordinate) {
        self.coordinate = coordinate;
    }

    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    pub fn set_bearing(&mut self, bearing: f64) -> Result<()> {
        if !Self::is_valid_bearing(bearing) {
            return Err(ViewportError::InvalidBearing(bearing));
        }
        self.bearing = bearing;
        Ok(())
    }

    pub fn tiled_zoom_level(&self) -> &TiledZoomLevel {
        &self.tiled_zoom_level
    }

    pub fn zoom_level(&self) -> u32 {
        self.tiled_zoom_level.zoom_level()
    }

    pub fn set_zoom_level(&mut self, zoom_level: u32) {
        self.tiled_zoom_level.set_zoom_level(zoom_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{EQUATORIAL_PERIMETER, TILE_SIZE};
    use crate::core::resolution::TilePyramid;

    fn zoom_level(zoom: u32) -> TiledZoomLevel {
        TiledZoomLevel::new(TilePyramid::new(EQUATORIAL_PERIMETER, TILE_SIZE), zoom)
    }

    #[test]
    fn test_state_creation() {
        let state =
            ViewportState::new(GeoCoordinate::new(2.3522, 48.8566), zoom_level(10), 45.0).unwrap();
        assert_eq!(state.zoom_level(), 10);
        assert_eq!(state.bearing(), 45.0);
    }

    #[test]
    fn test_bearing_is_rejected_out_of_range() {
        let result = ViewportState::new(GeoCoordinate::default(), zoom_level(0), 181.0);
        assert_eq!(result, Err(ViewportError::InvalidBearing(181.0)));

        let mut state = ViewportState::new(GeoCoordinate::default(), zoom_level(0), 0.0).unwrap();
        assert!(state.set_bearing(-180.0).is_ok());
        assert!(state.set_bearing(-180.1).is_err());
        // the failed setter leaves the state untouched
        assert_eq!(state.bearing(), -180.0);
    }

    #[test]
    fn test_state_equality_drives_change_detection() {
        let a = ViewportState::new(GeoCoordinate::new(1.0, 2.0), zoom_level(5), 0.0).unwrap();
        let mut b = a.clone();
        assert_eq!(a, b);
        b.set_zoom_level(6);
        assert_ne!(a, b);
    }

    #[test]
    fn test_state_serde_round_trip() {
        let state =
            ViewportState::new(GeoCoordinate::new(-74.006, 40.7128), zoom_level(12), 30.0).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let back: ViewportState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
