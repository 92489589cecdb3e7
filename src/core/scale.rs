use crate::{Result, ViewportError};
use serde::{Deserialize, Serialize};

/// A scale-bar length: a round real-world length and its on-screen size
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MapScale {
    length: f64,
    length_px: u32,
}

impl MapScale {
    pub fn new(length: f64, length_px: u32) -> Self {
        Self { length, length_px }
    }

    /// Length in meters
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Length in pixels; never exceeds the maximum it was derived from
    pub fn length_px(&self) -> u32 {
        self.length_px
    }

    /// Selects the largest round length (1-2-5 progression) whose pixel size
    /// at the given resolution does not exceed `max_length_px`.
    pub fn from_resolution(resolution: f64, max_length_px: u32) -> Result<MapScale> {
        if !resolution.is_finite() || resolution <= 0.0 || max_length_px == 0 {
            return Err(ViewportError::NotConfigured);
        }

        let max_length = max_length_px as f64 * resolution;
        let power_of_ten = 10f64.powf(max_length.log10().floor());
        let length = [5.0, 2.0, 1.0]
            .iter()
            .map(|factor| factor * power_of_ten)
            .find(|&candidate| candidate <= max_length)
            .unwrap_or(power_of_ten);

        let length_px = (length / resolution).round() as u32;
        Ok(MapScale::new(length, length_px.min(max_length_px)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_progression() {
        // 100 px at 1 m/px -> 100 m fits exactly
        let scale = MapScale::from_resolution(1.0, 100).unwrap();
        assert_eq!(scale.length(), 100.0);
        assert_eq!(scale.length_px(), 100);

        // 100 px at 0.7 m/px -> 70 m budget -> 50 m
        let scale = MapScale::from_resolution(0.7, 100).unwrap();
        assert_eq!(scale.length(), 50.0);
        assert!(scale.length_px() <= 100);

        // 100 px at 0.3 m/px -> 30 m budget -> 20 m
        let scale = MapScale::from_resolution(0.3, 100).unwrap();
        assert_eq!(scale.length(), 20.0);
    }

    #[test]
    fn test_pixel_length_never_exceeds_max() {
        for &resolution in &[0.123, 1.0, 3.7, 39_135.76, 152_874.05] {
            for &max_px in &[50u32, 100, 250, 333] {
                let scale = MapScale::from_resolution(resolution, max_px).unwrap();
                assert!(scale.length_px() <= max_px, "res {resolution} max {max_px}");
                assert!(scale.length() > 0.0);
            }
        }
    }

    #[test]
    fn test_invalid_resolution() {
        assert_eq!(
            MapScale::from_resolution(0.0, 100),
            Err(ViewportError::NotConfigured)
        );
        assert_eq!(
            MapScale::from_resolution(f64::INFINITY, 100),
            Err(ViewportError::NotConfigured)
        );
    }
}
