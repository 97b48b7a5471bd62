//! Map regions derived from the latest fix.

use serde::{Deserialize, Serialize};

use crate::Coordinates;

/// Span used once a real fix exists, in degrees.
pub const FOCUSED_SPAN_DEG: f64 = 0.005;

/// The visible area of a map: a center point and the span around it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapRegion {
    /// Latitude of the center, in degrees.
    pub center_lat: f64,
    /// Longitude of the center, in degrees.
    pub center_lon: f64,
    /// Latitude span, in degrees.
    pub lat_span_deg: f64,
    /// Longitude span, in degrees.
    pub lon_span_deg: f64,
}

impl MapRegion {
    /// The wide region shown before any fix is available.
    pub const INITIAL: Self = Self {
        center_lat: 37.788_25,
        center_lon: -122.4324,
        lat_span_deg: 0.0922,
        lon_span_deg: 0.0421,
    };

    /// A square region of `span_deg` centered on `fix`.
    #[must_use]
    pub const fn focused(fix: &Coordinates, span_deg: f64) -> Self {
        Self {
            center_lat: fix.latitude,
            center_lon: fix.longitude,
            lat_span_deg: span_deg,
            lon_span_deg: span_deg,
        }
    }
}

impl Default for MapRegion {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// How regions are derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Region exposed before the first fix.
    pub initial: MapRegion,
    /// Span of the region centered on a fix.
    pub focused_span_deg: f64,
}

impl RegionConfig {
    /// Region for the given fix, or the initial region when there is none.
    #[must_use]
    pub fn region_for(&self, fix: Option<&Coordinates>) -> MapRegion {
        fix.map_or(self.initial, |fix| {
            MapRegion::focused(fix, self.focused_span_deg)
        })
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            initial: MapRegion::INITIAL,
            focused_span_deg: FOCUSED_SPAN_DEG,
        }
    }
}
