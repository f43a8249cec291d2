use serde::{Deserialize, Serialize};

/// A (longitude, latitude) pair treated as a point on a plane.
///
/// Distances are plain Euclidean over the raw degrees. This is a known
/// approximation that holds for province-sized extents; no geodesic
/// correction is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn distance(&self, other: &GeoPoint) -> f64 {
        distance(self, other)
    }

    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((longitude, latitude): (f64, f64)) -> Self {
        Self::new(longitude, latitude)
    }
}

/// Planar distance between two points.
///
/// Computed as `sqrt(dx² + dy²)` so it orders candidates exactly as the
/// R-tree's squared distance does.
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let dx = a.longitude - b.longitude;
    let dy = a.latitude - b.latitude;
    (dx * dx + dy * dy).sqrt()
}
