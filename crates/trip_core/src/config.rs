//! Fixed trip configuration.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Where the trip starts and ends, and how long the simulated journey takes
/// in wall-clock milliseconds. Configuration, not derived state: the route
/// model built from a fetched polyline always falls back to this
/// origin/destination pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripConfig {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub duration_ms: u64,
}

impl TripConfig {
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

impl Default for TripConfig {
    fn default() -> Self {
        // Guwahati: Ganeshguri to the Kamakhya foothills.
        Self {
            origin: GeoPoint::new(91.7889, 26.1548),
            destination: GeoPoint::new(91.7362, 26.1445),
            duration_ms: 60_000,
        }
    }
}
