//! Pluggable polyline suppliers: trait abstraction for route sources.
//!
//! Two implementations, selectable via [`RouteSourceKind`]:
//!
//! - **`StraightLineRouteSource`**: the canonical two-point polyline. Zero
//!   dependencies, never fails.
//! - **`OsrmRouteSource`** (feature `osrm`): calls an OSRM HTTP endpoint and
//!   returns the driving-route geometry.
//!
//! A source yields a raw ordered polyline and nothing else; folding it into
//! a [`crate::route::RouteModel`] — including substituting the straight-line
//! fallback when a fetch fails — is the caller's job.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Why a polyline fetch failed. Non-fatal: callers fall back to the
/// straight-line route and surface an advisory.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteFetchError {
    /// Transport-level failure (connection, timeout, body read).
    Http(String),
    /// The service answered with a non-Ok code.
    Api(String),
    /// The response decoded but did not contain a usable polyline.
    Malformed,
}

impl std::fmt::Display for RouteFetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteFetchError::Http(err) => write!(f, "http error: {err}"),
            RouteFetchError::Api(code) => write!(f, "service error: {code}"),
            RouteFetchError::Malformed => write!(f, "malformed route geometry"),
        }
    }
}

/// Which route source to use. Serializes into the viewer configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub enum RouteSourceKind {
    /// Two-point origin → destination line, zero external dependencies.
    #[default]
    StraightLine,
    /// OSRM HTTP endpoint (e.g. `"http://localhost:5000"`).
    #[cfg(feature = "osrm")]
    Osrm { endpoint: String },
}

/// Trait for route sources. Implementations must be `Send + Sync` so a
/// fetch can run on a background thread.
pub trait RouteSource: Send + Sync {
    /// Fetch an ordered polyline from `origin` to `destination`.
    fn fetch_route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Vec<GeoPoint>, RouteFetchError>;
}

/// Always yields the two-point polyline.
pub struct StraightLineRouteSource;

impl RouteSource for StraightLineRouteSource {
    fn fetch_route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Vec<GeoPoint>, RouteFetchError> {
        Ok(vec![origin, destination])
    }
}

#[cfg(feature = "osrm")]
pub mod osrm {
    use super::*;
    use reqwest::blocking::Client;
    use std::time::Duration;

    const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

    /// Fetches driving-route geometry from an OSRM HTTP endpoint.
    pub struct OsrmRouteSource {
        client: Client,
        endpoint: String,
    }

    impl OsrmRouteSource {
        pub fn new(endpoint: &str) -> Self {
            let client = Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("failed to build HTTP client");
            Self {
                client,
                endpoint: endpoint.trim_end_matches('/').to_string(),
            }
        }
    }

    /// Minimal OSRM JSON response structures.
    #[derive(Deserialize)]
    pub(super) struct OsrmRouteResponse {
        pub code: String,
        pub routes: Option<Vec<OsrmRoute>>,
    }

    #[derive(Deserialize)]
    pub(super) struct OsrmRoute {
        pub geometry: OsrmGeometry,
    }

    #[derive(Deserialize)]
    pub(super) struct OsrmGeometry {
        /// GeoJSON coordinate pairs, `[lng, lat]`.
        pub coordinates: Vec<Vec<f64>>,
    }

    pub(super) fn parse_route_response(
        resp: OsrmRouteResponse,
    ) -> Result<Vec<GeoPoint>, RouteFetchError> {
        if resp.code != "Ok" {
            return Err(RouteFetchError::Api(resp.code));
        }
        let route = resp
            .routes
            .and_then(|routes| routes.into_iter().next())
            .ok_or(RouteFetchError::Malformed)?;

        let points: Vec<GeoPoint> = route
            .geometry
            .coordinates
            .iter()
            .filter(|pair| pair.len() >= 2)
            .map(|pair| GeoPoint::new(pair[0], pair[1]))
            .collect();

        if points.len() < 2 {
            return Err(RouteFetchError::Malformed);
        }
        Ok(points)
    }

    impl RouteSource for OsrmRouteSource {
        fn fetch_route(
            &self,
            origin: GeoPoint,
            destination: GeoPoint,
        ) -> Result<Vec<GeoPoint>, RouteFetchError> {
            let url = format!(
                "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
                self.endpoint, origin.lng, origin.lat, destination.lng, destination.lat,
            );

            let response = self
                .client
                .get(&url)
                .send()
                .map_err(|err| RouteFetchError::Http(err.to_string()))?;
            let parsed: OsrmRouteResponse = response
                .json()
                .map_err(|err| RouteFetchError::Http(err.to_string()))?;
            parse_route_response(parsed)
        }
    }

}

/// Construct a boxed [`RouteSource`] from a [`RouteSourceKind`] descriptor.
pub fn build_route_source(kind: &RouteSourceKind) -> Box<dyn RouteSource> {
    match kind {
        RouteSourceKind::StraightLine => Box::new(StraightLineRouteSource),
        #[cfg(feature = "osrm")]
        RouteSourceKind::Osrm { endpoint } => Box::new(osrm::OsrmRouteSource::new(endpoint)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_line_source_yields_the_two_endpoints() {
        let origin = GeoPoint::new(91.7889, 26.1548);
        let destination = GeoPoint::new(91.7362, 26.1445);
        let points = StraightLineRouteSource
            .fetch_route(origin, destination)
            .expect("total");
        assert_eq!(points, vec![origin, destination]);
    }

    #[test]
    fn factory_defaults_to_straight_line() {
        let source = build_route_source(&RouteSourceKind::default());
        let points = source
            .fetch_route(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0))
            .expect("total");
        assert_eq!(points.len(), 2);
    }
}
