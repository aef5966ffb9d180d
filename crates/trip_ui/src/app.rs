//! Application state for the trip viewer.

pub mod route_fetch;

use std::sync::mpsc::Receiver;

use trip_core::config::TripConfig;
use trip_core::driver::TripDriver;
use trip_core::route::RouteModel;
use trip_core::routing::RouteSourceKind;
use trip_core::snapshot::{SnapshotHistory, TripSnapshot};

use crate::app::route_fetch::RouteFetchState;

/// Main application state for the viewer.
pub struct TripUiApp {
    pub driver: TripDriver,
    pub config: TripConfig,
    pub route_source_kind: RouteSourceKind,
    pub route_fetch: RouteFetchState,
    pub routing_advisory: Option<String>,
    pub snapshots: SnapshotHistory,
    snapshot_rx: Receiver<TripSnapshot>,
    pub grid_enabled: bool,
}

impl TripUiApp {
    pub fn new() -> Self {
        let config = load_config();
        let route_source_kind = default_route_source_kind();

        // The straight-line fallback model is installed immediately; a real
        // polyline replaces it wholesale if the fetch succeeds.
        let mut driver = TripDriver::from_config(&config);
        let snapshot_rx = driver.subscribe();

        let mut route_fetch = RouteFetchState::new();
        route_fetch.request(route_source_kind.clone(), config.origin, config.destination);

        // The in-process map view exists as soon as the fallback model
        // does, which opens the start gate.
        driver.set_map_ready(true);

        Self {
            driver,
            config,
            route_source_kind,
            route_fetch,
            routing_advisory: None,
            snapshots: SnapshotHistory::default(),
            snapshot_rx,
            grid_enabled: false,
        }
    }

    /// Apply a completed background fetch, if one arrived. Failures keep
    /// the fallback route and surface a non-fatal advisory.
    pub fn drain_route_results(&mut self) {
        let Some(result) = self.route_fetch.drain() else {
            return;
        };
        match result {
            Ok(points) => {
                let model = RouteModel::build(points, self.config.origin, self.config.destination);
                self.driver.set_route(model);
                self.routing_advisory = None;
            }
            Err(err) => {
                log::warn!("route fetch failed, keeping straight-line fallback: {err}");
                self.routing_advisory =
                    Some(format!("Routing degraded: {err} (showing straight-line path)"));
            }
        }
    }

    /// Move published snapshots into the history buffer for the chart.
    pub fn pump_snapshots(&mut self) {
        while let Ok(snapshot) = self.snapshot_rx.try_recv() {
            self.snapshots.push(snapshot);
        }
    }

    /// Return the trip to origin and clear the chart history.
    pub fn reset(&mut self) {
        self.driver.on_reset();
        self.snapshots.clear();
    }
}

impl Default for TripUiApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Trip configuration from the optional JSON file named by the first CLI
/// argument; the canonical default trip otherwise.
fn load_config() -> TripConfig {
    let Some(path) = std::env::args().nth(1) else {
        return TripConfig::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring malformed trip config {path}: {err}");
                TripConfig::default()
            }
        },
        Err(err) => {
            log::warn!("ignoring unreadable trip config {path}: {err}");
            TripConfig::default()
        }
    }
}

#[cfg(feature = "osrm")]
fn default_route_source_kind() -> RouteSourceKind {
    let endpoint = std::env::var("OSRM_ENDPOINT")
        .unwrap_or_else(|_| "https://router.project-osrm.org".to_string());
    RouteSourceKind::Osrm { endpoint }
}

#[cfg(not(feature = "osrm"))]
fn default_route_source_kind() -> RouteSourceKind {
    RouteSourceKind::StraightLine
}
