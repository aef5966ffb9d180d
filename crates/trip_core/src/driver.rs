//! Animation driver: samples the route model at display-refresh cadence.
//!
//! One cooperative sample per [`TripDriver::tick`] call. The driver owns the
//! phase machine, normalizes elapsed time into progress, queries the route
//! model, and fans the resulting snapshot out to subscribers. Commands
//! issued in an invalid phase are silent no-ops: rapid double-clicks must
//! never corrupt the clock.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;

use crate::clock::{TripClock, TripPhase};
use crate::config::TripConfig;
use crate::geo::{self, GeoPoint};
use crate::route::RouteModel;
use crate::snapshot::TripSnapshot;

/// Marker for the armed display-refresh sample.
///
/// Present exactly while sampling is scheduled. Pause, reset, and
/// completion drop it before any other state changes, so a stale frame
/// callback can never observe post-mutation state: `tick` without the
/// marker publishes nothing.
#[derive(Debug)]
struct ScheduledSample;

/// Orchestrates the timed playback of one trip.
pub struct TripDriver {
    route: Arc<RouteModel>,
    clock: TripClock,
    duration_ms: u64,
    scheduled: Option<ScheduledSample>,
    subscribers: Vec<Sender<TripSnapshot>>,
    last_snapshot: TripSnapshot,
    map_ready: bool,
    follow_enabled: bool,
}

impl TripDriver {
    pub fn new(route: RouteModel, duration_ms: u64) -> Self {
        let route = Arc::new(route);
        let last_snapshot = TripSnapshot {
            position: route.origin(),
            progress: 0.0,
            distance_remaining_km: route.total_km(),
            elapsed_ms: 0,
            phase: TripPhase::Idle,
        };
        Self {
            route,
            clock: TripClock::new(),
            duration_ms,
            scheduled: None,
            subscribers: Vec::new(),
            last_snapshot,
            map_ready: false,
            follow_enabled: false,
        }
    }

    /// Driver over the configured straight-line fallback route.
    pub fn from_config(config: &TripConfig) -> Self {
        let fallback = RouteModel::straight_line(config.origin, config.destination);
        Self::new(fallback, config.duration_ms)
    }

    pub fn phase(&self) -> TripPhase {
        self.clock.phase()
    }

    pub fn route(&self) -> &RouteModel {
        &self.route
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Latest published snapshot (the t = 0 snapshot before any sampling).
    pub fn last_snapshot(&self) -> &TripSnapshot {
        &self.last_snapshot
    }

    /// Register a snapshot subscriber. Disconnected receivers are pruned on
    /// the next publication.
    pub fn subscribe(&mut self) -> Receiver<TripSnapshot> {
        let (sender, receiver) = mpsc::channel();
        self.subscribers.push(sender);
        receiver
    }

    /// Replace the route wholesale. The swap is atomic from the sampler's
    /// viewpoint: the next tick reads the new model in full.
    pub fn set_route(&mut self, route: RouteModel) {
        log::info!(
            "route replaced: {} points, {:.2} km",
            route.points().len(),
            route.total_km()
        );
        self.route = Arc::new(route);
    }

    /// Readiness gate supplied by the map collaborator. While false,
    /// `on_start` stays a no-op.
    pub fn set_map_ready(&mut self, ready: bool) {
        self.map_ready = ready;
    }

    pub fn map_ready(&self) -> bool {
        self.map_ready
    }

    /// Stored for the presentation layer; the driver itself never moves a
    /// camera.
    pub fn set_follow_enabled(&mut self, enabled: bool) {
        self.follow_enabled = enabled;
    }

    pub fn follow_enabled(&self) -> bool {
        self.follow_enabled
    }

    /// Begin from origin (Idle) or resume mid-route (Paused). No-op while
    /// Running or Completed, or while the map is not ready.
    pub fn on_start(&mut self, now: Instant) {
        if !self.map_ready {
            return;
        }
        match self.clock.phase() {
            TripPhase::Idle | TripPhase::Paused => {
                self.clock.start(now);
                self.scheduled = Some(ScheduledSample);
            }
            TripPhase::Running | TripPhase::Completed => {}
        }
    }

    /// Cancel the scheduled sample, then freeze the clock. No-op unless
    /// Running.
    pub fn on_pause(&mut self, now: Instant) {
        if self.clock.phase() != TripPhase::Running {
            return;
        }
        self.scheduled = None;
        self.clock.pause(now);
    }

    /// Return to origin. Always allowed; publishes the t = 0 snapshot.
    pub fn on_reset(&mut self) {
        self.scheduled = None;
        self.clock.reset();
        let snapshot = self.snapshot_at(0.0, 0);
        self.publish(snapshot);
    }

    /// One cooperative sample. Publishes nothing unless a sample is
    /// scheduled; at t >= 1 publishes the final snapshot, completes the
    /// clock, and stops scheduling.
    pub fn tick(&mut self, now: Instant) -> Option<TripSnapshot> {
        self.scheduled.as_ref()?;

        let elapsed_ms = self.clock.elapsed_ms(now);
        let t = if self.duration_ms == 0 {
            1.0
        } else {
            (elapsed_ms as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
        };
        if t >= 1.0 {
            self.scheduled = None;
            self.clock.complete(now);
        }

        let snapshot = self.snapshot_at(t, elapsed_ms.min(self.duration_ms));
        self.publish(snapshot.clone());
        Some(snapshot)
    }

    fn snapshot_at(&self, t: f64, elapsed_ms: u64) -> TripSnapshot {
        let position = self.route.position_at_progress(t);
        TripSnapshot {
            position,
            progress: t,
            distance_remaining_km: self.distance_remaining_km(t, position),
            elapsed_ms,
            phase: self.clock.phase(),
        }
    }

    fn distance_remaining_km(&self, t: f64, position: GeoPoint) -> f64 {
        let remaining = self.route.total_km() * (1.0 - t);
        if remaining.is_finite() && remaining >= 0.0 {
            remaining
        } else {
            geo::distance_km(position, self.route.destination())
        }
    }

    fn publish(&mut self, snapshot: TripSnapshot) {
        self.subscribers
            .retain(|subscriber| subscriber.send(snapshot.clone()).is_ok());
        self.last_snapshot = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const DURATION_MS: u64 = 1_000;

    fn ready_driver() -> TripDriver {
        let mut driver = TripDriver::from_config(&TripConfig::default().with_duration_ms(DURATION_MS));
        driver.set_map_ready(true);
        driver
    }

    fn ms(offset: u64) -> Duration {
        Duration::from_millis(offset)
    }

    #[test]
    fn start_is_gated_by_map_readiness() {
        let t0 = Instant::now();
        let mut driver = TripDriver::from_config(&TripConfig::default());
        driver.on_start(t0);
        assert_eq!(driver.phase(), TripPhase::Idle);
        assert!(driver.tick(t0).is_none());

        driver.set_map_ready(true);
        driver.on_start(t0);
        assert_eq!(driver.phase(), TripPhase::Running);
    }

    #[test]
    fn progress_is_monotonic_within_a_run() {
        let t0 = Instant::now();
        let mut driver = ready_driver();
        driver.on_start(t0);

        let mut previous = -1.0;
        for offset in [0, 100, 250, 250, 600, 900] {
            let snapshot = driver.tick(t0 + ms(offset)).expect("scheduled");
            assert!(snapshot.progress >= previous);
            previous = snapshot.progress;
        }
    }

    #[test]
    fn tick_without_start_publishes_nothing() {
        let t0 = Instant::now();
        let mut driver = ready_driver();
        assert!(driver.tick(t0).is_none());
        assert_eq!(driver.last_snapshot().progress, 0.0);
    }

    #[test]
    fn pause_cancels_sampling_and_resume_has_no_discontinuity() {
        let t0 = Instant::now();
        let mut driver = ready_driver();
        driver.on_start(t0);
        let before_pause = driver.tick(t0 + ms(500)).expect("scheduled");

        driver.on_pause(t0 + ms(500));
        assert_eq!(driver.phase(), TripPhase::Paused);
        assert!(driver.tick(t0 + ms(800)).is_none());

        driver.on_start(t0 + ms(2_000));
        let after_resume = driver.tick(t0 + ms(2_000)).expect("scheduled");
        assert_eq!(after_resume.position, before_pause.position);
        assert_eq!(after_resume.progress, before_pause.progress);
    }

    #[test]
    fn paused_run_matches_uninterrupted_run() {
        let t0 = Instant::now();

        let mut continuous = ready_driver();
        continuous.on_start(t0);

        let mut interrupted = ready_driver();
        interrupted.on_start(t0);
        interrupted.tick(t0 + ms(300));
        interrupted.on_pause(t0 + ms(400));
        interrupted.on_start(t0 + ms(400));

        let a = continuous.tick(t0 + ms(700)).expect("scheduled");
        let b = interrupted.tick(t0 + ms(700)).expect("scheduled");
        assert_eq!(a.progress, b.progress);
        assert_eq!(a.position, b.position);
    }

    #[test]
    fn reset_returns_to_origin_from_any_phase() {
        let t0 = Instant::now();
        let mut driver = ready_driver();
        driver.on_start(t0);
        driver.tick(t0 + ms(400));

        driver.on_reset();
        assert_eq!(driver.phase(), TripPhase::Idle);
        let snapshot = driver.last_snapshot();
        assert_eq!(snapshot.progress, 0.0);
        assert_eq!(snapshot.position, driver.route().origin());
        assert_eq!(snapshot.distance_remaining_km, driver.route().total_km());
        assert!(driver.tick(t0 + ms(500)).is_none());

        // Idempotent: repeating changes nothing.
        driver.on_reset();
        assert_eq!(driver.phase(), TripPhase::Idle);
        assert_eq!(driver.last_snapshot().progress, 0.0);
    }

    #[test]
    fn completion_is_terminal_until_reset() {
        let t0 = Instant::now();
        let mut driver = ready_driver();
        driver.on_start(t0);

        let last = driver.tick(t0 + ms(1_500)).expect("scheduled");
        assert_eq!(last.progress, 1.0);
        assert_eq!(last.phase, TripPhase::Completed);
        assert_eq!(last.position, driver.route().destination());
        assert!(last.distance_remaining_km.abs() < 1e-9);
        assert_eq!(last.elapsed_ms, DURATION_MS);

        // No further samples, and start without reset stays inert.
        assert!(driver.tick(t0 + ms(1_600)).is_none());
        driver.on_start(t0 + ms(1_700));
        assert_eq!(driver.phase(), TripPhase::Completed);
        assert!(driver.tick(t0 + ms(1_800)).is_none());

        driver.on_reset();
        driver.on_start(t0 + ms(2_000));
        assert_eq!(driver.phase(), TripPhase::Running);
        let restarted = driver.tick(t0 + ms(2_000)).expect("scheduled");
        assert_eq!(restarted.progress, 0.0);
    }

    #[test]
    fn distance_remaining_spans_total_to_zero() {
        let t0 = Instant::now();
        let mut driver = ready_driver();
        let total = driver.route().total_km();
        assert_eq!(driver.last_snapshot().distance_remaining_km, total);

        driver.on_start(t0);
        let done = driver.tick(t0 + ms(DURATION_MS)).expect("scheduled");
        assert!(done.distance_remaining_km.abs() < 1e-9);
    }

    #[test]
    fn route_swap_is_whole_model() {
        let t0 = Instant::now();
        let mut driver = ready_driver();
        driver.on_start(t0);
        driver.tick(t0 + ms(200));

        let config = TripConfig::default();
        let detour = RouteModel::build(
            vec![
                config.origin,
                GeoPoint::new(91.7700, 26.1700),
                config.destination,
            ],
            config.origin,
            config.destination,
        );
        let detour_total = detour.total_km();
        driver.set_route(detour);

        let snapshot = driver.tick(t0 + ms(500)).expect("scheduled");
        assert_eq!(
            snapshot.position,
            driver.route().position_at_progress(snapshot.progress)
        );
        assert!((snapshot.distance_remaining_km - detour_total * (1.0 - snapshot.progress)).abs() < 1e-9);
    }

    #[test]
    fn subscribers_receive_snapshots_in_publication_order() {
        let t0 = Instant::now();
        let mut driver = ready_driver();
        let receiver = driver.subscribe();

        driver.on_start(t0);
        driver.tick(t0 + ms(100));
        driver.tick(t0 + ms(300));
        driver.on_reset();

        let received: Vec<TripSnapshot> = receiver.try_iter().collect();
        assert_eq!(received.len(), 3);
        assert!(received[0].progress <= received[1].progress);
        assert_eq!(received[2].progress, 0.0);
        assert_eq!(received[2].phase, TripPhase::Idle);
    }

    #[test]
    fn follow_flag_is_stored_only() {
        let mut driver = ready_driver();
        assert!(!driver.follow_enabled());
        driver.set_follow_enabled(true);
        assert!(driver.follow_enabled());
    }
}
