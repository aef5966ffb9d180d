//! Trip clock: elapsed-time accounting across start/pause/resume/reset.
//!
//! The clock separates "time already accounted for" from the wall-clock
//! anchor of the current run segment, so pause/resume is exact. `now` is an
//! explicit argument on every operation; the clock never reads wall time
//! itself.

use std::time::Instant;

/// Lifecycle phase of the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripPhase {
    Idle,
    Running,
    Paused,
    Completed,
}

/// State machine over [`TripPhase`].
///
/// While Running, total elapsed = `elapsed_before_run_ms + (now - anchor)`;
/// otherwise total elapsed = `elapsed_before_run_ms`.
#[derive(Debug, Clone)]
pub struct TripClock {
    phase: TripPhase,
    elapsed_before_run_ms: u64,
    run_started_at: Option<Instant>,
}

impl TripClock {
    pub fn new() -> Self {
        Self {
            phase: TripPhase::Idle,
            elapsed_before_run_ms: 0,
            run_started_at: None,
        }
    }

    pub fn phase(&self) -> TripPhase {
        self.phase
    }

    /// Begin a run segment anchored at `now`.
    ///
    /// From Idle this starts a fresh trip (accumulated time cleared); from
    /// Paused it resumes without touching accumulated time. Ignored while
    /// Running or Completed.
    pub fn start(&mut self, now: Instant) {
        match self.phase {
            TripPhase::Idle => {
                self.elapsed_before_run_ms = 0;
                self.run_started_at = Some(now);
                self.phase = TripPhase::Running;
            }
            TripPhase::Paused => {
                self.run_started_at = Some(now);
                self.phase = TripPhase::Running;
            }
            TripPhase::Running | TripPhase::Completed => {}
        }
    }

    /// Fold the current run segment into accumulated time. Ignored unless
    /// Running.
    pub fn pause(&mut self, now: Instant) {
        if self.phase != TripPhase::Running {
            return;
        }
        self.fold_run_segment(now);
        self.phase = TripPhase::Paused;
    }

    /// Clear all accounting and return to Idle. Valid from any phase.
    pub fn reset(&mut self) {
        self.elapsed_before_run_ms = 0;
        self.run_started_at = None;
        self.phase = TripPhase::Idle;
    }

    /// Terminal transition, taken when progress reaches 1. Only `reset`
    /// leaves Completed.
    pub fn complete(&mut self, now: Instant) {
        if self.phase == TripPhase::Running {
            self.fold_run_segment(now);
        }
        self.phase = TripPhase::Completed;
    }

    /// Total elapsed simulated milliseconds at `now`. Pure read.
    pub fn elapsed_ms(&self, now: Instant) -> u64 {
        let running = match (self.phase, self.run_started_at) {
            (TripPhase::Running, Some(anchor)) => {
                now.saturating_duration_since(anchor).as_millis() as u64
            }
            _ => 0,
        };
        self.elapsed_before_run_ms + running
    }

    fn fold_run_segment(&mut self, now: Instant) {
        if let Some(anchor) = self.run_started_at.take() {
            self.elapsed_before_run_ms += now.saturating_duration_since(anchor).as_millis() as u64;
        }
    }
}

impl Default for TripClock {
    fn default() -> Self {
        Self::new()
    }
}
