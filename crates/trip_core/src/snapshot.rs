//! Published trip state: per-sample snapshots and a bounded history buffer.

use std::collections::VecDeque;

use crate::clock::TripPhase;
use crate::geo::GeoPoint;

/// One published sample of the trip. Recomputed on every tick, never
/// mutated after publication.
#[derive(Debug, Clone, PartialEq)]
pub struct TripSnapshot {
    pub position: GeoPoint,
    /// Normalized elapsed time in [0, 1].
    pub progress: f64,
    pub distance_remaining_km: f64,
    pub elapsed_ms: u64,
    pub phase: TripPhase,
}

/// Rolling buffer of published snapshots, capped so a long-running viewer
/// does not grow without bound.
#[derive(Debug)]
pub struct SnapshotHistory {
    snapshots: VecDeque<TripSnapshot>,
    max_snapshots: usize,
}

impl SnapshotHistory {
    pub fn new(max_snapshots: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            max_snapshots: max_snapshots.max(1),
        }
    }

    pub fn push(&mut self, snapshot: TripSnapshot) {
        if self.snapshots.len() == self.max_snapshots {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    pub fn latest(&self) -> Option<&TripSnapshot> {
        self.snapshots.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TripSnapshot> {
        self.snapshots.iter()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new(10_000)
    }
}
