//! Background polyline fetch: one request at a time, spawned on its own
//! thread, with the result drained on the UI thread each frame.

use std::sync::mpsc::{self, Receiver, Sender};

use trip_core::geo::GeoPoint;
use trip_core::routing::{build_route_source, RouteFetchError, RouteSourceKind};

type FetchResult = Result<Vec<GeoPoint>, RouteFetchError>;

pub struct RouteFetchState {
    sender: Sender<FetchResult>,
    receiver: Receiver<FetchResult>,
    inflight: bool,
}

impl RouteFetchState {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            inflight: false,
        }
    }

    /// Kick off a fetch on a background thread. Ignored while a fetch is
    /// already in flight.
    pub fn request(&mut self, kind: RouteSourceKind, origin: GeoPoint, destination: GeoPoint) {
        if self.inflight {
            return;
        }
        self.inflight = true;
        let sender = self.sender.clone();
        std::thread::spawn(move || {
            let source = build_route_source(&kind);
            let _ = sender.send(source.fetch_route(origin, destination));
        });
    }

    /// Non-blocking read of the completed fetch result, if one arrived.
    pub fn drain(&mut self) -> Option<FetchResult> {
        match self.receiver.try_recv() {
            Ok(result) => {
                self.inflight = false;
                Some(result)
            }
            Err(_) => None,
        }
    }

    pub fn inflight(&self) -> bool {
        self.inflight
    }
}

impl Default for RouteFetchState {
    fn default() -> Self {
        Self::new()
    }
}
