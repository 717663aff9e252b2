//! Capture endpoint: the "reflect the conference" side of a pair.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::params::{PairKey, StreamParams};
use super::playback::PlaybackShared;
use crate::event::{BridgeEvent, EventCallback};
use crate::frame::ReadHandler;
use crate::pipeline::PairRegistry;

/// Shared capture state, reachable from the endpoint handle, the registry,
/// and the peer playback.
pub(crate) struct CaptureShared {
    pub(crate) prm: StreamParams,
    pub(crate) device: String,
    pub(crate) key: PairKey,
    pub(crate) rh: ReadHandler,
    pub(crate) peer: Mutex<Weak<PlaybackShared>>,
}

impl CaptureShared {
    pub(crate) fn new(prm: StreamParams, device: String, key: PairKey, rh: ReadHandler) -> Self {
        Self {
            prm,
            device,
            key,
            rh,
            peer: Mutex::new(Weak::new()),
        }
    }

    pub(crate) fn peer_playback(&self) -> Option<Arc<PlaybackShared>> {
        self.peer.lock().upgrade()
    }
}

/// One capture stream of the bridge.
///
/// Created by [`MixBridge::open_capture`](crate::MixBridge::open_capture)
/// when the host framework opens a capture device. A capture endpoint
/// produces no audio of its own: once paired with a playback endpoint
/// sharing its [`PairKey`], its read handler receives the N-1 mix on every
/// tick, timestamped with the pair's clock. Unpaired it simply waits.
///
/// Dropping the endpoint disables the peer's mixer contribution (that
/// session stops feeding the shared mix) and unregisters it.
pub struct CaptureEndpoint {
    shared: Arc<CaptureShared>,
    registry: Arc<PairRegistry>,
    events: Option<EventCallback>,
}

impl CaptureEndpoint {
    pub(crate) fn new(
        shared: Arc<CaptureShared>,
        registry: Arc<PairRegistry>,
        events: Option<EventCallback>,
    ) -> Self {
        Self {
            shared,
            registry,
            events,
        }
    }

    /// The device name this endpoint was opened under.
    pub fn device(&self) -> &str {
        &self.shared.device
    }

    /// The correlation key this endpoint was opened with.
    pub fn key(&self) -> PairKey {
        self.shared.key
    }

    /// The stream parameters this endpoint was opened with.
    pub fn params(&self) -> StreamParams {
        self.shared.prm
    }

    /// Returns `true` if a playback endpoint is currently paired with this
    /// one.
    pub fn is_paired(&self) -> bool {
        self.shared.peer_playback().is_some()
    }

    /// Device name of the paired playback endpoint, if any.
    pub fn peer_device(&self) -> Option<String> {
        self.shared.peer_playback().map(|play| play.device.clone())
    }
}

impl Drop for CaptureEndpoint {
    fn drop(&mut self) {
        let peer = self.shared.peer_playback();
        if let Some(play) = &peer {
            play.disable_contribution();
            tracing::debug!(
                device = %self.shared.device,
                peer = %play.device,
                "capture endpoint closed, peer contribution disabled"
            );
        }
        self.registry.unregister_capture(&self.shared);
        if peer.is_some() {
            if let Some(cb) = &self.events {
                cb(BridgeEvent::PairDissolved {
                    key: self.shared.key,
                });
            }
        }
    }
}
