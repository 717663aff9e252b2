//! Playback endpoint: owns the tick buffer and the mixer-source handle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::capture::CaptureShared;
use super::params::{PairKey, StreamParams};
use crate::engine::MixerSource;
use crate::event::{BridgeEvent, EventCallback};
use crate::frame::WriteHandler;
use crate::pipeline::PairRegistry;

/// Shared playback state, reachable from the endpoint handle, the registry,
/// the peer capture, and the engine's tick callback.
///
/// Only the endpoint handle holds a strong reference; everything else is
/// weak, so dropping the handle releases the buffer deterministically.
pub(crate) struct PlaybackShared {
    pub(crate) prm: StreamParams,
    pub(crate) device: String,
    pub(crate) key: PairKey,
    pub(crate) wh: WriteHandler,
    /// One tick's worth of 16-bit samples. Sized at allocation, never
    /// resized.
    pub(crate) sampv: Mutex<Vec<i16>>,
    /// The engine-side handle. `None` only during construction and after
    /// teardown has begun.
    pub(crate) mixer: Mutex<Option<Box<dyn MixerSource>>>,
    pub(crate) peer: Mutex<Weak<CaptureShared>>,
    /// Microseconds since the first tick; advanced by the tick duration on
    /// every dispatched tick.
    pub(crate) ts: AtomicU64,
    pub(crate) tick_micros: u64,
}

impl PlaybackShared {
    pub(crate) fn new(
        prm: StreamParams,
        device: String,
        key: PairKey,
        wh: WriteHandler,
        sampv: Vec<i16>,
        tick_micros: u64,
    ) -> Self {
        Self {
            prm,
            device,
            key,
            wh,
            sampv: Mutex::new(sampv),
            mixer: Mutex::new(None),
            peer: Mutex::new(Weak::new()),
            ts: AtomicU64::new(0),
            tick_micros,
        }
    }

    pub(crate) fn peer_capture(&self) -> Option<Arc<CaptureShared>> {
        self.peer.lock().upgrade()
    }

    /// Stops this endpoint feeding the shared mix. The handle stays
    /// allocated; the control plane can re-enable it later.
    pub(crate) fn disable_contribution(&self) {
        if let Some(src) = self.mixer.lock().as_ref() {
            src.set_enabled(false);
        }
    }

    pub(crate) fn timestamp(&self) -> u64 {
        self.ts.load(Ordering::SeqCst)
    }
}

/// One output stream of the bridge.
///
/// Created by [`MixBridge::open_playback`](crate::MixBridge::open_playback)
/// when the host framework opens an output device. The endpoint owns a
/// fixed-size sample buffer and a mixer-source handle whose lifetime equals
/// its own; dropping the endpoint releases both and unregisters it.
///
/// On every mixing tick the endpoint's write handler is invoked over the
/// buffer and the result is submitted to the engine as this session's
/// contribution. If a capture endpoint with the same [`PairKey`] is active,
/// the pair's read handler additionally receives the N-1 mix first.
pub struct PlaybackEndpoint {
    shared: Arc<PlaybackShared>,
    registry: Arc<PairRegistry>,
    events: Option<EventCallback>,
}

impl PlaybackEndpoint {
    pub(crate) fn new(
        shared: Arc<PlaybackShared>,
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

    /// Returns `true` if a capture endpoint is currently paired with this
    /// one.
    pub fn is_paired(&self) -> bool {
        self.shared.peer_capture().is_some()
    }

    /// Device name of the paired capture endpoint, if any.
    pub fn peer_device(&self) -> Option<String> {
        self.shared.peer_capture().map(|cap| cap.device.clone())
    }

    /// Microseconds since this endpoint's first tick.
    ///
    /// Starts at 0 and advances by the tick duration on every dispatched
    /// tick; while the endpoint is disabled no ticks arrive and the value
    /// holds.
    pub fn timestamp(&self) -> u64 {
        self.shared.timestamp()
    }
}

impl Drop for PlaybackEndpoint {
    fn drop(&mut self) {
        // Release the handle first so the engine stops ticking this
        // endpoint, then unregister; the registry clears the peer's
        // back-reference.
        drop(self.shared.mixer.lock().take());
        let was_paired = self.shared.peer_capture().is_some();
        self.registry.unregister_playback(&self.shared);
        tracing::debug!(device = %self.shared.device, key = %self.shared.key, "playback endpoint closed");
        if was_paired {
            if let Some(cb) = &self.events {
                cb(BridgeEvent::PairDissolved {
                    key: self.shared.key,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::write_handler;

    fn shared() -> PlaybackShared {
        PlaybackShared::new(
            StreamParams::new(48_000, 2),
            "spk".to_string(),
            PairKey::new(1),
            write_handler(|_| {}),
            vec![0i16; 1920],
            20_000,
        )
    }

    #[test]
    fn test_timestamp_starts_at_zero() {
        assert_eq!(shared().timestamp(), 0);
    }

    #[test]
    fn test_unpaired_by_default() {
        assert!(shared().peer_capture().is_none());
    }

    #[test]
    fn test_disable_without_handle_is_noop() {
        // Teardown can race a tick; disabling with the handle gone must not
        // panic.
        shared().disable_contribution();
    }
}
