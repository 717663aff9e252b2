//! The bridge service: endpoint creation and the control plane.

use std::sync::Arc;

use crate::builder::MixBridgeBuilder;
use crate::config::BridgeConfig;
use crate::endpoint::{
    CaptureEndpoint, CaptureShared, PairKey, PlaybackEndpoint, PlaybackShared, StreamParams,
};
use crate::engine::{MixerEngine, MixerSource, TickHandler};
use crate::error::BridgeError;
use crate::event::{BridgeEvent, EventCallback};
use crate::frame::{ReadHandler, WriteHandler};
use crate::pipeline::{self, PairRegistry};

/// The N-1 audio bridge.
///
/// One `MixBridge` backs one conference mix: it owns the pair registry and
/// the mixer-engine handle, and the host framework calls
/// [`open_capture`](MixBridge::open_capture) /
/// [`open_playback`](MixBridge::open_playback) as devices named
/// [`MixBridge::NAME`] are opened. Endpoints clean up after themselves on
/// drop, so dropping the bridge itself requires no explicit flush.
///
/// The control plane ([`set_mixing_enabled`](MixBridge::set_mixing_enabled))
/// may be called from a different thread than the one delivering ticks.
pub struct MixBridge {
    engine: Arc<dyn MixerEngine>,
    config: BridgeConfig,
    registry: Arc<PairRegistry>,
    events: Option<EventCallback>,
}

impl MixBridge {
    /// The fixed device name this bridge registers under with the host
    /// framework, for both the capture and the playback provider.
    pub const NAME: &'static str = "mixbridge";

    /// Starts configuring a bridge.
    #[must_use]
    pub fn builder() -> MixBridgeBuilder {
        MixBridgeBuilder::new()
    }

    /// Creates a bridge over the given engine with the given mix
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidArgument`] if the configuration has a
    /// zero sample rate, channel count, or tick.
    pub fn new(engine: Arc<dyn MixerEngine>, config: BridgeConfig) -> Result<Self, BridgeError> {
        Self::with_parts(engine, config, None)
    }

    pub(crate) fn with_parts(
        engine: Arc<dyn MixerEngine>,
        config: BridgeConfig,
        events: Option<EventCallback>,
    ) -> Result<Self, BridgeError> {
        config.validate()?;
        Ok(Self {
            engine,
            config,
            registry: Arc::new(PairRegistry::new()),
            events,
        })
    }

    /// The mix configuration this bridge was created with.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Opens a capture endpoint.
    ///
    /// If a playback endpoint with the same key is active, the two pair up
    /// immediately; otherwise the capture waits, valid but silent, until a
    /// playback arrives or the host closes it. Contribution enablement is
    /// never touched here.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidArgument`] for malformed parameters.
    pub fn open_capture(
        &self,
        params: StreamParams,
        device: impl Into<String>,
        key: PairKey,
        read_handler: ReadHandler,
    ) -> Result<CaptureEndpoint, BridgeError> {
        params.validate()?;

        let shared = Arc::new(CaptureShared::new(
            params,
            device.into(),
            key,
            read_handler,
        ));
        if let Some(play) = self.registry.register_capture(&shared) {
            tracing::debug!(
                capture = %shared.device,
                playback = %play.device,
                key = %key,
                "endpoints paired"
            );
            self.emit(BridgeEvent::PairEstablished {
                key,
                capture_device: shared.device.clone(),
                playback_device: play.device.clone(),
            });
        }

        Ok(CaptureEndpoint::new(
            shared,
            self.registry.clone(),
            self.events.clone(),
        ))
    }

    /// Opens a playback endpoint.
    ///
    /// Allocates one tick's worth of sample buffer, binds a mixer source to
    /// the endpoint's tick dispatch, then attempts pairing. Failures roll
    /// back fully: nothing is registered and no handle or buffer survives a
    /// failed open.
    ///
    /// # Errors
    ///
    /// [`BridgeError::InvalidArgument`] for malformed parameters,
    /// [`BridgeError::OutOfMemory`] if the buffer cannot be allocated, or
    /// the engine's own error if it cannot host another source.
    pub fn open_playback(
        &self,
        params: StreamParams,
        device: impl Into<String>,
        key: PairKey,
        write_handler: WriteHandler,
    ) -> Result<PlaybackEndpoint, BridgeError> {
        params.validate()?;

        let requested = self.config.samples_per_tick();
        let mut sampv = Vec::new();
        sampv
            .try_reserve_exact(requested)
            .map_err(|_| BridgeError::OutOfMemory { requested })?;
        sampv.resize(requested, 0);

        let shared = Arc::new(PlaybackShared::new(
            params,
            device.into(),
            key,
            write_handler,
            sampv,
            self.config.tick_micros(),
        ));

        // The callback only holds a weak reference; once the handle is
        // released the engine may still fire a pending tick and must find
        // nothing to dispatch to.
        let weak = Arc::downgrade(&shared);
        let on_mix: TickHandler = Box::new(move |mixed| {
            if let Some(st) = weak.upgrade() {
                pipeline::mix_tick(&st, mixed);
            }
        });
        let handle = self.engine.alloc_source(on_mix)?;
        *shared.mixer.lock() = Some(handle);

        if let Some(cap) = self.registry.register_playback(&shared) {
            tracing::debug!(
                capture = %cap.device,
                playback = %shared.device,
                key = %key,
                "endpoints paired"
            );
            self.emit(BridgeEvent::PairEstablished {
                key,
                capture_device: cap.device.clone(),
                playback_device: shared.device.clone(),
            });
        }

        Ok(PlaybackEndpoint::new(
            shared,
            self.registry.clone(),
            self.events.clone(),
        ))
    }

    /// Toggles mixing for every playback endpoint whose device name exactly
    /// equals `device`.
    ///
    /// Enabled endpoints both contribute to and receive the mix; disabled
    /// ones do neither. Buffers and mixer-source handles stay allocated
    /// either way, so re-enabling resumes where the endpoint left off.
    /// Returns the number of endpoints matched; zero is a no-op, not an
    /// error.
    pub fn set_mixing_enabled(&self, device: &str, enabled: bool) -> usize {
        let mut matched = 0;
        for play in self.registry.playbacks() {
            if play.device != device {
                continue;
            }
            if let Some(src) = play.mixer.lock().as_ref() {
                src.set_enabled(enabled);
                matched += 1;
            }
        }

        tracing::info!(device, enabled, matched, "mixing toggled");
        self.emit(BridgeEvent::MixingToggled {
            device: device.to_string(),
            enabled,
            matched,
        });
        matched
    }

    fn emit(&self, event: BridgeEvent) {
        if let Some(cb) = &self.events {
            cb(event);
        }
    }
}
