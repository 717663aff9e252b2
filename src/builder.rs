//! Builder pattern for `MixBridge`.

use std::sync::Arc;

use crate::bridge::MixBridge;
use crate::config::BridgeConfig;
use crate::engine::MixerEngine;
use crate::error::BridgeError;
use crate::event::{event_callback, BridgeEvent, EventCallback};

/// Builder for configuring a [`MixBridge`].
///
/// Use [`MixBridge::builder()`] to create a new builder. An engine is
/// required; the mix configuration defaults to 48 kHz stereo with 20 ms
/// ticks.
///
/// # Example
///
/// ```rust,ignore
/// let bridge = MixBridge::builder()
///     .engine(Arc::new(engine))
///     .config(BridgeConfig::default())
///     .on_event(|e| tracing::debug!(?e, "bridge event"))
///     .build()?;
/// ```
pub struct MixBridgeBuilder {
    engine: Option<Arc<dyn MixerEngine>>,
    config: BridgeConfig,
    events: Option<EventCallback>,
}

impl MixBridgeBuilder {
    pub(crate) fn new() -> Self {
        Self {
            engine: None,
            config: BridgeConfig::default(),
            events: None,
        }
    }

    /// Sets the mixer engine the bridge allocates its sources from.
    #[must_use]
    pub fn engine(mut self, engine: Arc<dyn MixerEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Sets the mix configuration.
    #[must_use]
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a callback for bridge events.
    #[must_use]
    pub fn on_event<F>(mut self, f: F) -> Self
    where
        F: Fn(BridgeEvent) + Send + Sync + 'static,
    {
        self.events = Some(event_callback(f));
        self
    }

    /// Builds the bridge.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidArgument`] if no engine was supplied or
    /// the configuration is malformed.
    pub fn build(self) -> Result<MixBridge, BridgeError> {
        let engine = self
            .engine
            .ok_or_else(|| BridgeError::invalid_argument("a mixer engine is required"))?;
        MixBridge::with_parts(engine, self.config, self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MockEngine;

    #[test]
    fn test_build_requires_engine() {
        let result = MixBridge::builder().build();
        assert!(matches!(result, Err(BridgeError::InvalidArgument { .. })));
    }

    #[test]
    fn test_build_with_engine() {
        let engine = MockEngine::new(&BridgeConfig::default());
        let bridge = MixBridge::builder()
            .engine(Arc::new(engine))
            .build()
            .unwrap();
        assert_eq!(bridge.config().sample_rate, 48_000);
    }

    #[test]
    fn test_build_rejects_malformed_config() {
        let engine = MockEngine::new(&BridgeConfig::default());
        let mut config = BridgeConfig::default();
        config.channels = 0;

        let result = MixBridge::builder()
            .engine(Arc::new(engine))
            .config(config)
            .build();
        assert!(matches!(result, Err(BridgeError::InvalidArgument { .. })));
    }
}
