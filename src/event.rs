//! Runtime events for observing bridge behavior.
//!
//! Events are informational notifications, not control flow. The bridge
//! continues running after every event; register a callback to log them or
//! update metrics.

use std::sync::Arc;

use crate::endpoint::PairKey;

/// Events emitted as endpoints pair, unpair, and get toggled.
#[derive(Debug, Clone)]
pub enum BridgeEvent {
    /// A capture endpoint and a playback endpoint with equal correlation
    /// keys found each other.
    PairEstablished {
        /// The correlation key both endpoints share.
        key: PairKey,
        /// Device name of the capture side.
        capture_device: String,
        /// Device name of the playback side.
        playback_device: String,
    },

    /// One side of an established pairing was destroyed.
    ///
    /// The surviving endpoint keeps running unpaired ("plays mix, does not
    /// reflect").
    PairDissolved {
        /// The correlation key the pairing was established under.
        key: PairKey,
    },

    /// The control plane toggled mixing for a device name.
    MixingToggled {
        /// The device name pattern that was matched.
        device: String,
        /// Whether mixing was enabled or disabled.
        enabled: bool,
        /// How many playback endpoints matched. Zero is a no-op, not an
        /// error.
        matched: usize,
    },
}

/// Callback type for receiving bridge events.
///
/// Register via [`MixBridgeBuilder::on_event()`](crate::MixBridgeBuilder::on_event).
pub type EventCallback = Arc<dyn Fn(BridgeEvent) + Send + Sync>;

/// Creates an [`EventCallback`] from a closure.
///
/// # Example
///
/// ```
/// use bridge_audio::{event_callback, BridgeEvent};
///
/// let callback = event_callback(|event| {
///     println!("bridge event: {:?}", event);
/// });
/// ```
pub fn event_callback<F>(f: F) -> EventCallback
where
    F: Fn(BridgeEvent) + Send + Sync + 'static,
{
    Arc::new(f)
}
