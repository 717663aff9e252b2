//! Mixer engine SPI and the mock engine for tests.
//!
//! The engine is an external collaborator: it owns the N-1 arithmetic and
//! the rolling per-source contribution buffers, and it drives one tick
//! callback per playback endpoint per tick period. The bridge consumes it
//! through two traits:
//!
//! - [`MixerEngine`]: allocates mixer sources bound to tick callbacks
//! - [`MixerSource`]: the per-endpoint handle used to toggle participation
//!   and submit contributions; releasing it (drop) stops ticks
//!
//! [`MockEngine`] implements both in-process so the whole bridge can be
//! exercised without audio hardware or a DSP backend.

mod mock;

pub use mock::MockEngine;

use crate::error::EngineError;

/// Callback invoked by the engine with the N-1 mix for one source.
///
/// The slice holds one tick's worth of mixed 16-bit samples: everyone
/// else's audio, excluding this source's own prior contribution.
pub type TickHandler = Box<dyn FnMut(&[i16]) + Send>;

/// A multi-source mixing engine.
///
/// Implementations compute, per tick and per source, the mix of all other
/// enabled sources' contributions and deliver it through the source's tick
/// callback on the engine's thread. Ticks for one source are delivered
/// serially and never overlap.
pub trait MixerEngine: Send + Sync {
    /// Allocates a mixer source bound to a tick callback.
    ///
    /// The returned handle exclusively represents the source; dropping it
    /// releases the source and stops callback delivery.
    ///
    /// # Errors
    ///
    /// Returns an engine-specific error if another source cannot be hosted.
    fn alloc_source(&self, on_mix: TickHandler) -> Result<Box<dyn MixerSource>, EngineError>;
}

/// Handle to one source inside a mixer engine.
///
/// Enabled sources both contribute to and receive the mix; disabled ones do
/// neither. Toggling never disturbs allocated resources.
pub trait MixerSource: Send + Sync {
    /// Toggles whether this source participates in the mix.
    fn set_enabled(&self, enabled: bool);

    /// Submits one tick's worth of samples as this source's contribution
    /// for the following tick.
    fn submit(&self, samples: &[i16]);
}
