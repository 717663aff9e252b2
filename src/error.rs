//! Error types for bridge-audio.
//!
//! Errors are split into two categories:
//! - **Bridge errors** ([`BridgeError`]): returned from endpoint creation and
//!   the control command surface.
//! - **Engine errors** ([`EngineError`]): reported by the mixer engine SPI
//!   and propagated verbatim inside [`BridgeError::Engine`].
//!
//! Pairing absence is never an error: an endpoint whose correlation key has
//! no counterpart runs unpaired indefinitely. Likewise a control command
//! whose device pattern matches nothing is a no-op.

/// Errors returned from endpoint creation and control commands.
///
/// Creation failures roll back fully: a failed [`open_playback`] or
/// [`open_capture`] leaves no registry entry, no dangling mixer-source
/// handle, and no allocated buffer. No failure here is fatal to the process;
/// the host framework reports it as a failed device open.
///
/// [`open_playback`]: crate::MixBridge::open_playback
/// [`open_capture`]: crate::MixBridge::open_capture
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A required parameter was missing or malformed.
    ///
    /// Also covers malformed control-command argument strings.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument.
        reason: String,
    },

    /// Allocating an endpoint sample buffer failed.
    #[error("out of memory allocating {requested} samples")]
    OutOfMemory {
        /// The number of 16-bit samples that could not be allocated.
        requested: usize,
    },

    /// The mixer engine reported a failure, propagated verbatim.
    #[error("mixer engine error: {0}")]
    Engine(#[from] EngineError),
}

impl BridgeError {
    /// Creates an invalid-argument error with the given reason.
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

/// Errors reported by a mixer engine implementation.
///
/// These surface from [`MixerEngine::alloc_source`](crate::MixerEngine::alloc_source)
/// when the engine cannot bind another tick callback.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine cannot host another mixer source.
    #[error("mixer source limit reached ({limit})")]
    SourceLimit {
        /// The engine's source capacity.
        limit: usize,
    },

    /// The engine is shutting down and no longer accepts sources.
    #[error("mixer engine is shutting down")]
    ShuttingDown,

    /// An engine-specific failure.
    #[error("{0}")]
    Backend(String),
}

impl EngineError {
    /// Creates an engine-specific backend error with the given message.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
