//! # bridge-audio
//!
//! N-1 conference audio bridge with paired capture/playback endpoints.
//!
//! `bridge-audio` pairs a capture endpoint and a playback endpoint that
//! belong to the same call session and, on every fixed-duration mixing tick,
//! delivers each of them the mix of "everyone else" in the conference. The
//! capture path reflects the rest of the room for outbound transmission
//! while the playback path plays it locally, so no participant ever hears an
//! echo of themselves.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bridge_audio::engine::MockEngine;
//! use bridge_audio::{
//!     read_handler, write_handler, BridgeConfig, MixBridge, PairKey, StreamParams,
//! };
//!
//! let config = BridgeConfig::default(); // 48 kHz stereo, 20 ms ticks
//! let engine = MockEngine::new(&config);
//!
//! let bridge = MixBridge::builder()
//!     .engine(Arc::new(engine.clone()))
//!     .config(config)
//!     .on_event(|e| tracing::debug!(?e, "bridge event"))
//!     .build()?;
//!
//! // The host framework opens endpoints in arbitrary order; equal keys pair.
//! let key = PairKey::new(42);
//! let spk = bridge.open_playback(
//!     StreamParams::new(48_000, 2),
//!     "spk",
//!     key,
//!     write_handler(|frame| frame.samples.fill(0)),
//! )?;
//! let mic = bridge.open_capture(
//!     StreamParams::new(48_000, 2),
//!     "mic",
//!     key,
//!     read_handler(|frame| println!("{} mixed samples", frame.sample_count())),
//! )?;
//!
//! assert!(spk.is_paired() && mic.is_paired());
//! engine.mix_tick(); // one tick: mic read handler, then spk write handler
//! ```
//!
//! ## Architecture
//!
//! The bridge sits between two external collaborators:
//!
//! - **Host framework**: opens and closes endpoints as devices named
//!   [`MixBridge::NAME`]; the bridge never performs audio I/O itself.
//! - **Mixer engine** (the [`engine`] module SPI): owns the N-1 arithmetic
//!   and drives one tick callback per playback endpoint per tick period.
//!
//! Each tick is dispatched synchronously on the engine's thread: the paired
//! capture's read handler first (if any), then the playback's write handler
//! over the endpoint's own buffer, then that buffer is submitted back to the
//! engine as this endpoint's contribution to the next tick. The control
//! plane may toggle mixing per device name from another thread without
//! disturbing allocated buffers or mixer-source handles.

#![warn(missing_docs)]
// Audio code requires intentional numeric casts between sample formats
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_lossless
)]
// unwrap/expect allowed in tests only
#![allow(clippy::unwrap_used)]
// These doc lints are too strict for internal implementation details
#![allow(clippy::missing_panics_doc, clippy::missing_errors_doc)]

mod bridge;
mod builder;
mod config;
pub mod control;
mod endpoint;
pub mod engine;
mod error;
mod event;
mod frame;
mod pipeline;

pub use bridge::MixBridge;
pub use builder::MixBridgeBuilder;
pub use config::BridgeConfig;
pub use endpoint::{CaptureEndpoint, FormatTag, PairKey, PlaybackEndpoint, StreamParams};
pub use engine::{MixerEngine, MixerSource, MockEngine};
pub use error::{BridgeError, EngineError};
pub use event::{event_callback, BridgeEvent, EventCallback};
pub use frame::{read_handler, write_handler, AudioFrame, AudioFrameMut, ReadHandler, WriteHandler};
