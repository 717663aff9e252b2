//! Bridge endpoints and their identification types.
//!
//! Endpoints come in two kinds that pair up by correlation key:
//!
//! - [`CaptureEndpoint`]: receives the N-1 mix through its read handler so
//!   a local "microphone" path can reflect the rest of the conference.
//! - [`PlaybackEndpoint`]: is asked for audio through its write handler and
//!   feeds the result back into the shared mix as its contribution.
//!
//! Both are created by the host framework in arbitrary order and converge
//! to a consistent pair through the registry. Peer links are weak and only
//! ever cleared through the registry's unregister path, so neither kind can
//! observe a dangling peer.

mod capture;
mod params;
mod playback;

pub use capture::CaptureEndpoint;
pub use params::{FormatTag, PairKey, StreamParams};
pub use playback::PlaybackEndpoint;

pub(crate) use capture::CaptureShared;
pub(crate) use playback::PlaybackShared;
