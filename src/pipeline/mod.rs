//! Pairing and tick-dispatch internals.
//!
//! Endpoint creation and engine ticks meet here:
//!
//! ```text
//! open_capture/open_playback → PairRegistry match → peers linked
//! engine tick → mix_tick → read handler → write handler → contribution
//! ```
//!
//! - **Registry**: insertion-ordered weak membership, first-available-match
//!   pairing, the single path through which peer links are cleared
//! - **Dispatch**: one tick in, at most two synchronous handler calls out,
//!   one contribution submitted, timestamp advanced
//!
//! Lock order is fixed so the control plane can run against the tick
//! thread: the registry lock is released before any handler or engine call,
//! and an endpoint's mixer-handle lock is only ever taken in front of the
//! engine's own internals.

mod dispatch;
mod registry;

pub(crate) use dispatch::mix_tick;
pub(crate) use registry::PairRegistry;
