//! Per-tick audio frames and endpoint handler types.
//!
//! Frames are borrowed views over sample memory, built fresh for each tick
//! and handed to handlers synchronously on the tick thread. Nothing here
//! allocates: the read side borrows the engine's mixed samples and the write
//! side borrows the playback endpoint's own buffer.

use std::sync::Arc;
use std::time::Duration;

use crate::endpoint::FormatTag;

/// An immutable frame of mixed audio delivered to capture read handlers.
///
/// Carries one tick's worth of the N-1 mix ("everyone else") together with
/// the format the paired capture endpoint was opened with. Timestamps start
/// at 0 for a given playback endpoint and advance by the tick duration in
/// microseconds on every tick, regardless of pairing state.
///
/// # Example
///
/// ```
/// use bridge_audio::{AudioFrame, FormatTag};
///
/// let samples = vec![0i16; 960];
/// let frame = AudioFrame {
///     format: FormatTag::S16LE,
///     samples: &samples,
///     sample_rate: 48_000,
///     channels: 2,
///     timestamp: 20_000,
/// };
/// assert_eq!(frame.sample_count(), 960);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AudioFrame<'a> {
    /// Sample format tag, passed through from the endpoint's parameters.
    pub format: FormatTag,

    /// PCM samples for this tick, interleaved by channel.
    pub samples: &'a [i16],

    /// Sample rate in Hz.
    pub sample_rate: u32,

    /// Number of audio channels.
    pub channels: u16,

    /// Microseconds since the playback endpoint's first tick.
    pub timestamp: u64,
}

impl AudioFrame<'_> {
    /// Returns the number of samples in this frame.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Returns the duration covered by this frame.
    pub fn duration(&self) -> Duration {
        duration_of(self.samples.len(), self.sample_rate, self.channels)
    }
}

/// A mutable frame handed to playback write handlers.
///
/// The sample slice is the playback endpoint's own buffer, sized to the
/// tick; the handler deposits this session's outbound audio into it, and the
/// bridge submits the buffer to the mixer engine as the endpoint's
/// contribution for the following tick.
#[derive(Debug)]
pub struct AudioFrameMut<'a> {
    /// Sample format tag, passed through from the endpoint's parameters.
    pub format: FormatTag,

    /// The endpoint's own sample buffer for this tick, to be filled.
    pub samples: &'a mut [i16],

    /// Sample rate in Hz.
    pub sample_rate: u32,

    /// Number of audio channels.
    pub channels: u16,

    /// Microseconds since the playback endpoint's first tick.
    pub timestamp: u64,
}

impl AudioFrameMut<'_> {
    /// Returns the number of samples in this frame.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Returns the duration covered by this frame.
    pub fn duration(&self) -> Duration {
        duration_of(self.samples.len(), self.sample_rate, self.channels)
    }
}

fn duration_of(samples: usize, sample_rate: u32, channels: u16) -> Duration {
    if sample_rate == 0 || channels == 0 {
        return Duration::ZERO;
    }
    let frames = samples / channels as usize;
    Duration::from_secs_f64(frames as f64 / f64::from(sample_rate))
}

/// Handler invoked with the N-1 mix on behalf of a capture endpoint.
///
/// Called synchronously once per tick while the endpoint is paired; the
/// typical implementation forwards the frame into the session's outbound
/// audio path.
pub type ReadHandler = Arc<dyn Fn(&AudioFrame<'_>) + Send + Sync>;

/// Handler invoked once per tick to fill a playback endpoint's buffer.
///
/// Called synchronously on every tick, paired or not. Whatever the handler
/// leaves in the buffer becomes the endpoint's contribution to the next mix.
pub type WriteHandler = Arc<dyn Fn(&mut AudioFrameMut<'_>) + Send + Sync>;

/// Creates a [`ReadHandler`] from a closure.
///
/// # Example
///
/// ```
/// use bridge_audio::read_handler;
///
/// let handler = read_handler(|frame| {
///     assert!(frame.sample_count() > 0);
/// });
/// ```
pub fn read_handler<F>(f: F) -> ReadHandler
where
    F: Fn(&AudioFrame<'_>) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Creates a [`WriteHandler`] from a closure.
///
/// # Example
///
/// ```
/// use bridge_audio::write_handler;
///
/// let handler = write_handler(|frame| frame.samples.fill(0));
/// ```
pub fn write_handler<F>(f: F) -> WriteHandler
where
    F: Fn(&mut AudioFrameMut<'_>) + Send + Sync + 'static,
{
    Arc::new(f)
}
