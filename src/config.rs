//! Configuration for the shared mix state.

use std::time::Duration;

use crate::BridgeError;

/// Shared mix parameters: sample rate, channel count, and tick period.
///
/// The mixer engine is allocated with these values and every playback
/// endpoint's sample buffer is sized from them. Defaults match a typical
/// centralized conference: 48 kHz stereo with 20 ms ticks.
///
/// # Example
///
/// ```
/// use bridge_audio::BridgeConfig;
/// use std::time::Duration;
///
/// let config = BridgeConfig::default();
/// assert_eq!(config.samples_per_tick(), 1920); // 48000 * 2 * 20ms
/// assert_eq!(config.tick_micros(), 20_000);
///
/// let narrow = BridgeConfig {
///     sample_rate: 8_000,
///     channels: 1,
///     tick: Duration::from_millis(20),
/// };
/// assert_eq!(narrow.samples_per_tick(), 160);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Mix sample rate in Hz.
    pub sample_rate: u32,

    /// Mix channel count (1 = mono, 2 = stereo).
    pub channels: u16,

    /// Duration of one mixing tick.
    ///
    /// The engine delivers one mix per playback endpoint per tick and
    /// endpoint timestamps advance by this much (in microseconds) each tick.
    pub tick: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            channels: 2,
            tick: Duration::from_millis(20),
        }
    }
}

impl BridgeConfig {
    /// Returns the number of 16-bit samples in one tick's worth of audio.
    ///
    /// This is the fixed size of every playback endpoint's sample buffer.
    #[must_use]
    pub fn samples_per_tick(&self) -> usize {
        let frames = u64::from(self.sample_rate) * self.tick.as_millis() as u64 / 1000;
        frames as usize * self.channels as usize
    }

    /// Returns the tick period in microseconds.
    #[must_use]
    pub fn tick_micros(&self) -> u64 {
        self.tick.as_micros() as u64
    }

    pub(crate) fn validate(&self) -> Result<(), BridgeError> {
        if self.sample_rate == 0 {
            return Err(BridgeError::invalid_argument("sample rate must be nonzero"));
        }
        if self.channels == 0 {
            return Err(BridgeError::invalid_argument(
                "channel count must be nonzero",
            ));
        }
        if self.tick.is_zero() {
            return Err(BridgeError::invalid_argument("tick must be nonzero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.sample_rate, 48_000);
        assert_eq!(config.channels, 2);
        assert_eq!(config.tick, Duration::from_millis(20));
    }

    #[test]
    fn test_samples_per_tick_stereo_48khz() {
        // 48000 Hz * 20ms = 960 frames * 2 channels
        assert_eq!(BridgeConfig::default().samples_per_tick(), 1920);
    }

    #[test]
    fn test_samples_per_tick_mono_16khz() {
        let config = BridgeConfig {
            sample_rate: 16_000,
            channels: 1,
            tick: Duration::from_millis(100),
        };
        assert_eq!(config.samples_per_tick(), 1600);
    }

    #[test]
    fn test_tick_micros() {
        assert_eq!(BridgeConfig::default().tick_micros(), 20_000);
    }

    #[test]
    fn test_validate_rejects_zero_fields() {
        let mut config = BridgeConfig::default();
        config.sample_rate = 0;
        assert!(config.validate().is_err());

        let mut config = BridgeConfig::default();
        config.channels = 0;
        assert!(config.validate().is_err());

        let mut config = BridgeConfig::default();
        config.tick = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
