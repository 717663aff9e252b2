//! Endpoint identification and format parameters.

use std::fmt;

use crate::BridgeError;

/// Opaque correlation key shared by the two endpoints of one call session.
///
/// The host framework derives the key from whatever identifies a session on
/// its side; the bridge only ever compares keys for equality to establish
/// pairing.
///
/// # Example
///
/// ```
/// use bridge_audio::PairKey;
///
/// let a = PairKey::new(42);
/// let b = PairKey::new(42);
/// assert_eq!(a, b);
/// assert_ne!(a, PairKey::new(7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(u64);

impl PairKey {
    /// Creates a key from a raw session identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PairKey {
    fn from(raw: u64) -> Self {
        Self::new(raw)
    }
}

/// Opaque sample-format tag.
///
/// The bridge never converts samples; the tag travels from an endpoint's
/// parameters into every frame handed to its handlers, untouched. Sample
/// memory is always 16-bit signed PCM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatTag(u16);

impl FormatTag {
    /// Signed 16-bit little-endian PCM, the default tag.
    pub const S16LE: FormatTag = FormatTag(0);

    /// Creates a tag from a host-framework format code.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw format code.
    #[must_use]
    pub const fn as_raw(&self) -> u16 {
        self.0
    }
}

impl Default for FormatTag {
    fn default() -> Self {
        Self::S16LE
    }
}

/// Per-endpoint stream parameters supplied by the host framework at open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamParams {
    /// Sample format tag, carried into frames unchanged.
    pub format: FormatTag,

    /// Endpoint sample rate in Hz.
    pub sample_rate: u32,

    /// Endpoint channel count.
    pub channels: u16,
}

impl StreamParams {
    /// Creates parameters with the default format tag.
    #[must_use]
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            format: FormatTag::S16LE,
            sample_rate,
            channels,
        }
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
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_equality() {
        assert_eq!(PairKey::new(1), PairKey::from(1));
        assert_ne!(PairKey::new(1), PairKey::new(2));
    }

    #[test]
    fn test_pair_key_display() {
        assert_eq!(format!("{}", PairKey::new(42)), "42");
    }

    #[test]
    fn test_format_tag_default() {
        assert_eq!(FormatTag::default(), FormatTag::S16LE);
        assert_eq!(FormatTag::from_raw(3).as_raw(), 3);
    }

    #[test]
    fn test_params_validate() {
        assert!(StreamParams::new(48_000, 2).validate().is_ok());
        assert!(StreamParams::new(0, 2).validate().is_err());
        assert!(StreamParams::new(48_000, 0).validate().is_err());
    }
}
