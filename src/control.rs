//! Control command semantics.
//!
//! The bridge exposes two operator commands. Their lexing and dispatch
//! belong to the host's command framework; this module only defines what
//! the commands mean once their argument string arrives.
//!
//! - enable: takes `"<device>,<bool>"` and toggles mixing for every
//!   playback endpoint whose device name matches exactly
//! - debug: reserved diagnostic with no defined output yet

use crate::bridge::MixBridge;
use crate::error::BridgeError;

/// Parses the enable command's `"<device>,<bool>"` argument.
///
/// The device name is everything before the first comma; the boolean token
/// accepts `true`/`false` (ASCII case-insensitive) and `1`/`0`. Surrounding
/// whitespace is ignored.
///
/// # Errors
///
/// Returns [`BridgeError::InvalidArgument`] for a missing comma, an empty
/// device name, or an unrecognized boolean token.
///
/// # Example
///
/// ```
/// use bridge_audio::control::parse_enable_arg;
///
/// assert_eq!(parse_enable_arg("spk,true").unwrap(), ("spk", true));
/// assert_eq!(parse_enable_arg("spk, 0").unwrap(), ("spk", false));
/// assert!(parse_enable_arg("spk").is_err());
/// ```
pub fn parse_enable_arg(arg: &str) -> Result<(&str, bool), BridgeError> {
    let (device, token) = arg
        .split_once(',')
        .ok_or_else(|| BridgeError::invalid_argument("expected \"<device>,<bool>\""))?;

    let device = device.trim();
    if device.is_empty() {
        return Err(BridgeError::invalid_argument("device name is empty"));
    }

    Ok((device, parse_bool(token.trim())?))
}

fn parse_bool(token: &str) -> Result<bool, BridgeError> {
    if token == "1" || token.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if token == "0" || token.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(BridgeError::invalid_argument(format!(
            "not a boolean: {token:?}"
        )))
    }
}

/// Applies the enable command to a bridge.
///
/// Returns the number of playback endpoints matched; zero matches is a
/// no-op, not an error.
///
/// # Errors
///
/// Returns [`BridgeError::InvalidArgument`] if the argument string is
/// malformed. The error is reported to the command dispatch layer; nothing
/// in the bridge changes.
pub fn enable_command(bridge: &MixBridge, arg: &str) -> Result<usize, BridgeError> {
    let (device, enabled) = parse_enable_arg(arg)?;
    Ok(bridge.set_mixing_enabled(device, enabled))
}

/// Reserved diagnostic command.
///
/// Hosts may register it alongside the enable command, but its output
/// contract is intentionally undefined for now.
pub fn debug_command(_bridge: &MixBridge) {
    // TODO: settle on a diagnostic contract (registry membership and
    // per-endpoint timestamps are the obvious candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_true_tokens() {
        assert_eq!(parse_enable_arg("spk,true").unwrap(), ("spk", true));
        assert_eq!(parse_enable_arg("spk,TRUE").unwrap(), ("spk", true));
        assert_eq!(parse_enable_arg("spk,1").unwrap(), ("spk", true));
    }

    #[test]
    fn test_parse_false_tokens() {
        assert_eq!(parse_enable_arg("spk,false").unwrap(), ("spk", false));
        assert_eq!(parse_enable_arg("spk,0").unwrap(), ("spk", false));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_enable_arg(" spk , true ").unwrap(), ("spk", true));
    }

    #[test]
    fn test_parse_device_may_contain_spaces() {
        assert_eq!(
            parse_enable_arg("USB Speaker,false").unwrap(),
            ("USB Speaker", false)
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_enable_arg("").is_err());
        assert!(parse_enable_arg("spk").is_err());
        assert!(parse_enable_arg(",true").is_err());
        assert!(parse_enable_arg("spk,maybe").is_err());
    }
}
