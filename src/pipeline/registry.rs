//! Endpoint pair registry.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::endpoint::{CaptureShared, PlaybackShared};

/// Matches endpoints of opposite kinds by correlation key.
///
/// The registry keeps two insertion-ordered collections of weak endpoint
/// references and owns nothing: membership ends when the endpoint handle is
/// dropped and unregisters itself. Registration scans the opposite
/// collection in insertion order and pairs with the first entry whose key
/// matches and which is not already paired; a later endpoint sharing an
/// already-consumed key stays unpaired.
///
/// All access goes through one internal lock, which is what makes the
/// control plane safe to run concurrently with the tick thread. The lock is
/// never held across handler or engine calls.
pub(crate) struct PairRegistry {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    captures: Vec<Weak<CaptureShared>>,
    playbacks: Vec<Weak<PlaybackShared>>,
}

impl PairRegistry {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Registers a capture endpoint, pairing it with the first available
    /// playback endpoint sharing its key. The capture is appended to the
    /// active collection regardless of match outcome.
    pub(crate) fn register_capture(
        &self,
        st: &Arc<CaptureShared>,
    ) -> Option<Arc<PlaybackShared>> {
        let mut inner = self.inner.lock();
        inner.playbacks.retain(|w| w.strong_count() > 0);

        let mut matched = None;
        for cand in inner.playbacks.iter().filter_map(Weak::upgrade) {
            if cand.key != st.key {
                continue;
            }
            if cand.peer.lock().strong_count() > 0 {
                tracing::warn!(
                    key = %st.key,
                    device = %cand.device,
                    "correlation key already consumed, leaving new capture unpaired"
                );
                continue;
            }
            matched = Some(cand);
            break;
        }

        if let Some(play) = &matched {
            *play.peer.lock() = Arc::downgrade(st);
            *st.peer.lock() = Arc::downgrade(play);
        }
        inner.captures.push(Arc::downgrade(st));
        matched
    }

    /// Registers a playback endpoint, symmetric to [`register_capture`].
    ///
    /// [`register_capture`]: PairRegistry::register_capture
    pub(crate) fn register_playback(
        &self,
        st: &Arc<PlaybackShared>,
    ) -> Option<Arc<CaptureShared>> {
        let mut inner = self.inner.lock();
        inner.captures.retain(|w| w.strong_count() > 0);

        let mut matched = None;
        for cand in inner.captures.iter().filter_map(Weak::upgrade) {
            if cand.key != st.key {
                continue;
            }
            if cand.peer.lock().strong_count() > 0 {
                tracing::warn!(
                    key = %st.key,
                    device = %cand.device,
                    "correlation key already consumed, leaving new playback unpaired"
                );
                continue;
            }
            matched = Some(cand);
            break;
        }

        if let Some(cap) = &matched {
            *cap.peer.lock() = Arc::downgrade(st);
            *st.peer.lock() = Arc::downgrade(cap);
        }
        inner.playbacks.push(Arc::downgrade(st));
        matched
    }

    /// Removes a capture endpoint and clears both sides of its pairing.
    ///
    /// This is the single path through which peer back-references are
    /// cleared, so neither kind can observe a dangling peer afterwards.
    pub(crate) fn unregister_capture(&self, st: &Arc<CaptureShared>) {
        let target = Arc::downgrade(st);
        let mut inner = self.inner.lock();
        inner
            .captures
            .retain(|w| w.strong_count() > 0 && !w.ptr_eq(&target));

        if let Some(play) = st.peer.lock().upgrade() {
            *play.peer.lock() = Weak::new();
        }
        *st.peer.lock() = Weak::new();
    }

    /// Removes a playback endpoint and clears both sides of its pairing.
    pub(crate) fn unregister_playback(&self, st: &Arc<PlaybackShared>) {
        let target = Arc::downgrade(st);
        let mut inner = self.inner.lock();
        inner
            .playbacks
            .retain(|w| w.strong_count() > 0 && !w.ptr_eq(&target));

        if let Some(cap) = st.peer.lock().upgrade() {
            *cap.peer.lock() = Weak::new();
        }
        *st.peer.lock() = Weak::new();
    }

    /// Snapshot of the live playback endpoints, in insertion order.
    ///
    /// Taken under the lock and returned by value so callers never invoke
    /// engine or handler code while the registry is locked.
    pub(crate) fn playbacks(&self) -> Vec<Arc<PlaybackShared>> {
        self.inner
            .lock()
            .playbacks
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn capture_count(&self) -> usize {
        self.inner
            .lock()
            .captures
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    #[cfg(test)]
    pub(crate) fn playback_count(&self) -> usize {
        self.inner
            .lock()
            .playbacks
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{PairKey, StreamParams};
    use crate::frame::{read_handler, write_handler};

    fn capture(key: u64, device: &str) -> Arc<CaptureShared> {
        Arc::new(CaptureShared::new(
            StreamParams::new(48_000, 2),
            device.to_string(),
            PairKey::new(key),
            read_handler(|_| {}),
        ))
    }

    fn playback(key: u64, device: &str) -> Arc<PlaybackShared> {
        Arc::new(PlaybackShared::new(
            StreamParams::new(48_000, 2),
            device.to_string(),
            PairKey::new(key),
            write_handler(|_| {}),
            vec![0i16; 1920],
            20_000,
        ))
    }

    #[test]
    fn test_pairing_playback_first() {
        let registry = PairRegistry::new();
        let play = playback(42, "spk");
        assert!(registry.register_playback(&play).is_none());

        let cap = capture(42, "mic");
        let matched = registry.register_capture(&cap).unwrap();
        assert!(Arc::ptr_eq(&matched, &play));
        assert!(cap.peer_playback().is_some());
        assert!(play.peer_capture().is_some());
    }

    #[test]
    fn test_pairing_capture_first() {
        let registry = PairRegistry::new();
        let cap = capture(42, "mic");
        assert!(registry.register_capture(&cap).is_none());

        let play = playback(42, "spk");
        let matched = registry.register_playback(&play).unwrap();
        assert!(Arc::ptr_eq(&matched, &cap));
        assert!(play.peer_capture().is_some());
    }

    #[test]
    fn test_mismatched_keys_do_not_pair() {
        let registry = PairRegistry::new();
        let play = playback(1, "spk");
        assert!(registry.register_playback(&play).is_none());

        let cap = capture(2, "mic");
        assert!(registry.register_capture(&cap).is_none());
        assert!(cap.peer_playback().is_none());
    }

    #[test]
    fn test_consumed_key_leaves_latecomer_unpaired() {
        let registry = PairRegistry::new();
        let play = playback(5, "spk");
        let cap = capture(5, "mic");
        assert!(registry.register_playback(&play).is_none());
        assert!(registry.register_capture(&cap).is_some());

        let late = capture(5, "mic2");
        assert!(registry.register_capture(&late).is_none());
        assert!(late.peer_playback().is_none());
        // the established pair is untouched
        assert!(Arc::ptr_eq(&cap.peer_playback().unwrap(), &play));
    }

    #[test]
    fn test_first_match_in_insertion_order() {
        let registry = PairRegistry::new();
        let first = playback(9, "spk1");
        let second = playback(9, "spk2");
        assert!(registry.register_playback(&first).is_none());
        assert!(registry.register_playback(&second).is_none());

        let cap = capture(9, "mic");
        let matched = registry.register_capture(&cap).unwrap();
        assert!(Arc::ptr_eq(&matched, &first));
    }

    #[test]
    fn test_unregister_clears_both_sides() {
        let registry = PairRegistry::new();
        let play = playback(3, "spk");
        let cap = capture(3, "mic");
        assert!(registry.register_playback(&play).is_none());
        assert!(registry.register_capture(&cap).is_some());

        registry.unregister_capture(&cap);
        assert!(play.peer_capture().is_none());
        assert!(cap.peer_playback().is_none());
        assert_eq!(registry.capture_count(), 0);
        assert_eq!(registry.playback_count(), 1);
    }

    #[test]
    fn test_dropped_endpoints_vanish_from_snapshots() {
        let registry = PairRegistry::new();
        let play = playback(1, "spk");
        assert!(registry.register_playback(&play).is_none());
        assert_eq!(registry.playbacks().len(), 1);

        drop(play);
        assert!(registry.playbacks().is_empty());
    }
}
