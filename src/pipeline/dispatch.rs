//! Per-tick frame dispatch.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::endpoint::PlaybackShared;
use crate::engine::MixerSource;
use crate::frame::{AudioFrame, AudioFrameMut};

/// Dispatches one engine tick for one playback endpoint.
///
/// `mixed` is the engine's N-1 mix for this endpoint (everyone else's audio,
/// excluding this endpoint's own prior contribution). In strict order:
///
/// 1. If a peer capture exists, its read handler receives the mixed samples
///    framed with the *peer's* parameters. No peer means skip, not error.
/// 2. The endpoint's write handler fills the endpoint's own buffer, framed
///    with the endpoint's parameters and the same timestamp.
/// 3. The buffer is submitted to the engine as the contribution for the
///    following tick.
/// 4. The timestamp advances by one tick in microseconds.
///
/// Runs synchronously on the thread that delivered the tick; at most two
/// handler invocations, always read-then-write. No allocation, no blocking.
pub(crate) fn mix_tick(st: &Arc<PlaybackShared>, mixed: &[i16]) {
    let ts = st.ts.load(Ordering::SeqCst);

    // Snapshot the peer once so a concurrent unpair cannot split the tick.
    if let Some(peer) = st.peer_capture() {
        let frame = AudioFrame {
            format: peer.prm.format,
            samples: mixed,
            sample_rate: peer.prm.sample_rate,
            channels: peer.prm.channels,
            timestamp: ts,
        };
        (peer.rh)(&frame);
    }

    {
        let mut sampv = st.sampv.lock();
        let count = mixed.len().min(sampv.len());
        if count < mixed.len() {
            tracing::warn!(
                device = %st.device,
                delivered = mixed.len(),
                capacity = sampv.len(),
                "tick larger than endpoint buffer, clamping"
            );
        }

        let mut frame = AudioFrameMut {
            format: st.prm.format,
            samples: &mut sampv[..count],
            sample_rate: st.prm.sample_rate,
            channels: st.prm.channels,
            timestamp: ts,
        };
        (st.wh)(&mut frame);

        if let Some(src) = st.mixer.lock().as_ref() {
            src.submit(&sampv[..count]);
        }
    }

    st.ts.fetch_add(st.tick_micros, Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{CaptureShared, PairKey, StreamParams};
    use crate::frame::{read_handler, write_handler};
    use parking_lot::Mutex;

    fn playback_with(wh: crate::frame::WriteHandler) -> Arc<PlaybackShared> {
        Arc::new(PlaybackShared::new(
            StreamParams::new(48_000, 2),
            "spk".to_string(),
            PairKey::new(1),
            wh,
            vec![0i16; 1920],
            20_000,
        ))
    }

    #[test]
    fn test_write_handler_always_runs() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let calls_clone = calls.clone();
        let play = playback_with(write_handler(move |frame| {
            calls_clone.lock().push((frame.sample_count(), frame.timestamp));
        }));

        mix_tick(&play, &vec![0i16; 960]);
        mix_tick(&play, &vec![0i16; 960]);

        assert_eq!(*calls.lock(), vec![(960, 0), (960, 20_000)]);
    }

    #[test]
    fn test_read_then_write_order() {
        let order = Arc::new(Mutex::new(Vec::new()));

        let order_w = order.clone();
        let play = playback_with(write_handler(move |_| order_w.lock().push("write")));

        let order_r = order.clone();
        let cap = Arc::new(CaptureShared::new(
            StreamParams::new(48_000, 2),
            "mic".to_string(),
            PairKey::new(1),
            read_handler(move |_| order_r.lock().push("read")),
        ));
        *play.peer.lock() = Arc::downgrade(&cap);

        mix_tick(&play, &vec![0i16; 960]);
        assert_eq!(*order.lock(), vec!["read", "write"]);
    }

    #[test]
    fn test_read_frame_uses_peer_params() {
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = seen.clone();
        let play = playback_with(write_handler(|_| {}));

        let cap = Arc::new(CaptureShared::new(
            StreamParams::new(16_000, 1),
            "mic".to_string(),
            PairKey::new(1),
            read_handler(move |frame| {
                *seen_clone.lock() = Some((frame.sample_rate, frame.channels));
            }),
        ));
        *play.peer.lock() = Arc::downgrade(&cap);

        mix_tick(&play, &vec![0i16; 960]);
        assert_eq!(*seen.lock(), Some((16_000, 1)));
    }

    #[test]
    fn test_timestamp_advances_without_peer() {
        let play = playback_with(write_handler(|_| {}));
        assert_eq!(play.timestamp(), 0);

        mix_tick(&play, &vec![0i16; 960]);
        assert_eq!(play.timestamp(), 20_000);

        mix_tick(&play, &vec![0i16; 960]);
        assert_eq!(play.timestamp(), 40_000);
    }

    #[test]
    fn test_oversized_tick_is_clamped() {
        let counts = Arc::new(Mutex::new(Vec::new()));
        let counts_clone = counts.clone();
        let play = playback_with(write_handler(move |frame| {
            counts_clone.lock().push(frame.sample_count());
        }));

        mix_tick(&play, &vec![0i16; 4000]);
        assert_eq!(*counts.lock(), vec![1920]);
    }
}
