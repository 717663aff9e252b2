//! Mock mixer engine for testing without hardware or a DSP backend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::HeapRb;

use super::{MixerEngine, MixerSource, TickHandler};
use crate::config::BridgeConfig;
use crate::error::EngineError;

/// Ticks of contribution backlog each source can buffer before new audio is
/// dropped.
const CONTRIBUTION_BACKLOG_TICKS: usize = 8;

/// An in-process [`MixerEngine`] that mixes submitted contributions.
///
/// Sources hold rolling contribution ring buffers and start enabled. Tests
/// drive ticks explicitly:
///
/// - [`tick_with`](MockEngine::tick_with) delivers a caller-supplied mix to
///   every enabled source, for deterministic dispatch tests.
/// - [`mix_tick`](MockEngine::mix_tick) pops one tick of each enabled
///   source's buffered contribution and delivers each source the saturating
///   sum of everyone else's, closing the real N-1 loop.
///
/// Cloning is cheap and clones share the same engine state, so a test can
/// keep a handle for driving ticks after moving one into the bridge.
///
/// # Example
///
/// ```
/// use bridge_audio::engine::{MixerEngine, MixerSource, MockEngine};
/// use bridge_audio::BridgeConfig;
///
/// let engine = MockEngine::new(&BridgeConfig::default());
/// let source = engine.alloc_source(Box::new(|_mixed| {})).unwrap();
/// source.submit(&[1, 2, 3]);
/// assert_eq!(engine.source_count(), 1);
/// ```
#[derive(Clone)]
pub struct MockEngine {
    inner: Arc<MockInner>,
}

struct MockInner {
    samples_per_tick: usize,
    limit: Option<usize>,
    next_id: AtomicU64,
    sources: Mutex<Vec<Slot>>,
}

struct Slot {
    id: u64,
    enabled: bool,
    on_mix: Arc<Mutex<TickHandler>>,
    tx: ringbuf::HeapProd<i16>,
    rx: ringbuf::HeapCons<i16>,
}

impl MockEngine {
    /// Creates a mock engine sized from the given mix configuration.
    #[must_use]
    pub fn new(config: &BridgeConfig) -> Self {
        Self::build(config, None)
    }

    /// Creates a mock engine that refuses to host more than `limit`
    /// sources, for exercising allocation-failure rollback.
    #[must_use]
    pub fn with_source_limit(config: &BridgeConfig, limit: usize) -> Self {
        Self::build(config, Some(limit))
    }

    fn build(config: &BridgeConfig, limit: Option<usize>) -> Self {
        Self {
            inner: Arc::new(MockInner {
                samples_per_tick: config.samples_per_tick(),
                limit,
                next_id: AtomicU64::new(0),
                sources: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Returns the number of live sources.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.inner.sources.lock().len()
    }

    /// Returns the number of sources currently participating in the mix.
    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.inner.sources.lock().iter().filter(|s| s.enabled).count()
    }

    /// Delivers `mixed` to every enabled source's tick callback.
    ///
    /// Buffered contributions are left untouched; use this when a test
    /// wants full control over what each tick carries.
    pub fn tick_with(&self, mixed: &[i16]) {
        let handlers: Vec<_> = self
            .inner
            .sources
            .lock()
            .iter()
            .filter(|s| s.enabled)
            .map(|s| s.on_mix.clone())
            .collect();

        // Callbacks run without the source table locked so they can submit
        // and toggle freely.
        for handler in handlers {
            let mut on_mix = handler.lock();
            (*on_mix)(mixed);
        }
    }

    /// Runs one real N-1 mixing tick.
    ///
    /// Pops one tick of contribution from every enabled source (missing
    /// samples are silence), then delivers each source the saturating sum
    /// of all the others'.
    pub fn mix_tick(&self) {
        let samples_per_tick = self.inner.samples_per_tick;

        let mut parts: Vec<(Arc<Mutex<TickHandler>>, Vec<i16>)> = Vec::new();
        {
            let mut sources = self.inner.sources.lock();
            for slot in sources.iter_mut().filter(|s| s.enabled) {
                let mut contribution = vec![0i16; samples_per_tick];
                for sample in contribution.iter_mut() {
                    match slot.rx.try_pop() {
                        Some(s) => *sample = s,
                        None => break,
                    }
                }
                parts.push((slot.on_mix.clone(), contribution));
            }
        }

        for i in 0..parts.len() {
            let mut mixed = vec![0i16; samples_per_tick];
            for (j, (_, contribution)) in parts.iter().enumerate() {
                if i == j {
                    continue;
                }
                for (m, s) in mixed.iter_mut().zip(contribution) {
                    *m = m.saturating_add(*s);
                }
            }
            let mut on_mix = parts[i].0.lock();
            (*on_mix)(&mixed);
        }
    }
}

impl MixerEngine for MockEngine {
    fn alloc_source(&self, on_mix: TickHandler) -> Result<Box<dyn MixerSource>, EngineError> {
        let mut sources = self.inner.sources.lock();
        if let Some(limit) = self.inner.limit {
            if sources.len() >= limit {
                return Err(EngineError::SourceLimit { limit });
            }
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        let capacity = self.inner.samples_per_tick * CONTRIBUTION_BACKLOG_TICKS;
        let (tx, rx) = HeapRb::<i16>::new(capacity.max(1)).split();

        sources.push(Slot {
            id,
            enabled: true,
            on_mix: Arc::new(Mutex::new(on_mix)),
            tx,
            rx,
        });

        Ok(Box::new(MockSourceHandle {
            id,
            inner: self.inner.clone(),
        }))
    }
}

struct MockSourceHandle {
    id: u64,
    inner: Arc<MockInner>,
}

impl MixerSource for MockSourceHandle {
    fn set_enabled(&self, enabled: bool) {
        let mut sources = self.inner.sources.lock();
        if let Some(slot) = sources.iter_mut().find(|s| s.id == self.id) {
            slot.enabled = enabled;
        }
    }

    fn submit(&self, samples: &[i16]) {
        let mut sources = self.inner.sources.lock();
        if let Some(slot) = sources.iter_mut().find(|s| s.id == self.id) {
            if slot.tx.vacant_len() < samples.len() {
                tracing::warn!(
                    submitted = samples.len(),
                    vacant = slot.tx.vacant_len(),
                    "contribution backlog full, dropping excess"
                );
            }
            let _ = slot.tx.push_slice(samples);
        }
    }
}

impl Drop for MockSourceHandle {
    fn drop(&mut self) {
        self.inner.sources.lock().retain(|s| s.id != self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn engine() -> MockEngine {
        MockEngine::new(&BridgeConfig::default())
    }

    #[test]
    fn test_alloc_and_release() {
        let engine = engine();
        let source = engine.alloc_source(Box::new(|_| {})).unwrap();
        assert_eq!(engine.source_count(), 1);

        drop(source);
        assert_eq!(engine.source_count(), 0);
    }

    #[test]
    fn test_source_limit() {
        let engine = MockEngine::with_source_limit(&BridgeConfig::default(), 1);
        let _first = engine.alloc_source(Box::new(|_| {})).unwrap();

        let second = engine.alloc_source(Box::new(|_| {}));
        assert!(matches!(second, Err(EngineError::SourceLimit { limit: 1 })));
    }

    #[test]
    fn test_tick_with_skips_disabled() {
        let engine = engine();
        let ticks = Arc::new(AtomicUsize::new(0));

        let ticks_clone = ticks.clone();
        let source = engine
            .alloc_source(Box::new(move |_| {
                ticks_clone.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        engine.tick_with(&[0; 4]);
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        source.set_enabled(false);
        engine.tick_with(&[0; 4]);
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        source.set_enabled(true);
        engine.tick_with(&[0; 4]);
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_mix_tick_is_n_minus_one() {
        let engine = engine();
        let samples_per_tick = BridgeConfig::default().samples_per_tick();

        let heard_a = Arc::new(Mutex::new(Vec::new()));
        let heard_a_clone = heard_a.clone();
        let a = engine
            .alloc_source(Box::new(move |mixed| {
                *heard_a_clone.lock() = mixed.to_vec();
            }))
            .unwrap();

        let heard_b = Arc::new(Mutex::new(Vec::new()));
        let heard_b_clone = heard_b.clone();
        let b = engine
            .alloc_source(Box::new(move |mixed| {
                *heard_b_clone.lock() = mixed.to_vec();
            }))
            .unwrap();

        a.submit(&vec![100i16; samples_per_tick]);
        b.submit(&vec![7i16; samples_per_tick]);
        engine.mix_tick();

        // each side hears only the other
        assert_eq!(heard_a.lock().len(), samples_per_tick);
        assert!(heard_a.lock().iter().all(|&s| s == 7));
        assert!(heard_b.lock().iter().all(|&s| s == 100));
    }

    #[test]
    fn test_missing_contribution_is_silence() {
        let engine = engine();

        let heard = Arc::new(Mutex::new(Vec::new()));
        let heard_clone = heard.clone();
        let _a = engine
            .alloc_source(Box::new(move |mixed| {
                *heard_clone.lock() = mixed.to_vec();
            }))
            .unwrap();
        let _b = engine.alloc_source(Box::new(|_| {})).unwrap();

        engine.mix_tick();
        assert!(!heard.lock().is_empty());
        assert!(heard.lock().iter().all(|&s| s == 0));
    }
}
