//! Shared animation clock for the decorative visualization.
//!
//! Reference counted: the first subscriber starts the clock, dropping the
//! last [`Subscription`] stops it and resets the phase. Frames are pushed
//! in with [`AnimationClock::tick`] by whatever drives rendering.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

/// Phase advance per elapsed millisecond.
pub const PHASE_PER_MS: f64 = 0.0015;

type Callback = Box<dyn FnMut(f64) + Send>;

#[derive(Default)]
struct ClockInner {
    subscribers: BTreeMap<u64, Callback>,
    next_id: u64,
    phase: f64,
    last_time: Option<f64>,
}

impl ClockInner {
    fn stop(&mut self) {
        self.last_time = None;
        self.phase = 0.0;
    }
}

/// Cloneable handle to one shared clock.
#[derive(Clone, Default)]
pub struct AnimationClock {
    inner: Arc<Mutex<ClockInner>>,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a frame callback. It receives the phase after every tick.
    ///
    /// Callbacks run with the clock locked and must not call back into it.
    pub fn subscribe(&self, callback: impl FnMut(f64) + Send + 'static) -> Subscription {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.insert(id, Box::new(callback));
        if inner.subscribers.len() == 1 {
            tracing::debug!(target: "player::clock", "Animation clock started");
        }
        Subscription {
            id,
            clock: Arc::downgrade(&self.inner),
        }
    }

    pub fn is_running(&self) -> bool {
        !self.inner.lock().subscribers.is_empty()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    pub fn phase(&self) -> f64 {
        self.inner.lock().phase
    }

    /// Advance to a frame timestamp (milliseconds) and notify subscribers.
    ///
    /// Ignored while stopped. The first frame after a start only records
    /// the timestamp.
    pub fn tick(&self, timestamp_ms: f64) {
        let mut inner = self.inner.lock();
        if inner.subscribers.is_empty() {
            return;
        }
        if let Some(last) = inner.last_time {
            inner.phase += (timestamp_ms - last).max(0.0) * PHASE_PER_MS;
        }
        inner.last_time = Some(timestamp_ms);

        let phase = inner.phase;
        for callback in inner.subscribers.values_mut() {
            callback(phase);
        }
    }
}

/// Keeps a clock subscription alive; dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    clock: Weak<Mutex<ClockInner>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(clock) = self.clock.upgrade() else {
            return;
        };
        let mut inner = clock.lock();
        inner.subscribers.remove(&self.id);
        if inner.subscribers.is_empty() {
            inner.stop();
            tracing::debug!(target: "player::clock", "Animation clock stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_starts_and_stops_with_subscribers() {
        let clock = AnimationClock::new();
        assert!(!clock.is_running());

        let first = clock.subscribe(|_| {});
        let second = clock.subscribe(|_| {});
        assert!(clock.is_running());
        assert_eq!(clock.subscriber_count(), 2);

        drop(first);
        assert!(clock.is_running());
        drop(second);
        assert!(!clock.is_running());
    }

    #[test]
    fn test_phase_advances_and_resets() {
        let clock = AnimationClock::new();
        let sub = clock.subscribe(|_| {});

        clock.tick(1000.0);
        assert_eq!(clock.phase(), 0.0);
        clock.tick(2000.0);
        assert!((clock.phase() - 1.5).abs() < 1e-9);

        drop(sub);
        assert_eq!(clock.phase(), 0.0);

        // Restart: first frame does not jump by the gap
        let _sub = clock.subscribe(|_| {});
        clock.tick(10_000.0);
        assert_eq!(clock.phase(), 0.0);
    }

    #[test]
    fn test_ticks_ignored_while_stopped() {
        let clock = AnimationClock::new();
        clock.tick(0.0);
        clock.tick(5000.0);
        assert_eq!(clock.phase(), 0.0);
    }

    #[test]
    fn test_callbacks_receive_phase() {
        let clock = AnimationClock::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let _sub = clock.subscribe(move |phase| {
            assert!(phase >= 0.0);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        clock.tick(0.0);
        clock.tick(16.0);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_subscription_outliving_clock() {
        let clock = AnimationClock::new();
        let sub = clock.subscribe(|_| {});
        drop(clock);
        drop(sub);
    }
}
