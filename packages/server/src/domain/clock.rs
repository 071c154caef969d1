//! Lamport logical clock.

use std::sync::atomic::{AtomicI64, Ordering};

use super::value_object::LogicalTime;

/// A Lamport clock owned by exactly one process.
///
/// Both operations are a single atomic read-modify-write, so concurrent
/// callers are serialized in some order and every caller gets a distinct,
/// strictly larger value than any value returned before it.
///
/// ```
/// use chitchat_server::domain::{LogicalClock, LogicalTime};
///
/// let clock = LogicalClock::new();
/// assert_eq!(clock.tick(), LogicalTime::new(1));
/// assert_eq!(clock.observe(LogicalTime::new(5)), LogicalTime::new(6));
/// assert_eq!(clock.observe(LogicalTime::new(2)), LogicalTime::new(7));
/// ```
#[derive(Debug, Default)]
pub struct LogicalClock {
    counter: AtomicI64,
}

impl LogicalClock {
    /// Create a clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value, without advancing the clock.
    pub fn value(&self) -> LogicalTime {
        LogicalTime::new(self.counter.load(Ordering::SeqCst))
    }

    /// Advance for a locally originated event and return the new time.
    pub fn tick(&self) -> LogicalTime {
        self.advance(|current| current.saturating_add(1))
    }

    /// Merge a received timestamp: `max(local, received) + 1`.
    pub fn observe(&self, received: LogicalTime) -> LogicalTime {
        self.advance(|current| current.max(received.value()).saturating_add(1))
    }

    fn advance(&self, next: impl Fn(i64) -> i64) -> LogicalTime {
        let previous = self
            .counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(next(current))
            })
            // the closure always returns Some
            .unwrap_or_else(|current| current);
        LogicalTime::new(next(previous))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashSet, sync::Arc, thread};

    #[test]
    fn test_new_clock_starts_at_zero() {
        let clock = LogicalClock::new();
        assert_eq!(clock.value(), LogicalTime::ZERO);
    }

    #[test]
    fn test_tick_increments_by_one() {
        let clock = LogicalClock::new();
        assert_eq!(clock.tick(), LogicalTime::new(1));
        assert_eq!(clock.tick(), LogicalTime::new(2));
        assert_eq!(clock.value(), LogicalTime::new(2));
    }

    #[test]
    fn test_observe_takes_max_plus_one() {
        // テスト項目: observe は max(local, received) + 1 を返す
        // given (前提条件):
        let clock = LogicalClock::new();
        clock.tick();
        clock.tick();

        // when (操作) / then (期待する結果): 受信値が大きい場合
        assert_eq!(clock.observe(LogicalTime::new(10)), LogicalTime::new(11));
        // 受信値が小さい場合
        assert_eq!(clock.observe(LogicalTime::new(3)), LogicalTime::new(12));
        // 受信値が等しい場合
        assert_eq!(clock.observe(LogicalTime::new(12)), LogicalTime::new(13));
    }

    #[test]
    fn test_observe_exceeds_received_and_previous() {
        // テスト項目: observe(r) は常に r より大きく、直前の値より大きい
        let clock = LogicalClock::new();
        let mut previous = LogicalTime::ZERO;
        for received in [0, 7, 2, 7, -5, 100, 99] {
            let received = LogicalTime::new(received);
            let value = clock.observe(received);
            assert!(value > received);
            assert!(value > previous);
            previous = value;
        }
    }

    #[test]
    fn test_mixed_sequence_is_strictly_increasing() {
        let clock = LogicalClock::new();
        let mut values = Vec::new();
        for i in 0..50 {
            let value = if i % 3 == 0 {
                clock.observe(LogicalTime::new(i * 2))
            } else {
                clock.tick()
            };
            values.push(value);
        }
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_observe_saturates_at_max() {
        let clock = LogicalClock::new();
        assert_eq!(
            clock.observe(LogicalTime::new(i64::MAX)),
            LogicalTime::new(i64::MAX)
        );
        assert_eq!(clock.tick(), LogicalTime::new(i64::MAX));
    }

    #[test]
    fn test_concurrent_ticks_are_unique() {
        // テスト項目: 並行に tick しても値が重複しない
        // given (前提条件):
        let clock = Arc::new(LogicalClock::new());
        let threads = 8;
        let per_thread = 500;

        // when (操作):
        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let clock = clock.clone();
                thread::spawn(move || {
                    (0..per_thread)
                        .map(|i| {
                            if (t + i) % 2 == 0 {
                                clock.tick()
                            } else {
                                clock.observe(LogicalTime::ZERO)
                            }
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        // then (期待する結果):
        let mut seen = HashSet::new();
        for handle in handles {
            let values = handle.join().unwrap();
            assert!(values.windows(2).all(|w| w[0] < w[1]));
            for value in values {
                assert!(seen.insert(value), "duplicate logical time {value}");
            }
        }
        assert_eq!(seen.len(), threads * per_thread);
        assert_eq!(clock.value(), LogicalTime::new((threads * per_thread) as i64));
    }
}
