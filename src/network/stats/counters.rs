use crate::network::hooks::Verdict;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

const ACCEPTED_SHIFT: u32 = 32;
const DROPPED_MASK: u64 = 0xFFFF_FFFF;

/// A consistent point-in-time view of both counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Packets that received an accept verdict
    pub accepted: u32,
    /// Packets that received a drop verdict
    pub dropped: u32,
}

impl StatsSnapshot {
    fn from_word(word: u64) -> Self {
        Self {
            accepted: (word >> ACCEPTED_SHIFT) as u32,
            dropped: (word & DROPPED_MASK) as u32,
        }
    }

    fn to_word(self) -> u64 {
        (u64::from(self.accepted) << ACCEPTED_SHIFT) | u64::from(self.dropped)
    }

    /// Total packets seen by any hook point.
    pub fn total(&self) -> u64 {
        u64::from(self.accepted) + u64::from(self.dropped)
    }
}

/// Accepted and dropped packet counters.
///
/// Both 32-bit counters live in one `AtomicU64` so that a reset or a read
/// always covers the pair as a unit. Increments never block: they retry a
/// compare-and-swap, which is safe from packet-processing contexts that must
/// not sleep. Each half wraps on its own without carrying into the other.
#[derive(Debug, Default)]
pub struct StatsCounters {
    packed: AtomicU64,
}

impl StatsCounters {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one packet under the counter matching `verdict`.
    pub fn record(&self, verdict: Verdict) {
        // The closure always returns Some, so the update cannot fail.
        let _ = self
            .packed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |word| {
                let mut stats = StatsSnapshot::from_word(word);
                match verdict {
                    Verdict::Accept => stats.accepted = stats.accepted.wrapping_add(1),
                    Verdict::Drop => stats.dropped = stats.dropped.wrapping_add(1),
                }
                Some(stats.to_word())
            });
    }

    /// Zeroes both counters in a single store.
    pub fn reset(&self) {
        self.packed.store(0, Ordering::SeqCst);
    }

    /// Reads both counters in a single load.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot::from_word(self.packed.load(Ordering::SeqCst))
    }

    pub fn accepted(&self) -> u32 {
        self.snapshot().accepted
    }

    pub fn dropped(&self) -> u32 {
        self.snapshot().dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_counters_are_zero() {
        let stats = StatsCounters::new();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
        assert_eq!(stats.snapshot().total(), 0);
    }

    #[test]
    fn test_record_updates_matching_counter() {
        let stats = StatsCounters::new();
        stats.record(Verdict::Accept);
        stats.record(Verdict::Accept);
        stats.record(Verdict::Drop);

        assert_eq!(stats.accepted(), 2);
        assert_eq!(stats.dropped(), 1);
    }

    #[test]
    fn test_reset_zeroes_both() {
        let stats = StatsCounters::new();
        stats.record(Verdict::Accept);
        stats.record(Verdict::Drop);

        stats.reset();
        assert_eq!(stats.snapshot(), StatsSnapshot { accepted: 0, dropped: 0 });
    }

    #[test]
    fn test_dropped_wraps_without_touching_accepted() {
        let stats = StatsCounters {
            packed: AtomicU64::new(
                StatsSnapshot {
                    accepted: 7,
                    dropped: u32::MAX,
                }
                .to_word(),
            ),
        };
        stats.record(Verdict::Drop);

        assert_eq!(stats.snapshot(), StatsSnapshot { accepted: 7, dropped: 0 });
    }

    #[test]
    fn test_accepted_wraps_without_touching_dropped() {
        let stats = StatsCounters {
            packed: AtomicU64::new(
                StatsSnapshot {
                    accepted: u32::MAX,
                    dropped: 3,
                }
                .to_word(),
            ),
        };
        stats.record(Verdict::Accept);

        assert_eq!(stats.snapshot(), StatsSnapshot { accepted: 0, dropped: 3 });
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let stats = Arc::new(StatsCounters::new());
        let threads = 8;
        let per_thread = 10_000;

        let handles: Vec<_> = (0..threads)
            .map(|i| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    let verdict = if i % 2 == 0 { Verdict::Accept } else { Verdict::Drop };
                    for _ in 0..per_thread {
                        stats.record(verdict);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(stats.accepted(), (threads / 2 * per_thread) as u32);
        assert_eq!(stats.dropped(), (threads / 2 * per_thread) as u32);
    }

    #[test]
    fn test_reset_is_never_torn() {
        let stats = Arc::new(StatsCounters::new());
        let writer = {
            let stats = Arc::clone(&stats);
            thread::spawn(move || {
                for _ in 0..5_000 {
                    stats.record(Verdict::Accept);
                    stats.record(Verdict::Drop);
                    stats.reset();
                }
            })
        };

        // Accept is always recorded before Drop, and reset clears both, so a
        // consistent view never shows more drops than accepts.
        for _ in 0..20_000 {
            let snapshot = stats.snapshot();
            assert!(snapshot.dropped <= snapshot.accepted, "torn view: {:?}", snapshot);
        }
        writer.join().unwrap();
    }
}
