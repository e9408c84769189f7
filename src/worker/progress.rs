//! Shared attempt counter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use log::info;

use super::reporter::format_count;

/// Process-wide count of tried keys.
///
/// Workers add to it in batches. Reads are lock-free and may be stale.
#[derive(Debug)]
pub struct ProgressCounter {
    /// Total keys tried
    count: AtomicU64,
    /// Log a progress line every time the total crosses a multiple of this
    report_every: u64,
    /// Start of the search
    start_time: Instant,
}

impl ProgressCounter {
    /// Creates a counter. A `report_every` of 0 disables progress lines.
    pub fn new(report_every: u64) -> Self {
        Self {
            count: AtomicU64::new(0),
            report_every,
            start_time: Instant::now(),
        }
    }

    /// Adds `n` attempts.
    ///
    /// The caller whose addition crosses a reporting threshold logs the
    /// progress line, so each threshold is logged once. An addition that
    /// spans several thresholds logs a single line. Returns the new total
    /// when a line was logged.
    pub fn increment(&self, n: u64) -> Option<u64> {
        let previous = self.count.fetch_add(n, Ordering::Relaxed);
        let total = previous + n;

        if self.report_every == 0 || previous / self.report_every == total / self.report_every {
            return None;
        }

        info!(
            "Tried {} npubs so far ({:.1}s)",
            format_count(total),
            self.elapsed().as_secs_f64()
        );
        Some(total)
    }

    /// Returns the current total.
    #[inline]
    pub fn current(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Returns the time since the counter was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the average rate (keys per second).
    pub fn keys_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.current() as f64 / elapsed
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_increment() {
        let counter = ProgressCounter::new(0);
        assert_eq!(counter.increment(10_000), None);
        assert_eq!(counter.increment(5), None);
        assert_eq!(counter.current(), 10_005);
    }

    #[test]
    fn test_threshold_crossings() {
        let counter = ProgressCounter::new(1_000_000);
        assert_eq!(counter.increment(999_999), None);
        assert_eq!(counter.increment(1), Some(1_000_000));
        assert_eq!(counter.increment(1), None);

        // one line even when a single add spans two thresholds
        assert_eq!(counter.increment(2_499_999), Some(3_500_000));
        assert_eq!(counter.increment(400_000), None);
        assert_eq!(counter.increment(100_000), Some(4_000_000));
    }

    #[test]
    fn test_concurrent_increments() {
        let counter = Arc::new(ProgressCounter::new(1_000_000));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = counter.clone();
                thread::spawn(move || {
                    (0..250)
                        .filter(|_| counter.increment(10_000).is_some())
                        .count()
                })
            })
            .collect();
        let lines: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(counter.current(), 20_000_000);
        assert_eq!(lines, 20);
    }
}
