//! Sleeping between polls, behind a trait so tests can run without delays.

use std::time::Duration;

/// Blocks the calling thread between poll attempts.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Real sleeper: `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Records requested sleeps instead of blocking.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    sleeps: Vec<Duration>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `sleep` was called.
    pub fn count(&self) -> usize {
        self.sleeps.len()
    }

    /// Sum of all requested sleeps.
    pub fn total(&self) -> Duration {
        self.sleeps.iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sleeper_counts_and_sums() {
        let mut s = RecordingSleeper::new();
        s.sleep(Duration::from_millis(250));
        s.sleep(Duration::from_millis(750));
        assert_eq!(s.count(), 2);
        assert_eq!(s.total(), Duration::from_secs(1));
    }

    #[test]
    fn thread_sleeper_zero_returns() {
        ThreadSleeper.sleep(Duration::ZERO);
    }
}
