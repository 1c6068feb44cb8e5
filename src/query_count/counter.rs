use std::sync::atomic::{AtomicU64, Ordering};

use crate::{QueryCountError, Result};

/// Monotonic emission index source: yields 1, 2, 3, ... and never resets.
///
/// One counter belongs to exactly one transformed stream.
#[derive(Debug, Default)]
pub struct EmitCounter {
    n: AtomicU64,
}

impl EmitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the next index. The first call returns 1.
    pub fn increment(&self) -> u64 {
        self.n.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Number of indices handed out so far.
    pub fn current(&self) -> u64 {
        self.n.load(Ordering::SeqCst)
    }

    pub fn remove(&mut self) -> Result<()> {
        Err(QueryCountError::UnsupportedOperation("remove"))
    }

    pub fn rewind(&mut self) -> Result<()> {
        Err(QueryCountError::UnsupportedOperation("rewind"))
    }
}

impl Iterator for EmitCounter {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.increment())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::*;

    #[test]
    fn starts_at_one() {
        let counter = EmitCounter::new();

        assert_eq!(counter.current(), 0);
        assert_eq!(counter.increment(), 1);
        assert_eq!(counter.increment(), 2);
        assert_eq!(counter.current(), 2);
    }

    #[test]
    fn iterates_without_end() {
        let counter = EmitCounter::new();

        let taken: Vec<u64> = counter.take(5).collect();

        assert_eq!(taken, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn remove_and_rewind_are_rejected() {
        let mut counter = EmitCounter::new();
        counter.increment();

        assert_eq!(
            counter.remove(),
            Err(QueryCountError::UnsupportedOperation("remove"))
        );
        assert_eq!(
            counter.rewind().unwrap_err().to_string(),
            "rewind() not supported"
        );
        assert_eq!(counter.increment(), 2);
    }

    #[test]
    fn concurrent_increments_never_repeat() {
        crate::init_test_logger();

        let counter = Arc::new(EmitCounter::new());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = counter.clone();
                thread::spawn(move || (0..250).map(|_| counter.increment()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen: Vec<u64> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        seen.sort_unstable();

        log::debug!("collected {} indices", seen.len());

        assert_eq!(seen, (1..=1000).collect::<Vec<_>>());
        assert_eq!(counter.current(), 1000);
    }
}
