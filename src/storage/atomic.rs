use std::sync::atomic::{AtomicU64, Ordering};

use super::CountStorage;

/// Atomic implementation of [`CountStorage`].
///
/// This is the default policy: reads may land on the same pacer from
/// multiple threads, and the counter update is the only synchronization
/// point the design requires.
#[derive(Debug, Default)]
pub struct AtomicStorage(AtomicU64);

impl CountStorage for AtomicStorage {
    fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    fn load(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    fn add(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrent_adds_are_not_lost() {
        let counter = AtomicStorage::new();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..10_000 {
                        counter.add(3);
                    }
                });
            }
        });
        assert_eq!(counter.load(), 4 * 10_000 * 3);
    }
}
