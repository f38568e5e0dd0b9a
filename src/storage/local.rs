use std::cell::Cell;

use super::CountStorage;

/// Non-atomic implementation of [`CountStorage`]. Intended for
/// single-threaded readers that own their pacer; uses [`Cell`] internally.
#[derive(Debug, Default)]
pub struct LocalStorage(Cell<u64>);

impl CountStorage for LocalStorage {
    fn new() -> Self {
        Self(Cell::new(0))
    }

    fn load(&self) -> u64 {
        self.0.get()
    }

    fn add(&self, n: u64) {
        self.0.set(self.0.get() + n);
    }
}
