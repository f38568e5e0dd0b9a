pub mod atomic;
pub mod local;

/// Storage policy for the running byte counter used by [`Pacer`].
///
/// Implementations provide either atomic or non-atomic access to the
/// counter depending on the desired level of concurrency. The counter is
/// only ever increased; the pacer never writes it backwards.
///
/// [`Pacer`]: crate::Pacer
pub trait CountStorage {
    /// Create a new counter at zero.
    fn new() -> Self;
    /// Load the number of bytes consumed so far.
    fn load(&self) -> u64;
    /// Add `n` bytes to the counter.
    fn add(&self, n: u64);
}
