use std::time::Duration;

use crate::clock::Clock;
use crate::storage::CountStorage;
use crate::storage::atomic::AtomicStorage;
use crate::{StdClock, Throttle};

/// After a wait the next grant is capped to this many bytes, so the
/// pacing decision is re-checked frequently instead of releasing another
/// large burst before the following checkpoint.
const REPLENISH_CHUNK: usize = 8 * 1024;

/// The rate-accounting core: decides, per read call, how many bytes may
/// be released right away and how long the caller must wait first.
///
/// A pacer tracks cumulative bytes released against wall-clock time since
/// its construction. The elapsed time multiplied by the throttle rate
/// defines the running *allowance*; the difference between allowance and
/// the bytes already consumed (the *deficit*) drives every decision:
///
/// - `deficit >= want`: the caller is behind schedule, release `want`.
/// - `0 < deficit < want`: release only the deficit.
/// - `deficit <= 0`: the caller is ahead of schedule; wait
///   `-deficit / rate` seconds (whole milliseconds), then release a small
///   fixed chunk.
///
/// The decision is taken on a snapshot and is deliberately not serialized
/// across concurrent callers; only the counter update is synchronized.
/// Concurrent readers sharing a pacer can therefore burst above the
/// nominal ceiling momentarily, but the long-run rate still converges.
///
/// # Type Parameters
///
/// - `S`: counter storage policy (default: [`AtomicStorage`])
/// - `C`: clock implementation (default: [`StdClock`])
///
/// # Examples
///
/// ```rust
/// use drossel::{ManualClock, Pacer, Throttle};
///
/// let clock = ManualClock::new(0.0);
/// let pacer = Pacer::with_clock(Throttle::kib_per_sec(10), &clock);
///
/// // nothing consumed yet at time zero: no wait, one small chunk
/// let grant = pacer.plan(50_000);
/// assert!(grant.wait().is_none());
/// assert_eq!(grant.len(), 8192);
///
/// // ahead of schedule: the next caller owes 800ms
/// pacer.record(16_384);
/// clock.advance(0.8);
/// let grant = pacer.plan(50_000);
/// assert_eq!(grant.wait(), Some(std::time::Duration::from_millis(800)));
/// assert_eq!(grant.len(), 8192);
/// ```
#[derive(Debug)]
pub struct Pacer<S = AtomicStorage, C = StdClock> {
    consumed: S,
    start: f64,
    clock: C,
    throttle: Throttle,
}

/// Outcome of a single pacing decision: an optional wait to honor before
/// touching the underlying source, and the byte count that may be
/// requested from it afterwards. `len() <= want` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    wait: Option<Duration>,
    len: usize,
}

impl Grant {
    /// How long the caller must suspend before issuing the read.
    pub fn wait(&self) -> Option<Duration> {
        self.wait
    }

    /// Number of bytes that may be requested from the source this call.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no bytes may be requested this call.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Pacer<AtomicStorage, StdClock> {
    /// Creates a pacer with thread-safe counting and the standard clock.
    ///
    /// The elapsed-time origin is captured here, not at the first read.
    pub fn new(throttle: Throttle) -> Self {
        Pacer::with_clock(throttle, StdClock::default())
    }
}

impl<C: Clock> Pacer<AtomicStorage, C> {
    /// Creates a pacer with a custom clock and the default atomic counter.
    pub fn with_clock(throttle: Throttle, clock: C) -> Self {
        Pacer::from_parts(throttle, clock)
    }
}

impl<S: CountStorage, C: Clock> Pacer<S, C> {
    /// Creates a pacer from custom storage and clock policies.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use drossel::{LocalStorage, ManualClock, Pacer, Throttle};
    ///
    /// let clock = ManualClock::new(0.0);
    /// let pacer = Pacer::<LocalStorage, _>::from_parts(Throttle::kib_per_sec(8), &clock);
    /// ```
    pub fn from_parts(throttle: Throttle, clock: C) -> Self {
        let start = clock.now();
        Self {
            consumed: S::new(),
            start,
            clock,
            throttle,
        }
    }

    /// Computes the pacing decision for a read of up to `want` bytes.
    ///
    /// This does not suspend and does not mutate the counter; the caller
    /// honors [`Grant::wait`], issues the underlying read for at most
    /// [`Grant::len`] bytes, then reports the actual count via
    /// [`record`](Self::record).
    pub fn plan(&self, want: usize) -> Grant {
        if self.throttle.is_unlimited() {
            return Grant {
                wait: None,
                len: want,
            };
        }

        let rate = self.throttle.bytes_per_sec();
        let elapsed_ms = ((self.clock.now() - self.start) * 1000.0) as u64;
        let allowance = (elapsed_ms as f64 * (rate as f64 / 1000.0)) as i64;
        let deficit = allowance - self.consumed.load() as i64;

        let wait = if deficit <= 0 {
            let wait_secs = (-deficit) as f64 / rate as f64;
            let wait_ms = (wait_secs * 1000.0) as u64;
            (wait_ms > 0).then(|| Duration::from_millis(wait_ms))
        } else {
            None
        };

        let len = if deficit >= want as i64 {
            want
        } else if deficit > 0 {
            deficit as usize
        } else {
            REPLENISH_CHUNK.min(want)
        };

        Grant { wait, len }
    }

    /// Records `n` bytes actually obtained from the underlying source.
    pub fn record(&self, n: usize) {
        self.consumed.add(n as u64);
    }

    /// Total bytes released to callers since construction.
    pub fn consumed(&self) -> u64 {
        self.consumed.load()
    }

    /// The throttle this pacer enforces.
    pub fn throttle(&self) -> Throttle {
        self.throttle
    }
}
