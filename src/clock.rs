use std::sync::{Arc, Mutex};

/// Trait for monotonic clock implementations used by the pacer.
///
/// Implementations report time in fractional seconds since an arbitrary
/// origin. The value must never decrease; the pacer captures a reading at
/// construction and derives elapsed time from later readings.
pub trait Clock {
    /// Returns the current time in seconds since the clock's origin.
    fn now(&self) -> f64;
}

/// Standard clock backed by [`std::time::Instant`].
///
/// The origin is captured when the clock is created, so a freshly built
/// clock reads close to zero.
///
/// # Examples
///
/// ```rust
/// use drossel::{Pacer, StdClock, Throttle};
///
/// let pacer = Pacer::with_clock(Throttle::kib_per_sec(64), StdClock::default());
/// assert_eq!(pacer.consumed(), 0);
/// ```
#[derive(Clone)]
pub struct StdClock {
    origin: std::time::Instant,
}

impl Default for StdClock {
    fn default() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

impl Clock for StdClock {
    fn now(&self) -> f64 {
        std::time::Instant::now()
            .duration_since(self.origin)
            .as_secs_f64()
    }
}

/// Clock backed by [`tokio::time::Instant`].
///
/// This is the clock the async reader uses by default: under
/// `tokio::test(start_paused = true)` it follows the runtime's virtual
/// time, which keeps timing tests deterministic.
#[cfg(feature = "async")]
#[derive(Clone)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

#[cfg(feature = "async")]
impl Default for TokioClock {
    fn default() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

#[cfg(feature = "async")]
impl Clock for TokioClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// High-precision clock backed by the `quanta` crate.
///
/// Requires the "quanta" feature.
#[cfg(feature = "quanta")]
#[derive(Clone)]
pub struct QuantaClock {
    origin: quanta::Instant,
}

#[cfg(feature = "quanta")]
impl Default for QuantaClock {
    fn default() -> Self {
        Self::new(quanta::Clock::new())
    }
}

#[cfg(feature = "quanta")]
impl QuantaClock {
    /// Creates a `QuantaClock` from a `quanta::Clock` instance.
    pub fn new(clock: quanta::Clock) -> Self {
        let origin = clock.now();
        Self { origin }
    }
}

#[cfg(feature = "quanta")]
impl Clock for QuantaClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Coarse but very cheap clock using quanta's recent-time snapshot.
///
/// Reads cost a single atomic load, at the price of precision bounded by
/// the quanta upkeep interval. The upkeep thread must be running,
/// otherwise the pacer never observes time moving and throttled reads
/// stall on their own deficit.
#[cfg(feature = "quanta")]
#[derive(Clone)]
pub struct FastClock {
    clock: quanta::Clock,
    origin: quanta::Instant,
}

#[cfg(feature = "quanta")]
impl Default for FastClock {
    fn default() -> Self {
        Self::new(quanta::Clock::new())
    }
}

#[cfg(feature = "quanta")]
impl FastClock {
    /// Creates a `FastClock` from a `quanta::Clock` instance.
    pub fn new(clock: quanta::Clock) -> Self {
        let origin = clock.recent();
        Self { clock, origin }
    }
}

#[cfg(feature = "quanta")]
impl Clock for FastClock {
    fn now(&self) -> f64 {
        (self.clock.recent() - self.origin).as_secs_f64()
    }
}

/// Manual clock for tests and simulation.
///
/// Time only moves when told to, which makes the pacing arithmetic fully
/// deterministic.
///
/// # Examples
///
/// ```rust
/// use drossel::{ManualClock, Pacer, Throttle};
///
/// let clock = ManualClock::new(0.0);
/// let pacer = Pacer::with_clock(Throttle::kib_per_sec(1), &clock);
///
/// clock.advance(1.0);
/// // one second in, a full second of allowance is available
/// assert_eq!(pacer.plan(4096).len(), 1024);
/// ```
pub struct ManualClock {
    pub now: Mutex<f64>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl ManualClock {
    /// Creates a manual clock starting at the given time in seconds.
    pub fn new(now: f64) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Sets the current time in seconds.
    pub fn set(&self, now: f64) {
        let mut guard = self.now.lock().unwrap();
        *guard = now;
    }

    /// Advances the current time by `delta` seconds.
    pub fn advance(&self, delta: f64) {
        let mut guard = self.now.lock().unwrap();
        *guard += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        let guard = self.now.lock().unwrap();
        *guard
    }
}

impl Clock for &ManualClock {
    fn now(&self) -> f64 {
        let guard = self.now.lock().unwrap();
        *guard
    }
}

impl Clock for Arc<ManualClock> {
    fn now(&self) -> f64 {
        let guard = self.now.lock().unwrap();
        *guard
    }
}
