use likely_stable::unlikely;

/// Ceiling on the requested rate: 40 MiB/s, expressed in KiB/s because
/// that is the unit callers configure.
const MAX_KIB_PER_SEC: i64 = 40_960;

/// Configuration for the maximum sustained read rate.
///
/// A throttle is built from a rate in **KiB per second**. Requests above
/// 40 MiB/s are silently capped rather than rejected, and a rate of zero
/// (or below) disables throttling entirely.
///
/// # Examples
///
/// ```rust
/// use drossel::Throttle;
///
/// // 10 KiB/s ceiling
/// let throttle = Throttle::kib_per_sec(10);
/// assert_eq!(throttle.bytes_per_sec(), 10 * 1024);
///
/// // zero or negative disables throttling
/// assert!(Throttle::kib_per_sec(0).is_unlimited());
/// assert!(Throttle::kib_per_sec(-5).is_unlimited());
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    bytes_per_sec: u64,
}

impl std::fmt::Debug for Throttle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_unlimited() {
            write!(f, "Throttle(unlimited)")
        } else {
            write!(f, "Throttle(bytes_per_sec={})", self.bytes_per_sec)
        }
    }
}

impl Throttle {
    /// A throttle that never limits anything.
    pub const UNLIMITED: Throttle = Throttle { bytes_per_sec: 0 };

    /// Creates a throttle from a rate in KiB per second.
    ///
    /// The effective rate is `min(rate, 40_960) * 1024` bytes per second;
    /// absurdly high requests are capped at 40 MiB/s instead of failing.
    /// Zero or negative rates mean unlimited.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use drossel::Throttle;
    ///
    /// let capped = Throttle::kib_per_sec(1_000_000);
    /// assert_eq!(capped, Throttle::kib_per_sec(40_960));
    /// ```
    pub fn kib_per_sec(rate: i64) -> Self {
        if rate <= 0 {
            return Self::UNLIMITED;
        }
        let rate = if unlikely(rate > MAX_KIB_PER_SEC) {
            MAX_KIB_PER_SEC
        } else {
            rate
        };
        Self {
            bytes_per_sec: rate as u64 * 1024,
        }
    }

    /// Returns the effective rate in bytes per second. Zero means unlimited.
    pub const fn bytes_per_sec(&self) -> u64 {
        self.bytes_per_sec
    }

    /// Returns `true` if this throttle does not limit the rate.
    pub const fn is_unlimited(&self) -> bool {
        self.bytes_per_sec == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kib_conversion() {
        assert_eq!(Throttle::kib_per_sec(1).bytes_per_sec(), 1024);
        assert_eq!(Throttle::kib_per_sec(10).bytes_per_sec(), 10_240);
    }

    #[test]
    fn clamps_to_forty_mib() {
        let capped = Throttle::kib_per_sec(1_000_000);
        let ceiling = Throttle::kib_per_sec(40_960);
        assert_eq!(capped, ceiling);
        assert_eq!(capped.bytes_per_sec(), 40_960 * 1024);
    }

    #[test]
    fn zero_and_negative_are_unlimited() {
        assert!(Throttle::kib_per_sec(0).is_unlimited());
        assert!(Throttle::kib_per_sec(-1).is_unlimited());
        assert!(Throttle::UNLIMITED.is_unlimited());
        assert_eq!(Throttle::kib_per_sec(0).bytes_per_sec(), 0);
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Throttle::UNLIMITED), "Throttle(unlimited)");
        assert_eq!(
            format!("{:?}", Throttle::kib_per_sec(1)),
            "Throttle(bytes_per_sec=1024)"
        );
    }
}
