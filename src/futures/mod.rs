mod reader;
mod timer;

pub use reader::ThrottledReader;

use tokio::io::AsyncRead;

use crate::Throttle;
use crate::clock::TokioClock;

/// Extension trait for attaching a throttle to any [`AsyncRead`].
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "async")]
/// # {
/// use drossel::Throttle;
/// use drossel::futures::ThrottledReadExt;
///
/// let source = std::io::Cursor::new(vec![0u8; 4096]);
/// let reader = source.throttled(Throttle::kib_per_sec(16));
/// # let _ = reader;
/// # }
/// ```
pub trait ThrottledReadExt: AsyncRead + Sized {
    /// Caps this reader's sustained rate to `throttle`.
    fn throttled(self, throttle: Throttle) -> ThrottledReader<Self, TokioClock>;
}

impl<R: AsyncRead> ThrottledReadExt for R {
    fn throttled(self, throttle: Throttle) -> ThrottledReader<Self, TokioClock> {
        ThrottledReader::new(self, throttle)
    }
}
