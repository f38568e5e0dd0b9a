use std::io::{Read, Seek, SeekFrom, Write};

use crate::clock::Clock;
use crate::pacer::Pacer;
use crate::storage::atomic::AtomicStorage;
use crate::{StdClock, Throttle};

/// A blocking reader that caps the sustained byte rate of its source.
///
/// Wraps any [`Read`] and enforces the configured [`Throttle`] by
/// sleeping the calling thread whenever the consumer gets ahead of its
/// allowance. For cooperative suspension inside an async runtime use
/// [`futures::ThrottledReader`](crate::futures::ThrottledReader) instead;
/// this type is the synchronous convenience wrapper around the same
/// [`Pacer`].
///
/// The wrapper is read-only from the caller's perspective: [`Seek`]
/// delegates to the source, while [`Write`] is accepted and silently
/// discarded (a read-only sink, not an error).
///
/// I/O failures from the source propagate unmodified; throttling itself
/// introduces no error conditions.
///
/// # Examples
///
/// ```rust
/// use std::io::Read;
///
/// use drossel::{Throttle, ThrottledReader};
///
/// let source = std::io::Cursor::new(vec![0u8; 1024]);
/// let mut reader = ThrottledReader::new(source, Throttle::UNLIMITED);
///
/// let mut out = Vec::new();
/// reader.read_to_end(&mut out).unwrap();
/// assert_eq!(out.len(), 1024);
/// assert_eq!(reader.consumed(), 1024);
/// ```
#[derive(Debug)]
pub struct ThrottledReader<R, C = StdClock> {
    inner: R,
    pacer: Pacer<AtomicStorage, C>,
}

impl<R> ThrottledReader<R, StdClock> {
    /// Wraps `inner`, enforcing `throttle` from this moment on.
    ///
    /// The rate accounting clock starts here, not at the first read.
    pub fn new(inner: R, throttle: Throttle) -> Self {
        Self::with_clock(inner, throttle, StdClock::default())
    }
}

impl<R, C: Clock> ThrottledReader<R, C> {
    /// Wraps `inner` with a custom clock implementation.
    pub fn with_clock(inner: R, throttle: Throttle, clock: C) -> Self {
        Self {
            inner,
            pacer: Pacer::with_clock(throttle, clock),
        }
    }

    /// The throttle this reader enforces.
    pub fn throttle(&self) -> Throttle {
        self.pacer.throttle()
    }

    /// Total bytes released to the caller since construction.
    pub fn consumed(&self) -> u64 {
        self.pacer.consumed()
    }

    /// Gets a reference to the wrapped source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Gets a mutable reference to the wrapped source.
    ///
    /// Reading from the source directly bypasses the rate accounting.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwraps the reader, returning the source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read, C: Clock> Read for ThrottledReader<R, C> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let grant = self.pacer.plan(buf.len());
        if let Some(wait) = grant.wait() {
            std::thread::sleep(wait);
        }
        let n = self.inner.read(&mut buf[..grant.len()])?;
        self.pacer.record(n);
        Ok(n)
    }
}

impl<R: Seek, C: Clock> Seek for ThrottledReader<R, C> {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.inner.seek(pos)
    }
}

/// Read-only sink semantics: writes are accepted and dropped without
/// error, and flushing is a no-op. The source is never touched.
impl<R, C: Clock> Write for ThrottledReader<R, C> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::clock::ManualClock;

    use super::*;

    #[test]
    fn unlimited_reads_pass_through() {
        let data: Vec<u8> = (0..=255).cycle().take(20_000).map(|b: u16| b as u8).collect();
        let mut reader = ThrottledReader::new(Cursor::new(data.clone()), Throttle::kib_per_sec(0));
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
        assert_eq!(reader.consumed(), data.len() as u64);
    }

    #[test]
    fn first_read_is_capped_to_one_chunk() {
        let clock = ManualClock::default();
        let mut reader = ThrottledReader::with_clock(
            Cursor::new(vec![1u8; 50_000]),
            Throttle::kib_per_sec(10),
            &clock,
        );
        let mut buf = vec![0u8; 16_384];
        let n = reader.read(&mut buf).unwrap();
        assert_eq!(n, 8192);
        assert_eq!(reader.consumed(), 8192);
    }

    #[test]
    fn read_is_capped_to_deficit() {
        let clock = ManualClock::default();
        let mut reader = ThrottledReader::with_clock(
            Cursor::new(vec![1u8; 50_000]),
            Throttle::kib_per_sec(1),
            &clock,
        );
        clock.advance(1.0);
        let mut buf = vec![0u8; 4096];
        let n = reader.read(&mut buf).unwrap();
        assert_eq!(n, 1024);
        // a second of allowance was spent; the next call would wait, but
        // after another second the balance covers a full kilobyte again
        clock.advance(1.0);
        let n = reader.read(&mut buf).unwrap();
        assert_eq!(n, 1024);
        assert_eq!(reader.consumed(), 2048);
    }

    #[test]
    fn counter_matches_source_returns() {
        let clock = ManualClock::default();
        let mut reader = ThrottledReader::with_clock(
            Cursor::new(vec![9u8; 300]),
            Throttle::kib_per_sec(10),
            &clock,
        );
        // plenty of allowance; the short source bounds every read
        clock.set(100.0);
        let mut buf = [0u8; 128];
        let mut total = 0u64;
        loop {
            let n = reader.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            total += n as u64;
        }
        assert_eq!(total, 300);
        assert_eq!(reader.consumed(), total);
    }

    #[test]
    fn eof_returns_zero() {
        let mut reader = ThrottledReader::new(Cursor::new(Vec::<u8>::new()), Throttle::UNLIMITED);
        let mut buf = [0u8; 16];
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn seek_delegates_to_source() {
        let mut reader =
            ThrottledReader::new(Cursor::new(vec![0u8; 1000]), Throttle::kib_per_sec(10));
        assert_eq!(reader.seek(SeekFrom::End(0)).unwrap(), 1000);
        assert_eq!(reader.seek(SeekFrom::Start(10)).unwrap(), 10);
        assert_eq!(reader.seek(SeekFrom::Current(5)).unwrap(), 15);
    }

    #[test]
    fn writes_are_discarded_without_error() {
        let data = vec![7u8; 64];
        let mut reader = ThrottledReader::new(Cursor::new(data.clone()), Throttle::kib_per_sec(10));
        assert_eq!(reader.write(b"ignored").unwrap(), 7);
        reader.flush().unwrap();
        // the source is untouched
        assert_eq!(reader.into_inner().into_inner(), data);
    }
}
