use std::io::SeekFrom;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use pin_project_lite::pin_project;
use tokio::io::{AsyncRead, AsyncSeek, AsyncWrite, ReadBuf};

use super::timer::{Sleep, sleep};
use crate::clock::{Clock, TokioClock};
use crate::pacer::Pacer;
use crate::storage::atomic::AtomicStorage;
use crate::Throttle;
#[cfg(not(feature = "tokio-hrtime"))]
use tokio::time::Instant;

pin_project! {
    /// An [`AsyncRead`] wrapper that caps the sustained byte rate of its
    /// source.
    ///
    /// The suspension is cooperative: when the consumer is ahead of its
    /// allowance, `poll_read` parks on a timer instead of blocking a
    /// worker thread. Dropping a read future mid-wait abandons the wait;
    /// the pending grant survives and the next poll picks it up without
    /// recomputing.
    ///
    /// [`AsyncSeek`] delegates to the source. [`AsyncWrite`] is accepted
    /// and discarded without error (read-only sink semantics). I/O
    /// failures from the source propagate unmodified.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "async")]
    /// # {
    /// use drossel::Throttle;
    /// use drossel::futures::ThrottledReader;
    /// use tokio::io::AsyncReadExt;
    ///
    /// # async fn example() -> std::io::Result<()> {
    /// let source = std::io::Cursor::new(vec![0u8; 50_000]);
    /// let mut reader = ThrottledReader::new(source, Throttle::kib_per_sec(10));
    ///
    /// let mut out = Vec::new();
    /// reader.read_to_end(&mut out).await?; // takes ~4.8s instead of 0
    /// # Ok(()) }
    /// # }
    /// ```
    pub struct ThrottledReader<R, C>
    where
        C: Clock,
    {
        #[pin]
        inner: R,
        pacer: Pacer<AtomicStorage, C>,
        // boxed so the reader stays Unpin whenever R is
        delay: Option<Pin<Box<Sleep>>>,
        granted: Option<usize>,
    }
}

impl<R> ThrottledReader<R, TokioClock> {
    /// Wraps `inner`, enforcing `throttle` from this moment on.
    ///
    /// The rate accounting clock starts here, not at the first read.
    pub fn new(inner: R, throttle: Throttle) -> Self {
        Self::with_clock(inner, throttle, TokioClock::default())
    }
}

impl<R, C: Clock> ThrottledReader<R, C> {
    /// Wraps `inner` with a custom clock implementation.
    pub fn with_clock(inner: R, throttle: Throttle, clock: C) -> Self {
        Self {
            inner,
            pacer: Pacer::with_clock(throttle, clock),
            delay: None,
            granted: None,
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

impl<R: AsyncRead, C: Clock> AsyncRead for ThrottledReader<R, C> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        let this = self.project();

        if this.pacer.throttle().is_unlimited() {
            let before = buf.filled().len();
            ready!(this.inner.poll_read(cx, buf))?;
            this.pacer.record(buf.filled().len() - before);
            return Poll::Ready(Ok(()));
        }

        // a grant left over from a cancelled or Pending poll is reused
        let len = match *this.granted {
            Some(len) => len,
            None => {
                let grant = this.pacer.plan(buf.remaining());
                if let Some(wait) = grant.wait() {
                    #[cfg(feature = "tokio-hrtime")]
                    {
                        *this.delay = Some(Box::pin(sleep(wait)));
                    }
                    #[cfg(not(feature = "tokio-hrtime"))]
                    {
                        if let Some(delay) = this.delay.as_mut() {
                            delay.as_mut().reset(Instant::now() + wait);
                        } else {
                            *this.delay = Some(Box::pin(sleep(wait)));
                        }
                    }
                }
                *this.granted = Some(grant.len());
                grant.len()
            }
        };

        if let Some(delay) = this.delay.as_mut() {
            ready!(delay.as_mut().poll(cx));
            *this.delay = None;
        }

        // the caller may hand in a different buffer between polls
        let len = len.min(buf.remaining());
        if len == 0 {
            *this.granted = None;
            return Poll::Ready(Ok(()));
        }

        let mut limited = ReadBuf::new(buf.initialize_unfilled_to(len));
        ready!(this.inner.poll_read(cx, &mut limited))?;
        let n = limited.filled().len();
        buf.advance(n);
        this.pacer.record(n);
        *this.granted = None;
        Poll::Ready(Ok(()))
    }
}

impl<R: AsyncSeek, C: Clock> AsyncSeek for ThrottledReader<R, C> {
    fn start_seek(self: Pin<&mut Self>, position: SeekFrom) -> std::io::Result<()> {
        self.project().inner.start_seek(position)
    }

    fn poll_complete(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<u64>> {
        self.project().inner.poll_complete(cx)
    }
}

/// Read-only sink semantics: writes are accepted and dropped without
/// error, and flush/shutdown are no-ops. The source is never touched.
impl<R, C: Clock> AsyncWrite for ThrottledReader<R, C> {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
