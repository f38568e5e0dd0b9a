#![doc = include_str!("../README.md")]
//!
//! # Core Components
//!
//! - [`Pacer`] - The rate-accounting core with pluggable storage and clock
//! - [`Throttle`] - Rate configuration in KiB/s, capped at 40 MiB/s
//! - [`ThrottledReader`] - Blocking [`std::io::Read`] wrapper
//! - `futures::ThrottledReader` - Async `tokio::io::AsyncRead` wrapper
//!   (feature `async`)
//! - [`Clock`] trait and implementations for time sources
//!
//! # Quick Start
//!
//! ```rust
//! use std::io::Read;
//!
//! use drossel::{Throttle, ThrottledReader};
//!
//! // cap a source at 10 KiB/s
//! let source = std::io::Cursor::new(vec![0u8; 50_000]);
//! let mut reader = ThrottledReader::new(source, Throttle::kib_per_sec(10));
//!
//! let mut chunk = vec![0u8; 16_384];
//! let n = reader.read(&mut chunk).unwrap();
//! // the first call releases at most one 8 KiB pacing chunk
//! assert!(n > 0 && n <= 8192);
//! ```

mod clock;
#[cfg(feature = "async")]
pub mod futures;
mod pacer;
mod read;
mod storage;
mod throttle;

#[cfg(feature = "async")]
pub use clock::TokioClock;
pub use clock::{Clock, ManualClock, StdClock};
#[cfg(feature = "quanta")]
pub use clock::{FastClock, QuantaClock};
pub use pacer::{Grant, Pacer};
pub use read::ThrottledReader;
pub use throttle::Throttle;

pub use storage::{CountStorage, atomic::AtomicStorage, local::LocalStorage};
