use std::path::PathBuf;

/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `tallyid` can emit.
///
/// Every variant is terminal for the call that produced it. In particular, a
/// reservation that fails never advances the counter, neither in memory nor on
/// disk.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The operation failed because the counter lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("counter lock poisoned")]
    LockPoisoned,

    /// Reading, writing or locking the persisted record failed.
    ///
    /// A reservation that hits this error has **not** been issued.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted record exists but does not hold a decimal integer.
    #[error("corrupt counter record at {}: {content:?}", path.display())]
    CorruptRecord {
        /// Location of the offending record.
        path: PathBuf,
        /// Raw content that failed to parse.
        content: String,
    },

    /// A reservation asked for zero identifiers.
    #[error("invalid count: {count} (must be greater than 0)")]
    InvalidCount {
        /// The rejected count.
        count: u64,
    },

    /// The value does not fit the configured identifier width.
    #[error("value {value} exceeds the representable maximum {max}")]
    Overflow {
        /// The offending value: the value being encoded, or the last value of
        /// the requested range.
        value: u128,
        /// The largest value that can be encoded or reserved.
        max: u64,
    },

    /// The alphabet cannot be used as a positional numeral system.
    #[error("invalid alphabet: {reason}")]
    InvalidAlphabet {
        /// Why the alphabet was rejected.
        reason: String,
    },

    /// The identifier width must be between one symbol and [`crate::MAX_LENGTH`].
    #[error("invalid identifier length: {length}")]
    InvalidLength {
        /// The rejected width.
        length: usize,
    },
}

#[cfg(not(feature = "parking-lot"))]
use crate::allocator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
// Convert all poisoned lock errors to a simplified `LockPoisoned`
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
