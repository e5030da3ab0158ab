use crate::{Reservation, Result};

/// A minimal interface for reserving ranges of a monotonic counter.
///
/// Implementations guarantee that no two reservations ever overlap, that
/// every reservation starts right after the highest value previously
/// reserved, and that the new high-water mark is durable before
/// [`IdAllocator::reserve`] returns.
pub trait IdAllocator {
    /// Loads the counter from its store on the first call; later calls are
    /// no-ops.
    ///
    /// Returns the highest value reserved so far as known to this allocator.
    /// [`IdAllocator::reserve`] initializes implicitly, so calling this is
    /// only needed to surface load errors early.
    fn init(&self) -> Result<u64>;

    /// Reserves the next `count` consecutive values.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::InvalidCount`] if `count` is zero
    /// - [`crate::Error::Overflow`] if the range would pass the allocator's
    ///   ceiling
    /// - [`crate::Error::Io`] if the new high-water mark could not be
    ///   persisted; the range is **not** issued in that case
    fn reserve(&self, count: u64) -> Result<Reservation>;
}
