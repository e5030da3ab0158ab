use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{IdAllocator, Mutex, Reservation, Result, Store, allocator::acquire};

/// A lock-based allocator for sharing one counter across threads of a single
/// process.
///
/// The counter lives in an [`Arc<Mutex<_>>`] shared by every clone. The
/// persisted record is read once, on initialization; afterwards each
/// reservation reads the in-memory value, computes the new range, saves the
/// new maximum to the [`Store`] and only then releases the lock. Allocation,
/// including the durable write, is therefore fully serialized.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Crash-safe: a returned range is already persisted
/// - ❌ Not safe across processes: two processes with their own
///   `LockAllocator` over the same record will issue duplicates
///
/// ## Recommended When
/// - A single process owns the record
/// - You want the lowest overhead per reservation
///
/// ## See Also
/// - [`FileLockAllocator`]
///
/// [`FileLockAllocator`]: crate::FileLockAllocator
pub struct LockAllocator<S>
where
    S: Store,
{
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<Option<u64>>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<Option<u64>>>,
    store: S,
    max_value: u64,
}

impl<S> LockAllocator<S>
where
    S: Store,
{
    /// Creates an allocator over `store` that may use the whole `u64` range.
    ///
    /// The store is not read until the first [`IdAllocator::init`] or
    /// [`IdAllocator::reserve`].
    ///
    /// # Example
    /// ```
    /// use tallyid::{IdAllocator, LockAllocator, MemoryStore, Store};
    ///
    /// let store = MemoryStore::default();
    /// let allocator = LockAllocator::new(store.clone());
    ///
    /// let first = allocator.reserve(1).unwrap();
    /// let next = allocator.reserve(10).unwrap();
    /// assert_eq!(first.first(), 1);
    /// assert_eq!((next.first(), next.last()), (2, 11));
    /// assert_eq!(store.load().unwrap(), 11);
    /// ```
    pub fn new(store: S) -> Self {
        Self::with_max_value(store, u64::MAX)
    }

    /// Creates an allocator that refuses to reserve past `max_value`.
    ///
    /// Use the encoder's [`max_value`] so that every reserved value can be
    /// encoded.
    ///
    /// [`max_value`]: crate::Encoder::max_value
    pub fn with_max_value(store: S, max_value: u64) -> Self {
        Self {
            state: Arc::default(),
            store,
            max_value,
        }
    }

    /// The highest value this allocator will ever reserve.
    #[must_use]
    pub fn max_value(&self) -> u64 {
        self.max_value
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn init_locked(&self, state: &mut Option<u64>) -> Result<u64> {
        if let Some(max) = *state {
            return Ok(max);
        }
        let max = self.store.load()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(max, "counter initialized");
        *state = Some(max);
        Ok(max)
    }
}

impl<S> IdAllocator for LockAllocator<S>
where
    S: Store,
{
    fn init(&self) -> Result<u64> {
        let mut state = acquire(&self.state)?;
        self.init_locked(&mut state)
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn reserve(&self, count: u64) -> Result<Reservation> {
        let mut state = acquire(&self.state)?;
        let previous = self.init_locked(&mut state)?;
        let reservation = Reservation::after(previous, count, self.max_value)?;

        // Persist before publishing; on failure the in-memory counter stays at
        // `previous` and nothing is issued.
        self.store.save(reservation.last())?;
        *state = Some(reservation.last());

        Ok(reservation)
    }
}

impl<S> Clone for LockAllocator<S>
where
    S: Store + Clone,
{
    /// Clones share the same counter.
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            store: self.store.clone(),
            max_value: self.max_value,
        }
    }
}

impl<S> core::fmt::Debug for LockAllocator<S>
where
    S: Store + core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LockAllocator")
            .field("store", &self.store)
            .field("max_value", &self.max_value)
            .finish_non_exhaustive()
    }
}
