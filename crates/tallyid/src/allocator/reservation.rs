use core::ops::RangeInclusive;

use crate::{Error, Result};

/// A contiguous, non-empty range of counter values claimed by one caller.
///
/// # Example
///
/// ```
/// use tallyid::{IdAllocator, LockAllocator, MemoryStore};
///
/// let allocator = LockAllocator::new(MemoryStore::default());
/// let reservation = allocator.reserve(3).unwrap();
/// assert_eq!((reservation.first(), reservation.last()), (1, 3));
/// assert_eq!(reservation.into_iter().collect::<Vec<_>>(), [1, 2, 3]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Reservation {
    first: u64,
    last: u64,
}

impl Reservation {
    /// Computes the `count` values following `previous`, capped at
    /// `max_value`.
    pub(crate) fn after(previous: u64, count: u64, max_value: u64) -> Result<Self> {
        if count == 0 {
            return Err(Error::InvalidCount { count });
        }
        let last = previous
            .checked_add(count)
            .filter(|last| *last <= max_value)
            .ok_or(Error::Overflow {
                value: u128::from(previous) + u128::from(count),
                max: max_value,
            })?;

        Ok(Self {
            first: previous + 1,
            last,
        })
    }

    /// The lowest reserved value.
    #[must_use]
    pub fn first(&self) -> u64 {
        self.first
    }

    /// The highest reserved value, which is also the new high-water mark.
    #[must_use]
    pub fn last(&self) -> u64 {
        self.last
    }

    /// Number of reserved values. Always at least one.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.last - self.first + 1
    }

    /// The reserved values in ascending order.
    #[must_use]
    pub fn iter(&self) -> RangeInclusive<u64> {
        self.first..=self.last
    }
}

impl IntoIterator for Reservation {
    type Item = u64;
    type IntoIter = RangeInclusive<u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
