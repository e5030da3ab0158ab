use crate::Result;

/// Durable record of the highest counter value ever reserved.
///
/// Allocators call [`Store::save`] inside their critical section, before the
/// reserved range is handed out, so an implementation's durability guarantee
/// is exactly the crash-safety of the identifiers it backs.
///
/// # Example
///
/// ```
/// use tallyid::{MemoryStore, Store};
///
/// let store = MemoryStore::default();
/// assert_eq!(store.load().unwrap(), 0);
///
/// store.save(42).unwrap();
/// assert_eq!(store.load().unwrap(), 42);
/// ```
pub trait Store {
    /// Returns the last saved value, or `0` if nothing was ever saved.
    ///
    /// # Errors
    ///
    /// Implementations fail if the record exists but cannot be read or parsed.
    /// They must never paper over an unreadable record by returning `0`, since
    /// that would re-issue identifiers.
    fn load(&self) -> Result<u64>;

    /// Replaces the record with `value`.
    ///
    /// Must be atomic with respect to crashes: after an interruption the
    /// record holds either the previous value or `value`, never a partial
    /// write.
    ///
    /// # Errors
    ///
    /// Fails if the new value could not be made durable.
    fn save(&self, value: u64) -> Result<()>;
}

impl<S: Store + ?Sized> Store for &S {
    fn load(&self) -> Result<u64> {
        (**self).load()
    }

    fn save(&self, value: u64) -> Result<()> {
        (**self).save(value)
    }
}
