use std::sync::Arc;

use crate::{Mutex, Result, Store, allocator::acquire};

/// A volatile [`Store`] kept in memory.
///
/// Clones share the same record, so dropping an allocator and building a new
/// one from a clone simulates a process restart without touching the disk.
///
/// Nothing survives the process; use [`FileStore`] when identifiers must stay
/// unique across restarts.
///
/// [`FileStore`]: crate::FileStore
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    record: Arc<Mutex<Option<u64>>>,
}

impl MemoryStore {
    /// Creates a store whose record already holds `value`.
    #[must_use]
    pub fn with_value(value: u64) -> Self {
        Self {
            record: Arc::new(Mutex::new(Some(value))),
        }
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<u64> {
        Ok(acquire(&self.record)?.unwrap_or(0))
    }

    fn save(&self, value: u64) -> Result<()> {
        *acquire(&self.record)? = Some(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_loads_zero() {
        assert_eq!(MemoryStore::default().load().unwrap(), 0);
    }

    #[test]
    fn clones_share_the_record() {
        let store = MemoryStore::with_value(7);
        let other = store.clone();
        other.save(9).unwrap();
        assert_eq!(store.load().unwrap(), 9);
    }
}
