use std::{
    fs::{File, OpenOptions},
    io,
    sync::Arc,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{FileStore, IdAllocator, Mutex, Reservation, Result, Store, allocator::acquire};

/// An allocator that shares one counter between every thread **and every
/// process** on the same machine.
///
/// Each reservation takes an in-process mutex, then an exclusive OS advisory
/// lock on [`FileStore::lock_path`]. While holding both it re-reads the
/// record (the record *is* the counter when several processes share it),
/// computes the range, saves the new maximum, and only then unlocks.
///
/// The advisory lock belongs to the open file and the kernel drops it when the
/// holding process exits, so a process killed mid-reservation cannot leave the
/// counter locked. Because the record is replaced atomically, the next holder
/// sees either the old or the new maximum. The lock is advisory: it only
/// protects against cooperating `FileLockAllocator`s, not against other
/// writers of the record. Lock acquisition blocks without a timeout.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Process-safe on one machine
/// - ✅ Crash-safe: a returned range is already persisted
///
/// ## Recommended When
/// - Several processes issue identifiers from the same record
///
/// ## See Also
/// - [`LockAllocator`]
///
/// [`LockAllocator`]: crate::LockAllocator
#[derive(Clone, Debug)]
pub struct FileLockAllocator {
    shared: Arc<Shared>,
    max_value: u64,
}

#[derive(Debug)]
struct Shared {
    store: FileStore,
    state: Mutex<LockFileState>,
}

#[derive(Debug)]
struct LockFileState {
    lock_file: File,
    // Highest value seen by this process; `None` until initialized
    known: Option<u64>,
}

impl FileLockAllocator {
    /// Creates an allocator over `store`, opening (and creating if needed) its
    /// lock file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the lock file cannot be opened.
    ///
    /// # Example
    /// ```
    /// use tallyid::{FileLockAllocator, FileStore, IdAllocator};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let store = FileStore::new(dir.path().join("max_value.txt"));
    ///
    /// // Two independent handles, as two processes would have
    /// let a = FileLockAllocator::new(store.clone()).unwrap();
    /// let b = FileLockAllocator::new(store).unwrap();
    ///
    /// assert_eq!(a.reserve(5).unwrap().last(), 5);
    /// assert_eq!(b.reserve(1).unwrap().first(), 6);
    /// ```
    pub fn new(store: FileStore) -> Result<Self> {
        Self::with_max_value(store, u64::MAX)
    }

    /// Like [`Self::new`], refusing to reserve past `max_value`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the lock file cannot be opened.
    pub fn with_max_value(store: FileStore, max_value: u64) -> Result<Self> {
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(store.lock_path())?;

        Ok(Self {
            shared: Arc::new(Shared {
                store,
                state: Mutex::new(LockFileState {
                    lock_file,
                    known: None,
                }),
            }),
            max_value,
        })
    }

    /// The highest value this allocator will ever reserve.
    #[must_use]
    pub fn max_value(&self) -> u64 {
        self.max_value
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &FileStore {
        &self.shared.store
    }
}

impl IdAllocator for FileLockAllocator {
    fn init(&self) -> Result<u64> {
        let mut state = acquire(&self.shared.state)?;
        if let Some(max) = state.known {
            return Ok(max);
        }

        let max = {
            let _held = FileGuard::acquire(&state.lock_file)?;
            self.shared.store.load()?
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(max, "counter initialized");
        state.known = Some(max);
        Ok(max)
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn reserve(&self, count: u64) -> Result<Reservation> {
        let mut state = acquire(&self.shared.state)?;
        let reservation = {
            let _held = FileGuard::acquire(&state.lock_file)?;
            let previous = self.shared.store.load()?;
            let reservation = Reservation::after(previous, count, self.max_value)?;
            self.shared.store.save(reservation.last())?;
            reservation
        };
        state.known = Some(reservation.last());

        Ok(reservation)
    }
}

/// Holds the exclusive advisory lock on a file until dropped.
struct FileGuard<'a> {
    file: &'a File,
}

impl<'a> FileGuard<'a> {
    fn acquire(file: &'a File) -> io::Result<Self> {
        file.lock()?;
        Ok(Self { file })
    }
}

impl Drop for FileGuard<'_> {
    fn drop(&mut self) {
        // The kernel still releases it when the file is closed
        if let Err(_err) = self.file.unlock() {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %_err, "failed to release counter file lock");
        }
    }
}
