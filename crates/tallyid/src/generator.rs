#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Encoder, FileLockAllocator, FileStore, GeneratorConfig, IdAllocator, LockAllocator, Result,
};

/// Issues fixed-length, sortable identifiers from a persistent counter.
///
/// An `IdGenerator` pairs an [`IdAllocator`], which hands out unique integer
/// ranges and persists the high-water mark, with an [`Encoder`], which turns
/// each reserved integer into its identifier string. Clones share the same
/// counter, so a generator can be handed to as many threads as needed.
///
/// Identifiers come out in ascending order per caller and never repeat, even
/// across restarts, as long as the record survives.
///
/// # Example
///
/// ```
/// use tallyid::{GeneratorConfig, IdGenerator};
///
/// let dir = tempfile::tempdir().unwrap();
/// let config = GeneratorConfig {
///     store_path: dir.path().join("max_value.txt"),
///     ..GeneratorConfig::default()
/// };
///
/// let generator = IdGenerator::open(&config).unwrap();
/// assert_eq!(generator.generate_one().unwrap(), "00000001");
/// assert_eq!(
///     generator.generate_many(3).unwrap(),
///     ["00000002", "00000003", "00000004"]
/// );
/// ```
#[derive(Clone, Debug)]
pub struct IdGenerator<A = LockAllocator<FileStore>>
where
    A: IdAllocator,
{
    encoder: Encoder,
    allocator: A,
}

impl IdGenerator<LockAllocator<FileStore>> {
    /// Opens a generator for a single process, backed by the file at
    /// `config.store_path`.
    ///
    /// The record is read once here. Reservations are capped at the
    /// encoder's [`Encoder::max_value`], so every issued value fits the
    /// configured width.
    ///
    /// # Errors
    ///
    /// Fails if the config is invalid or the record exists but cannot be
    /// read.
    pub fn open(config: &GeneratorConfig) -> Result<Self> {
        let encoder = config.encoder()?;
        let allocator = LockAllocator::with_max_value(
            FileStore::new(&config.store_path),
            encoder.max_value(),
        );
        Self::new(encoder, allocator)
    }
}

impl IdGenerator<FileLockAllocator> {
    /// Opens a generator that can share `config.store_path` with other
    /// processes on the same machine.
    ///
    /// See [`FileLockAllocator`] for the locking protocol.
    ///
    /// # Errors
    ///
    /// Fails if the config is invalid, the lock file cannot be opened, or the
    /// record exists but cannot be read.
    pub fn open_shared(config: &GeneratorConfig) -> Result<Self> {
        let encoder = config.encoder()?;
        let allocator = FileLockAllocator::with_max_value(
            FileStore::new(&config.store_path),
            encoder.max_value(),
        )?;
        Self::new(encoder, allocator)
    }
}

impl<A> IdGenerator<A>
where
    A: IdAllocator,
{
    /// Builds a generator from its parts and initializes the counter.
    ///
    /// The allocator should be capped at `encoder.max_value()`; otherwise
    /// values past it are still reserved (and therefore burned) before
    /// encoding fails with [`crate::Error::Overflow`].
    ///
    /// # Errors
    ///
    /// Propagates any error from [`IdAllocator::init`].
    ///
    /// # Example
    ///
    /// ```
    /// use tallyid::{Alphabet, Encoder, IdGenerator, LockAllocator, MemoryStore};
    ///
    /// let encoder = Encoder::new(Alphabet::new("0123456789").unwrap(), 4).unwrap();
    /// let allocator = LockAllocator::with_max_value(MemoryStore::with_value(41), encoder.max_value());
    ///
    /// let generator = IdGenerator::new(encoder, allocator).unwrap();
    /// assert_eq!(generator.generate_one().unwrap(), "0042");
    /// ```
    pub fn new(encoder: Encoder, allocator: A) -> Result<Self> {
        let _last = allocator.init()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            last = _last,
            last_id = ?encoder.encode(_last).ok(),
            "id generator initialized"
        );
        Ok(Self { encoder, allocator })
    }

    /// Reserves one value and returns its identifier.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::Overflow`] once the identifier space is exhausted
    /// - [`crate::Error::Io`] if the counter could not be persisted
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate_one(&self) -> Result<String> {
        let reservation = self.allocator.reserve(1)?;
        self.encoder.encode(reservation.last())
    }

    /// Reserves `count` consecutive values and returns their identifiers in
    /// ascending order.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::InvalidCount`] if `count` is zero
    /// - [`crate::Error::Overflow`] if fewer than `count` identifiers remain
    /// - [`crate::Error::Io`] if the counter could not be persisted
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate_many(&self, count: usize) -> Result<Vec<String>> {
        // Saturate so oversized requests fail as overflow
        let count = u64::try_from(count).unwrap_or(u64::MAX);
        let reservation = self.allocator.reserve(count)?;
        reservation
            .into_iter()
            .map(|value| self.encoder.encode(value))
            .collect()
    }

    /// The encoder turning counter values into identifiers.
    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// The allocator owning the counter.
    pub fn allocator(&self) -> &A {
        &self.allocator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Alphabet, Error, MemoryStore, Store};
    use std::{collections::HashSet, thread::scope};
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> GeneratorConfig {
        GeneratorConfig {
            store_path: dir.path().join("max_value.txt"),
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn base36_scenario() {
        let dir = TempDir::new().unwrap();
        let generator = IdGenerator::open(&config_in(&dir)).unwrap();
        assert_eq!(generator.generate_one().unwrap(), "00000001");
        assert_eq!(
            generator.generate_many(3).unwrap(),
            ["00000002", "00000003", "00000004"]
        );
    }

    #[test]
    fn generate_one_is_unique() {
        let dir = TempDir::new().unwrap();
        let generator = IdGenerator::open(&config_in(&dir)).unwrap();
        let ids: HashSet<_> = (0..1_000)
            .map(|_| {
                let id = generator.generate_one().unwrap();
                assert_eq!(id.len(), 8);
                id
            })
            .collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn generate_many_is_strictly_ascending() {
        let encoder = Encoder::default();
        let allocator = LockAllocator::new(MemoryStore::with_value(1_290));
        let generator = IdGenerator::new(encoder, allocator).unwrap();

        let ids = generator.generate_many(10).unwrap();
        assert_eq!(ids.len(), 10);
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(ids.first().unwrap(), "000000ZV");
        assert_eq!(ids.last().unwrap(), "00000104");

        let next = generator.generate_many(5).unwrap();
        assert!(ids.last().unwrap() < next.first().unwrap());
    }

    #[test]
    fn zero_count_is_rejected() {
        let generator =
            IdGenerator::new(Encoder::default(), LockAllocator::new(MemoryStore::default()))
                .unwrap();
        assert!(matches!(
            generator.generate_many(0),
            Err(Error::InvalidCount { count: 0 })
        ));
        assert_eq!(generator.generate_one().unwrap(), "00000001");
    }

    #[test]
    fn resumes_from_record_after_restart() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let last = {
            let generator = IdGenerator::open(&config).unwrap();
            generator.generate_many(1_000).unwrap().pop().unwrap()
        };
        assert_eq!(last, "000000RS");

        let restarted = IdGenerator::open(&config).unwrap();
        assert_eq!(restarted.generate_one().unwrap(), "000000RT");
    }

    #[test]
    fn shared_and_local_generators_agree_on_record() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        {
            let generator = IdGenerator::open(&config).unwrap();
            generator.generate_many(35).unwrap();
        }
        let shared = IdGenerator::open_shared(&config).unwrap();
        assert_eq!(shared.generate_one().unwrap(), "00000010");
        assert_eq!(FileStore::new(&config.store_path).load().unwrap(), 36);
    }

    #[test]
    fn exhausted_space_overflows_without_burning() {
        let dir = TempDir::new().unwrap();
        let config = GeneratorConfig::new(
            Alphabet::new("01").unwrap(),
            2,
            dir.path().join("max_value.txt"),
        );
        let generator = IdGenerator::open(&config).unwrap();
        assert_eq!(generator.generate_many(3).unwrap(), ["01", "10", "11"]);
        assert!(matches!(
            generator.generate_one(),
            Err(Error::Overflow { value: 4, max: 3 })
        ));
        assert_eq!(FileStore::new(&config.store_path).load().unwrap(), 3);
    }

    #[test]
    fn invalid_config_fails_to_open() {
        let dir = TempDir::new().unwrap();
        let config = GeneratorConfig {
            length: 0,
            ..config_in(&dir)
        };
        assert!(matches!(
            IdGenerator::open(&config),
            Err(Error::InvalidLength { length: 0 })
        ));
    }

    #[test]
    fn concurrent_bulk_generation_is_disjoint() {
        const CALLERS: usize = 8;
        const ROUNDS: usize = 50;
        const BATCH: usize = 100;

        let dir = TempDir::new().unwrap();
        let generator = IdGenerator::open(&config_in(&dir)).unwrap();

        let all: Vec<String> = scope(|s| {
            let handles: Vec<_> = (0..CALLERS)
                .map(|_| {
                    let generator = generator.clone();
                    s.spawn(move || {
                        (0..ROUNDS)
                            .flat_map(|_| generator.generate_many(BATCH).unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap())
                .collect()
        });

        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), CALLERS * ROUNDS * BATCH);
        assert_eq!(
            FileStore::new(dir.path().join("max_value.txt"))
                .load()
                .unwrap(),
            (CALLERS * ROUNDS * BATCH) as u64
        );
    }
}
