use std::path::PathBuf;

use crate::{Alphabet, Encoder, Result};

/// Default location of the counter record, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "max_value.txt";

/// Default identifier width.
pub const DEFAULT_LENGTH: usize = 8;

/// Everything needed to open an [`IdGenerator`]: the digit set, the
/// identifier width and where the counter record lives.
///
/// With the `serde` feature the config can be loaded from any serde format;
/// the alphabet is (de)serialized as a plain string and validated on load.
///
/// [`IdGenerator`]: crate::IdGenerator
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GeneratorConfig {
    /// Ordered digit set, in ascending sort order.
    pub alphabet: Alphabet,
    /// Width of every identifier, in symbols.
    pub length: usize,
    /// Path of the plain-text counter record.
    pub store_path: PathBuf,
}

impl GeneratorConfig {
    pub fn new(alphabet: Alphabet, length: usize, store_path: impl Into<PathBuf>) -> Self {
        Self {
            alphabet,
            length,
            store_path: store_path.into(),
        }
    }

    /// Builds the encoder described by this config.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidLength`] if `length` is zero or past
    /// [`crate::MAX_LENGTH`].
    pub fn encoder(&self) -> Result<Encoder> {
        Encoder::new(self.alphabet.clone(), self.length)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(Alphabet::base36(), DEFAULT_LENGTH, DEFAULT_STORE_PATH)
    }
}
