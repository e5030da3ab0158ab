use core::{fmt, str::FromStr};

use crate::{Error, Result};

/// Digits and upper-case Latin letters, in ASCII (and therefore sort) order.
pub const BASE36: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// An ordered, duplicate-free set of ASCII symbols used as the digits of a
/// positional numeral system.
///
/// The symbol at index `0` is the zero digit (and the padding symbol); the
/// number of symbols is the radix. Identifiers only sort in numeric order if
/// the symbols are listed in ascending order of the desired sort, which for
/// byte-wise string comparison means ascending ASCII order. That ordering is
/// the caller's responsibility and is not checked here.
///
/// # Example
///
/// ```
/// use tallyid::Alphabet;
///
/// let hex = Alphabet::new("0123456789abcdef").unwrap();
/// assert_eq!(hex.radix(), 16);
/// assert_eq!(hex.symbol(10), b'a');
///
/// assert!(Alphabet::new("0").is_err());
/// assert!(Alphabet::new("0120").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Alphabet {
    symbols: Box<[u8]>,
}

impl Alphabet {
    /// Builds an alphabet from a string of ASCII symbols.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAlphabet`] if `symbols` holds fewer than two
    /// symbols, contains a non-ASCII character, or repeats a symbol.
    pub fn new(symbols: &str) -> Result<Self> {
        if !symbols.is_ascii() {
            return Err(Error::InvalidAlphabet {
                reason: "symbols must be ASCII".into(),
            });
        }
        let bytes = symbols.as_bytes();
        if bytes.len() < 2 {
            return Err(Error::InvalidAlphabet {
                reason: format!("need at least 2 symbols, got {}", bytes.len()),
            });
        }

        let mut seen = [false; 128];
        for (index, &b) in bytes.iter().enumerate() {
            if core::mem::replace(&mut seen[usize::from(b)], true) {
                return Err(Error::InvalidAlphabet {
                    reason: format!("symbol {:?} repeated at index {index}", char::from(b)),
                });
            }
        }

        Ok(Self {
            symbols: bytes.into(),
        })
    }

    /// The 36-symbol [`BASE36`] alphabet.
    #[must_use]
    pub fn base36() -> Self {
        Self {
            symbols: BASE36.as_bytes().into(),
        }
    }

    /// Number of symbols, i.e. the base of the numeral system.
    #[must_use]
    pub fn radix(&self) -> u64 {
        self.symbols.len() as u64
    }

    /// The symbol for `digit`.
    ///
    /// # Panics
    ///
    /// Panics if `digit >= self.radix()`.
    #[must_use]
    pub fn symbol(&self, digit: usize) -> u8 {
        self.symbols[digit]
    }

    /// The zero digit, used to left-pad short encodings.
    #[must_use]
    pub fn zero(&self) -> u8 {
        self.symbols[0]
    }

    /// All symbols in digit order.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Validated as ASCII on construction
        core::str::from_utf8(&self.symbols).unwrap_or_default()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::base36()
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Alphabet").field(&self.as_str()).finish()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alphabet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Alphabet {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::new(&s)
    }
}

impl From<Alphabet> for String {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.as_str().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base36_matches_constant() {
        let alphabet = Alphabet::base36();
        assert_eq!(alphabet.radix(), 36);
        assert_eq!(alphabet.as_str(), BASE36);
        assert_eq!(alphabet.zero(), b'0');
        assert_eq!(alphabet.symbol(35), b'Z');
        assert_eq!(Alphabet::new(BASE36).unwrap(), alphabet);
    }

    #[test]
    fn rejects_short_alphabet() {
        assert!(matches!(
            Alphabet::new(""),
            Err(Error::InvalidAlphabet { .. })
        ));
        assert!(matches!(
            Alphabet::new("x"),
            Err(Error::InvalidAlphabet { .. })
        ));
    }

    #[test]
    fn rejects_non_ascii() {
        assert!(matches!(
            Alphabet::new("01é"),
            Err(Error::InvalidAlphabet { .. })
        ));
    }

    #[test]
    fn rejects_duplicates() {
        let err = Alphabet::new("ABCA").unwrap_err();
        match err {
            Error::InvalidAlphabet { reason } => assert!(reason.contains("index 3")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn binary_is_smallest_alphabet() {
        let alphabet: Alphabet = "01".parse().unwrap();
        assert_eq!(alphabet.radix(), 2);
        assert_eq!(alphabet.to_string(), "01");
    }
}
