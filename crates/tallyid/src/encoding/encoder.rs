use crate::{Alphabet, Error, Result};

/// The widest identifier an [`Encoder`] accepts.
///
/// Even the binary alphabet writes every `u64` in 64 symbols, so anything
/// wider would only add padding.
pub const MAX_LENGTH: usize = 64;

/// Encodes non-negative integers as fixed-width strings in the positional
/// numeral system described by an [`Alphabet`].
///
/// Every encoding is exactly [`Encoder::length`] symbols wide, left-padded
/// with the alphabet's zero digit. As long as the alphabet is listed in
/// ascending sort order, `a < b` implies `encode(a) < encode(b)` under plain
/// string comparison.
///
/// Values that need more than `length` digits are rejected with
/// [`Error::Overflow`] instead of being truncated.
///
/// # Example
///
/// ```
/// use tallyid::{Alphabet, Encoder};
///
/// let encoder = Encoder::new(Alphabet::base36(), 8).unwrap();
/// assert_eq!(encoder.encode(1).unwrap(), "00000001");
/// assert_eq!(encoder.encode(36).unwrap(), "00000010");
/// assert_eq!(encoder.max_value(), 36_u64.pow(8) - 1);
/// assert!(encoder.encode(36_u64.pow(8)).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encoder {
    alphabet: Alphabet,
    length: usize,
    max_value: u64,
}

impl Encoder {
    /// Creates an encoder producing identifiers of exactly `length` symbols.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] if `length` is zero or greater than
    /// [`MAX_LENGTH`].
    pub fn new(alphabet: Alphabet, length: usize) -> Result<Self> {
        if length == 0 || length > MAX_LENGTH {
            return Err(Error::InvalidLength { length });
        }
        // R^L - 1, or every u64 when R^L does not fit
        let max_value = u32::try_from(length)
            .ok()
            .and_then(|exp| alphabet.radix().checked_pow(exp))
            .map_or(u64::MAX, |capacity| capacity - 1);

        Ok(Self {
            alphabet,
            length,
            max_value,
        })
    }

    /// The digit set.
    #[must_use]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Width of every encoded identifier, in symbols.
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// The largest value that fits in [`Self::length`] symbols.
    #[must_use]
    pub fn max_value(&self) -> u64 {
        self.max_value
    }

    /// Encodes `value` into a freshly allocated [`String`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] if `value > self.max_value()`.
    pub fn encode(&self, value: u64) -> Result<String> {
        let mut buf = vec![0; self.length];
        self.encode_to_buf(value, &mut buf)?;
        // Every byte comes from an ASCII alphabet
        Ok(buf.into_iter().map(char::from).collect())
    }

    /// Encodes `value` into `buf` without allocating.
    ///
    /// This is the zero-allocation alternative to [`Encoder::encode`]; `buf`
    /// must be exactly [`Self::length`] bytes long.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidLength`] if `buf.len() != self.length()`
    /// - [`Error::Overflow`] if `value > self.max_value()`
    ///
    /// # Example
    ///
    /// ```
    /// use tallyid::{Alphabet, Encoder};
    ///
    /// let encoder = Encoder::new(Alphabet::new("01").unwrap(), 4).unwrap();
    /// let mut buf = [0_u8; 4];
    /// encoder.encode_to_buf(5, &mut buf).unwrap();
    /// assert_eq!(&buf, b"0101");
    /// ```
    pub fn encode_to_buf(&self, value: u64, buf: &mut [u8]) -> Result<()> {
        if buf.len() != self.length {
            return Err(Error::InvalidLength { length: buf.len() });
        }
        if value > self.max_value {
            return Err(Error::Overflow {
                value: u128::from(value),
                max: self.max_value,
            });
        }

        // Once the quotient hits zero, every remaining digit is the zero
        // symbol, which is exactly the left padding.
        let radix = self.alphabet.radix();
        let mut rest = value;
        for slot in buf.iter_mut().rev() {
            // `rest % radix < radix <= 128`
            *slot = self.alphabet.symbol((rest % radix) as usize);
            rest /= radix;
        }
        debug_assert_eq!(rest, 0);

        Ok(())
    }
}

impl Default for Encoder {
    /// Base36, 8 symbols wide.
    fn default() -> Self {
        Self {
            alphabet: Alphabet::base36(),
            length: 8,
            max_value: 36_u64.pow(8) - 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base36(length: usize) -> Encoder {
        Encoder::new(Alphabet::base36(), length).unwrap()
    }

    #[test]
    fn zero_is_all_padding() {
        assert_eq!(base36(8).encode(0).unwrap(), "00000000");
    }

    #[test]
    fn known_values() {
        let encoder = base36(8);
        assert_eq!(encoder.encode(1).unwrap(), "00000001");
        assert_eq!(encoder.encode(35).unwrap(), "0000000Z");
        assert_eq!(encoder.encode(36).unwrap(), "00000010");
        assert_eq!(encoder.encode(1_295).unwrap(), "000000ZZ");
        assert_eq!(encoder.encode(1_296).unwrap(), "00000100");
        assert_eq!(encoder.encode(2_821_109_907_455).unwrap(), "ZZZZZZZZ");
    }

    #[test]
    fn max_value_boundary() {
        let encoder = base36(8);
        assert_eq!(encoder.max_value(), 2_821_109_907_455);
        assert_eq!(encoder.encode(encoder.max_value()).unwrap(), "ZZZZZZZZ");

        let err = encoder.encode(encoder.max_value() + 1).unwrap_err();
        assert!(matches!(
            err,
            Error::Overflow {
                value: 2_821_109_907_456,
                max: 2_821_109_907_455
            }
        ));
    }

    #[test]
    fn wide_encoder_covers_all_u64() {
        let encoder = base36(13);
        assert_eq!(encoder.max_value(), u64::MAX);
        assert_eq!(encoder.encode(u64::MAX).unwrap(), "3W5E11264SGSF");

        let widest = base36(MAX_LENGTH);
        assert_eq!(widest.max_value(), u64::MAX);
        assert_eq!(widest.encode(1).unwrap().len(), MAX_LENGTH);
    }

    #[test]
    fn binary_alphabet_at_max_length_covers_all_u64() {
        let encoder = Encoder::new(Alphabet::new("01").unwrap(), MAX_LENGTH).unwrap();
        assert_eq!(encoder.max_value(), u64::MAX);
        assert_eq!(encoder.encode(u64::MAX).unwrap(), "1".repeat(MAX_LENGTH));
    }

    #[test]
    fn rejects_lengths_past_max() {
        for length in [MAX_LENGTH + 1, 1 << 20, usize::MAX] {
            assert!(matches!(
                Encoder::new(Alphabet::base36(), length),
                Err(Error::InvalidLength { length: l }) if l == length
            ));
        }
    }

    #[test]
    fn binary_alphabet() {
        let encoder = Encoder::new(Alphabet::new("01").unwrap(), 3).unwrap();
        assert_eq!(encoder.max_value(), 7);
        let all: Vec<_> = (0..=7).map(|v| encoder.encode(v).unwrap()).collect();
        assert_eq!(
            all,
            ["000", "001", "010", "011", "100", "101", "110", "111"]
        );
        assert!(encoder.encode(8).is_err());
    }

    #[test]
    fn custom_symbols_pad_with_first_symbol() {
        let encoder = Encoder::new(Alphabet::new("abc").unwrap(), 5).unwrap();
        assert_eq!(encoder.encode(0).unwrap(), "aaaaa");
        assert_eq!(encoder.encode(5).unwrap(), "aaabc");
    }

    #[test]
    fn fixed_length_for_every_representable_magnitude() {
        let encoder = base36(6);
        let mut value = 1_u64;
        while value <= encoder.max_value() {
            assert_eq!(encoder.encode(value).unwrap().len(), 6);
            value *= 7;
        }
    }

    #[test]
    fn encoding_preserves_order() {
        let encoder = base36(4);
        let mut prev = encoder.encode(0).unwrap();
        for value in (1..=encoder.max_value()).step_by(97) {
            let next = encoder.encode(value).unwrap();
            assert!(prev < next, "{prev} !< {next} at {value}");
            prev = next;
        }
    }

    #[test]
    fn rejects_zero_length() {
        assert!(matches!(
            Encoder::new(Alphabet::base36(), 0),
            Err(Error::InvalidLength { length: 0 })
        ));
    }

    #[test]
    fn encode_to_buf_checks_buffer_width() {
        let encoder = base36(8);
        let mut short = [0_u8; 7];
        assert!(matches!(
            encoder.encode_to_buf(1, &mut short),
            Err(Error::InvalidLength { length: 7 })
        ));

        let mut buf = [0_u8; 8];
        encoder.encode_to_buf(46_655, &mut buf).unwrap();
        assert_eq!(&buf, b"00000ZZZ");
    }

    #[test]
    fn default_is_base36_width_8() {
        assert_eq!(Encoder::default(), base36(8));
    }
}
