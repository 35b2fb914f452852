//! Signed 256-bit integer

use std::fmt;
use std::str::FromStr;

use bach_primitives::{u256_to_word, word_to_u256, Word, U256};

use crate::error::AbiError;

/// Signed 256-bit integer
///
/// Stored as sign and magnitude; the magnitude never exceeds 2^255 and zero
/// is never negative, so derived equality is value equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct I256 {
    abs: U256,
    negative: bool,
}

/// 2^255, the magnitude of the smallest representable value
fn sign_bit() -> U256 {
    U256::one() << 255
}

fn twos_complement(value: U256) -> U256 {
    (!value).overflowing_add(U256::one()).0
}

impl I256 {
    /// Zero
    pub const ZERO: I256 = I256 {
        abs: U256::zero(),
        negative: false,
    };

    /// Create from magnitude and sign, `None` when outside the int256 range
    pub fn new(abs: U256, negative: bool) -> Option<Self> {
        if abs.is_zero() {
            return Some(Self::ZERO);
        }
        let limit = sign_bit();
        if (negative && abs > limit) || (!negative && abs >= limit) {
            return None;
        }
        Some(Self { abs, negative })
    }

    /// Create from i128
    pub fn from_i128(value: i128) -> Self {
        Self {
            abs: U256::from(value.unsigned_abs()),
            negative: value < 0,
        }
    }

    /// Absolute value
    pub fn abs(&self) -> U256 {
        self.abs
    }

    /// Check if negative
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }

    /// Whether the value is representable as `int<bits>`
    pub fn fits_bits(&self, bits: usize) -> bool {
        if bits >= 256 {
            return true;
        }
        if bits == 0 {
            return self.is_zero();
        }
        let limit = U256::one() << (bits - 1);
        if self.negative {
            self.abs <= limit
        } else {
            self.abs < limit
        }
    }

    /// Two's complement big-endian word, sign-extended to 32 bytes
    pub fn to_word(&self) -> Word {
        if self.negative {
            u256_to_word(&twos_complement(self.abs))
        } else {
            u256_to_word(&self.abs)
        }
    }

    /// Interpret a word as a two's complement int256
    pub fn from_word(word: &Word) -> Self {
        let raw = word_to_u256(word);
        if word[0] & 0x80 != 0 {
            Self {
                abs: twos_complement(raw),
                negative: true,
            }
        } else {
            Self {
                abs: raw,
                negative: false,
            }
        }
    }

    /// Interpret only the low `bits` of a word, sign-extending from bit `bits - 1`.
    ///
    /// `bits` must be a multiple of 8.
    pub fn from_word_truncated(word: &Word, bits: usize) -> Self {
        let width = (bits / 8).clamp(1, 32);
        let start = 32 - width;
        let fill = if word[start] & 0x80 != 0 { 0xff } else { 0x00 };
        let mut extended = *word;
        extended[..start].fill(fill);
        Self::from_word(&extended)
    }

    /// Convert to i128 if it fits
    pub fn to_i128(&self) -> Option<i128> {
        if self.abs.bits() > 127 {
            let min = U256::one() << 127;
            return (self.negative && self.abs == min).then_some(i128::MIN);
        }
        let magnitude = self.abs.as_u128() as i128;
        Some(if self.negative { -magnitude } else { magnitude })
    }
}

impl From<i128> for I256 {
    fn from(value: i128) -> Self {
        Self::from_i128(value)
    }
}

impl From<i64> for I256 {
    fn from(value: i64) -> Self {
        Self::from_i128(value as i128)
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.abs)
        } else {
            write!(f, "{}", self.abs)
        }
    }
}

impl FromStr for I256 {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AbiError::TypeMismatch(format!("invalid integer: {:?}", s)));
        }
        let abs = U256::from_dec_str(digits)
            .map_err(|_| AbiError::TypeMismatch(format!("integer out of range: {}", s)))?;
        Self::new(abs, negative)
            .ok_or_else(|| AbiError::TypeMismatch(format!("integer out of range: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i256_from_i128() {
        let positive = I256::from_i128(100);
        assert!(!positive.is_negative());
        assert_eq!(positive.abs(), U256::from(100));

        let negative = I256::from_i128(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs(), U256::from(100));

        assert!(I256::from_i128(0).is_zero());
        assert_eq!(I256::from_i128(i128::MIN).to_i128(), Some(i128::MIN));
    }

    #[test]
    fn test_negative_zero_normalizes() {
        assert_eq!(I256::new(U256::zero(), true), Some(I256::ZERO));
    }

    #[test]
    fn test_range() {
        let min = sign_bit();
        assert!(I256::new(min, true).is_some());
        assert!(I256::new(min, false).is_none());
        assert!(I256::new(min + 1, true).is_none());
    }

    #[test]
    fn test_minus_one_word() {
        let word = I256::from_i128(-1).to_word();
        assert_eq!(word, [0xff; 32]);
        assert_eq!(I256::from_word(&word), I256::from_i128(-1));
    }

    #[test]
    fn test_min_word_round_trip() {
        let min = I256::new(sign_bit(), true).unwrap();
        let word = min.to_word();
        assert_eq!(word[0], 0x80);
        assert!(word[1..].iter().all(|&b| b == 0));
        assert_eq!(I256::from_word(&word), min);
    }

    #[test]
    fn test_fits_bits() {
        assert!(I256::from_i128(127).fits_bits(8));
        assert!(I256::from_i128(-128).fits_bits(8));
        assert!(!I256::from_i128(128).fits_bits(8));
        assert!(!I256::from_i128(-129).fits_bits(8));
        assert!(I256::from_i128(-129).fits_bits(16));
    }

    #[test]
    fn test_from_word_truncated_sign_extends() {
        let mut word = [0u8; 32];
        word[31] = 0xff;
        assert_eq!(I256::from_word_truncated(&word, 8), I256::from_i128(-1));
        assert_eq!(I256::from_word_truncated(&word, 16), I256::from_i128(255));
    }

    #[test]
    fn test_parse_and_display() {
        let value: I256 = "-12345".parse().unwrap();
        assert_eq!(value, I256::from_i128(-12345));
        assert_eq!(value.to_string(), "-12345");
        assert!("12a".parse::<I256>().is_err());
        assert!("-".parse::<I256>().is_err());
    }
}
