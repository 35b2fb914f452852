//! Signed fixed-point values for `fixed<M>x<N>`
//!
//! A [`FixedPoint`] is an exact decimal number. Before it reaches the wire
//! it is multiplied by the profile's scaling factor and must land on an
//! integer; that integer is then encoded as `int<M>`.
//!
//! | [`FixedScaling`] | factor | `fixed128x18` of `1.5` |
//! |---|---|---|
//! | `Decimal` (default) | `10^N` | `1500000000000000000` |
//! | `Binary` | `2^N` | `393216` |

use std::fmt;
use std::str::FromStr;

use bach_primitives::{U256, U512};
use serde::{Deserialize, Serialize};

use crate::error::{AbiError, Result};
use crate::int::I256;

/// How the `N` in `fixed<M>x<N>` scales a value into its raw integer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedScaling {
    /// `N` decimal places: raw = value * 10^N
    #[default]
    Decimal,
    /// `N` fractional bits: raw = value * 2^N
    Binary,
}

/// Exact signed decimal `mantissa * 10^-scale`, kept in lowest terms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FixedPoint {
    mantissa: I256,
    scale: u32,
}

impl FixedPoint {
    /// Create `mantissa * 10^-scale`
    pub fn new(mantissa: I256, scale: u32) -> Self {
        if mantissa.is_zero() {
            return Self::default();
        }
        let ten = U256::from(10u8);
        let mut abs = mantissa.abs();
        let mut scale = scale;
        while scale > 0 && (abs % ten).is_zero() {
            abs = abs / ten;
            scale -= 1;
        }
        Self {
            // Dividing a valid magnitude by ten keeps it in range.
            mantissa: I256::new(abs, mantissa.is_negative()).unwrap_or(mantissa),
            scale,
        }
    }

    /// Whole number
    pub fn from_integer(value: i128) -> Self {
        Self::new(I256::from_i128(value), 0)
    }

    /// Digits of the value without the decimal point
    pub fn mantissa(&self) -> I256 {
        self.mantissa
    }

    /// Number of decimal places
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Scale into the raw integer stored on the wire
    pub fn to_raw(&self, fraction: usize, scaling: FixedScaling) -> Result<I256> {
        let n = u32::try_from(fraction)
            .map_err(|_| AbiError::UnsupportedType(format!("fractional width {}", fraction)))?;
        let abs = match scaling {
            FixedScaling::Decimal => {
                if self.scale > n {
                    return Err(AbiError::TypeMismatch(format!(
                        "{} has more than {} decimal places",
                        self, n
                    )));
                }
                U256::from(10u8)
                    .checked_pow(U256::from(n - self.scale))
                    .and_then(|factor| self.mantissa.abs().checked_mul(factor))
            }
            FixedScaling::Binary => {
                if n >= 256 {
                    return Err(AbiError::UnsupportedType(format!(
                        "fractional width {}",
                        fraction
                    )));
                }
                let numerator = U512::from(self.mantissa.abs()) << (n as usize);
                let denominator = U512::from(10u8)
                    .checked_pow(U512::from(self.scale))
                    .ok_or_else(|| self.not_representable(n))?;
                if !(numerator % denominator).is_zero() {
                    return Err(self.not_representable(n));
                }
                U256::try_from(numerator / denominator).ok()
            }
        };
        abs.and_then(|abs| I256::new(abs, self.mantissa.is_negative()))
            .ok_or_else(|| AbiError::TypeMismatch(format!("{} overflows when scaled", self)))
    }

    /// Recover the value from its raw wire integer
    pub fn from_raw(raw: I256, fraction: usize, scaling: FixedScaling) -> Result<Self> {
        let n = u32::try_from(fraction)
            .map_err(|_| AbiError::UnsupportedType(format!("fractional width {}", fraction)))?;
        match scaling {
            FixedScaling::Decimal => Ok(Self::new(raw, n)),
            FixedScaling::Binary => {
                // x / 2^k == x * 5^k / 10^k, after cancelling common factors of two
                let mut abs = raw.abs();
                let mut k = n;
                while k > 0 && !abs.is_zero() && !abs.bit(0) {
                    abs = abs >> 1;
                    k -= 1;
                }
                let factor = U512::from(5u8)
                    .checked_pow(U512::from(k))
                    .ok_or_else(|| AbiError::UnsupportedType(format!("fractional width {}", n)))?;
                let mantissa = U512::from(abs)
                    .checked_mul(factor)
                    .and_then(|m| U256::try_from(m).ok())
                    .and_then(|m| I256::new(m, raw.is_negative()))
                    .ok_or_else(|| {
                        AbiError::TypeMismatch(format!(
                            "raw fixed value {} with {} fractional bits has no int256 decimal form",
                            raw, n
                        ))
                    })?;
                Ok(Self::new(mantissa, k))
            }
        }
    }

    fn not_representable(&self, bits: u32) -> AbiError {
        AbiError::TypeMismatch(format!(
            "{} is not exactly representable with {} fractional bits",
            self, bits
        ))
    }
}

impl From<i128> for FixedPoint {
    fn from(value: i128) -> Self {
        Self::from_integer(value)
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.abs().to_string();
        let sign = if self.mantissa.is_negative() { "-" } else { "" };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{}{}.{}", sign, int_part, frac_part)
        } else {
            write!(f, "{}0.{}{}", sign, "0".repeat(scale - digits.len()), digits)
        }
    }
}

impl FromStr for FixedPoint {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (sign, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let valid = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty()) || !valid(int_part) || !valid(frac_part) {
            return Err(AbiError::TypeMismatch(format!("invalid fixed-point literal: {:?}", s)));
        }
        let scale = u32::try_from(frac_part.len())
            .map_err(|_| AbiError::TypeMismatch(format!("too many decimal places: {:?}", s)))?;
        let mantissa: I256 = format!("{}{}{}", sign, int_part, frac_part).parse()?;
        Ok(Self::new(mantissa, scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(s: &str) -> FixedPoint {
        s.parse().unwrap()
    }

    // ==================== Parsing and display ====================

    #[test]
    fn test_parse_normalizes() {
        let value = fp("1.50");
        assert_eq!(value.mantissa(), I256::from_i128(15));
        assert_eq!(value.scale(), 1);
        assert_eq!(value, fp("1.5"));
        assert_eq!(fp("-0.000"), FixedPoint::default());
    }

    #[test]
    fn test_display() {
        assert_eq!(fp("-1.5").to_string(), "-1.5");
        assert_eq!(fp("0.005").to_string(), "0.005");
        assert_eq!(fp(".25").to_string(), "0.25");
        assert_eq!(FixedPoint::from_integer(42).to_string(), "42");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<FixedPoint>().is_err());
        assert!(".".parse::<FixedPoint>().is_err());
        assert!("1.2.3".parse::<FixedPoint>().is_err());
        assert!("1e5".parse::<FixedPoint>().is_err());
    }

    // ==================== Decimal scaling ====================

    #[test]
    fn test_decimal_to_raw() {
        let raw = fp("1.5").to_raw(18, FixedScaling::Decimal).unwrap();
        assert_eq!(raw.abs(), U256::from(15u64) * U256::exp10(17));
        assert!(!raw.is_negative());

        let raw = fp("-0.01").to_raw(2, FixedScaling::Decimal).unwrap();
        assert_eq!(raw, I256::from_i128(-1));
    }

    #[test]
    fn test_decimal_too_many_places() {
        assert!(matches!(
            fp("1.2345").to_raw(2, FixedScaling::Decimal),
            Err(AbiError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_decimal_from_raw() {
        let value = FixedPoint::from_raw(I256::from_i128(-1500), 3, FixedScaling::Decimal).unwrap();
        assert_eq!(value, fp("-1.5"));
    }

    // ==================== Binary scaling ====================

    #[test]
    fn test_binary_to_raw() {
        let raw = fp("1.5").to_raw(18, FixedScaling::Binary).unwrap();
        assert_eq!(raw, I256::from_i128(3 << 17));
    }

    #[test]
    fn test_binary_not_representable() {
        assert!(matches!(
            fp("0.1").to_raw(16, FixedScaling::Binary),
            Err(AbiError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_binary_from_raw() {
        let value = FixedPoint::from_raw(I256::from_i128(3 << 17), 18, FixedScaling::Binary).unwrap();
        assert_eq!(value, fp("1.5"));

        let value = FixedPoint::from_raw(I256::from_i128(-1), 1, FixedScaling::Binary).unwrap();
        assert_eq!(value, fp("-0.5"));

        let value = FixedPoint::from_raw(I256::from_i128(1), 16, FixedScaling::Binary).unwrap();
        assert_eq!(value.to_raw(16, FixedScaling::Binary).unwrap(), I256::from_i128(1));
    }
}
