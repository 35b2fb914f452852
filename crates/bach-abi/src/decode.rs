//! ABI decoding

use std::cell::Cell;
use std::iter;

use bach_primitives::{word_to_u256, Address, Word, U256, WORD_SIZE};

use crate::config::AbiConfig;
use crate::error::{AbiError, Result};
use crate::fixed::FixedPoint;
use crate::int::I256;
use crate::token::Token;
use crate::types::ParamType;
use crate::validate::validate_params;

/// Decode tokens from ABI-encoded data
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>> {
    decode_with_config(&AbiConfig::default(), types, data)
}

/// Decode tokens under an explicit configuration.
///
/// Bytes after the last value are ignored.
pub fn decode_with_config(config: &AbiConfig, types: &[ParamType], data: &[u8]) -> Result<Vec<Token>> {
    validate_params(types, config)?;
    Decoder {
        config,
        data,
        consumed: Cell::new(0),
    }
    .decode_region(types, 0)
}

struct Decoder<'a> {
    config: &'a AbiConfig,
    data: &'a [u8],
    /// Bytes read so far, counting every revisit through a shared offset.
    /// A canonical encoding reads each byte at most once.
    consumed: Cell<usize>,
}

impl<'a> Decoder<'a> {
    /// Decode one head/tail region starting at `start`. Offsets found in the
    /// head are relative to `start`.
    fn decode_region<'t, I>(&self, types: I, start: usize) -> Result<Vec<Token>>
    where
        I: IntoIterator<Item = &'t ParamType>,
    {
        let mut cursor = start;
        let mut tokens = Vec::new();

        for param_type in types {
            if param_type.is_dynamic() {
                let offset = self.read_offset(cursor)?;
                let at = start.checked_add(offset).ok_or_else(|| self.truncated(usize::MAX))?;
                tokens.push(self.decode_at(param_type, at)?);
                cursor += WORD_SIZE;
            } else {
                tokens.push(self.decode_at(param_type, cursor)?);
                cursor = cursor
                    .checked_add(param_type.head_len())
                    .ok_or_else(|| self.truncated(usize::MAX))?;
            }
        }

        Ok(tokens)
    }

    /// Decode a single token whose encoding starts at `at`
    fn decode_at(&self, param_type: &ParamType, at: usize) -> Result<Token> {
        match param_type {
            ParamType::Address => {
                let word = self.word(at)?;
                if self.config.strict_padding && word[..Address::WORD_PADDING].iter().any(|&b| b != 0) {
                    return Err(dirty(param_type, word));
                }
                Ok(Token::Address(Address::from_word(word)))
            }
            ParamType::Uint(bits) => {
                let word = self.word(at)?;
                let mut value = word_to_u256(word);
                if value.bits() > *bits {
                    if self.config.strict_padding {
                        return Err(dirty(param_type, word));
                    }
                    value = value & ((U256::one() << *bits) - U256::one());
                }
                Ok(Token::Uint(*bits, value))
            }
            ParamType::Int(bits) => Ok(Token::Int(*bits, self.read_int(param_type, *bits, at)?)),
            ParamType::Bool => {
                let word = self.word(at)?;
                let clean = word[..WORD_SIZE - 1].iter().all(|&b| b == 0) && word[WORD_SIZE - 1] <= 1;
                if !clean && self.config.strict_padding {
                    return Err(dirty(param_type, word));
                }
                Ok(Token::Bool(word.iter().any(|&b| b != 0)))
            }
            ParamType::FixedBytes(size) => {
                let word = self.word(at)?;
                if self.config.strict_padding && word[*size..].iter().any(|&b| b != 0) {
                    return Err(dirty(param_type, word));
                }
                Ok(Token::FixedBytes(word[..*size].to_vec()))
            }
            ParamType::Fixed(m, n) => {
                let raw = self.read_int(param_type, *m, at)?;
                let value = FixedPoint::from_raw(raw, *n, self.config.fixed_scaling)?;
                Ok(Token::Fixed(*m, *n, value))
            }
            ParamType::Bytes => Ok(Token::Bytes(self.read_bytes(at)?.to_vec())),
            ParamType::String => {
                let s = std::str::from_utf8(self.read_bytes(at)?)
                    .map_err(|e| AbiError::TypeMismatch(format!("invalid UTF-8: {}", e)))?;
                Ok(Token::String(s.to_string()))
            }
            ParamType::Array(inner) => {
                let len = self.read_len(at)?;
                let start = at + WORD_SIZE;
                self.check_room(start, len, inner.head_len())?;
                let tokens = self.decode_region(iter::repeat(inner.as_ref()).take(len), start)?;
                Ok(Token::Array(inner.as_ref().clone(), tokens))
            }
            ParamType::FixedArray(inner, len) => {
                self.check_room(at, *len, inner.head_len())?;
                let tokens = self.decode_region(iter::repeat(inner.as_ref()).take(*len), at)?;
                Ok(Token::FixedArray(inner.as_ref().clone(), tokens))
            }
            ParamType::Tuple(fields) => {
                let tokens = self.decode_region(fields.iter().map(|f| &f.kind), at)?;
                Ok(Token::Tuple(tokens))
            }
        }
    }

    /// Read the word at `at`
    fn word(&self, at: usize) -> Result<&'a Word> {
        let data = self.data;
        let end = at.checked_add(WORD_SIZE).ok_or_else(|| self.truncated(usize::MAX))?;
        let word = data
            .get(at..end)
            .and_then(|slice| <&Word>::try_from(slice).ok())
            .ok_or_else(|| self.truncated(end))?;
        self.consume(WORD_SIZE)?;
        Ok(word)
    }

    /// Read a signed word declared as `bits` wide
    fn read_int(&self, param_type: &ParamType, bits: usize, at: usize) -> Result<I256> {
        let word = self.word(at)?;
        if !self.config.strict_padding {
            return Ok(I256::from_word_truncated(word, bits));
        }
        let value = I256::from_word(word);
        if !value.fits_bits(bits) {
            return Err(dirty(param_type, word));
        }
        Ok(value)
    }

    /// Read an offset word; it must be word-aligned and fit in `usize`
    fn read_offset(&self, at: usize) -> Result<usize> {
        let value = word_to_u256(self.word(at)?);
        if !(value % U256::from(WORD_SIZE)).is_zero() {
            return Err(AbiError::MalformedOffset(format!(
                "offset {} at byte {} is not a multiple of {}",
                value, at, WORD_SIZE
            )));
        }
        if value > U256::from(usize::MAX) {
            return Err(AbiError::MalformedOffset(format!(
                "offset {} at byte {} does not fit in memory",
                value, at
            )));
        }
        Ok(value.as_usize())
    }

    /// Read a length word; anything longer than the input is truncated input
    fn read_len(&self, at: usize) -> Result<usize> {
        let value = word_to_u256(self.word(at)?);
        if value > U256::from(self.data.len()) {
            let needed = if value > U256::from(usize::MAX) {
                usize::MAX
            } else {
                value.as_usize()
            };
            return Err(self.truncated(needed));
        }
        Ok(value.as_usize())
    }

    /// Length-prefixed content of `bytes` or `string`
    fn read_bytes(&self, at: usize) -> Result<&'a [u8]> {
        let data = self.data;
        let len = self.read_len(at)?;
        let start = at + WORD_SIZE;
        let end = start.checked_add(len).ok_or_else(|| self.truncated(usize::MAX))?;
        let content = data.get(start..end).ok_or_else(|| self.truncated(end))?;
        self.consume(len)?;
        Ok(content)
    }

    /// Charge `len` bytes against the input size, so offsets that alias the
    /// same region cannot multiply the work
    fn consume(&self, len: usize) -> Result<()> {
        let total = self.consumed.get().saturating_add(len);
        if total > self.data.len() {
            tracing::debug!(
                consumed = total,
                available = self.data.len(),
                "ABI decode read budget exhausted"
            );
            return Err(self.truncated(total));
        }
        self.consumed.set(total);
        Ok(())
    }

    /// Refuse element counts that cannot fit in what is left of the input,
    /// before anything is allocated for them
    fn check_room(&self, start: usize, count: usize, stride: usize) -> Result<()> {
        let needed = count
            .checked_mul(stride)
            .and_then(|size| size.checked_add(start))
            .unwrap_or(usize::MAX);
        if needed > self.data.len() {
            return Err(self.truncated(needed));
        }
        Ok(())
    }

    fn truncated(&self, needed: usize) -> AbiError {
        AbiError::TruncatedInput {
            needed,
            available: self.data.len(),
        }
    }
}

fn dirty(param_type: &ParamType, word: &Word) -> AbiError {
    AbiError::TypeMismatch(format!(
        "invalid {} word 0x{}",
        param_type,
        hex::encode(word)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{encode, encode_with_config};
    use crate::fixed::FixedScaling;
    use bach_primitives::{u256_to_word, usize_to_word};

    fn word(n: usize) -> Vec<u8> {
        usize_to_word(n).to_vec()
    }

    fn round_trip(tokens: Vec<Token>) {
        let types: Vec<ParamType> = tokens.iter().map(Token::param_type).collect();
        let encoded = encode(&tokens).unwrap();
        assert_eq!(decode(&types, &encoded).unwrap(), tokens);
    }

    // ==================== Leaf Tests ====================

    #[test]
    fn test_decode_address() {
        let addr = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d").unwrap();
        let encoded = encode(&[Token::Address(addr)]).unwrap();
        let decoded = decode(&[ParamType::Address], &encoded).unwrap();

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0], Token::Address(addr));
    }

    #[test]
    fn test_decode_uint() {
        let value = U256::from(12345u64);
        let encoded = encode(&[Token::uint256(value)]).unwrap();
        let decoded = decode(&[ParamType::Uint(256)], &encoded).unwrap();

        assert_eq!(decoded[0], Token::uint256(value));
    }

    #[test]
    fn test_decode_negative_int() {
        round_trip(vec![
            Token::int(8, I256::from_i128(-128)),
            Token::int(64, I256::from_i128(-1)),
            Token::int256(I256::from_i128(i128::MIN)),
        ]);
    }

    #[test]
    fn test_decode_bool() {
        let decoded = decode(&[ParamType::Bool, ParamType::Bool], &[word(1), word(0)].concat()).unwrap();
        assert_eq!(decoded, vec![Token::Bool(true), Token::Bool(false)]);
    }

    #[test]
    fn test_decode_string() {
        round_trip(vec![Token::string("Hello, World!")]);
        round_trip(vec![Token::string("")]);
        round_trip(vec![Token::string("x".repeat(33))]);
    }

    #[test]
    fn test_decode_fixed_scalings() {
        let value: FixedPoint = "-2.25".parse().unwrap();
        let tokens = vec![Token::fixed(128, 18, value)];
        round_trip(tokens.clone());

        let binary = AbiConfig::default().with_fixed_scaling(FixedScaling::Binary);
        let encoded = encode_with_config(&binary, &tokens).unwrap();
        let decoded = decode_with_config(&binary, &[ParamType::Fixed(128, 18)], &encoded).unwrap();
        assert_eq!(decoded, tokens);
    }

    // ==================== Container Tests ====================

    #[test]
    fn test_decode_uint_and_string() {
        let mut abc = b"abc".to_vec();
        abc.resize(32, 0);
        let data = [word(1), word(64), word(3), abc].concat();

        let decoded = decode(&[ParamType::Uint(256), ParamType::String], &data).unwrap();
        assert_eq!(decoded, vec![Token::uint256(U256::one()), Token::string("abc")]);
    }

    #[test]
    fn test_decode_nested_dynamic() {
        round_trip(vec![
            Token::array(vec![Token::string("a"), Token::string("bcd")]).unwrap(),
            Token::tuple(vec![
                Token::uint256(U256::from(9)),
                Token::array(vec![Token::bytes(vec![1; 40])]).unwrap(),
                Token::tuple(vec![Token::Bool(true), Token::uint(8, U256::from(3))]),
            ]),
            Token::fixed_array(vec![Token::string("x"), Token::string("y")], Some(2)).unwrap(),
            Token::empty_array(ParamType::tuple(vec![ParamType::String])),
        ]);
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let mut data = word(7);
        data.extend_from_slice(&[0xee; 5]);
        let decoded = decode(&[ParamType::Uint(256)], &data).unwrap();
        assert_eq!(decoded, vec![Token::uint256(U256::from(7))]);
    }

    // ==================== Malformed Input Tests ====================

    #[test]
    fn test_decode_insufficient_data() {
        let result = decode(&[ParamType::Uint(256)], &[0u8; 16]);
        assert_eq!(result, Err(AbiError::TruncatedInput { needed: 32, available: 16 }));
    }

    #[test]
    fn test_offset_past_end() {
        let data = [word(64), word(1)].concat();
        let result = decode(&[ParamType::String], &data);
        assert!(matches!(result, Err(AbiError::TruncatedInput { .. })));
    }

    #[test]
    fn test_misaligned_offset() {
        let data = [word(33), word(0), word(0)].concat();
        let result = decode(&[ParamType::Bytes], &data);
        assert!(matches!(result, Err(AbiError::MalformedOffset(_))));
    }

    #[test]
    fn test_huge_offset() {
        let mut data = u256_to_word(&(U256::MAX - U256::from(31))).to_vec();
        data.extend(word(0));
        let result = decode(&[ParamType::Bytes], &data);
        assert!(matches!(result, Err(AbiError::MalformedOffset(_))));
    }

    #[test]
    fn test_length_past_end() {
        let data = [word(32), word(1000)].concat();
        let result = decode(&[ParamType::Bytes], &data);
        assert!(matches!(result, Err(AbiError::TruncatedInput { .. })));
    }

    #[test]
    fn test_huge_array_length_is_rejected_before_allocating() {
        let mut data = word(32);
        data.extend(u256_to_word(&U256::from(u64::MAX)));
        let result = decode(&[ParamType::array(ParamType::Uint(256))], &data);
        assert!(matches!(result, Err(AbiError::TruncatedInput { .. })));

        // Fits the input as a count, but not once every element needs a word
        let data = [word(32), word(2), word(1)].concat();
        let result = decode(&[ParamType::array(ParamType::Uint(256))], &data);
        assert!(matches!(result, Err(AbiError::TruncatedInput { .. })));
    }

    /// `depth` nested `uint256[]` levels with `fanout` elements each, where
    /// every element offset of a level points at one shared child
    fn shared_child_arrays(depth: usize, fanout: usize) -> (ParamType, Vec<u8>) {
        let mut kind = ParamType::array(ParamType::Uint(256));
        let mut region = word(fanout);
        for _ in 0..fanout {
            region.extend(word(1));
        }
        for _ in 1..depth {
            kind = ParamType::array(kind);
            let mut outer = word(fanout);
            for _ in 0..fanout {
                outer.extend(word(fanout * WORD_SIZE));
            }
            outer.extend(region);
            region = outer;
        }
        (kind, [word(32), region].concat())
    }

    #[test]
    fn test_shared_offsets_exhaust_read_budget() {
        let (kind, data) = shared_child_arrays(1, 4);
        let decoded = decode(&[kind], &data).unwrap();
        assert_eq!(decoded[0].as_slice().map(<[Token]>::len), Some(4));

        // Two elements pointing at the same child read it twice
        let (kind, data) = shared_child_arrays(2, 2);
        assert!(matches!(
            decode(&[kind], &data),
            Err(AbiError::TruncatedInput { .. })
        ));

        // 4^12 leaves from under 2 KiB of input
        let (kind, data) = shared_child_arrays(12, 4);
        assert!(data.len() < 2048);
        assert!(matches!(
            decode(&[kind], &data),
            Err(AbiError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut content = vec![0xff, 0xfe];
        content.resize(32, 0);
        let data = [word(32), word(2), content].concat();
        let result = decode(&[ParamType::String], &data);
        assert!(matches!(result, Err(AbiError::TypeMismatch(_))));
    }

    #[test]
    fn test_invalid_descriptor() {
        let result = decode(&[ParamType::Uint(7)], &word(1));
        assert!(matches!(result, Err(AbiError::UnsupportedType(_))));
    }

    // ==================== Padding Tests ====================

    #[test]
    fn test_dirty_padding_strict() {
        let mut dirty_addr = word(1);
        dirty_addr[0] = 1;
        assert!(matches!(
            decode(&[ParamType::Address], &dirty_addr),
            Err(AbiError::TypeMismatch(_))
        ));

        assert!(matches!(
            decode(&[ParamType::Uint(8)], &word(256)),
            Err(AbiError::TypeMismatch(_))
        ));
        assert!(matches!(
            decode(&[ParamType::Bool], &word(2)),
            Err(AbiError::TypeMismatch(_))
        ));
        // 0x80 in the low byte is out of range for int8 unless sign-extended
        assert!(matches!(
            decode(&[ParamType::Int(8)], &word(0x80)),
            Err(AbiError::TypeMismatch(_))
        ));

        let mut dirty_bytes = vec![0u8; 32];
        dirty_bytes[0] = 0xaa;
        dirty_bytes[5] = 1;
        assert!(matches!(
            decode(&[ParamType::FixedBytes(4)], &dirty_bytes),
            Err(AbiError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_dirty_padding_lenient() {
        let lenient = AbiConfig::default().with_strict_padding(false);

        let decoded = decode_with_config(&lenient, &[ParamType::Uint(8)], &word(0x1ff)).unwrap();
        assert_eq!(decoded, vec![Token::uint(8, U256::from(0xff))]);

        let decoded = decode_with_config(&lenient, &[ParamType::Int(8)], &word(0x80)).unwrap();
        assert_eq!(decoded, vec![Token::int(8, I256::from_i128(-128))]);

        let decoded = decode_with_config(&lenient, &[ParamType::Bool], &word(2)).unwrap();
        assert_eq!(decoded, vec![Token::Bool(true)]);

        let mut data = vec![0u8; 32];
        data[0] = 0xaa;
        data[31] = 0x01;
        let decoded = decode_with_config(&lenient, &[ParamType::FixedBytes(1)], &data).unwrap();
        assert_eq!(decoded, vec![Token::FixedBytes(vec![0xaa])]);
    }
}
