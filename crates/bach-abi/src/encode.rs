//! ABI encoding

use bach_primitives::{padded_len, u256_to_word, usize_to_word, Word, WORD_SIZE};

use crate::config::AbiConfig;
use crate::error::{AbiError, Result};
use crate::token::Token;
use crate::types::ParamType;
use crate::validate::validate_params;

/// Encode tokens with the Solidity contract ABI head/tail layout
pub fn encode(tokens: &[Token]) -> Result<Vec<u8>> {
    encode_with_config(&AbiConfig::default(), tokens)
}

/// Encode tokens under an explicit configuration
pub fn encode_with_config(config: &AbiConfig, tokens: &[Token]) -> Result<Vec<u8>> {
    let types: Vec<ParamType> = tokens.iter().map(Token::param_type).collect();
    encode_params_with_config(config, &types, tokens)
}

/// Encode tokens against declared parameter types
pub fn encode_params(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>> {
    encode_params_with_config(&AbiConfig::default(), types, tokens)
}

/// Encode tokens against declared parameter types under an explicit configuration
pub fn encode_params_with_config(
    config: &AbiConfig,
    types: &[ParamType],
    tokens: &[Token],
) -> Result<Vec<u8>> {
    if types.len() != tokens.len() {
        return Err(AbiError::TypeArityMismatch {
            expected: types.len(),
            got: tokens.len(),
        });
    }
    validate_params(types, config)?;

    let pairs: Vec<(&ParamType, &Token)> = types.iter().zip(tokens.iter()).collect();
    Encoder { config }.encode_region(&pairs)
}

/// Encode function call (selector + params)
pub fn encode_function_call(selector: [u8; 4], tokens: &[Token]) -> Result<Vec<u8>> {
    let mut result = selector.to_vec();
    result.extend(encode(tokens)?);
    Ok(result)
}

/// Encode constructor arguments appended to contract bytecode
pub fn encode_constructor(bytecode: &[u8], tokens: &[Token]) -> Result<Vec<u8>> {
    let mut result = bytecode.to_vec();
    result.extend(encode(tokens)?);
    Ok(result)
}

struct Encoder<'a> {
    config: &'a AbiConfig,
}

impl Encoder<'_> {
    /// One head/tail pass: static values in place, dynamic values behind an
    /// offset relative to the start of this region.
    fn encode_region(&self, pairs: &[(&ParamType, &Token)]) -> Result<Vec<u8>> {
        let head_size: usize = pairs.iter().map(|(t, _)| t.head_len()).sum();

        let mut head = Vec::with_capacity(head_size);
        let mut tail = Vec::new();

        for (param_type, token) in pairs {
            if param_type.is_dynamic() {
                let offset = head_size + tail.len();
                head.extend_from_slice(&usize_to_word(offset));
                tail.extend(self.encode_token(param_type, token)?);
            } else {
                head.extend(self.encode_token(param_type, token)?);
            }
        }

        head.extend(tail);
        Ok(head)
    }

    /// Encode a single token
    fn encode_token(&self, param_type: &ParamType, token: &Token) -> Result<Vec<u8>> {
        match (param_type, token) {
            (ParamType::Address, Token::Address(addr)) => Ok(addr.to_word().to_vec()),
            (ParamType::Uint(bits), Token::Uint(token_bits, value)) => {
                if bits != token_bits || value.bits() > *bits {
                    return Err(mismatch(param_type, token));
                }
                Ok(u256_to_word(value).to_vec())
            }
            (ParamType::Int(bits), Token::Int(token_bits, value)) => {
                if bits != token_bits || !value.fits_bits(*bits) {
                    return Err(mismatch(param_type, token));
                }
                Ok(value.to_word().to_vec())
            }
            (ParamType::Bool, Token::Bool(b)) => {
                let mut word: Word = [0u8; WORD_SIZE];
                word[31] = u8::from(*b);
                Ok(word.to_vec())
            }
            (ParamType::FixedBytes(size), Token::FixedBytes(data)) => {
                if data.len() != *size {
                    return Err(mismatch(param_type, token));
                }
                let mut word: Word = [0u8; WORD_SIZE];
                word[..data.len()].copy_from_slice(data);
                Ok(word.to_vec())
            }
            (ParamType::Bytes, Token::Bytes(data)) => Ok(encode_bytes(data)),
            (ParamType::String, Token::String(s)) => Ok(encode_bytes(s.as_bytes())),
            (ParamType::Fixed(m, n), Token::Fixed(token_m, token_n, value)) => {
                if m != token_m || n != token_n {
                    return Err(mismatch(param_type, token));
                }
                let raw = value.to_raw(*n, self.config.fixed_scaling)?;
                if !raw.fits_bits(*m) {
                    return Err(AbiError::TypeMismatch(format!(
                        "{} does not fit {}",
                        value, param_type
                    )));
                }
                Ok(raw.to_word().to_vec())
            }
            (ParamType::Array(inner), Token::Array(element, tokens)) => {
                if !element.is_compatible(inner) {
                    return Err(mismatch(param_type, token));
                }
                let mut result = usize_to_word(tokens.len()).to_vec();
                let pairs: Vec<(&ParamType, &Token)> =
                    tokens.iter().map(|t| (inner.as_ref(), t)).collect();
                result.extend(self.encode_region(&pairs)?);
                Ok(result)
            }
            (ParamType::FixedArray(inner, len), Token::FixedArray(_, tokens)) => {
                if tokens.len() != *len {
                    return Err(AbiError::ArityMismatch {
                        expected: *len,
                        got: tokens.len(),
                    });
                }
                let pairs: Vec<(&ParamType, &Token)> =
                    tokens.iter().map(|t| (inner.as_ref(), t)).collect();
                self.encode_region(&pairs)
            }
            (ParamType::Tuple(fields), Token::Tuple(tokens)) => {
                if fields.len() != tokens.len() {
                    return Err(AbiError::TypeArityMismatch {
                        expected: fields.len(),
                        got: tokens.len(),
                    });
                }
                let pairs: Vec<(&ParamType, &Token)> =
                    fields.iter().map(|f| &f.kind).zip(tokens.iter()).collect();
                self.encode_region(&pairs)
            }
            _ => Err(mismatch(param_type, token)),
        }
    }
}

fn mismatch(param_type: &ParamType, token: &Token) -> AbiError {
    AbiError::TypeMismatch(format!("expected {}, got {:?}", param_type, token))
}

/// Encode dynamic bytes: length word, then content padded to a word boundary
fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut result = usize_to_word(data.len()).to_vec();
    result.extend_from_slice(data);
    result.resize(WORD_SIZE + padded_len(data.len()), 0);
    result
}
