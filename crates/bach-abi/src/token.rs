//! ABI values

use bach_primitives::{Address, PrimitiveError, H256, U256};

use crate::config::DEFAULT_MAX_STATIC_ARRAY_LEN;
use crate::error::{AbiError, Result};
use crate::fixed::FixedPoint;
use crate::int::I256;
use crate::types::{Param, ParamType};

/// Solidity ABI token types
///
/// Every token knows its exact [`ParamType`]: integers carry their bit
/// width and arrays carry their element type, so even an empty array
/// encodes unambiguously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Address (20 bytes)
    Address(Address),
    /// Unsigned integer: bit width, value
    Uint(usize, U256),
    /// Signed integer: bit width, value
    Int(usize, I256),
    /// Boolean
    Bool(bool),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// Fixed-size bytes (1-32)
    FixedBytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Signed fixed point: total bits, fractional width, value
    Fixed(usize, usize, FixedPoint),
    /// Dynamic array: element type, elements
    Array(ParamType, Vec<Token>),
    /// Fixed-size array: element type, elements
    FixedArray(ParamType, Vec<Token>),
    /// Tuple (struct)
    Tuple(Vec<Token>),
}

impl Token {
    /// Create an address token
    pub fn address(addr: Address) -> Self {
        Token::Address(addr)
    }

    /// Parse an address token from hex
    pub fn address_from_hex(s: &str) -> Result<Self> {
        let addr = Address::from_hex(s).map_err(PrimitiveError::from)?;
        Ok(Token::Address(addr))
    }

    /// Create a uint256 token
    pub fn uint256(value: U256) -> Self {
        Token::Uint(256, value)
    }

    /// Create a uint256 from u128
    pub fn uint256_from_u128(value: u128) -> Self {
        Token::Uint(256, U256::from(value))
    }

    /// Create a `uint<bits>` token; the width is checked when encoding
    pub fn uint(bits: usize, value: U256) -> Self {
        Token::Uint(bits, value)
    }

    /// Create an int256 token
    pub fn int256(value: I256) -> Self {
        Token::Int(256, value)
    }

    /// Create an `int<bits>` token; the width is checked when encoding
    pub fn int(bits: usize, value: I256) -> Self {
        Token::Int(bits, value)
    }

    /// Create a bool token
    pub fn bool(value: bool) -> Self {
        Token::Bool(value)
    }

    /// Create a bytes token
    pub fn bytes(data: Vec<u8>) -> Self {
        Token::Bytes(data)
    }

    /// Create a string token
    pub fn string(s: impl Into<String>) -> Self {
        Token::String(s.into())
    }

    /// Create a bytes32 token
    pub fn bytes32(data: H256) -> Self {
        Token::FixedBytes(data.as_bytes().to_vec())
    }

    /// Create a `bytes<N>` token where N is the data length
    pub fn fixed_bytes(data: impl Into<Vec<u8>>) -> Self {
        Token::FixedBytes(data.into())
    }

    /// Create a `fixed<m>x<n>` token
    pub fn fixed(m: usize, n: usize, value: FixedPoint) -> Self {
        Token::Fixed(m, n, value)
    }

    /// Create a tuple token
    pub fn tuple(tokens: Vec<Token>) -> Self {
        Token::Tuple(tokens)
    }

    /// Dynamic array whose element type is taken from its elements.
    ///
    /// Fails with [`AbiError::EmptyTypedArray`] when `tokens` is empty; use
    /// [`Token::empty_array`] for that case.
    pub fn array(tokens: Vec<Token>) -> Result<Self> {
        let element = infer_element(&tokens)?;
        Ok(Token::Array(element, tokens))
    }

    /// Dynamic array with an explicit element type
    pub fn array_of(element: ParamType, tokens: Vec<Token>) -> Result<Self> {
        check_elements(&element, &tokens)?;
        Ok(Token::Array(element, tokens))
    }

    /// Empty dynamic array of `element`
    pub fn empty_array(element: ParamType) -> Self {
        Token::Array(element, Vec::new())
    }

    /// Static array bounded by the default maximum length.
    ///
    /// With `expected = Some(n)` the element count must equal `n`
    /// ([`AbiError::ArityMismatch`]); without it the count must not exceed
    /// 1024 ([`AbiError::SizeOverflow`]).
    pub fn fixed_array(tokens: Vec<Token>, expected: Option<usize>) -> Result<Self> {
        Self::fixed_array_with_limit(tokens, expected, DEFAULT_MAX_STATIC_ARRAY_LEN)
    }

    /// Static array bounded by `max_len` when no explicit length is given
    pub fn fixed_array_with_limit(
        tokens: Vec<Token>,
        expected: Option<usize>,
        max_len: usize,
    ) -> Result<Self> {
        check_static_len(tokens.len(), expected, max_len)?;
        let element = infer_element(&tokens)?;
        Ok(Token::FixedArray(element, tokens))
    }

    /// Static array with an explicit element type
    pub fn fixed_array_of(
        element: ParamType,
        tokens: Vec<Token>,
        expected: Option<usize>,
    ) -> Result<Self> {
        check_static_len(tokens.len(), expected, DEFAULT_MAX_STATIC_ARRAY_LEN)?;
        if tokens.is_empty() {
            return Err(AbiError::UnsupportedType(format!("{}[0]", element)));
        }
        check_elements(&element, &tokens)?;
        Ok(Token::FixedArray(element, tokens))
    }

    /// Get the type of this token
    pub fn param_type(&self) -> ParamType {
        match self {
            Token::Address(_) => ParamType::Address,
            Token::Uint(bits, _) => ParamType::Uint(*bits),
            Token::Int(bits, _) => ParamType::Int(*bits),
            Token::Bool(_) => ParamType::Bool,
            Token::Bytes(_) => ParamType::Bytes,
            Token::FixedBytes(b) => ParamType::FixedBytes(b.len()),
            Token::String(_) => ParamType::String,
            Token::Fixed(m, n, _) => ParamType::Fixed(*m, *n),
            Token::Array(element, _) => ParamType::Array(Box::new(element.clone())),
            Token::FixedArray(element, tokens) => {
                ParamType::FixedArray(Box::new(element.clone()), tokens.len())
            }
            Token::Tuple(tokens) => {
                ParamType::Tuple(tokens.iter().map(|t| Param::unnamed(t.param_type())).collect())
            }
        }
    }

    /// Get the address, if this is an address token
    pub fn as_address(&self) -> Option<&Address> {
        match self {
            Token::Address(addr) => Some(addr),
            _ => None,
        }
    }

    /// Get the value of an unsigned integer token
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Token::Uint(_, value) => Some(*value),
            _ => None,
        }
    }

    /// Get the value of a signed integer token
    pub fn as_int(&self) -> Option<I256> {
        match self {
            Token::Int(_, value) => Some(*value),
            _ => None,
        }
    }

    /// Get the value of a bool token
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Token::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the content of a string token
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Token::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the content of a bytes or fixed-bytes token
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Token::Bytes(b) | Token::FixedBytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get the children of an array, fixed array or tuple token
    pub fn as_slice(&self) -> Option<&[Token]> {
        match self {
            Token::Array(_, tokens) | Token::FixedArray(_, tokens) | Token::Tuple(tokens) => {
                Some(tokens)
            }
            _ => None,
        }
    }
}

fn check_static_len(len: usize, expected: Option<usize>, max_len: usize) -> Result<()> {
    match expected {
        Some(expected) if expected != len => Err(AbiError::ArityMismatch { expected, got: len }),
        None if len > max_len => Err(AbiError::SizeOverflow { len, max: max_len }),
        _ => Ok(()),
    }
}

fn infer_element(tokens: &[Token]) -> Result<ParamType> {
    let first = tokens.first().ok_or(AbiError::EmptyTypedArray)?;
    let element = first.param_type();
    check_elements(&element, &tokens[1..])?;
    Ok(element)
}

fn check_elements(element: &ParamType, tokens: &[Token]) -> Result<()> {
    for (i, token) in tokens.iter().enumerate() {
        let actual = token.param_type();
        if !actual.is_compatible(element) {
            return Err(AbiError::TypeMismatch(format!(
                "array element {} is {}, expected {}",
                i, actual, element
            )));
        }
    }
    Ok(())
}
