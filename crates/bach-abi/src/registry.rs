//! Primitive type names and the canonical type-string parser

use std::collections::HashMap;

use crate::config::AbiConfig;
use crate::error::{AbiError, Result};
use crate::types::{Param, ParamType};
use crate::validate::validate_param_type;

/// Read-only table mapping primitive type names to descriptors
///
/// Built once and never mutated; pass it by reference to whatever needs to
/// resolve type strings. [`AbiCodec`](crate::AbiCodec) owns one per profile.
///
/// ```rust
/// use bach_abi::{ParamType, TypeRegistry};
///
/// let registry = TypeRegistry::new();
/// let parsed = registry.parse("(address,uint256)[]").unwrap();
/// assert_eq!(parsed.type_string(), "(address,uint256)[]");
/// assert_eq!(registry.parse("uint"), Ok(ParamType::Uint(256)));
/// ```
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    primitives: HashMap<String, ParamType>,
}

impl TypeRegistry {
    /// Build the table of every primitive name
    pub fn new() -> Self {
        let mut primitives = HashMap::new();
        for bits in (8..=256).step_by(8) {
            primitives.insert(format!("uint{}", bits), ParamType::Uint(bits));
            primitives.insert(format!("int{}", bits), ParamType::Int(bits));
        }
        for size in 1..=32 {
            primitives.insert(format!("bytes{}", size), ParamType::FixedBytes(size));
        }
        primitives.insert("address".to_string(), ParamType::Address);
        primitives.insert("bool".to_string(), ParamType::Bool);
        primitives.insert("bytes".to_string(), ParamType::Bytes);
        primitives.insert("string".to_string(), ParamType::String);
        // Aliases resolve to their canonical forms
        primitives.insert("uint".to_string(), ParamType::Uint(256));
        primitives.insert("int".to_string(), ParamType::Int(256));
        primitives.insert("byte".to_string(), ParamType::FixedBytes(1));
        primitives.insert("fixed".to_string(), ParamType::Fixed(128, 18));

        tracing::debug!(entries = primitives.len(), "ABI type registry built");
        Self { primitives }
    }

    /// Look up a primitive name
    pub fn get(&self, name: &str) -> Option<&ParamType> {
        self.primitives.get(name)
    }

    /// Number of known primitive names
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Parse a type string with the default limits
    pub fn parse(&self, s: &str) -> Result<ParamType> {
        self.parse_with_config(s, &AbiConfig::default())
    }

    /// Parse a type string (e.g. `"(uint256,string)[2][]"`) and validate it
    pub fn parse_with_config(&self, s: &str, config: &AbiConfig) -> Result<ParamType> {
        let mut parser = Parser {
            registry: self,
            src: s.trim(),
            pos: 0,
            max_depth: config.max_depth,
        };
        let (param_type, _) = parser.parse_type(0)?;
        parser.skip_whitespace();
        if parser.pos != parser.src.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        validate_param_type(&param_type, config)?;
        Ok(param_type)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

struct Parser<'a> {
    registry: &'a TypeRegistry,
    src: &'a str,
    pos: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    /// Parse one type nested inside `depth` enclosing levels; also returns
    /// how many levels the parsed type itself spans
    fn parse_type(&mut self, depth: usize) -> Result<(ParamType, usize)> {
        self.skip_whitespace();
        let (mut param_type, mut levels) = if self.peek() == Some(b'(') {
            self.parse_tuple(depth)?
        } else {
            (self.parse_primitive()?, 0)
        };

        // Suffixes apply left to right: uint256[2][] is a dynamic array of uint256[2]
        while self.peek() == Some(b'[') {
            levels += 1;
            if depth + levels > self.max_depth {
                return Err(self.too_deep());
            }
            self.pos += 1;
            let digits = self.take_while(|b| b.is_ascii_digit());
            if self.peek() != Some(b']') {
                return Err(self.error("expected ']'"));
            }
            self.pos += 1;
            param_type = if digits.is_empty() {
                ParamType::Array(Box::new(param_type))
            } else {
                let len = digits
                    .parse::<usize>()
                    .map_err(|_| self.error("array length out of range"))?;
                ParamType::FixedArray(Box::new(param_type), len)
            };
        }
        Ok((param_type, levels))
    }

    fn parse_tuple(&mut self, depth: usize) -> Result<(ParamType, usize)> {
        if depth + 1 > self.max_depth {
            return Err(self.too_deep());
        }
        self.pos += 1; // '('
        let mut fields = Vec::new();
        let mut inner = 0;
        self.skip_whitespace();
        if self.peek() == Some(b')') {
            self.pos += 1;
            return Ok((ParamType::Tuple(fields), 1));
        }
        loop {
            let (kind, levels) = self.parse_type(depth + 1)?;
            fields.push(Param::unnamed(kind));
            inner = inner.max(levels);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {
                    self.pos += 1;
                    return Ok((ParamType::Tuple(fields), inner + 1));
                }
                _ => return Err(self.error("expected ',' or ')'")),
            }
        }
    }

    fn parse_primitive(&mut self) -> Result<ParamType> {
        let name = self.take_while(|b| b.is_ascii_alphanumeric());
        if name.is_empty() {
            return Err(self.error("expected a type name"));
        }
        if let Some(param_type) = self.registry.get(name) {
            return Ok(param_type.clone());
        }
        parse_fixed(name).ok_or_else(|| AbiError::UnsupportedType(format!("unknown type: {}", name)))
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &src[start..self.pos]
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn too_deep(&self) -> AbiError {
        AbiError::UnsupportedType(format!("nesting deeper than {} levels", self.max_depth))
    }

    fn error(&self, message: &str) -> AbiError {
        AbiError::UnsupportedType(format!("{} at byte {} of {:?}", message, self.pos, self.src))
    }
}

/// `fixed<M>x<N>`
fn parse_fixed(name: &str) -> Option<ParamType> {
    let (m, n) = name.strip_prefix("fixed")?.split_once('x')?;
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(m) || !digits(n) {
        return None;
    }
    Some(ParamType::Fixed(m.parse().ok()?, n.parse().ok()?))
}
