//! ABI type descriptors

use std::fmt;

use bach_primitives::WORD_SIZE;

/// Solidity parameter types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Address
    Address,
    /// Unsigned integer with bit size (8, 16, ..., 256)
    Uint(usize),
    /// Signed integer with bit size (8, 16, ..., 256)
    Int(usize),
    /// Boolean
    Bool,
    /// Dynamic bytes
    Bytes,
    /// Fixed-size bytes (size 1-32)
    FixedBytes(usize),
    /// UTF-8 string
    String,
    /// Signed fixed point: total bits, fractional width
    Fixed(usize, usize),
    /// Dynamic array
    Array(Box<ParamType>),
    /// Fixed-size array
    FixedArray(Box<ParamType>, usize),
    /// Tuple (struct)
    Tuple(Vec<Param>),
}

/// A tuple field or function parameter: optional name plus type
///
/// Names are carried for callers but never affect the encoding or the
/// canonical type string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    /// Field name, if the interface declared one
    pub name: Option<String>,
    /// Field type
    pub kind: ParamType,
}

/// Whether a type's encoded size depends on its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Fixed size, encoded in place
    Static,
    /// Value-dependent size, encoded in the tail behind an offset
    Dynamic,
}

/// Classify a type descriptor
pub fn classify(param_type: &ParamType) -> Encoding {
    if param_type.is_dynamic() {
        Encoding::Dynamic
    } else {
        Encoding::Static
    }
}

impl Param {
    /// Create a named parameter
    pub fn new(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            name: Some(name.into()),
            kind,
        }
    }

    /// Create an unnamed parameter
    pub fn unnamed(kind: ParamType) -> Self {
        Self { name: None, kind }
    }
}

impl From<ParamType> for Param {
    fn from(kind: ParamType) -> Self {
        Param::unnamed(kind)
    }
}

impl ParamType {
    /// Dynamic array of `element`
    pub fn array(element: ParamType) -> Self {
        ParamType::Array(Box::new(element))
    }

    /// Static array of `len` elements
    pub fn fixed_array(element: ParamType, len: usize) -> Self {
        ParamType::FixedArray(Box::new(element), len)
    }

    /// Tuple of unnamed fields
    pub fn tuple(fields: Vec<ParamType>) -> Self {
        ParamType::Tuple(fields.into_iter().map(Param::unnamed).collect())
    }

    /// Check if this type is dynamic (variable length)
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            ParamType::Tuple(fields) => fields.iter().any(|f| f.kind.is_dynamic()),
            ParamType::Address
            | ParamType::Uint(_)
            | ParamType::Int(_)
            | ParamType::Bool
            | ParamType::FixedBytes(_)
            | ParamType::Fixed(_, _) => false,
        }
    }

    /// Whether the value fits in a single word (no container)
    pub fn is_value_type(&self) -> bool {
        matches!(
            self,
            ParamType::Address
                | ParamType::Uint(_)
                | ParamType::Int(_)
                | ParamType::Bool
                | ParamType::FixedBytes(_)
                | ParamType::Fixed(_, _)
        )
    }

    /// Bytes occupied in a head region.
    ///
    /// Dynamic types take one offset word; static containers are laid out in
    /// place. Saturates on absurd static sizes, which validation rejects.
    pub fn head_len(&self) -> usize {
        if self.is_dynamic() {
            return WORD_SIZE;
        }
        match self {
            ParamType::FixedArray(inner, len) => inner.head_len().saturating_mul(*len),
            ParamType::Tuple(fields) => fields
                .iter()
                .fold(0usize, |acc, f| acc.saturating_add(f.kind.head_len())),
            _ => WORD_SIZE,
        }
    }

    /// Canonical type string, e.g. `(uint256,string)[2][]`
    pub fn type_string(&self) -> String {
        self.to_string()
    }

    /// Structural equality that ignores tuple field names
    pub fn is_compatible(&self, other: &ParamType) -> bool {
        match (self, other) {
            (ParamType::Array(a), ParamType::Array(b)) => a.is_compatible(b),
            (ParamType::FixedArray(a, n), ParamType::FixedArray(b, m)) => {
                n == m && a.is_compatible(b)
            }
            (ParamType::Tuple(a), ParamType::Tuple(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|(x, y)| x.kind.is_compatible(&y.kind))
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => f.write_str("address"),
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Int(bits) => write!(f, "int{}", bits),
            ParamType::Bool => f.write_str("bool"),
            ParamType::Bytes => f.write_str("bytes"),
            ParamType::FixedBytes(size) => write!(f, "bytes{}", size),
            ParamType::String => f.write_str("string"),
            ParamType::Fixed(m, n) => write!(f, "fixed{}x{}", m, n),
            ParamType::Array(inner) => write!(f, "{}[]", inner),
            ParamType::FixedArray(inner, len) => write!(f, "{}[{}]", inner, len),
            ParamType::Tuple(fields) => {
                f.write_str("(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", field.kind)?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_type_is_dynamic() {
        assert!(!ParamType::Address.is_dynamic());
        assert!(!ParamType::Uint(256).is_dynamic());
        assert!(!ParamType::Bool.is_dynamic());
        assert!(!ParamType::FixedBytes(32).is_dynamic());
        assert!(!ParamType::Fixed(128, 18).is_dynamic());

        assert!(ParamType::Bytes.is_dynamic());
        assert!(ParamType::String.is_dynamic());
        assert!(ParamType::array(ParamType::Uint(256)).is_dynamic());
    }

    #[test]
    fn test_container_classification() {
        assert_eq!(
            classify(&ParamType::fixed_array(ParamType::Uint(256), 3)),
            Encoding::Static
        );
        assert_eq!(
            classify(&ParamType::fixed_array(ParamType::String, 3)),
            Encoding::Dynamic
        );
        assert_eq!(
            classify(&ParamType::tuple(vec![ParamType::Address, ParamType::Bool])),
            Encoding::Static
        );
        assert_eq!(
            classify(&ParamType::tuple(vec![
                ParamType::Address,
                ParamType::array(ParamType::Bool),
            ])),
            Encoding::Dynamic
        );
    }

    #[test]
    fn test_type_strings() {
        let nested = ParamType::array(ParamType::fixed_array(ParamType::Uint(256), 2));
        assert_eq!(nested.type_string(), "uint256[2][]");

        let tuple = ParamType::tuple(vec![
            ParamType::String,
            ParamType::array(ParamType::FixedBytes(32)),
        ]);
        assert_eq!(tuple.type_string(), "(string,bytes32[])");

        let tuple_array = ParamType::array(ParamType::fixed_array(
            ParamType::tuple(vec![ParamType::Uint(256), ParamType::String]),
            2,
        ));
        assert_eq!(tuple_array.type_string(), "(uint256,string)[2][]");

        assert_eq!(ParamType::Fixed(128, 18).type_string(), "fixed128x18");
        assert_eq!(ParamType::Int(8).type_string(), "int8");
    }

    #[test]
    fn test_type_string_ignores_field_names() {
        let tuple = ParamType::Tuple(vec![
            Param::new("owner", ParamType::Address),
            Param::new("amount", ParamType::Uint(256)),
        ]);
        assert_eq!(tuple.type_string(), "(address,uint256)");
    }

    #[test]
    fn test_head_len() {
        assert_eq!(ParamType::Uint(8).head_len(), 32);
        assert_eq!(ParamType::String.head_len(), 32);
        assert_eq!(ParamType::fixed_array(ParamType::Uint(256), 3).head_len(), 96);
        assert_eq!(ParamType::fixed_array(ParamType::String, 3).head_len(), 32);
        assert_eq!(
            ParamType::tuple(vec![
                ParamType::Address,
                ParamType::fixed_array(ParamType::Bool, 2)
            ])
            .head_len(),
            96
        );
        assert_eq!(
            ParamType::fixed_array(ParamType::fixed_array(ParamType::Uint(8), usize::MAX), 2)
                .head_len(),
            usize::MAX
        );
    }

    #[test]
    fn test_is_compatible_ignores_names() {
        let named = ParamType::Tuple(vec![Param::new("x", ParamType::Uint(256))]);
        let unnamed = ParamType::tuple(vec![ParamType::Uint(256)]);
        assert_ne!(named, unnamed);
        assert!(named.is_compatible(&unnamed));
        assert!(!named.is_compatible(&ParamType::tuple(vec![ParamType::Uint(128)])));
        assert!(ParamType::array(named.clone()).is_compatible(&ParamType::array(unnamed)));
    }
}
