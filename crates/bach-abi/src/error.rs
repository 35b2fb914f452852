//! ABI error types

use bach_primitives::PrimitiveError;
use thiserror::Error;

/// ABI encoding/decoding error
///
/// Every failure is local to the call that produced it; nothing needs to be
/// rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// Type descriptor cannot be resolved or exceeds configured limits
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Value does not fit its declared type
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// Array literal with no elements and no element type
    #[error("cannot infer element type of an empty array; use an explicitly typed constructor")]
    EmptyTypedArray,

    /// Static array longer than the configured maximum
    #[error("static array length {len} exceeds maximum {max}")]
    SizeOverflow {
        /// Supplied element count
        len: usize,
        /// Configured maximum
        max: usize,
    },

    /// Static array element count differs from the expected length
    #[error("static array expects {expected} elements, got {got}")]
    ArityMismatch {
        /// Expected length
        expected: usize,
        /// Supplied element count
        got: usize,
    },

    /// Offset, length or word read past the end of the input
    #[error("truncated input: need {needed} bytes, have {available}")]
    TruncatedInput {
        /// Bytes required
        needed: usize,
        /// Bytes available
        available: usize,
    },

    /// Offset is misaligned or unrepresentable
    #[error("malformed offset: {0}")]
    MalformedOffset(String),

    /// Value count differs from descriptor count
    #[error("expected {expected} values, got {got}")]
    TypeArityMismatch {
        /// Declared descriptor count
        expected: usize,
        /// Supplied or decoded value count
        got: usize,
    },

    /// No function or event with the requested name
    #[error("unknown {0}")]
    UnknownItem(String),
}

/// ABI result type
pub type Result<T> = std::result::Result<T, AbiError>;

impl From<PrimitiveError> for AbiError {
    fn from(e: PrimitiveError) -> Self {
        AbiError::TypeMismatch(e.to_string())
    }
}
