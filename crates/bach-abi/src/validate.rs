//! Type descriptor validation
//!
//! Runs before any encoding or decoding starts, so malformed descriptors
//! surface as [`AbiError::UnsupportedType`] instead of half-written output
//! or unbounded recursion.

use bach_primitives::WORD_SIZE;

use crate::config::AbiConfig;
use crate::error::{AbiError, Result};
use crate::types::ParamType;

/// Largest fractional width accepted for `fixed<M>x<N>`
pub const MAX_FIXED_FRACTION: usize = 80;

/// Validate one descriptor against the configured limits.
///
/// Checks integer and fixed-point widths, `bytes<N>` sizes, zero-length
/// static arrays, empty tuples, nesting depth and static size overflow.
pub fn validate_param_type(param_type: &ParamType, config: &AbiConfig) -> Result<()> {
    // Depth first, with an explicit stack: the descriptor may be deeper than
    // the call stack can afford.
    let mut stack = vec![(param_type, 0usize)];
    while let Some((current, depth)) = stack.pop() {
        match current {
            ParamType::Uint(bits) | ParamType::Int(bits) => check_int_width(current, *bits)?,
            ParamType::FixedBytes(size) => {
                if !(1..=32).contains(size) {
                    return Err(unsupported(current));
                }
            }
            ParamType::Fixed(m, n) => {
                check_int_width(current, *m)?;
                if *n > MAX_FIXED_FRACTION {
                    return Err(unsupported(current));
                }
            }
            ParamType::Address | ParamType::Bool | ParamType::Bytes | ParamType::String => {}
            ParamType::Array(inner) => {
                stack.push((inner, enter(depth, config)?));
            }
            ParamType::FixedArray(inner, len) => {
                if *len == 0 {
                    return Err(AbiError::UnsupportedType(
                        "zero-length static array".to_string(),
                    ));
                }
                stack.push((inner, enter(depth, config)?));
            }
            ParamType::Tuple(fields) => {
                if fields.is_empty() {
                    return Err(AbiError::UnsupportedType("empty tuple".to_string()));
                }
                let depth = enter(depth, config)?;
                stack.extend(fields.iter().map(|f| (&f.kind, depth)));
            }
        }
    }

    // Depth is bounded now, so plain recursion is safe.
    checked_head_len(param_type).ok_or_else(|| {
        AbiError::UnsupportedType("static size overflows the address space".to_string())
    })?;
    Ok(())
}

/// Validate every descriptor in a parameter list
pub fn validate_params(types: &[ParamType], config: &AbiConfig) -> Result<()> {
    types
        .iter()
        .try_for_each(|t| validate_param_type(t, config))
}

fn enter(depth: usize, config: &AbiConfig) -> Result<usize> {
    let next = depth + 1;
    if next > config.max_depth {
        return Err(AbiError::UnsupportedType(format!(
            "nesting deeper than {} levels",
            config.max_depth
        )));
    }
    Ok(next)
}

fn check_int_width(param_type: &ParamType, bits: usize) -> Result<()> {
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(unsupported(param_type));
    }
    Ok(())
}

fn unsupported(param_type: &ParamType) -> AbiError {
    AbiError::UnsupportedType(param_type.to_string())
}

fn checked_head_len(param_type: &ParamType) -> Option<usize> {
    let static_len = match param_type {
        ParamType::FixedArray(inner, len) => checked_head_len(inner)?.checked_mul(*len)?,
        ParamType::Array(inner) => {
            checked_head_len(inner)?;
            WORD_SIZE
        }
        ParamType::Tuple(fields) => fields
            .iter()
            .try_fold(0usize, |acc, f| acc.checked_add(checked_head_len(&f.kind)?))?,
        _ => WORD_SIZE,
    };
    if param_type.is_dynamic() {
        Some(WORD_SIZE)
    } else {
        Some(static_len)
    }
}
