//! Codec configuration

use serde::{Deserialize, Serialize};

use crate::fixed::FixedScaling;

/// Default upper bound on static array length when no explicit length is given
pub const DEFAULT_MAX_STATIC_ARRAY_LEN: usize = 1024;

/// Default upper bound on container nesting in a type descriptor
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Codec limits and conventions for one network profile
///
/// Loaded from TOML the same way as the CLI config; every field falls back to
/// its default when absent.
///
/// ```toml
/// max_static_array_len = 1024
/// max_depth = 32
/// fixed_scaling = "decimal"
/// strict_padding = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiConfig {
    /// Longest static array accepted when no explicit length is supplied
    #[serde(default = "default_max_static_array_len")]
    pub max_static_array_len: usize,
    /// Deepest container nesting accepted in a type descriptor
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Scaling factor convention for `fixed<M>x<N>` values
    #[serde(default)]
    pub fixed_scaling: FixedScaling,
    /// Reject words whose padding bytes are not clean when decoding
    #[serde(default = "default_strict_padding")]
    pub strict_padding: bool,
}

fn default_max_static_array_len() -> usize {
    DEFAULT_MAX_STATIC_ARRAY_LEN
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_strict_padding() -> bool {
    true
}

impl Default for AbiConfig {
    fn default() -> Self {
        Self {
            max_static_array_len: default_max_static_array_len(),
            max_depth: default_max_depth(),
            fixed_scaling: FixedScaling::default(),
            strict_padding: default_strict_padding(),
        }
    }
}

impl AbiConfig {
    /// Parse a config from TOML, filling in defaults
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Set the fixed-point scaling convention
    pub fn with_fixed_scaling(mut self, scaling: FixedScaling) -> Self {
        self.fixed_scaling = scaling;
        self
    }

    /// Set the maximum descriptor nesting depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the maximum implicit static array length
    pub fn with_max_static_array_len(mut self, len: usize) -> Self {
        self.max_static_array_len = len;
        self
    }

    /// Accept or reject dirty padding when decoding
    pub fn with_strict_padding(mut self, strict: bool) -> Self {
        self.strict_padding = strict;
        self
    }
}
