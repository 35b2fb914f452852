//! Network profiles: a configuration paired with a hash function

use bach_crypto::{HashAlgorithm, Hasher};
use bach_primitives::H256;
use serde::{Deserialize, Serialize};

use crate::config::AbiConfig;
use crate::decode::decode_with_config;
use crate::encode::{encode_params_with_config, encode_with_config};
use crate::error::Result;
use crate::event::Event;
use crate::function::{Constructor, Function};
use crate::registry::TypeRegistry;
use crate::signature;
use crate::token::Token;
use crate::types::ParamType;

/// Profile file contents
///
/// ```toml
/// hash = "sm3"
///
/// [abi]
/// fixed_scaling = "binary"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecProfile {
    /// Hash used for selectors and event topics
    #[serde(default)]
    pub hash: HashAlgorithm,
    /// Codec limits and conventions
    #[serde(default)]
    pub abi: AbiConfig,
}

/// Encoder, decoder and selector builder for one network profile
#[derive(Debug, Clone, Default)]
pub struct AbiCodec<H = HashAlgorithm> {
    config: AbiConfig,
    hasher: H,
    registry: TypeRegistry,
}

impl AbiCodec<HashAlgorithm> {
    /// Codec for a named hash algorithm
    pub fn from_algorithm(config: AbiConfig, algorithm: HashAlgorithm) -> Self {
        Self::new(config, algorithm)
    }

    /// Codec described by a profile
    pub fn from_profile(profile: CodecProfile) -> Self {
        tracing::debug!(
            hash = %profile.hash,
            fixed_scaling = ?profile.abi.fixed_scaling,
            max_depth = profile.abi.max_depth,
            "ABI codec profile loaded"
        );
        Self::new(profile.abi, profile.hash)
    }

    /// Codec described by a TOML profile
    pub fn from_toml_str(s: &str) -> std::result::Result<Self, toml::de::Error> {
        Ok(Self::from_profile(toml::from_str(s)?))
    }
}

impl<H: Hasher> AbiCodec<H> {
    /// Codec with an explicit hasher
    pub fn new(config: AbiConfig, hasher: H) -> Self {
        Self {
            config,
            hasher,
            registry: TypeRegistry::new(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &AbiConfig {
        &self.config
    }

    /// Get the hasher
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Get the primitive type table
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Parse a type string under this profile's limits
    pub fn parse_type(&self, s: &str) -> Result<ParamType> {
        self.registry.parse_with_config(s, &self.config)
    }

    /// Encode tokens, deriving types from the tokens
    pub fn encode(&self, tokens: &[Token]) -> Result<Vec<u8>> {
        encode_with_config(&self.config, tokens)
    }

    /// Encode tokens against declared types
    pub fn encode_params(&self, types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>> {
        encode_params_with_config(&self.config, types, tokens)
    }

    /// Decode values of the given types
    pub fn decode(&self, types: &[ParamType], data: &[u8]) -> Result<Vec<Token>> {
        decode_with_config(&self.config, types, data)
    }

    /// Static array bounded by this profile's maximum length
    pub fn fixed_array(&self, tokens: Vec<Token>, expected: Option<usize>) -> Result<Token> {
        Token::fixed_array_with_limit(tokens, expected, self.config.max_static_array_len)
    }

    /// Selector of a signature
    pub fn selector(&self, signature: &str) -> [u8; 4] {
        signature::selector(signature, &self.hasher)
    }

    /// Topic 0 of an event signature
    pub fn event_topic(&self, signature: &str) -> H256 {
        signature::event_topic(signature, &self.hasher)
    }

    /// Encode a call to `function`
    pub fn encode_call(&self, function: &Function, args: &[Token]) -> Result<Vec<u8>> {
        function.encode_call_with_config(&self.config, &self.hasher, args)
    }

    /// Decode call data addressed to `function`
    pub fn decode_input(&self, function: &Function, data: &[u8]) -> Result<Vec<Token>> {
        function.decode_input_with_config(&self.config, &self.hasher, data)
    }

    /// Decode return data of `function`
    pub fn decode_output(&self, function: &Function, data: &[u8]) -> Result<Vec<Token>> {
        function.decode_output_with_config(&self.config, data)
    }

    /// Deployment payload for `constructor`
    pub fn encode_constructor(
        &self,
        constructor: &Constructor,
        bytecode: &[u8],
        args: &[Token],
    ) -> Result<Vec<u8>> {
        constructor.encode_with_config(&self.config, bytecode, args)
    }

    /// Decode a log emitted as `event`
    pub fn decode_log(&self, event: &Event, topics: &[H256], data: &[u8]) -> Result<Vec<Token>> {
        event.decode_log_with_config(&self.config, &self.hasher, topics, data)
    }
}
