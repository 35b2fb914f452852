//! Event descriptions and log decoding

use bach_crypto::Hasher;
use bach_primitives::H256;

use crate::config::AbiConfig;
use crate::decode::decode_with_config;
use crate::error::{AbiError, Result};
use crate::signature::{event_topic, signature_of};
use crate::token::Token;
use crate::types::ParamType;

/// Event parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventParam {
    /// Parameter name
    pub name: Option<String>,
    /// Parameter type
    pub kind: ParamType,
    /// Whether the value is carried in a topic instead of the data
    pub indexed: bool,
}

impl EventParam {
    /// Create a parameter stored in the log data
    pub fn new(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            name: Some(name.into()),
            kind,
            indexed: false,
        }
    }

    /// Create a parameter stored in a topic
    pub fn indexed(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            name: Some(name.into()),
            kind,
            indexed: true,
        }
    }
}

/// Event definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event name
    pub name: String,
    /// Parameters in declaration order
    pub inputs: Vec<EventParam>,
    /// Anonymous events do not emit their signature as topic 0
    pub anonymous: bool,
}

impl Event {
    /// Create a new (non-anonymous) event definition
    pub fn new(name: impl Into<String>, inputs: Vec<EventParam>) -> Self {
        Self {
            name: name.into(),
            inputs,
            anonymous: false,
        }
    }

    /// Event signature (e.g., "Transfer(address,address,uint256)")
    pub fn signature(&self) -> String {
        let types: Vec<ParamType> = self.inputs.iter().map(|p| p.kind.clone()).collect();
        signature_of(&self.name, &types)
    }

    /// Topic 0 of a non-anonymous log
    pub fn topic<H: Hasher + ?Sized>(&self, hasher: &H) -> H256 {
        event_topic(&self.signature(), hasher)
    }

    /// Decode a log into its parameters, in declaration order
    pub fn decode_log<H: Hasher + ?Sized>(
        &self,
        hasher: &H,
        topics: &[H256],
        data: &[u8],
    ) -> Result<Vec<Token>> {
        self.decode_log_with_config(&AbiConfig::default(), hasher, topics, data)
    }

    /// Decode a log under an explicit configuration.
    ///
    /// Indexed parameters that are not single words (strings, bytes, arrays,
    /// tuples) only have their hash in the topic; they come back as
    /// `Token::FixedBytes` holding that hash.
    pub fn decode_log_with_config<H: Hasher + ?Sized>(
        &self,
        config: &AbiConfig,
        hasher: &H,
        topics: &[H256],
        data: &[u8],
    ) -> Result<Vec<Token>> {
        let indexed = self.inputs.iter().filter(|p| p.indexed).count();
        let expected = indexed + usize::from(!self.anonymous);
        if topics.len() != expected {
            return Err(AbiError::TypeArityMismatch {
                expected,
                got: topics.len(),
            });
        }

        let mut topics = topics.iter();
        if !self.anonymous {
            let expected_topic = self.topic(hasher);
            if let Some(topic) = topics.next().filter(|t| **t != expected_topic) {
                return Err(AbiError::TypeMismatch(format!(
                    "topic {} does not match {} ({})",
                    topic,
                    self.signature(),
                    expected_topic
                )));
            }
        }

        let data_types: Vec<ParamType> = self
            .inputs
            .iter()
            .filter(|p| !p.indexed)
            .map(|p| p.kind.clone())
            .collect();
        let mut data_tokens = decode_with_config(config, &data_types, data)?.into_iter();

        tracing::trace!(
            event = %self.name,
            topics = expected,
            len = data.len(),
            "Decoding log"
        );

        // Topic count is checked above; the data decoder returns one token per type
        let short = || AbiError::TypeArityMismatch {
            expected: self.inputs.len(),
            got: indexed + data_types.len(),
        };
        let mut tokens = Vec::with_capacity(self.inputs.len());
        for param in &self.inputs {
            let token = if param.indexed {
                decode_topic(config, &param.kind, topics.next().ok_or_else(short)?)?
            } else {
                data_tokens.next().ok_or_else(short)?
            };
            tokens.push(token);
        }
        Ok(tokens)
    }
}

fn decode_topic(config: &AbiConfig, kind: &ParamType, topic: &H256) -> Result<Token> {
    if !kind.is_value_type() {
        return Ok(Token::FixedBytes(topic.as_bytes().to_vec()));
    }
    decode_with_config(config, std::slice::from_ref(kind), topic.as_bytes())?
        .pop()
        .ok_or(AbiError::TypeArityMismatch { expected: 1, got: 0 })
}
