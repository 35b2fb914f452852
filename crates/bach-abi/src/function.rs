//! Function and constructor descriptions

use bach_crypto::Hasher;

use crate::config::AbiConfig;
use crate::decode::decode_with_config;
use crate::encode::encode_params_with_config;
use crate::error::{AbiError, Result};
use crate::signature::{selector, signature_of};
use crate::token::Token;
use crate::types::{Param, ParamType};

/// Function definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// Function name
    pub name: String,
    /// Input parameters
    pub inputs: Vec<Param>,
    /// Output parameters
    pub outputs: Vec<Param>,
}

impl Function {
    /// Create a new function definition
    pub fn new(name: impl Into<String>, inputs: Vec<Param>, outputs: Vec<Param>) -> Self {
        Self {
            name: name.into(),
            inputs,
            outputs,
        }
    }

    /// Input parameter types
    pub fn input_types(&self) -> Vec<ParamType> {
        self.inputs.iter().map(|p| p.kind.clone()).collect()
    }

    /// Output parameter types
    pub fn output_types(&self) -> Vec<ParamType> {
        self.outputs.iter().map(|p| p.kind.clone()).collect()
    }

    /// Function signature (e.g., "transfer(address,uint256)")
    pub fn signature(&self) -> String {
        signature_of(&self.name, &self.input_types())
    }

    /// Function selector (4 bytes)
    pub fn selector<H: Hasher + ?Sized>(&self, hasher: &H) -> [u8; 4] {
        selector(&self.signature(), hasher)
    }

    /// Encode a call: selector followed by the encoded arguments
    pub fn encode_call<H: Hasher + ?Sized>(&self, hasher: &H, args: &[Token]) -> Result<Vec<u8>> {
        self.encode_call_with_config(&AbiConfig::default(), hasher, args)
    }

    /// Encode a call under an explicit configuration
    pub fn encode_call_with_config<H: Hasher + ?Sized>(
        &self,
        config: &AbiConfig,
        hasher: &H,
        args: &[Token],
    ) -> Result<Vec<u8>> {
        let selector = self.selector(hasher);
        let encoded = encode_params_with_config(config, &self.input_types(), args)?;

        tracing::debug!(
            function = %self.name,
            selector = %hex::encode(selector),
            args = args.len(),
            len = encoded.len() + selector.len(),
            "Encoded function call"
        );

        let mut data = Vec::with_capacity(selector.len() + encoded.len());
        data.extend_from_slice(&selector);
        data.extend(encoded);
        Ok(data)
    }

    /// Decode call data back into arguments, checking the selector
    pub fn decode_input<H: Hasher + ?Sized>(&self, hasher: &H, data: &[u8]) -> Result<Vec<Token>> {
        self.decode_input_with_config(&AbiConfig::default(), hasher, data)
    }

    /// Decode call data under an explicit configuration
    pub fn decode_input_with_config<H: Hasher + ?Sized>(
        &self,
        config: &AbiConfig,
        hasher: &H,
        data: &[u8],
    ) -> Result<Vec<Token>> {
        if data.len() < 4 {
            return Err(AbiError::TruncatedInput {
                needed: 4,
                available: data.len(),
            });
        }
        let expected = self.selector(hasher);
        if data[..4] != expected {
            return Err(AbiError::TypeMismatch(format!(
                "selector 0x{} does not match {} (0x{})",
                hex::encode(&data[..4]),
                self.signature(),
                hex::encode(expected)
            )));
        }
        tracing::trace!(function = %self.name, len = data.len(), "Decoding call data");
        decode_with_config(config, &self.input_types(), &data[4..])
    }

    /// Decode function output
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<Token>> {
        self.decode_output_with_config(&AbiConfig::default(), data)
    }

    /// Decode function output under an explicit configuration
    pub fn decode_output_with_config(&self, config: &AbiConfig, data: &[u8]) -> Result<Vec<Token>> {
        tracing::trace!(function = %self.name, len = data.len(), "Decoding return data");
        decode_with_config(config, &self.output_types(), data)
    }
}

/// Constructor definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constructor {
    /// Constructor parameters
    pub inputs: Vec<Param>,
}

impl Constructor {
    /// Create a new constructor definition
    pub fn new(inputs: Vec<Param>) -> Self {
        Self { inputs }
    }

    /// Deployment payload: bytecode followed by the encoded arguments
    pub fn encode(&self, bytecode: &[u8], args: &[Token]) -> Result<Vec<u8>> {
        self.encode_with_config(&AbiConfig::default(), bytecode, args)
    }

    /// Deployment payload under an explicit configuration
    pub fn encode_with_config(
        &self,
        config: &AbiConfig,
        bytecode: &[u8],
        args: &[Token],
    ) -> Result<Vec<u8>> {
        let types: Vec<ParamType> = self.inputs.iter().map(|p| p.kind.clone()).collect();
        let encoded = encode_params_with_config(config, &types, args)?;

        tracing::debug!(
            bytecode_len = bytecode.len(),
            args = args.len(),
            "Encoded constructor arguments"
        );

        let mut data = Vec::with_capacity(bytecode.len() + encoded.len());
        data.extend_from_slice(bytecode);
        data.extend(encoded);
        Ok(data)
    }
}
