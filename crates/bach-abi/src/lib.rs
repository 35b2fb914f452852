//! # bach-abi
//!
//! Solidity ABI codec for BachLedger contract calls.
//!
//! ## Features
//!
//! - **Types**: [`ParamType`] descriptors, canonical type strings and a
//!   type-string parser ([`TypeRegistry`])
//! - **Tokens**: typed values, including signed integers ([`I256`]) and
//!   fixed-point numbers ([`FixedPoint`])
//! - **Encoding / decoding**: the head/tail layout, with nested dynamic
//!   values addressed relative to their own region
//! - **Selectors**: signatures, function selectors and event topics built
//!   with an injected [`Hasher`](bach_crypto::Hasher)
//! - **Interfaces**: [`Function`], [`Event`], [`Constructor`] and
//!   [`Interface`] helpers
//! - **Profiles**: [`AbiCodec`] pairs an [`AbiConfig`] with a hash algorithm
//!
//! ## Quick Start
//!
//! ```rust
//! use bach_abi::{decode, encode, selector, Token, TypeRegistry};
//! use bach_crypto::Keccak256Hasher;
//! use bach_primitives::U256;
//!
//! // Encode the arguments of a call
//! let data = encode(&[Token::uint256(U256::from(1)), Token::string("abc")]).unwrap();
//! assert_eq!(data.len(), 128);
//!
//! // Decode them again
//! let registry = TypeRegistry::new();
//! let types = [registry.parse("uint256").unwrap(), registry.parse("string").unwrap()];
//! let tokens = decode(&types, &data).unwrap();
//! assert_eq!(tokens[1].as_str(), Some("abc"));
//!
//! // Selector under Keccak-256
//! assert_eq!(selector("transfer(address,uint256)", &Keccak256Hasher), [0xa9, 0x05, 0x9c, 0xbb]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod codec;
mod config;
mod decode;
mod encode;
mod error;
mod event;
mod fixed;
mod function;
mod int;
mod interface;
mod registry;
mod signature;
mod token;
mod types;
mod validate;

pub use codec::{AbiCodec, CodecProfile};
pub use config::{AbiConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_STATIC_ARRAY_LEN};
pub use decode::{decode, decode_with_config};
pub use encode::{
    encode, encode_constructor, encode_function_call, encode_params, encode_params_with_config,
    encode_with_config,
};
pub use error::{AbiError, Result};
pub use event::{Event, EventParam};
pub use fixed::{FixedPoint, FixedScaling};
pub use function::{Constructor, Function};
pub use int::I256;
pub use interface::{erc20, Interface, InterfaceBuilder};
pub use registry::TypeRegistry;
pub use signature::{build_signature, event_topic, selector, signature_of};
pub use token::Token;
pub use types::{classify, Encoding, Param, ParamType};
pub use validate::{validate_param_type, validate_params, MAX_FIXED_FRACTION};
