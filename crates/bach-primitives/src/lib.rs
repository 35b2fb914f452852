//! # bach-primitives
//!
//! Fixed-size byte types shared by the ABI codec and the hash providers.
//!
//! - [`Address`]: 20-byte account address
//! - [`H256`]: 32-byte hash, also used for event topics
//! - [`Word`] helpers: the 32-byte unit every ABI slot is built from

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;
mod word;

pub use address::{Address, AddressError};
pub use error::PrimitiveError;
pub use hash::H256;
pub use word::{padded_len, u256_to_word, usize_to_word, word_to_u256, Word, WORD_SIZE};

// Re-export primitive-types for the wide integers
pub use primitive_types::{U256, U512};
