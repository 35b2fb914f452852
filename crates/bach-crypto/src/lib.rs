//! # bach-crypto
//!
//! Hash primitives for BachLedger network profiles.
//!
//! - Keccak-256 (standard EVM profile)
//! - SM3 (national-cryptography profile)
//! - [`Hasher`]: the seam through which the ABI codec receives its hash
//!   function, so selector and topic derivation never hard-code one

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod hash;
mod hasher;

pub use error::CryptoError;
pub use hash::{keccak256, sm3};
pub use hasher::{HashAlgorithm, Hasher, Keccak256Hasher, Sm3Hasher};
