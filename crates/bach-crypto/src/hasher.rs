//! Injectable hash functions

use std::fmt;
use std::str::FromStr;

use bach_primitives::H256;
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;
use crate::hash::{keccak256, sm3};

/// A 256-bit hash function.
///
/// Selector and event topic derivation take a `Hasher` instead of calling a
/// fixed primitive, because different network profiles hash signatures
/// differently. Plain functions and closures of type `Fn(&[u8]) -> H256`
/// implement it too.
pub trait Hasher {
    /// Hash `data` into 32 bytes
    fn hash(&self, data: &[u8]) -> H256;
}

impl<F> Hasher for F
where
    F: Fn(&[u8]) -> H256,
{
    fn hash(&self, data: &[u8]) -> H256 {
        self(data)
    }
}

/// Keccak-256, used by EVM networks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keccak256Hasher;

impl Hasher for Keccak256Hasher {
    fn hash(&self, data: &[u8]) -> H256 {
        keccak256(data)
    }
}

/// SM3, used by national-cryptography networks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sm3Hasher;

impl Hasher for Sm3Hasher {
    fn hash(&self, data: &[u8]) -> H256 {
        sm3(data)
    }
}

/// Hash algorithm selected by a network profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// Keccak-256
    #[default]
    Keccak256,
    /// SM3
    Sm3,
}

impl HashAlgorithm {
    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Keccak256 => "keccak256",
            HashAlgorithm::Sm3 => "sm3",
        }
    }
}

impl Hasher for HashAlgorithm {
    fn hash(&self, data: &[u8]) -> H256 {
        match self {
            HashAlgorithm::Keccak256 => keccak256(data),
            HashAlgorithm::Sm3 => sm3(data),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keccak256" | "keccak-256" => Ok(HashAlgorithm::Keccak256),
            "sm3" => Ok(HashAlgorithm::Sm3),
            other => Err(CryptoError::UnknownAlgorithm(other.to_string())),
        }
    }
}
