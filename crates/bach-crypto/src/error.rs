//! Cryptographic errors

use thiserror::Error;

/// Cryptographic configuration error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Hash algorithm name not recognised
    #[error("unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),
}
