//! Keccak-256 and SM3 hashing

use bach_primitives::H256;
use ::sm3::Sm3;
use sha3::{Digest, Keccak256};

/// Compute Keccak-256 hash of the input data
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    H256::from_bytes(result.into())
}

/// Compute SM3 hash of the input data
pub fn sm3(data: &[u8]) -> H256 {
    let mut hasher = Sm3::new();
    hasher.update(data);
    let result = hasher.finalize();
    H256::from_bytes(result.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Keccak-256 vectors ====================

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            keccak256(&[]).to_hex(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_keccak256_hello() {
        assert_eq!(
            keccak256(b"hello").to_hex(),
            "0x1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
        );
    }

    #[test]
    fn test_keccak256_transfer_signature() {
        // ERC20 transfer selector is 0xa9059cbb
        let hash = keccak256(b"transfer(address,uint256)");
        assert_eq!(&hash.as_bytes()[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_keccak256_transfer_event_topic() {
        assert_eq!(
            keccak256(b"Transfer(address,address,uint256)").to_hex(),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    // ==================== SM3 vectors ====================

    #[test]
    fn test_sm3_abc() {
        // GB/T 32905-2016 example 1
        assert_eq!(
            sm3(b"abc").to_hex(),
            "0x66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0"
        );
    }

    #[test]
    fn test_sm3_64_bytes() {
        // GB/T 32905-2016 example 2
        let data = b"abcd".repeat(16);
        assert_eq!(
            sm3(&data).to_hex(),
            "0xdebe9ff92275b8a138604889c18e5a4d6fdb70e5387e5765293dcba39c0c5732"
        );
    }

    #[test]
    fn test_profiles_disagree() {
        let data = b"transfer(address,uint256)";
        assert_ne!(keccak256(data), sm3(data));
    }
}
