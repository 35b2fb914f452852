//! Function signatures, selectors and event topics
//!
//! The hash function is always supplied by the caller through
//! [`Hasher`], so the same signature yields a Keccak-256 selector on EVM
//! networks and an SM3 selector on national-cryptography networks.

use bach_crypto::Hasher;
use bach_primitives::H256;

use crate::types::ParamType;

/// Build `name(t1,t2,...)` from canonical type strings
pub fn build_signature<S: AsRef<str>>(name: &str, types: &[S]) -> String {
    let mut signature = String::with_capacity(name.len() + 2 + types.len() * 8);
    signature.push_str(name);
    signature.push('(');
    for (i, t) in types.iter().enumerate() {
        if i > 0 {
            signature.push(',');
        }
        signature.push_str(t.as_ref());
    }
    signature.push(')');
    signature
}

/// Build a signature from type descriptors
pub fn signature_of(name: &str, types: &[ParamType]) -> String {
    let type_strings: Vec<String> = types.iter().map(ParamType::type_string).collect();
    build_signature(name, &type_strings)
}

/// Compute a function selector: the first 4 bytes of the signature hash
pub fn selector<H: Hasher + ?Sized>(signature: &str, hasher: &H) -> [u8; 4] {
    let hash = hasher.hash(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}

/// Compute an event topic: the full signature hash
pub fn event_topic<H: Hasher + ?Sized>(signature: &str, hasher: &H) -> H256 {
    hasher.hash(signature.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bach_crypto::{keccak256, HashAlgorithm, Keccak256Hasher, Sm3Hasher};

    #[test]
    fn test_build_signature() {
        assert_eq!(
            build_signature("transfer", &["address", "uint256"]),
            "transfer(address,uint256)"
        );
        assert_eq!(build_signature::<&str>("totalSupply", &[]), "totalSupply()");
    }

    #[test]
    fn test_signature_of_descriptors() {
        let types = vec![
            ParamType::array(ParamType::tuple(vec![ParamType::Address, ParamType::String])),
            ParamType::FixedBytes(32),
        ];
        assert_eq!(signature_of("submit", &types), "submit((address,string)[],bytes32)");
    }

    #[test]
    fn test_function_selector() {
        // transfer(address,uint256) = 0xa9059cbb
        assert_eq!(
            selector("transfer(address,uint256)", &Keccak256Hasher),
            [0xa9, 0x05, 0x9c, 0xbb]
        );
        // balanceOf(address) = 0x70a08231
        assert_eq!(
            selector("balanceOf(address)", &Keccak256Hasher),
            [0x70, 0xa0, 0x82, 0x31]
        );
    }

    #[test]
    fn test_selector_with_closure_and_profile() {
        let closure = |data: &[u8]| keccak256(data);
        assert_eq!(
            selector("transfer(address,uint256)", &closure),
            selector("transfer(address,uint256)", &HashAlgorithm::Keccak256)
        );

        let dynamic: &dyn Hasher = &Sm3Hasher;
        let sm3 = selector("transfer(address,uint256)", dynamic);
        assert_ne!(sm3, [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(sm3, selector("transfer(address,uint256)", &HashAlgorithm::Sm3));
    }

    #[test]
    fn test_event_topic() {
        let topic = event_topic("Transfer(address,address,uint256)", &Keccak256Hasher);
        assert_eq!(
            topic.to_hex(),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }
}
