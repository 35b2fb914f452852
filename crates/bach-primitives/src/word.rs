//! 32-byte ABI words

use primitive_types::U256;

/// Size of one ABI word in bytes
pub const WORD_SIZE: usize = 32;

/// One ABI word: every head slot, offset and length is exactly this wide
pub type Word = [u8; WORD_SIZE];

/// Encode a U256 as a big-endian word
pub fn u256_to_word(value: &U256) -> Word {
    let mut word = [0u8; WORD_SIZE];
    value.to_big_endian(&mut word);
    word
}

/// Read a big-endian word as U256
pub fn word_to_u256(word: &Word) -> U256 {
    U256::from_big_endian(word)
}

/// Encode a length or offset as a big-endian word
pub fn usize_to_word(value: usize) -> Word {
    u256_to_word(&U256::from(value))
}

/// Round `len` up to the next word boundary
pub fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD_SIZE) * WORD_SIZE
}
