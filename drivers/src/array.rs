// Licensed under the Apache-2.0 license

//! Conversions between big-endian byte strings and the little-endian word
//! order of PKA operand memory.

/// Fill `words` from a big-endian byte string of exactly `4 * words.len()`
/// bytes. Word 0 receives the least significant four bytes.
pub fn be_bytes_to_le_words(bytes: &[u8], words: &mut [u32]) {
    for (word, chunk) in words.iter_mut().zip(bytes.rchunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
}

/// Inverse of [`be_bytes_to_le_words`]
pub fn le_words_to_be_bytes(words: &[u32], bytes: &mut [u8]) {
    for (word, chunk) in words.iter().zip(bytes.rchunks_exact_mut(4)) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
}

pub fn is_zero(words: &[u32]) -> bool {
    words.iter().all(|w| *w == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_order() {
        let bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        let mut words = [0u32; 2];
        be_bytes_to_le_words(&bytes, &mut words);
        assert_eq!(words, [0x05060708, 0x01020304]);

        let mut back = [0u8; 8];
        le_words_to_be_bytes(&words, &mut back);
        assert_eq!(back, bytes);
    }

    #[test]
    fn test_is_zero() {
        assert!(is_zero(&[0, 0, 0]));
        assert!(is_zero(&[]));
        assert!(!is_zero(&[0, 1]));
    }
}
