//! Conversion between the host byte stream and the big-endian words the ECU reads

/// Byte-reverse every complete 32-bit word. Applying it twice is the identity.
///
/// Trailing bytes that don't form a full word are copied through untouched.
pub fn swap_words(buf: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(buf.len());

    let mut words = buf.chunks_exact(4);
    for word in &mut words {
        out.extend(word.iter().rev());
    }
    out.extend_from_slice(words.remainder());

    out
}

/// Read the buffer as a sequence of big-endian words, dropping any partial tail
pub fn words_from_be(buf: &[u8]) -> Vec<u32> {
    buf.chunks_exact(4)
        .map(|w| u32::from_be_bytes([w[0], w[1], w[2], w[3]]))
        .collect()
}

/// Serialise words as big-endian bytes
pub fn words_to_be(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}
