//! Stable, platform-independent content hashing.
//!
//! `std::hash` makes no cross-release stability promise, so fallback codes
//! are derived from 64-bit FNV-1a instead.

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over `bytes`
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| {
        (hash ^ b as u64).wrapping_mul(FNV_PRIME)
    })
}

/// Stream of hash bytes: FNV-1a of `input` followed by a block counter,
/// eight bytes per block.
pub fn hash_bytes(input: &[u8], len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let mut block = 0u32;
    let mut buf = Vec::with_capacity(input.len() + 4);
    while out.len() < len {
        buf.clear();
        buf.extend_from_slice(input);
        buf.extend_from_slice(&block.to_le_bytes());
        out.extend_from_slice(&fnv1a64(&buf).to_be_bytes());
        block += 1;
    }
    out.truncate(len);
    out
}

/// Fixed-length decimal string: each hash byte reduced modulo 10
pub fn numeric_digest(input: &[u8], digits: usize) -> String {
    hash_bytes(input, digits)
        .into_iter()
        .map(|b| char::from(b'0' + b % 10))
        .collect()
}
