//! Stable seed derivation.
//!
//! Every seed that reaches a deck or a decision stream is derived from stable
//! keys (content hashes, ids, indices) through SHA-256, so results never
//! depend on wall-clock time, process, platform or evaluation order.

use sha2::{Digest, Sha256};

/// Derives a 64-bit seed from an ordered list of key parts.
///
/// Parts are length-prefixed before hashing, so `["ab", "c"]` and
/// `["a", "bc"]` produce different seeds.
///
/// ```
/// use evohold_engine::seed::derive_seed;
///
/// let a = derive_seed(["solution", "always_fold", "0"]);
/// let b = derive_seed(["solution", "always_fold", "0"]);
/// let c = derive_seed(["solution", "always_fold", "1"]);
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// ```
pub fn derive_seed<I, P>(parts: I) -> u64
where
    I: IntoIterator<Item = P>,
    P: AsRef<[u8]>,
{
    let mut hasher = Sha256::new();
    for part in parts {
        let bytes = part.as_ref();
        hasher.update((bytes.len() as u64).to_le_bytes());
        hasher.update(bytes);
    }
    let digest = hasher.finalize();
    let mut first = [0u8; 8];
    first.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(first)
}

/// Seed for the `index`-th child of a parent seed (deal `k` of a sub-run).
pub fn child_seed(parent: u64, index: u64) -> u64 {
    derive_seed([parent.to_le_bytes(), index.to_le_bytes()])
}

/// Hex-encoded SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
