// Path: crates/types/src/hash.rs

//! 32-byte hashes and the Blake2b-256 helpers used for every consensus
//! commitment in the kernel (block ids, txids, name hashes, tree roots).

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Blake2b with a 256-bit output, the only hash the consensus layer uses.
pub type Blake2b256 = Blake2b<U32>;

/// A 32-byte consensus hash. The all-zero value is the designated null
/// hash (parent of genesis, absent owner).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    /// The designated all-zero null hash.
    pub const ZERO: Hash = Hash([0u8; 32]);

    /// Returns true if this is the all-zero null hash.
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Borrows the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Constructs a hash from a 32-byte slice, if the length matches.
    pub fn from_slice(bytes: &[u8]) -> Option<Hash> {
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Some(Hash(arr))
    }

    /// Lowercase hex rendering of the hash.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Hash {
        Hash(bytes)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Blake2b-256 digest of a byte slice.
pub fn blake2b256(data: &[u8]) -> Hash {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    Hash(hasher.finalize().into())
}

/// Blake2b-256 digest over several concatenated segments, without an
/// intermediate allocation.
pub fn blake2b256_multi(segments: &[&[u8]]) -> Hash {
    let mut hasher = Blake2b256::new();
    for segment in segments {
        hasher.update(segment);
    }
    Hash(hasher.finalize().into())
}

/// The auction-store key for a name: `blake2b(name)`.
pub fn hash_name(name: &[u8]) -> Hash {
    blake2b256(name)
}
