// Path: crates/chain/src/tree.rs

//! The name-tree commitment.
//!
//! Each header commits to the merkle root over
//! `(name_hash -> serialized auction)` after the block is applied, with
//! records ordered by name hash. Leaves bind the key to a digest of the
//! record so neither can be swapped independently.

use std::collections::BTreeMap;

use nomen_types::block::{empty_merkle_root, merkle_root};
use nomen_types::codec::Encodable;
use nomen_types::hash::{blake2b256, blake2b256_multi, Hash};

use crate::auction::Auction;
use crate::view::View;

/// The root of the empty name tree (genesis commitment).
pub fn empty_root() -> Hash {
    empty_merkle_root()
}

fn leaf_hash(name_hash: &Hash, auction: &Auction) -> Hash {
    let record_digest = blake2b256(&auction.encode());
    blake2b256_multi(&[&name_hash.0, &record_digest.0])
}

/// Computes the root over a committed record set.
pub fn compute_root(records: &BTreeMap<Hash, Auction>) -> Hash {
    let leaves: Vec<Hash> = records
        .iter()
        .filter(|(_, auction)| !auction.is_null())
        .map(|(nh, auction)| leaf_hash(nh, auction))
        .collect();
    merkle_root(&leaves)
}

/// Computes the root the store would have after committing `view` on top
/// of `base`.
pub fn compute_root_with_view(base: &BTreeMap<Hash, Auction>, view: &View) -> Hash {
    let mut merged = base.clone();
    for (nh, auction) in view.auctions() {
        if auction.is_null() {
            merged.remove(nh);
        } else {
            merged.insert(*nh, auction.clone());
        }
    }
    compute_root(&merged)
}
