// Path: crates/chain/src/entry.rs

//! Chain entries: the in-memory projection of a header plus its height
//! and accumulated chainwork.
//!
//! Entries hold parent *hashes*, never parent objects; the store resolves
//! lookups. Chainwork is persisted with the entry so a restart never
//! rescans the chain to recompute it.

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use nomen_consensus::get_proof;
use nomen_types::block::{Block, BlockHeader};
use nomen_types::codec::{Decodable, Encodable, SliceReader};
use nomen_types::error::CodecError;
use nomen_types::hash::Hash;
use nomen_types::solution::Solution;

/// A header projected into the chain, with height and cumulative work.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    /// The block hash this entry describes.
    pub hash: Hash,
    /// Height above genesis.
    pub height: u32,
    /// Header version.
    pub version: u32,
    /// Parent block hash; null for genesis.
    pub prev_block: Hash,
    /// Merkle root over txids.
    pub merkle_root: Hash,
    /// Merkle root over wtxids.
    pub witness_root: Hash,
    /// Name-tree root after this block.
    pub tree_root: Hash,
    /// Reserved-claims root.
    pub reserved_root: Hash,
    /// Header time.
    pub time: u64,
    /// Compact target.
    pub bits: u32,
    /// Header nonce.
    pub nonce: [u8; 20],
    /// The cuckoo solution the block shipped with.
    pub solution: Solution,
    /// Cumulative work up to and including this entry.
    pub chainwork: U256,
}

impl ChainEntry {
    /// Projects a block onto its chain entry, deriving height and
    /// chainwork from the parent (`None` for genesis).
    pub fn from_block(block: &Block, prev: Option<&ChainEntry>) -> ChainEntry {
        let header = &block.header;
        let mut entry = ChainEntry {
            hash: header.hash(),
            height: prev.map_or(0, |p| p.height + 1),
            version: header.version,
            prev_block: header.prev_block,
            merkle_root: header.merkle_root,
            witness_root: header.witness_root,
            tree_root: header.tree_root,
            reserved_root: header.reserved_root,
            time: header.time,
            bits: header.bits,
            nonce: header.nonce,
            solution: block.solution.clone(),
            chainwork: U256::zero(),
        };
        entry.chainwork = entry.get_chainwork(prev);
        entry
    }

    /// The work this entry's own target proves.
    pub fn get_proof(&self) -> U256 {
        get_proof(self.bits)
    }

    /// Parent chainwork plus this entry's proof.
    pub fn get_chainwork(&self, prev: Option<&ChainEntry>) -> U256 {
        let parent = prev.map_or(U256::zero(), |p| p.chainwork);
        parent.saturating_add(self.get_proof())
    }

    /// True for the genesis entry.
    pub fn is_genesis(&self) -> bool {
        self.height == 0
    }

    /// Projects the entry back to a header message for peer
    /// distribution.
    pub fn to_headers(&self) -> BlockHeader {
        BlockHeader {
            version: self.version,
            prev_block: self.prev_block,
            merkle_root: self.merkle_root,
            witness_root: self.witness_root,
            tree_root: self.tree_root,
            reserved_root: self.reserved_root,
            time: self.time,
            bits: self.bits,
            nonce: self.nonce,
        }
    }
}

impl Encodable for ChainEntry {
    fn encoded_size(&self) -> usize {
        32 + 4 + self.to_headers().encoded_size() + self.solution.encoded_size() + 32
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.hash.0);
        buf.extend_from_slice(&self.height.to_le_bytes());
        self.to_headers().encode_into(buf);
        self.solution.encode_into(buf);
        let mut work = [0u8; 32];
        self.chainwork.to_big_endian(&mut work);
        buf.extend_from_slice(&work);
    }
}

impl Decodable for ChainEntry {
    fn decode_from(r: &mut SliceReader<'_>) -> Result<Self, CodecError> {
        let hash = r.read_hash()?;
        let height = r.read_u32()?;
        let header = BlockHeader::decode_from(r)?;
        let solution = Solution::decode_from(r)?;
        let chainwork = U256::from_big_endian(r.read_bytes(32)?);
        Ok(ChainEntry {
            hash,
            height,
            version: header.version,
            prev_block: header.prev_block,
            merkle_root: header.merkle_root,
            witness_root: header.witness_root,
            tree_root: header.tree_root,
            reserved_root: header.reserved_root,
            time: header.time,
            bits: header.bits,
            nonce: header.nonce,
            solution,
            chainwork,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nomen_types::hash::blake2b256;
    use nomen_types::tx::{Address, Input, Outpoint, Output, Transaction};

    fn block_at(prev: Hash, time: u64) -> Block {
        let coinbase = Transaction {
            version: 0,
            inputs: vec![Input::from_outpoint(Outpoint::NULL)],
            outputs: vec![Output::plain(1, Address::from_key_hash([2; 20]))],
            locktime: 0,
        };
        let mut block = Block {
            header: nomen_types::block::BlockHeader {
                version: 0,
                prev_block: prev,
                merkle_root: Hash::ZERO,
                witness_root: Hash::ZERO,
                tree_root: Hash::ZERO,
                reserved_root: Hash::ZERO,
                time,
                bits: 0x207fffff,
                nonce: [0; 20],
            },
            solution: Solution::zeroed(4),
            txs: vec![coinbase],
        };
        block.header.merkle_root = block.merkle_root();
        block.header.witness_root = block.witness_root();
        block
    }

    #[test]
    fn genesis_entry_has_its_own_proof() {
        let block = block_at(Hash::ZERO, 1);
        let entry = ChainEntry::from_block(&block, None);
        assert!(entry.is_genesis());
        assert_eq!(entry.height, 0);
        assert_eq!(entry.chainwork, entry.get_proof());
        assert!(entry.chainwork > U256::zero());
    }

    #[test]
    fn chainwork_accumulates() {
        let genesis_block = block_at(Hash::ZERO, 1);
        let genesis = ChainEntry::from_block(&genesis_block, None);
        let child_block = block_at(genesis.hash, 2);
        let child = ChainEntry::from_block(&child_block, Some(&genesis));
        assert_eq!(child.height, 1);
        assert_eq!(child.prev_block, genesis.hash);
        assert_eq!(child.chainwork, genesis.chainwork + child.get_proof());
    }

    #[test]
    fn entry_roundtrip() {
        let block = block_at(blake2b256(b"parent"), 77);
        let parent = ChainEntry {
            chainwork: U256::from(12345u64) << 128,
            ..ChainEntry::from_block(&block_at(Hash::ZERO, 1), None)
        };
        let entry = ChainEntry::from_block(&block, Some(&parent));
        let bytes = entry.encode();
        assert_eq!(bytes.len(), entry.encoded_size());
        assert_eq!(ChainEntry::decode(&bytes).unwrap(), entry);
    }

    #[test]
    fn headers_projection_hashes_back() {
        let block = block_at(Hash::ZERO, 9);
        let entry = ChainEntry::from_block(&block, None);
        assert_eq!(entry.to_headers().hash(), block.hash());
        assert_eq!(entry.to_headers(), block.header);
    }
}
