// Path: crates/types/src/block.rs

//! Block headers, blocks and the merkle commitments linking them.
//!
//! The header is exactly [`HEADER_SIZE`] bytes; the block hash is the
//! Blake2b-256 digest of those bytes. Witness data lives outside the base
//! serialization and is committed through `witness_root`.

use serde::{Deserialize, Serialize};

use crate::codec::{varint_size, write_varint, Decodable, Encodable, SliceReader};
use crate::constants::{HEADER_SIZE, WITNESS_SCALE_FACTOR};
use crate::error::CodecError;
use crate::hash::{blake2b256, blake2b256_multi, Hash};
use crate::solution::Solution;
use crate::tx::Transaction;

/// A block header. Field order is consensus-fixed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Header version, also carrying version-bit signals.
    pub version: u32,
    /// Hash of the parent header; all-zero for genesis.
    pub prev_block: Hash,
    /// Merkle root over txids.
    pub merkle_root: Hash,
    /// Merkle root over wtxids.
    pub witness_root: Hash,
    /// Root of the name-auction tree after this block is applied.
    pub tree_root: Hash,
    /// Root of the reserved-claims set. Zero while unused.
    pub reserved_root: Hash,
    /// UNIX timestamp in seconds.
    pub time: u64,
    /// Compact encoding of the proof-of-work target.
    pub bits: u32,
    /// Oversized nonce feeding cuckoo header expansion.
    pub nonce: [u8; 20],
}

impl BlockHeader {
    /// The block hash: Blake2b-256 over the serialized header.
    pub fn hash(&self) -> Hash {
        blake2b256(&self.encode())
    }
}

impl Encodable for BlockHeader {
    fn encoded_size(&self) -> usize {
        HEADER_SIZE
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.extend_from_slice(&self.prev_block.0);
        buf.extend_from_slice(&self.merkle_root.0);
        buf.extend_from_slice(&self.witness_root.0);
        buf.extend_from_slice(&self.tree_root.0);
        buf.extend_from_slice(&self.reserved_root.0);
        buf.extend_from_slice(&self.time.to_le_bytes());
        buf.extend_from_slice(&self.bits.to_le_bytes());
        buf.extend_from_slice(&self.nonce);
    }
}

impl Decodable for BlockHeader {
    fn decode_from(r: &mut SliceReader<'_>) -> Result<Self, CodecError> {
        let version = r.read_u32()?;
        let prev_block = r.read_hash()?;
        let merkle_root = r.read_hash()?;
        let witness_root = r.read_hash()?;
        let tree_root = r.read_hash()?;
        let reserved_root = r.read_hash()?;
        let time = r.read_u64()?;
        let bits = r.read_u32()?;
        let mut nonce = [0u8; 20];
        nonce.copy_from_slice(r.read_bytes(20)?);
        Ok(BlockHeader {
            version,
            prev_block,
            merkle_root,
            witness_root,
            tree_root,
            reserved_root,
            time,
            bits,
            nonce,
        })
    }
}

/// A block: header, cuckoo solution and ordered transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// The header.
    pub header: BlockHeader,
    /// The cuckoo-cycle solution for the header.
    pub solution: Solution,
    /// Ordered transactions; index 0 must be the coinbase.
    pub txs: Vec<Transaction>,
}

impl Block {
    /// The block hash (header hash).
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    /// Merkle root over the block's txids.
    pub fn merkle_root(&self) -> Hash {
        merkle_root(&self.txs.iter().map(|tx| tx.txid()).collect::<Vec<_>>())
    }

    /// Merkle root over the block's wtxids.
    pub fn witness_root(&self) -> Hash {
        merkle_root(&self.txs.iter().map(|tx| tx.wtxid()).collect::<Vec<_>>())
    }

    /// Base (witness-stripped) size in bytes.
    pub fn base_size(&self) -> usize {
        self.header.encoded_size()
            + self.solution.encoded_size()
            + varint_size(self.txs.len() as u64)
            + self.txs.iter().map(|tx| tx.encoded_size()).sum::<usize>()
    }

    /// Witness-section size in bytes.
    pub fn witness_size(&self) -> usize {
        self.txs.iter().map(|tx| tx.witness_size()).sum()
    }

    /// Raw (witness-inclusive) size in bytes.
    pub fn raw_size(&self) -> usize {
        self.base_size() + self.witness_size()
    }

    /// Block weight: base size discounted against raw size.
    pub fn weight(&self) -> usize {
        self.base_size() * (WITNESS_SCALE_FACTOR - 1) + self.raw_size()
    }
}

impl Encodable for Block {
    fn encoded_size(&self) -> usize {
        self.raw_size()
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        self.header.encode_into(buf);
        self.solution.encode_into(buf);
        write_varint(buf, self.txs.len() as u64);
        for tx in &self.txs {
            tx.encode_into(buf);
        }
        for tx in &self.txs {
            tx.write_witness(buf);
        }
    }
}

impl Decodable for Block {
    fn decode_from(r: &mut SliceReader<'_>) -> Result<Self, CodecError> {
        let header = BlockHeader::decode_from(r)?;
        let solution = Solution::decode_from(r)?;
        let count = r.read_varint()? as usize;
        let mut txs = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            txs.push(Transaction::decode_from(r)?);
        }
        for tx in &mut txs {
            tx.read_witness(r)?;
        }
        Ok(Block {
            header,
            solution,
            txs,
        })
    }
}

/// The root of an empty merkle set.
pub fn empty_merkle_root() -> Hash {
    blake2b256(&[])
}

/// Computes a merkle root over ordered leaf hashes with domain-separated
/// node hashing (`0x00` leaf, `0x01` internal); an odd node is promoted
/// to the next level unchanged.
pub fn merkle_root(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return empty_merkle_root();
    }
    let mut level: Vec<Hash> = leaves
        .iter()
        .map(|leaf| blake2b256_multi(&[&[0x00], &leaf.0[..]]))
        .collect();
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for pair in level.chunks(2) {
            if let [left, right] = pair {
                next.push(blake2b256_multi(&[&[0x01], &left.0[..], &right.0[..]]));
            } else {
                next.push(pair[0]);
            }
        }
        level = next;
    }
    level[0]
}
