// Path: crates/types/src/covenant.rs

//! Covenants: the typed side-channel carried by every transaction output.
//!
//! Each covenant type has a fixed positional item schema; the decoder
//! validates arity and item shapes up front so the state machine never
//! sees a mis-shaped covenant. The wire form is
//! `type:u8 | item_count:varint | items (varbytes each)`.

use serde::{Deserialize, Serialize};

use crate::codec::{
    varbytes_size, varint_size, write_varbytes, write_varint, Decodable, Encodable, SliceReader,
};
use crate::constants::{MAX_NAME_SIZE, MAX_RESOURCE_SIZE};
use crate::error::CodecError;
use crate::hash::Hash;
use crate::tx::Address;

/// Wire tags of the recognized covenant types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CovenantType {
    /// Pure value transfer.
    None = 0,
    /// Stake a claim on a pre-reserved root name.
    Claim = 1,
    /// Commit to a hidden bid.
    Bid = 2,
    /// Reveal a bid's true value.
    Reveal = 3,
    /// Reclaim a losing bid's lockup.
    Redeem = 4,
    /// Install the initial resource for a won name.
    Register = 5,
    /// Mutate a live name's resource.
    Update = 6,
    /// Extend a name's expiry.
    Renew = 7,
    /// Begin a delayed ownership transfer.
    Transfer = 8,
    /// Complete a transfer after the delay.
    Finalize = 9,
    /// Permanently burn a name.
    Revoke = 10,
}

/// A decoded covenant with its positional items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Covenant {
    /// Pure value transfer; carries no items.
    None,
    /// `CLAIM(name)`: stakes a claim on a pre-reserved root name. Only
    /// valid when the spending chain derives from the genesis claimant.
    Claim {
        /// Raw name, without a trailing dot.
        name: Vec<u8>,
    },
    /// `BID(name, blind)`: commits to a hidden bid. The output value is
    /// the lockup, not the bid.
    Bid {
        /// Raw name.
        name: Vec<u8>,
        /// `blake2b(value || nonce || name_hash)` commitment.
        blind: Hash,
    },
    /// `REVEAL(name, nonce)`: reveals the true bid; the output value plus
    /// this nonce must hash back to the earlier blind.
    Reveal {
        /// Raw name.
        name: Vec<u8>,
        /// Nonce the blind was computed over.
        nonce: Hash,
    },
    /// `REDEEM(name)`: reclaims a losing revealed bid's lockup.
    Redeem {
        /// Raw name.
        name: Vec<u8>,
    },
    /// `REGISTER(name, resource, tree_hash)`: installs the initial DNS
    /// resource for the winning name.
    Register {
        /// Raw name.
        name: Vec<u8>,
        /// Canonical resource-record encoding.
        resource: Vec<u8>,
        /// Name-tree anchor at registration time.
        tree_hash: Hash,
    },
    /// `UPDATE(name, resource)`: mutates the resource of a live name.
    Update {
        /// Raw name.
        name: Vec<u8>,
        /// Replacement resource encoding.
        resource: Vec<u8>,
    },
    /// `RENEW(name, block_hash)`: extends expiry; the hash must name a
    /// recent main-chain block.
    Renew {
        /// Raw name.
        name: Vec<u8>,
        /// Recent main-chain block hash.
        block_hash: Hash,
    },
    /// `TRANSFER(name, address)`: begins a delayed ownership change.
    Transfer {
        /// Raw name.
        name: Vec<u8>,
        /// Address the name will be handed to.
        address: Address,
    },
    /// `FINALIZE(name)`: completes a transfer after the delay.
    Finalize {
        /// Raw name.
        name: Vec<u8>,
    },
    /// `REVOKE(name)`: permanently burns the name.
    Revoke {
        /// Raw name.
        name: Vec<u8>,
    },
}

/// Validates the consensus name rules: non-empty, at most
/// [`MAX_NAME_SIZE`] bytes, charset `[a-z0-9_-]`.
pub fn is_valid_name(name: &[u8]) -> bool {
    if name.is_empty() || name.len() > MAX_NAME_SIZE {
        return false;
    }
    name.iter()
        .all(|&c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == b'-' || c == b'_')
}

impl Covenant {
    /// The wire tag of this covenant.
    pub fn covenant_type(&self) -> CovenantType {
        match self {
            Covenant::None => CovenantType::None,
            Covenant::Claim { .. } => CovenantType::Claim,
            Covenant::Bid { .. } => CovenantType::Bid,
            Covenant::Reveal { .. } => CovenantType::Reveal,
            Covenant::Redeem { .. } => CovenantType::Redeem,
            Covenant::Register { .. } => CovenantType::Register,
            Covenant::Update { .. } => CovenantType::Update,
            Covenant::Renew { .. } => CovenantType::Renew,
            Covenant::Transfer { .. } => CovenantType::Transfer,
            Covenant::Finalize { .. } => CovenantType::Finalize,
            Covenant::Revoke { .. } => CovenantType::Revoke,
        }
    }

    /// The covenant's name item, if it carries one.
    pub fn name(&self) -> Option<&[u8]> {
        match self {
            Covenant::None => None,
            Covenant::Claim { name }
            | Covenant::Bid { name, .. }
            | Covenant::Reveal { name, .. }
            | Covenant::Redeem { name }
            | Covenant::Register { name, .. }
            | Covenant::Update { name, .. }
            | Covenant::Renew { name, .. }
            | Covenant::Transfer { name, .. }
            | Covenant::Finalize { name }
            | Covenant::Revoke { name } => Some(name),
        }
    }

    /// True for covenants that mutate name state (everything but NONE).
    pub fn is_name_covenant(&self) -> bool {
        !matches!(self, Covenant::None)
    }

    fn items(&self) -> Vec<Vec<u8>> {
        match self {
            Covenant::None => vec![],
            Covenant::Claim { name } => vec![name.clone()],
            Covenant::Bid { name, blind } => vec![name.clone(), blind.0.to_vec()],
            Covenant::Reveal { name, nonce } => vec![name.clone(), nonce.0.to_vec()],
            Covenant::Redeem { name } => vec![name.clone()],
            Covenant::Register {
                name,
                resource,
                tree_hash,
            } => vec![name.clone(), resource.clone(), tree_hash.0.to_vec()],
            Covenant::Update { name, resource } => vec![name.clone(), resource.clone()],
            Covenant::Renew { name, block_hash } => vec![name.clone(), block_hash.0.to_vec()],
            Covenant::Transfer { name, address } => vec![name.clone(), address.encode()],
            Covenant::Finalize { name } => vec![name.clone()],
            Covenant::Revoke { name } => vec![name.clone()],
        }
    }
}

fn read_name(r: &mut SliceReader<'_>) -> Result<Vec<u8>, CodecError> {
    let name = r.read_varbytes(MAX_NAME_SIZE)?;
    if !is_valid_name(&name) {
        return Err(CodecError::Malformed("covenant name"));
    }
    Ok(name)
}

fn read_item_hash(r: &mut SliceReader<'_>) -> Result<Hash, CodecError> {
    let bytes = r.read_varbytes(32)?;
    Hash::from_slice(&bytes).ok_or(CodecError::Malformed("covenant hash item"))
}

fn read_resource(r: &mut SliceReader<'_>) -> Result<Vec<u8>, CodecError> {
    r.read_varbytes(MAX_RESOURCE_SIZE)
}

fn expect_count(count: u64, expected: u64) -> Result<(), CodecError> {
    if count == expected {
        Ok(())
    } else {
        Err(CodecError::Malformed("covenant item count"))
    }
}

impl Encodable for Covenant {
    fn encoded_size(&self) -> usize {
        let items = self.items();
        1 + varint_size(items.len() as u64)
            + items.iter().map(|i| varbytes_size(i)).sum::<usize>()
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.push(self.covenant_type() as u8);
        let items = self.items();
        write_varint(buf, items.len() as u64);
        for item in &items {
            write_varbytes(buf, item);
        }
    }
}

impl Decodable for Covenant {
    fn decode_from(r: &mut SliceReader<'_>) -> Result<Self, CodecError> {
        let tag = r.read_u8()?;
        let count = r.read_varint()?;
        let covenant = match tag {
            0 => {
                expect_count(count, 0)?;
                Covenant::None
            }
            1 => {
                expect_count(count, 1)?;
                Covenant::Claim { name: read_name(r)? }
            }
            2 => {
                expect_count(count, 2)?;
                Covenant::Bid {
                    name: read_name(r)?,
                    blind: read_item_hash(r)?,
                }
            }
            3 => {
                expect_count(count, 2)?;
                Covenant::Reveal {
                    name: read_name(r)?,
                    nonce: read_item_hash(r)?,
                }
            }
            4 => {
                expect_count(count, 1)?;
                Covenant::Redeem { name: read_name(r)? }
            }
            5 => {
                expect_count(count, 3)?;
                Covenant::Register {
                    name: read_name(r)?,
                    resource: read_resource(r)?,
                    tree_hash: read_item_hash(r)?,
                }
            }
            6 => {
                expect_count(count, 2)?;
                Covenant::Update {
                    name: read_name(r)?,
                    resource: read_resource(r)?,
                }
            }
            7 => {
                expect_count(count, 2)?;
                Covenant::Renew {
                    name: read_name(r)?,
                    block_hash: read_item_hash(r)?,
                }
            }
            8 => {
                expect_count(count, 2)?;
                let name = read_name(r)?;
                let raw = r.read_varbytes(2 + crate::constants::MAX_ADDRESS_SIZE)?;
                let address = Address::decode(&raw)?;
                Covenant::Transfer { name, address }
            }
            9 => {
                expect_count(count, 1)?;
                Covenant::Finalize { name: read_name(r)? }
            }
            10 => {
                expect_count(count, 1)?;
                Covenant::Revoke { name: read_name(r)? }
            }
            _ => return Err(CodecError::Malformed("covenant type")),
        };
        Ok(covenant)
    }
}
