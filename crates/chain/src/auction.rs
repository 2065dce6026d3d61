// Path: crates/chain/src/auction.rs

//! Per-name auction records.
//!
//! A record is keyed by `blake2b(name)` and tracks one name through its
//! lifecycle `BIDDING -> REVEAL -> CLOSED -> {RENEWED | REVOKED}`. An
//! unknown name is the null record; an expired record becomes biddable
//! again as if it were null. The record's canonical encoding is the
//! preimage committed by the header's tree root.

use serde::{Deserialize, Serialize};

use nomen_types::codec::{
    varbytes_size, write_varbytes, Decodable, Encodable, SliceReader,
};
use nomen_types::constants::MAX_NAME_SIZE;
use nomen_types::error::CodecError;
use nomen_types::hash::{blake2b256_multi, Hash};
use nomen_types::network::NameWindows;
use nomen_types::tx::{Address, Outpoint};

/// Lifecycle state of an auction record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AuctionState {
    /// Unknown name; the initial state.
    #[default]
    Null = 0,
    /// The bidding window is running.
    Bidding = 1,
    /// At least one bid has been revealed.
    Reveal = 2,
    /// The name is registered and live.
    Closed = 3,
    /// The name has been renewed at least once.
    Renewed = 4,
    /// The name is permanently burned.
    Revoked = 5,
}

impl AuctionState {
    fn from_u8(v: u8) -> Result<AuctionState, CodecError> {
        Ok(match v {
            0 => AuctionState::Null,
            1 => AuctionState::Bidding,
            2 => AuctionState::Reveal,
            3 => AuctionState::Closed,
            4 => AuctionState::Renewed,
            5 => AuctionState::Revoked,
            _ => return Err(CodecError::Malformed("auction state")),
        })
    }
}

/// A pending two-phase ownership change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Destination address.
    pub address: Address,
    /// Height the transfer was initiated at.
    pub height: u32,
}

/// The per-name auction record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    /// `blake2b(name)`, the store key.
    pub name_hash: Hash,
    /// The raw name.
    pub name: Vec<u8>,
    /// Height of the current auction opening (or claim).
    pub height: u32,
    /// Height of the last renewal event.
    pub renewal: u32,
    /// Outpoint currently owning the name; null before any reveal.
    pub owner: Outpoint,
    /// Price the winner pays: the second-highest revealed bid.
    pub value: u64,
    /// The highest revealed bid.
    pub highest: u64,
    /// Set between CLAIM and the claimant's REGISTER.
    pub claimed: bool,
    /// Lifecycle state.
    pub state: AuctionState,
    /// Pending transfer, if any.
    pub transfer: Option<Transfer>,
}

impl Auction {
    /// The null record for an unknown name.
    pub fn unknown(name_hash: Hash) -> Auction {
        Auction {
            name_hash,
            name: Vec::new(),
            height: 0,
            renewal: 0,
            owner: Outpoint::NULL,
            value: 0,
            highest: 0,
            claimed: false,
            state: AuctionState::Null,
            transfer: None,
        }
    }

    /// True for a record indistinguishable from an unknown name.
    pub fn is_null(&self) -> bool {
        self.state == AuctionState::Null
    }

    /// True once the renewal clock has run out. Revoked names never
    /// expire; they are burned for good.
    pub fn is_expired(&self, height: u32, windows: &NameWindows) -> bool {
        if self.is_null() || self.state == AuctionState::Revoked {
            return false;
        }
        height.saturating_sub(self.renewal) >= windows.expire
    }

    /// First height at which bidding is over.
    pub fn bidding_end(&self, windows: &NameWindows) -> u32 {
        self.height + windows.bidding
    }

    /// First height at which the reveal window is over.
    pub fn reveal_end(&self, windows: &NameWindows) -> u32 {
        self.bidding_end(windows) + windows.reveal
    }

    /// Re-opens the record as a fresh auction at `height`.
    pub fn open(&mut self, name: &[u8], height: u32) {
        self.name = name.to_vec();
        self.height = height;
        self.renewal = height;
        self.owner = Outpoint::NULL;
        self.value = 0;
        self.highest = 0;
        self.claimed = false;
        self.state = AuctionState::Bidding;
        self.transfer = None;
    }
}

/// The blind commitment a BID publishes:
/// `blake2b(value_le || nonce || name_hash)`.
pub fn compute_blind(value: u64, nonce: &Hash, name_hash: &Hash) -> Hash {
    blake2b256_multi(&[&value.to_le_bytes(), &nonce.0, &name_hash.0])
}

impl Encodable for Auction {
    fn encoded_size(&self) -> usize {
        32 + varbytes_size(&self.name)
            + 4
            + 4
            + self.owner.encoded_size()
            + 8
            + 8
            + 1
            + 1
            + 1
            + self
                .transfer
                .as_ref()
                .map_or(0, |t| t.address.encoded_size() + 4)
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.name_hash.0);
        write_varbytes(buf, &self.name);
        buf.extend_from_slice(&self.height.to_le_bytes());
        buf.extend_from_slice(&self.renewal.to_le_bytes());
        self.owner.encode_into(buf);
        buf.extend_from_slice(&self.value.to_le_bytes());
        buf.extend_from_slice(&self.highest.to_le_bytes());
        buf.push(self.claimed as u8);
        buf.push(self.state as u8);
        match &self.transfer {
            None => buf.push(0),
            Some(t) => {
                buf.push(1);
                t.address.encode_into(buf);
                buf.extend_from_slice(&t.height.to_le_bytes());
            }
        }
    }
}

impl Decodable for Auction {
    fn decode_from(r: &mut SliceReader<'_>) -> Result<Self, CodecError> {
        let name_hash = r.read_hash()?;
        let name = r.read_varbytes(MAX_NAME_SIZE)?;
        let height = r.read_u32()?;
        let renewal = r.read_u32()?;
        let owner = Outpoint::decode_from(r)?;
        let value = r.read_u64()?;
        let highest = r.read_u64()?;
        let claimed = match r.read_u8()? {
            0 => false,
            1 => true,
            _ => return Err(CodecError::Malformed("claimed flag")),
        };
        let state = AuctionState::from_u8(r.read_u8()?)?;
        let transfer = match r.read_u8()? {
            0 => None,
            1 => {
                let address = Address::decode_from(r)?;
                let height = r.read_u32()?;
                Some(Transfer { address, height })
            }
            _ => return Err(CodecError::Malformed("transfer flag")),
        };
        Ok(Auction {
            name_hash,
            name,
            height,
            renewal,
            owner,
            value,
            highest,
            claimed,
            state,
            transfer,
        })
    }
}
