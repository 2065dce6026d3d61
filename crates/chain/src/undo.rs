// Path: crates/chain/src/undo.rs

//! Per-block rollback logs.
//!
//! An undo log records, in first-touch order, the prior state of every
//! auction a block mutated (`None` for names that did not exist).
//! Replaying it in reverse restores the store exactly; a log that cannot
//! be replayed is a fatal database inconsistency.

use serde::{Deserialize, Serialize};

use nomen_types::codec::{varint_size, write_varint, Decodable, Encodable, SliceReader};
use nomen_types::error::CodecError;
use nomen_types::hash::Hash;

use crate::auction::Auction;

/// The ordered rollback log for one block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UndoNames {
    /// `(name_hash, prior record)` tuples in first-touch order.
    pub entries: Vec<(Hash, Option<Auction>)>,
}

impl UndoNames {
    /// True when the block touched no names.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Encodable for UndoNames {
    fn encoded_size(&self) -> usize {
        varint_size(self.entries.len() as u64)
            + self
                .entries
                .iter()
                .map(|(_, prior)| 33 + prior.as_ref().map_or(0, |a| a.encoded_size()))
                .sum::<usize>()
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        write_varint(buf, self.entries.len() as u64);
        for (name_hash, prior) in &self.entries {
            buf.extend_from_slice(&name_hash.0);
            match prior {
                None => buf.push(0),
                Some(auction) => {
                    buf.push(1);
                    auction.encode_into(buf);
                }
            }
        }
    }
}

impl Decodable for UndoNames {
    fn decode_from(r: &mut SliceReader<'_>) -> Result<Self, CodecError> {
        let count = r.read_varint()? as usize;
        let mut entries = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let name_hash = r.read_hash()?;
            let prior = match r.read_u8()? {
                0 => None,
                1 => Some(Auction::decode_from(r)?),
                _ => return Err(CodecError::Malformed("undo flag")),
            };
            entries.push((name_hash, prior));
        }
        Ok(UndoNames { entries })
    }
}
