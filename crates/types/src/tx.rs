// Path: crates/types/src/tx.rs

//! Transactions, inputs, outputs, addresses and witnesses.
//!
//! The transaction hash (txid) is computed over the base serialization,
//! which omits witness data; the witness hash (wtxid) covers both. The
//! witness section itself is serialized separately and committed through
//! the header's witness root.

use serde::{Deserialize, Serialize};

use crate::codec::{
    varbytes_size, varint_size, write_varbytes, write_varint, Decodable, Encodable, SliceReader,
};
use crate::constants::{MAX_ADDRESS_SIZE, MAX_SCRIPT_SIZE, MAX_SCRIPT_STACK};
use crate::covenant::Covenant;
use crate::error::CodecError;
use crate::hash::{blake2b256, blake2b256_multi, Hash};

/// A reference to a transaction output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Outpoint {
    /// Hash of the funding transaction.
    pub hash: Hash,
    /// Output index within the funding transaction.
    pub index: u32,
}

impl Outpoint {
    /// The designated null outpoint (coinbase prevout, absent owner).
    pub const NULL: Outpoint = Outpoint {
        hash: Hash::ZERO,
        index: u32::MAX,
    };

    /// Creates an outpoint.
    pub fn new(hash: Hash, index: u32) -> Outpoint {
        Outpoint { hash, index }
    }

    /// True for the designated null outpoint.
    pub fn is_null(&self) -> bool {
        *self == Outpoint::NULL
    }
}

impl Encodable for Outpoint {
    fn encoded_size(&self) -> usize {
        36
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.hash.0);
        buf.extend_from_slice(&self.index.to_le_bytes());
    }
}

impl Decodable for Outpoint {
    fn decode_from(r: &mut SliceReader<'_>) -> Result<Self, CodecError> {
        Ok(Outpoint {
            hash: r.read_hash()?,
            index: r.read_u32()?,
        })
    }
}

/// A versioned witness-program address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    version: u8,
    hash: Vec<u8>,
}

impl Address {
    /// Creates an address, validating the hash length bound.
    pub fn new(version: u8, hash: Vec<u8>) -> Result<Address, CodecError> {
        if hash.is_empty() || hash.len() > MAX_ADDRESS_SIZE {
            return Err(CodecError::Malformed("address hash length"));
        }
        Ok(Address { version, hash })
    }

    /// A version-0 pay-to-key-hash address over a 20-byte hash.
    pub fn from_key_hash(hash: [u8; 20]) -> Address {
        Address {
            version: 0,
            hash: hash.to_vec(),
        }
    }

    /// The address version.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// The raw address hash.
    pub fn hash(&self) -> &[u8] {
        &self.hash
    }
}

impl Encodable for Address {
    fn encoded_size(&self) -> usize {
        2 + self.hash.len()
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.push(self.version);
        buf.push(self.hash.len() as u8);
        buf.extend_from_slice(&self.hash);
    }
}

impl Decodable for Address {
    fn decode_from(r: &mut SliceReader<'_>) -> Result<Self, CodecError> {
        let version = r.read_u8()?;
        let len = r.read_u8()? as usize;
        if len == 0 || len > MAX_ADDRESS_SIZE {
            return Err(CodecError::Malformed("address hash length"));
        }
        Ok(Address {
            version,
            hash: r.read_bytes(len)?.to_vec(),
        })
    }
}

/// A witness stack: zero or more byte strings consumed by script
/// verification.
pub type Witness = Vec<Vec<u8>>;

/// A transaction input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    /// The output being spent.
    pub prevout: Outpoint,
    /// The witness stack authorizing the spend. Not part of the txid.
    pub witness: Witness,
    /// Relative-locktime sequence field.
    pub sequence: u32,
}

impl Input {
    /// An input spending `prevout` with an empty witness and final
    /// sequence.
    pub fn from_outpoint(prevout: Outpoint) -> Input {
        Input {
            prevout,
            witness: Vec::new(),
            sequence: u32::MAX,
        }
    }
}

/// A transaction output: a value, a destination and a covenant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Amount in dollarydoos.
    pub value: u64,
    /// Destination address.
    pub address: Address,
    /// The covenant envelope.
    pub covenant: Covenant,
}

impl Output {
    /// A plain value-transfer output.
    pub fn plain(value: u64, address: Address) -> Output {
        Output {
            value,
            address,
            covenant: Covenant::None,
        }
    }
}

impl Encodable for Output {
    fn encoded_size(&self) -> usize {
        8 + self.address.encoded_size() + self.covenant.encoded_size()
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.value.to_le_bytes());
        self.address.encode_into(buf);
        self.covenant.encode_into(buf);
    }
}

impl Decodable for Output {
    fn decode_from(r: &mut SliceReader<'_>) -> Result<Self, CodecError> {
        Ok(Output {
            value: r.read_u64()?,
            address: Address::decode_from(r)?,
            covenant: Covenant::decode_from(r)?,
        })
    }
}

/// A transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Serialization version.
    pub version: u32,
    /// Inputs.
    pub inputs: Vec<Input>,
    /// Outputs.
    pub outputs: Vec<Output>,
    /// Absolute locktime (height, or UNIX time at and above the
    /// threshold).
    pub locktime: u32,
}

impl Transaction {
    /// True for a coinbase: one input spending the null outpoint.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].prevout.is_null()
    }

    /// True when some input spends `outpoint`.
    pub fn spends(&self, outpoint: &Outpoint) -> bool {
        self.inputs.iter().any(|i| i.prevout == *outpoint)
    }

    /// The transaction hash over the base (witness-stripped)
    /// serialization.
    pub fn txid(&self) -> Hash {
        blake2b256(&self.encode())
    }

    /// The witness hash over base plus witness serialization.
    pub fn wtxid(&self) -> Hash {
        blake2b256_multi(&[&self.encode(), &self.encode_witness()])
    }

    /// Size of the witness section in bytes.
    pub fn witness_size(&self) -> usize {
        self.inputs
            .iter()
            .map(|i| {
                varint_size(i.witness.len() as u64)
                    + i.witness.iter().map(|w| varbytes_size(w)).sum::<usize>()
            })
            .sum()
    }

    /// Serializes the witness section (one stack per input, in input
    /// order).
    pub fn encode_witness(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.witness_size());
        self.write_witness(&mut buf);
        buf
    }

    /// Appends the witness section to `buf`.
    pub fn write_witness(&self, buf: &mut Vec<u8>) {
        for input in &self.inputs {
            write_varint(buf, input.witness.len() as u64);
            for item in &input.witness {
                write_varbytes(buf, item);
            }
        }
    }

    /// Reads the witness section for an already-decoded transaction,
    /// populating each input's stack.
    pub fn read_witness(&mut self, r: &mut SliceReader<'_>) -> Result<(), CodecError> {
        for input in &mut self.inputs {
            let count = r.read_varint()? as usize;
            if count > MAX_SCRIPT_STACK {
                return Err(CodecError::Oversized("witness stack"));
            }
            let mut stack = Vec::with_capacity(count);
            for _ in 0..count {
                stack.push(r.read_varbytes(MAX_SCRIPT_SIZE)?);
            }
            input.witness = stack;
        }
        Ok(())
    }
}

impl Encodable for Transaction {
    fn encoded_size(&self) -> usize {
        4 + varint_size(self.inputs.len() as u64)
            + self.inputs.len() * 40
            + varint_size(self.outputs.len() as u64)
            + self.outputs.iter().map(|o| o.encoded_size()).sum::<usize>()
            + 4
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.version.to_le_bytes());
        write_varint(buf, self.inputs.len() as u64);
        for input in &self.inputs {
            input.prevout.encode_into(buf);
            buf.extend_from_slice(&input.sequence.to_le_bytes());
        }
        write_varint(buf, self.outputs.len() as u64);
        for output in &self.outputs {
            output.encode_into(buf);
        }
        buf.extend_from_slice(&self.locktime.to_le_bytes());
    }
}

impl Decodable for Transaction {
    fn decode_from(r: &mut SliceReader<'_>) -> Result<Self, CodecError> {
        let version = r.read_u32()?;
        let input_count = r.read_varint()? as usize;
        let mut inputs = Vec::with_capacity(input_count.min(1024));
        for _ in 0..input_count {
            let prevout = Outpoint::decode_from(r)?;
            let sequence = r.read_u32()?;
            inputs.push(Input {
                prevout,
                witness: Vec::new(),
                sequence,
            });
        }
        let output_count = r.read_varint()? as usize;
        let mut outputs = Vec::with_capacity(output_count.min(1024));
        for _ in 0..output_count {
            outputs.push(Output::decode_from(r)?);
        }
        let locktime = r.read_u32()?;
        Ok(Transaction {
            version,
            inputs,
            outputs,
            locktime,
        })
    }
}
