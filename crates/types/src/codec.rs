// Path: crates/types/src/codec.rs

//! The canonical, deterministic binary codec for all consensus-critical
//! data.
//!
//! Every on-chain type serializes to a fixed, byte-exact little-endian
//! layout; variable-length sequences carry a compact-size prefix. The
//! round-trip law `decode(encode(x)) == x` holds for every type in this
//! workspace, and decoding rejects trailing bytes and non-minimal length
//! prefixes so that each value has exactly one wire form.

use crate::error::CodecError;
use crate::hash::Hash;

/// A type with a canonical wire encoding.
pub trait Encodable {
    /// Exact size of the encoding in bytes.
    fn encoded_size(&self) -> usize;

    /// Appends the canonical encoding to `buf`.
    fn encode_into(&self, buf: &mut Vec<u8>);

    /// Returns the canonical encoding as a fresh buffer.
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_size());
        self.encode_into(&mut buf);
        buf
    }
}

/// A type decodable from its canonical wire encoding.
pub trait Decodable: Sized {
    /// Reads one value from the cursor, advancing it.
    fn decode_from(r: &mut SliceReader<'_>) -> Result<Self, CodecError>;

    /// Decodes a value that must span the whole input.
    fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut r = SliceReader::new(bytes);
        let value = Self::decode_from(&mut r)?;
        r.finish()?;
        Ok(value)
    }
}

/// A bounds-checked cursor over an input slice.
pub struct SliceReader<'a> {
    data: &'a [u8],
}

impl<'a> SliceReader<'a> {
    /// Wraps a slice in a fresh cursor.
    pub fn new(data: &'a [u8]) -> Self {
        SliceReader { data }
    }

    /// Bytes left unread.
    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    /// Errors unless the input has been fully consumed.
    pub fn finish(&self) -> Result<(), CodecError> {
        if self.data.is_empty() {
            Ok(())
        } else {
            Err(CodecError::TrailingBytes(self.data.len()))
        }
    }

    /// Advances past `n` bytes and returns them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.data.len() < n {
            return Err(CodecError::UnexpectedEnd);
        }
        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        Ok(head)
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        let b = self.read_bytes(1)?;
        Ok(b[0])
    }

    /// Reads a little-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    /// Reads a little-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads a little-endian `u64`.
    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        let b = self.read_bytes(8)?;
        Ok(u64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Reads a raw 32-byte hash.
    pub fn read_hash(&mut self) -> Result<Hash, CodecError> {
        let b = self.read_bytes(32)?;
        let mut out = [0u8; 32];
        out.copy_from_slice(b);
        Ok(Hash(out))
    }

    /// Reads a compact-size length prefix, enforcing minimal encoding.
    pub fn read_varint(&mut self) -> Result<u64, CodecError> {
        let tag = self.read_u8()?;
        let value = match tag {
            0xff => {
                let v = self.read_u64()?;
                if v <= u32::MAX as u64 {
                    return Err(CodecError::NonCanonicalLength);
                }
                v
            }
            0xfe => {
                let v = self.read_u32()? as u64;
                if v <= u16::MAX as u64 {
                    return Err(CodecError::NonCanonicalLength);
                }
                v
            }
            0xfd => {
                let v = self.read_u16()? as u64;
                if v < 0xfd {
                    return Err(CodecError::NonCanonicalLength);
                }
                v
            }
            v => v as u64,
        };
        Ok(value)
    }

    /// Reads a compact-size prefixed byte string bounded by `max` bytes.
    pub fn read_varbytes(&mut self, max: usize) -> Result<Vec<u8>, CodecError> {
        let len = self.read_varint()? as usize;
        if len > max {
            return Err(CodecError::Oversized("varbytes"));
        }
        Ok(self.read_bytes(len)?.to_vec())
    }
}

/// Appends a compact-size length prefix.
pub fn write_varint(buf: &mut Vec<u8>, value: u64) {
    if value < 0xfd {
        buf.push(value as u8);
    } else if value <= u16::MAX as u64 {
        buf.push(0xfd);
        buf.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= u32::MAX as u64 {
        buf.push(0xfe);
        buf.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        buf.push(0xff);
        buf.extend_from_slice(&value.to_le_bytes());
    }
}

/// Appends a compact-size prefixed byte string.
pub fn write_varbytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    write_varint(buf, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Size of the compact-size prefix for `value`.
pub fn varint_size(value: u64) -> usize {
    if value < 0xfd {
        1
    } else if value <= u16::MAX as u64 {
        3
    } else if value <= u32::MAX as u64 {
        5
    } else {
        9
    }
}

/// Size of a compact-size prefixed byte string.
pub fn varbytes_size(bytes: &[u8]) -> usize {
    varint_size(bytes.len() as u64) + bytes.len()
}
