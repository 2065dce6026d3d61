// Path: crates/types/src/solution.rs

//! Fixed-arity cuckoo-cycle solutions.

use serde::{Deserialize, Serialize};

use crate::codec::{Decodable, Encodable, SliceReader};
use crate::error::CodecError;

/// Hard upper bound on solution arity, far above any network parameter.
pub const MAX_SOLUTION_SIZE: usize = 255;

/// An ordered sequence of 32-bit edge indices forming a cuckoo cycle.
/// The required arity and numeric bounds are per-network parameters; the
/// codec only enforces the representational cap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution(Vec<u32>);

impl Solution {
    /// Wraps a sequence of edge indices.
    pub fn new(edges: Vec<u32>) -> Result<Solution, CodecError> {
        if edges.len() > MAX_SOLUTION_SIZE {
            return Err(CodecError::Oversized("solution"));
        }
        Ok(Solution(edges))
    }

    /// An all-zero solution of the given arity (genesis placeholder).
    pub fn zeroed(size: usize) -> Solution {
        Solution(vec![0u32; size])
    }

    /// Number of edges.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// The edge indices.
    pub fn edges(&self) -> &[u32] {
        &self.0
    }
}

impl Encodable for Solution {
    fn encoded_size(&self) -> usize {
        1 + self.0.len() * 4
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.push(self.0.len() as u8);
        for edge in &self.0 {
            buf.extend_from_slice(&edge.to_le_bytes());
        }
    }
}

impl Decodable for Solution {
    fn decode_from(r: &mut SliceReader<'_>) -> Result<Self, CodecError> {
        let size = r.read_u8()? as usize;
        let mut edges = Vec::with_capacity(size);
        for _ in 0..size {
            edges.push(r.read_u32()?);
        }
        Ok(Solution(edges))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let solution = Solution::new(vec![1, 5, 9, 1 << 20]).unwrap();
        let bytes = solution.encode();
        assert_eq!(bytes.len(), solution.encoded_size());
        assert_eq!(Solution::decode(&bytes).unwrap(), solution);
    }

    #[test]
    fn zeroed_has_requested_arity() {
        assert_eq!(Solution::zeroed(42).size(), 42);
    }
}
