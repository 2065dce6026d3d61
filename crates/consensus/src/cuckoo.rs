// Path: crates/consensus/src/cuckoo.rs

//! The cuckoo-cycle solution verifier.
//!
//! A solution is a fixed-length list of edge indices into a bipartite
//! graph derived from the header: edge `n` joins nodes
//! `sipnode(n, 0)` and `sipnode(n, 1)` on opposite sides, with the
//! SipHash keys taken from the Blake2b digest of the 196-byte header.
//! Verification checks the index bounds and ordering, then walks the
//! edges to confirm a single cycle of exactly the required length. The
//! verifier never searches.

use std::hash::Hasher;

use siphasher::sip::SipHasher24;

use nomen_types::error::ConsensusError;
use nomen_types::hash::blake2b256;
use nomen_types::network::CuckooParams;
use nomen_types::solution::Solution;

/// Largest cycle length any network parameterizes; bounds the verifier's
/// stack buffer.
pub const MAX_PROOF_SIZE: usize = 42;

/// A pure verifier for one network's cuckoo parameters.
#[derive(Clone, Copy, Debug)]
pub struct CuckooVerifier {
    size: usize,
    edge_bound: u64,
    easiness: u64,
    node_mask: u64,
}

impl CuckooVerifier {
    /// Builds a verifier from the per-network graph parameters.
    pub fn new(params: &CuckooParams) -> CuckooVerifier {
        let edge_bound = 1u64 << params.bits;
        CuckooVerifier {
            size: params.size,
            edge_bound,
            easiness: params.ease.saturating_mul(edge_bound) / 100,
            node_mask: (edge_bound >> 1).saturating_sub(1),
        }
    }

    /// Verifies a solution against the nonce-extended header bytes.
    pub fn verify_header(
        &self,
        header_bytes: &[u8],
        solution: &Solution,
    ) -> Result<(), ConsensusError> {
        let seed = blake2b256(header_bytes);
        let (k0, k1) = sip_keys(&seed.0);
        self.verify(k0, k1, solution)
    }

    /// Verifies a solution against explicit SipHash keys.
    pub fn verify(&self, k0: u64, k1: u64, solution: &Solution) -> Result<(), ConsensusError> {
        let edges = solution.edges();
        if edges.len() != self.size || self.size > MAX_PROOF_SIZE {
            return Err(ConsensusError::BadSolutionSize {
                expected: self.size,
                got: edges.len(),
            });
        }

        // Interleaved endpoint buffer: slot 2n is edge n's u-node, slot
        // 2n+1 its v-node. Stack-sized; verification never allocates.
        let mut uvs = [0u64; 2 * MAX_PROOF_SIZE];
        let mut prev: Option<u32> = None;
        for (n, &edge) in edges.iter().enumerate() {
            let index = edge as u64;
            if index >= self.edge_bound {
                return Err(ConsensusError::PowNonMatching);
            }
            if index >= self.easiness {
                return Err(ConsensusError::PowTooBig);
            }
            if let Some(last) = prev {
                if edge <= last {
                    return Err(ConsensusError::PowTooSmall);
                }
            }
            prev = Some(edge);
            if let Some(slot) = uvs.get_mut(2 * n) {
                *slot = self.sipnode(k0, k1, index, 0);
            }
            if let Some(slot) = uvs.get_mut(2 * n + 1) {
                *slot = self.sipnode(k0, k1, index, 1);
            }
        }

        // Walk the cycle: from endpoint i, find the unique other slot on
        // the same side holding the same node, then hop to that edge's
        // opposite endpoint. A second match is a branch; none is a dead
        // end. The walk must consume exactly `size` edges and close at
        // slot 0.
        let len = 2 * self.size;
        let mut remaining = self.size;
        let mut i = 0usize;
        loop {
            let mut j = i;
            let mut k = i;
            loop {
                k = (k + 2) % len;
                if k == i {
                    break;
                }
                if uvs.get(k) == uvs.get(i) {
                    if j != i {
                        return Err(ConsensusError::PowBranch);
                    }
                    j = k;
                }
            }
            if j == i {
                return Err(ConsensusError::PowDeadEnd);
            }
            i = j ^ 1;
            remaining = match remaining.checked_sub(1) {
                Some(n) => n,
                // Walked past the proof size without closing.
                None => return Err(ConsensusError::PowShortCycle),
            };
            if i == 0 {
                break;
            }
        }
        if remaining != 0 {
            return Err(ConsensusError::PowShortCycle);
        }
        Ok(())
    }

    /// Edge endpoint on side `uorv` for edge index `edge`.
    fn sipnode(&self, k0: u64, k1: u64, edge: u64, uorv: u64) -> u64 {
        let mut hasher = SipHasher24::new_with_keys(k0, k1);
        hasher.write(&(2 * edge + uorv).to_le_bytes());
        ((hasher.finish() & self.node_mask) << 1) | uorv
    }
}

/// The SipHash key pair derived from a header seed.
fn sip_keys(seed: &[u8; 32]) -> (u64, u64) {
    let (head, rest) = seed.split_at(8);
    let (mid, _) = rest.split_at(8);
    (
        u64::from_le_bytes(head.try_into().unwrap_or_default()),
        u64::from_le_bytes(mid.try_into().unwrap_or_default()),
    )
}
