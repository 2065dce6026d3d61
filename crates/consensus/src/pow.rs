// Path: crates/consensus/src/pow.rs

//! Target checks and accumulated-work proofs.

use primitive_types::U256;

use nomen_types::error::ConsensusError;
use nomen_types::hash::Hash;

use crate::compact::from_compact;

/// Checks a header hash against its compact target.
///
/// Succeeds iff the target is positive, fits in 256 bits, and the hash
/// interpreted as a big-endian integer is at or below it.
pub fn verify_pow(hash: &Hash, bits: u32) -> Result<(), ConsensusError> {
    let target = from_compact(bits);
    if !target.is_usable() {
        return Err(ConsensusError::BadTarget(bits));
    }
    if U256::from_big_endian(&hash.0) > target.value {
        return Err(ConsensusError::HighHash);
    }
    Ok(())
}

/// The work proven by a compact target: `2^256 / (target + 1)`, computed
/// in 256 bits as `(~target / (target + 1)) + 1`. Unusable targets prove
/// zero work.
pub fn get_proof(bits: u32) -> U256 {
    let target = from_compact(bits);
    if !target.is_usable() {
        return U256::zero();
    }
    let (denominator, carry) = target.value.overflowing_add(U256::one());
    if carry {
        // target == 2^256 - 1: one hash op on average.
        return U256::one();
    }
    ((!target.value) / denominator).saturating_add(U256::one())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nomen_types::hash::blake2b256;

    #[test]
    fn permissive_target_accepts_any_hash() {
        let hash = blake2b256(b"whatever");
        verify_pow(&hash, 0x207fffff).unwrap();
    }

    #[test]
    fn strict_target_rejects_high_hash() {
        // All-ones hash can never be below a real target.
        let hash = Hash([0xff; 32]);
        assert_eq!(
            verify_pow(&hash, 0x1d00ffff),
            Err(ConsensusError::HighHash)
        );
        // The zero hash beats every usable target.
        verify_pow(&Hash::ZERO, 0x1d00ffff).unwrap();
    }

    #[test]
    fn unusable_targets_rejected() {
        assert_eq!(verify_pow(&Hash::ZERO, 0), Err(ConsensusError::BadTarget(0)));
        assert_eq!(
            verify_pow(&Hash::ZERO, 0x04_923456),
            Err(ConsensusError::BadTarget(0x04_923456))
        );
        assert_eq!(
            verify_pow(&Hash::ZERO, 0xff_7fffff),
            Err(ConsensusError::BadTarget(0xff_7fffff))
        );
    }

    #[test]
    fn proof_is_inverse_of_target() {
        // Proof of the easiest target is tiny, harder targets prove more.
        let easy = get_proof(0x207fffff);
        let hard = get_proof(0x1d00ffff);
        assert!(hard > easy);
        assert!(easy >= U256::one());
        // 2^256 / (2^224ish) for the classic initial target.
        let expected = (!from_compact(0x1d00ffff).value)
            / (from_compact(0x1d00ffff).value + U256::one())
            + U256::one();
        assert_eq!(hard, expected);
    }

    #[test]
    fn unusable_target_proves_nothing() {
        assert_eq!(get_proof(0), U256::zero());
        assert_eq!(get_proof(0xff_7fffff), U256::zero());
    }
}
