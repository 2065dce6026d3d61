// Path: crates/consensus/src/reward.rs

//! The block subsidy schedule.

use nomen_types::constants::{BASE_REWARD, MAX_HALVINGS};

/// The subsidy for a block at `height` with the given halving interval.
///
/// The base reward halves every `interval` blocks and is pinned to zero
/// from the 52nd halving on. The genesis block's extra subunits are not
/// part of the schedule; see `nomen_types::constants::GENESIS_REWARD`.
pub fn get_reward(height: u32, interval: u32) -> u64 {
    if interval == 0 {
        return 0;
    }
    let halvings = height / interval;
    if halvings >= MAX_HALVINGS {
        return 0;
    }
    BASE_REWARD >> halvings
}
