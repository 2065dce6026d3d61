// Path: crates/chain/src/bloom.rs

//! Bloom predicates for rescan filtering.
//!
//! Subscribers install a filter to narrow `Rescan` deliveries to
//! transactions touching their keys or names. No filter means match
//! everything.

use std::hash::Hasher;

use siphasher::sip::SipHasher24;

use nomen_types::covenant::Covenant;
use nomen_types::hash::hash_name;
use nomen_types::tx::Transaction;

/// A fixed-size bloom filter over byte strings.
#[derive(Clone, Debug)]
pub struct BloomFilter {
    bits: Vec<u8>,
    hashes: u8,
    tweak: u32,
}

impl BloomFilter {
    /// A filter of `size` bytes probed `hashes` times per item. `tweak`
    /// decorrelates filters built over the same items.
    pub fn new(size: usize, hashes: u8, tweak: u32) -> BloomFilter {
        BloomFilter {
            bits: vec![0u8; size.max(1)],
            hashes: hashes.max(1),
            tweak,
        }
    }

    fn bit_index(&self, round: u8, data: &[u8]) -> usize {
        let mut hasher =
            SipHasher24::new_with_keys(self.tweak as u64, 0x6e6f_6d65_6e00_0000 | round as u64);
        hasher.write(data);
        (hasher.finish() as usize) % (self.bits.len() * 8)
    }

    /// Adds an item.
    pub fn insert(&mut self, data: &[u8]) {
        for round in 0..self.hashes {
            let index = self.bit_index(round, data);
            if let Some(byte) = self.bits.get_mut(index / 8) {
                *byte |= 1 << (index % 8);
            }
        }
    }

    /// Probabilistically tests an item.
    pub fn contains(&self, data: &[u8]) -> bool {
        (0..self.hashes).all(|round| {
            let index = self.bit_index(round, data);
            self.bits
                .get(index / 8)
                .is_some_and(|byte| byte & (1 << (index % 8)) != 0)
        })
    }

    /// True when the transaction plausibly concerns a watched item: its
    /// txid, an output address hash, or a covenant name (raw or hashed).
    pub fn matches_tx(&self, tx: &Transaction) -> bool {
        if self.contains(&tx.txid().0) {
            return true;
        }
        for output in &tx.outputs {
            if self.contains(output.address.hash()) {
                return true;
            }
            if let Covenant::None = output.covenant {
                continue;
            }
            if let Some(name) = output.covenant.name() {
                if self.contains(name) || self.contains(&hash_name(name).0) {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nomen_types::tx::{Address, Input, Outpoint, Output};

    #[test]
    fn insert_then_contains() {
        let mut filter = BloomFilter::new(64, 5, 7);
        filter.insert(b"watched");
        assert!(filter.contains(b"watched"));
        assert!(!filter.contains(b"not-watched"));
    }

    #[test]
    fn matches_covenant_names_and_addresses() {
        let mut filter = BloomFilter::new(128, 5, 0);
        filter.insert(b"hello");

        let tx = Transaction {
            version: 0,
            inputs: vec![Input::from_outpoint(Outpoint::NULL)],
            outputs: vec![Output {
                value: 0,
                address: Address::from_key_hash([5; 20]),
                covenant: Covenant::Redeem {
                    name: b"hello".to_vec(),
                },
            }],
            locktime: 0,
        };
        assert!(filter.matches_tx(&tx));

        let mut by_address = BloomFilter::new(128, 5, 0);
        by_address.insert(&[5u8; 20]);
        assert!(by_address.matches_tx(&tx));

        let unrelated = BloomFilter::new(128, 5, 0);
        assert!(!unrelated.matches_tx(&tx));
    }
}
