// Path: crates/types/src/network.rs

//! Immutable per-network parameter tables.
//!
//! The four environments (main, testnet, regtest, simnet) differ only in
//! these values. Tables are constructed once and are read-only afterwards;
//! consensus code receives them as `&'static NetworkParams` threaded
//! through construction, never as mutable globals.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::constants::GENESIS_KEY;

/// The chain environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    /// Production network.
    Main,
    /// Public test network.
    Testnet,
    /// Local regression-test network.
    Regtest,
    /// Simulation network.
    Simnet,
}

impl Network {
    /// Lowercase identifier used in artifacts and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
            Network::Simnet => "simnet",
        }
    }

    /// The parameter table for this network.
    pub fn params(&self) -> &'static NetworkParams {
        match self {
            Network::Main => &MAIN,
            Network::Testnet => &TESTNET,
            Network::Regtest => &REGTEST,
            Network::Simnet => &SIMNET,
        }
    }
}

/// Cuckoo-cycle graph parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuckooParams {
    /// Graph size exponent: edge indices live below `1 << bits`.
    pub bits: u8,
    /// Required cycle length (solution arity). Even, at least 4.
    pub size: usize,
    /// Verification-ease percentage of the edge space.
    pub ease: u64,
}

/// Heights of the name-auction windows, in blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameWindows {
    /// Length of the bidding window after an auction opens.
    pub bidding: u32,
    /// Length of the reveal window after bidding closes.
    pub reveal: u32,
    /// How far back a RENEW anchor block may lie.
    pub renew_anchor: u32,
    /// Blocks after the last renewal before a name expires.
    pub expire: u32,
    /// Mandatory delay between TRANSFER and FINALIZE.
    pub transfer_lockup: u32,
}

/// The five reserved 20-byte key hashes paid by the genesis block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySet {
    /// Investor premine key.
    pub investors: [u8; 20],
    /// Foundation premine key.
    pub foundation: [u8; 20],
    /// Genesis claimant key; reserved names are claimed against it.
    pub claimant: [u8; 20],
    /// Creator premine key.
    pub creators: [u8; 20],
    /// Airdrop premine key.
    pub airdrop: [u8; 20],
}

impl KeySet {
    const fn uniform(key: [u8; 20]) -> KeySet {
        KeySet {
            investors: key,
            foundation: key,
            claimant: key,
            creators: key,
            airdrop: key,
        }
    }
}

/// The full per-network parameter table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParams {
    /// Which environment this table describes.
    pub network: Network,
    /// Initial compact proof-of-work target.
    pub pow_bits: u32,
    /// Cuckoo graph parameters.
    pub cuckoo: CuckooParams,
    /// Reserved genesis keys.
    pub keys: KeySet,
    /// Genesis timestamp, UNIX seconds.
    pub genesis_time: u64,
    /// Name-auction windows.
    pub windows: NameWindows,
    /// Blocks between subsidy halvings.
    pub halving_interval: u32,
}

static MAIN: Lazy<NetworkParams> = Lazy::new(|| NetworkParams {
    network: Network::Main,
    pow_bits: 0x1d00ffff,
    cuckoo: CuckooParams {
        bits: 30,
        size: 42,
        ease: 50,
    },
    keys: KeySet::uniform(GENESIS_KEY),
    genesis_time: 1514765688,
    windows: NameWindows {
        bidding: 720,
        reveal: 1440,
        renew_anchor: 17280,
        expire: 105120,
        transfer_lockup: 288,
    },
    halving_interval: 170000,
});

static TESTNET: Lazy<NetworkParams> = Lazy::new(|| NetworkParams {
    network: Network::Testnet,
    pow_bits: 0x1d00ffff,
    cuckoo: CuckooParams {
        bits: 30,
        size: 42,
        ease: 50,
    },
    keys: KeySet::uniform(GENESIS_KEY),
    genesis_time: 1514765689,
    windows: NameWindows {
        bidding: 360,
        reveal: 720,
        renew_anchor: 8640,
        expire: 52560,
        transfer_lockup: 144,
    },
    halving_interval: 85000,
});

static REGTEST: Lazy<NetworkParams> = Lazy::new(|| NetworkParams {
    network: Network::Regtest,
    pow_bits: 0x207fffff,
    cuckoo: CuckooParams {
        bits: 8,
        size: 4,
        ease: 50,
    },
    keys: KeySet::uniform(GENESIS_KEY),
    genesis_time: 1514765690,
    windows: NameWindows {
        bidding: 10,
        reveal: 20,
        renew_anchor: 40,
        expire: 80,
        transfer_lockup: 5,
    },
    halving_interval: 2500,
});

static SIMNET: Lazy<NetworkParams> = Lazy::new(|| NetworkParams {
    network: Network::Simnet,
    pow_bits: 0x207fffff,
    cuckoo: CuckooParams {
        bits: 16,
        size: 18,
        ease: 50,
    },
    keys: KeySet::uniform(GENESIS_KEY),
    genesis_time: 1514765691,
    windows: NameWindows {
        bidding: 25,
        reveal: 50,
        renew_anchor: 100,
        expire: 200,
        transfer_lockup: 10,
    },
    halving_interval: 5000,
});

/// All four networks, in artifact order.
pub const NETWORKS: [Network; 4] = [
    Network::Main,
    Network::Testnet,
    Network::Regtest,
    Network::Simnet,
];
