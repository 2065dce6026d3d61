// Path: crates/types/src/constants.rs

//! Authoritative consensus constants. These are fixed for the lifetime of
//! the chain; per-network tunables live in [`crate::network`] instead.

/// Decimal places of the base unit.
pub const EXP: u32 = 6;

/// Subunits ("dollarydoos") per coin.
pub const COIN: u64 = 10u64.pow(EXP);

/// Base block subsidy before any halving.
pub const BASE_REWARD: u64 = 1_000 * COIN;

/// Subsidy of the genesis block. The extra subunits make the final supply
/// land exactly on [`MAX_MONEY`].
pub const GENESIS_REWARD: u64 = BASE_REWARD + 4_420_000;

/// Number of halvings after which the subsidy is pinned to zero.
pub const MAX_HALVINGS: u32 = 52;

/// Premine allotted to investors.
pub const MAX_INVESTORS: u64 = 102_000_000 * COIN;

/// Premine allotted to the foundation.
pub const MAX_FOUNDATION: u64 = 102_000_000 * COIN;

/// Premine allotted to the creators.
pub const MAX_CREATORS: u64 = 102_000_000 * COIN;

/// Premine allotted to the airdrop.
pub const MAX_AIRDROP: u64 = 1_054_000_000 * COIN;

/// Total premine across all reserved outputs.
pub const MAX_PREMINE: u64 = 1_360_000_000 * COIN;

/// Total mined subsidy over the life of the chain.
pub const MAX_SUBSIDY: u64 = 680_000_000 * COIN;

/// Hard cap on the money supply.
pub const MAX_MONEY: u64 = 2_040_000_000 * COIN;

/// Maximum base (witness-stripped) block size in bytes.
pub const MAX_BLOCK_SIZE: usize = 1_000_000;

/// Maximum raw (witness-inclusive) block size in bytes.
pub const MAX_RAW_BLOCK_SIZE: usize = 4_000_000;

/// Maximum block weight.
pub const MAX_BLOCK_WEIGHT: usize = 4_000_000;

/// Maximum signature operations per block.
pub const MAX_BLOCK_SIGOPS: usize = 80_000;

/// Maximum name-state updates per block.
pub const MAX_BLOCK_UPDATES: usize = 500;

/// Witness discount factor for block weight.
pub const WITNESS_SCALE_FACTOR: usize = 4;

/// Number of entries over which the median time past is computed.
pub const MEDIAN_TIMESPAN: usize = 11;

/// Locktime values at or above this threshold are UNIX timestamps.
pub const LOCKTIME_THRESHOLD: u32 = 500_000_000;

/// Sequence flag disabling relative locktime.
pub const SEQUENCE_DISABLE_FLAG: u32 = 1 << 31;

/// Sequence flag selecting time-based relative locktime.
pub const SEQUENCE_TYPE_FLAG: u32 = 1 << 22;

/// Granularity shift for time-based relative locktime.
pub const SEQUENCE_GRANULARITY: u32 = 9;

/// Mask extracting the relative locktime value from a sequence.
pub const SEQUENCE_MASK: u32 = 0xffff;

/// Maximum script size in bytes.
pub const MAX_SCRIPT_SIZE: usize = 10_000;

/// Maximum script stack depth.
pub const MAX_SCRIPT_STACK: usize = 1_000;

/// Maximum script push size in bytes.
pub const MAX_SCRIPT_PUSH: usize = 520;

/// Maximum operations per script.
pub const MAX_SCRIPT_OPS: usize = 201;

/// Maximum public keys in a multisig script.
pub const MAX_MULTISIG_PUBKEYS: usize = 20;

/// Serialized block header size in bytes.
pub const HEADER_SIZE: usize = 196;

/// Byte offset of the nonce within the serialized header.
pub const NONCE_POS: usize = 176;

/// Size of the header nonce in bytes; oversized to feed cuckoo-cycle
/// header expansion.
pub const NONCE_SIZE: usize = 20;

/// Maximum length of a covenant name in bytes.
pub const MAX_NAME_SIZE: usize = 63;

/// Maximum length of a REGISTER/UPDATE resource blob in bytes.
pub const MAX_RESOURCE_SIZE: usize = 512;

/// Maximum address hash length in bytes.
pub const MAX_ADDRESS_SIZE: usize = 64;

/// The witness flag embedded in the genesis coinbase.
pub const GENESIS_FLAGS: &[u8] = b"01/Nov/2017 EFF to ICANN: Don't Pick Up the Censor's Pen";

/// The 20-byte reserved key hash paid by every genesis output.
pub const GENESIS_KEY: [u8; 20] = hex_literal::hex!("f0237ae2e8f860f7d79124fc513f012e5aaa8d23");
