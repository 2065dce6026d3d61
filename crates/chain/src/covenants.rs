// Path: crates/chain/src/covenants.rs

//! The covenant dispatch of the name-auction state machine.
//!
//! [`apply_covenant`] is a total, synchronous function on
//! `(prior record, covenant, context)`: every illegal combination maps
//! to a [`CovenantError`], which rejects the containing block. The chain
//! writer resolves everything the transitions need from storage up front
//! (spent outputs, renewal anchors) so no transition ever suspends.

use std::collections::HashMap;

use nomen_types::covenant::Covenant;
use nomen_types::error::CovenantError;
use nomen_types::hash::Hash;
use nomen_types::network::NetworkParams;
use nomen_types::tx::{Outpoint, Output, Transaction};

use crate::auction::{compute_blind, Auction, AuctionState, Transfer};

/// Everything a covenant transition may consult besides the record
/// itself.
pub struct CovenantContext<'a> {
    /// Active network parameters.
    pub network: &'static NetworkParams,
    /// Height of the block being applied.
    pub height: u32,
    /// Outpoint of the output carrying this covenant.
    pub outpoint: Outpoint,
    /// Value of the output carrying this covenant.
    pub output_value: u64,
    /// The containing transaction.
    pub tx: &'a Transaction,
    /// Outputs spent by the containing transaction, resolved up front.
    pub spent: &'a HashMap<Outpoint, Output>,
    /// Txid of the genesis claimer transaction.
    pub claimer_hash: Hash,
    /// Main-chain height of a RENEW anchor, when resolvable.
    pub anchor_height: Option<u32>,
}

impl CovenantContext<'_> {
    fn spends_claimant_path(&self) -> bool {
        self.tx
            .inputs
            .iter()
            .any(|input| input.prevout.hash == self.claimer_hash)
    }
}

/// Applies one covenant to its auction record.
pub fn apply_covenant(
    auction: &mut Auction,
    covenant: &Covenant,
    ctx: &CovenantContext<'_>,
) -> Result<(), CovenantError> {
    match covenant {
        Covenant::None => Ok(()),
        Covenant::Claim { name } => apply_claim(auction, name, ctx),
        Covenant::Bid { name, .. } => apply_bid(auction, name, ctx),
        Covenant::Reveal { name, nonce } => apply_reveal(auction, name, nonce, ctx),
        Covenant::Redeem { name } => apply_redeem(auction, name, ctx),
        Covenant::Register { .. } => apply_register(auction, ctx),
        Covenant::Update { .. } => apply_update(auction, ctx),
        Covenant::Renew { .. } => apply_renew(auction, ctx),
        Covenant::Transfer { address, .. } => apply_transfer(auction, address.clone(), ctx),
        Covenant::Finalize { .. } => apply_finalize(auction, ctx),
        Covenant::Revoke { .. } => apply_revoke(auction, ctx),
    }
}

/// Requires a registered, unexpired, unrevoked record whose owner output
/// is spent by the transaction.
fn ensure_live_owned(auction: &Auction, ctx: &CovenantContext<'_>) -> Result<(), CovenantError> {
    match auction.state {
        AuctionState::Revoked => return Err(CovenantError::Revoked),
        AuctionState::Closed | AuctionState::Renewed => {}
        _ => return Err(CovenantError::WrongState("name is not registered")),
    }
    if auction.is_expired(ctx.height, &ctx.network.windows) {
        return Err(CovenantError::WrongState("name is expired"));
    }
    if !ctx.tx.spends(&auction.owner) {
        return Err(CovenantError::NotOwner);
    }
    Ok(())
}

fn apply_claim(
    auction: &mut Auction,
    name: &[u8],
    ctx: &CovenantContext<'_>,
) -> Result<(), CovenantError> {
    if !auction.is_null() && !auction.is_expired(ctx.height, &ctx.network.windows) {
        if auction.state == AuctionState::Revoked {
            return Err(CovenantError::Revoked);
        }
        return Err(CovenantError::WrongState("name already exists"));
    }
    if !ctx.spends_claimant_path() {
        return Err(CovenantError::BadProvenance);
    }
    auction.open(name, ctx.height);
    auction.owner = ctx.outpoint;
    auction.claimed = true;
    auction.state = AuctionState::Closed;
    Ok(())
}

fn apply_bid(
    auction: &mut Auction,
    name: &[u8],
    ctx: &CovenantContext<'_>,
) -> Result<(), CovenantError> {
    let windows = &ctx.network.windows;
    match auction.state {
        AuctionState::Revoked => return Err(CovenantError::Revoked),
        AuctionState::Null => auction.open(name, ctx.height),
        AuctionState::Closed | AuctionState::Renewed => {
            if !auction.is_expired(ctx.height, windows) {
                return Err(CovenantError::NotExpired);
            }
            auction.open(name, ctx.height);
        }
        AuctionState::Bidding | AuctionState::Reveal => {
            if auction.is_expired(ctx.height, windows) {
                auction.open(name, ctx.height);
            } else if ctx.height >= auction.bidding_end(windows) {
                return Err(CovenantError::OutsideWindow("bidding"));
            }
        }
    }
    Ok(())
}

fn apply_reveal(
    auction: &mut Auction,
    name: &[u8],
    nonce: &Hash,
    ctx: &CovenantContext<'_>,
) -> Result<(), CovenantError> {
    let windows = &ctx.network.windows;
    match auction.state {
        AuctionState::Revoked => return Err(CovenantError::Revoked),
        AuctionState::Null => return Err(CovenantError::WrongState("no auction to reveal into")),
        AuctionState::Bidding | AuctionState::Reveal => {}
        _ => return Err(CovenantError::WrongState("auction already settled")),
    }
    if ctx.height < auction.bidding_end(windows) || ctx.height >= auction.reveal_end(windows) {
        return Err(CovenantError::OutsideWindow("reveal"));
    }

    // The reveal must spend its own bid output; that output carries the
    // blind the commitment is checked against. Inputs are scanned in
    // order so the choice is deterministic.
    let blind = ctx.tx.inputs.iter().find_map(|input| {
        let output = ctx.spent.get(&input.prevout)?;
        match &output.covenant {
            Covenant::Bid {
                name: bid_name,
                blind,
            } if bid_name == name => Some(*blind),
            _ => None,
        }
    });
    let blind = blind.ok_or(CovenantError::WrongState("reveal does not spend a bid"))?;
    if compute_blind(ctx.output_value, nonce, &auction.name_hash) != blind {
        return Err(CovenantError::BadBlind);
    }

    // Track the top two values. Strict comparisons break ties in favor
    // of the earliest-seen reveal.
    if ctx.output_value > auction.highest {
        auction.value = auction.highest;
        auction.highest = ctx.output_value;
        auction.owner = ctx.outpoint;
    } else if ctx.output_value > auction.value {
        auction.value = ctx.output_value;
    }
    auction.state = AuctionState::Reveal;
    Ok(())
}

fn apply_redeem(
    auction: &mut Auction,
    name: &[u8],
    ctx: &CovenantContext<'_>,
) -> Result<(), CovenantError> {
    match auction.state {
        AuctionState::Revoked => return Err(CovenantError::Revoked),
        AuctionState::Null => return Err(CovenantError::WrongState("no auction to redeem from")),
        _ => {}
    }
    if ctx.height < auction.reveal_end(&ctx.network.windows) {
        return Err(CovenantError::OutsideWindow("redeem"));
    }
    // Must spend a losing reveal of this name; the winner's lockup is
    // consumed by REGISTER instead.
    let outpoint = ctx.tx.inputs.iter().find_map(|input| {
        let output = ctx.spent.get(&input.prevout)?;
        match &output.covenant {
            Covenant::Reveal { name: n, .. } if n == name => Some(input.prevout),
            _ => None,
        }
    });
    let outpoint =
        outpoint.ok_or(CovenantError::WrongState("redeem does not spend a reveal"))?;
    if outpoint == auction.owner {
        return Err(CovenantError::NotWinner);
    }
    Ok(())
}

fn apply_register(auction: &mut Auction, ctx: &CovenantContext<'_>) -> Result<(), CovenantError> {
    let windows = &ctx.network.windows;
    if auction.state == AuctionState::Revoked {
        return Err(CovenantError::Revoked);
    }
    if auction.is_null() {
        return Err(CovenantError::WrongState("no auction to register"));
    }
    if auction.is_expired(ctx.height, windows) {
        return Err(CovenantError::WrongState("name is expired"));
    }

    if auction.claimed && auction.state == AuctionState::Closed {
        // Claimant path: a claimed name registers its resource without
        // an auction.
        if !ctx.tx.spends(&auction.owner) {
            return Err(CovenantError::NotOwner);
        }
    } else {
        if auction.state != AuctionState::Reveal {
            return Err(CovenantError::WrongState("auction is not settled"));
        }
        if ctx.height < auction.reveal_end(windows) {
            return Err(CovenantError::OutsideWindow("register"));
        }
        if !ctx.tx.spends(&auction.owner) {
            return Err(CovenantError::NotWinner);
        }
    }

    // The winner pays the second-highest revealed value.
    if ctx.output_value != auction.value {
        return Err(CovenantError::BadValue {
            expected: auction.value,
            got: ctx.output_value,
        });
    }

    auction.claimed = false;
    auction.state = AuctionState::Closed;
    auction.renewal = ctx.height;
    auction.owner = ctx.outpoint;
    Ok(())
}

fn apply_update(auction: &mut Auction, ctx: &CovenantContext<'_>) -> Result<(), CovenantError> {
    ensure_live_owned(auction, ctx)?;
    auction.owner = ctx.outpoint;
    Ok(())
}

fn apply_renew(auction: &mut Auction, ctx: &CovenantContext<'_>) -> Result<(), CovenantError> {
    ensure_live_owned(auction, ctx)?;
    let anchor = ctx.anchor_height.ok_or(CovenantError::UnknownAnchor)?;
    if ctx.height.saturating_sub(anchor) > ctx.network.windows.renew_anchor {
        return Err(CovenantError::StaleAnchor);
    }
    auction.renewal = ctx.height;
    auction.state = AuctionState::Renewed;
    auction.owner = ctx.outpoint;
    Ok(())
}

fn apply_transfer(
    auction: &mut Auction,
    address: nomen_types::tx::Address,
    ctx: &CovenantContext<'_>,
) -> Result<(), CovenantError> {
    ensure_live_owned(auction, ctx)?;
    if auction.transfer.is_some() {
        return Err(CovenantError::PendingTransfer);
    }
    auction.transfer = Some(Transfer {
        address,
        height: ctx.height,
    });
    auction.owner = ctx.outpoint;
    Ok(())
}

fn apply_finalize(auction: &mut Auction, ctx: &CovenantContext<'_>) -> Result<(), CovenantError> {
    ensure_live_owned(auction, ctx)?;
    let transfer = auction.transfer.as_ref().ok_or(CovenantError::NoTransfer)?;
    if ctx.height < transfer.height + ctx.network.windows.transfer_lockup {
        return Err(CovenantError::TransferLocked);
    }
    auction.owner = ctx.outpoint;
    auction.transfer = None;
    Ok(())
}

fn apply_revoke(auction: &mut Auction, ctx: &CovenantContext<'_>) -> Result<(), CovenantError> {
    match auction.state {
        AuctionState::Revoked => return Err(CovenantError::Revoked),
        AuctionState::Null => return Err(CovenantError::WrongState("no name to revoke")),
        _ => {}
    }
    if auction.owner.is_null() || !ctx.tx.spends(&auction.owner) {
        return Err(CovenantError::NotOwner);
    }
    // Revocation also cancels any pending transfer.
    auction.state = AuctionState::Revoked;
    auction.transfer = None;
    Ok(())
}
