// Path: crates/chain/src/events.rs

//! Typed events and per-subscriber bounded queues.
//!
//! The chain writer never blocks on a subscriber: events land in a
//! bounded queue per subscription, and when one fills up, its contents
//! are dropped and replaced by a `Reset` carrying the current tip, which
//! forces the consumer to resynchronize.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use nomen_types::tx::Transaction;

use crate::bloom::BloomFilter;
use crate::entry::ChainEntry;

/// An event published by the chain to its subscribers.
#[derive(Clone, Debug)]
pub enum ChainEvent {
    /// A block was appended to the best chain.
    Connect {
        /// The appended entry.
        entry: ChainEntry,
        /// The block's transactions.
        txs: Arc<Vec<Transaction>>,
    },
    /// A block was rolled back during a reorganization. Late attachers
    /// may see disconnects for blocks they never saw connect; treat
    /// unknown hashes as no-ops.
    Disconnect {
        /// The rolled-back entry.
        entry: ChainEntry,
    },
    /// A transaction was accepted outside a block. Unordered relative to
    /// block events; never infer chain state from it.
    Tx {
        /// The accepted transaction.
        tx: Transaction,
    },
    /// The active tip changed out from under the subscriber; drop local
    /// state and resynchronize from `tip`.
    Reset {
        /// The current tip.
        tip: ChainEntry,
    },
    /// One block of a historical scan, filtered by the subscription's
    /// bloom predicate.
    Rescan {
        /// The scanned entry.
        entry: ChainEntry,
        /// The matching transactions.
        txs: Vec<Transaction>,
    },
}

pub(crate) struct EventQueue {
    capacity: usize,
    events: Mutex<VecDeque<ChainEvent>>,
    notify: Notify,
}

impl EventQueue {
    pub(crate) fn new(capacity: usize) -> EventQueue {
        EventQueue {
            capacity: capacity.max(2),
            events: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
        }
    }

    /// Enqueues an event, dropping the backlog in favor of a `Reset`
    /// when the subscriber is too slow.
    pub(crate) fn push(&self, event: ChainEvent, tip: &ChainEntry) {
        if let Ok(mut events) = self.events.lock() {
            if events.len() >= self.capacity {
                events.clear();
                events.push_back(ChainEvent::Reset { tip: tip.clone() });
            }
            events.push_back(event);
        }
        self.notify.notify_one();
    }

    fn pop(&self) -> Option<ChainEvent> {
        self.events.lock().ok().and_then(|mut e| e.pop_front())
    }

    async fn notified(&self) {
        self.notify.notified().await;
    }
}

/// A handle to one subscriber's event stream and bloom filter.
pub struct Subscription {
    pub(crate) queue: Arc<EventQueue>,
    pub(crate) filter: Mutex<Option<BloomFilter>>,
}

impl Subscription {
    pub(crate) fn new(capacity: usize) -> Subscription {
        Subscription {
            queue: Arc::new(EventQueue::new(capacity)),
            filter: Mutex::new(None),
        }
    }

    /// Waits for the next event.
    pub async fn recv(&self) -> ChainEvent {
        loop {
            if let Some(event) = self.queue.pop() {
                return event;
            }
            self.queue.notified().await;
        }
    }

    /// Returns the next event without waiting.
    pub fn try_recv(&self) -> Option<ChainEvent> {
        self.queue.pop()
    }

    /// Installs a bloom filter gating `Rescan` deliveries.
    pub fn set_filter(&self, filter: BloomFilter) {
        if let Ok(mut slot) = self.filter.lock() {
            *slot = Some(filter);
        }
    }

    /// Removes the filter; rescans match everything again.
    pub fn clear_filter(&self) {
        if let Ok(mut slot) = self.filter.lock() {
            *slot = None;
        }
    }

    pub(crate) fn filter_matches(&self, tx: &Transaction) -> bool {
        match self.filter.lock() {
            Ok(slot) => slot.as_ref().map_or(true, |f| f.matches_tx(tx)),
            Err(_) => true,
        }
    }
}

/// A cooperative cancellation flag for long rescans.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, uncancelled token.
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// True once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
