//! Core order book: resting liquidity, aggregated depth, and the event queue.

use super::depth::Depth;
use super::events::Event;
use super::order::Order;
use super::side::SideBook;
use super::snapshot::DepthSnapshot;
use super::types::{Price, Side, TransId};

/// A single-instrument limit order book.
///
/// The book owns both side books of resting orders, the aggregated depth view
/// of the best `SIZE` levels per side, and the event queue of the transaction
/// in flight. It is a single-threaded state machine: every entry point
/// ([`submit`](Self::submit), [`cancel`](Self::cancel),
/// [`replace`](Self::replace)) runs to completion, including the drain of its
/// events into the listener, before the next may be called. One book per
/// instrument is the intended multiplicity; scale out by sharding books.
#[derive(Debug)]
pub struct OrderBook<O: Order, const SIZE: usize = 5> {
    /// The symbol or identifier for this order book.
    pub(super) symbol: String,

    /// Resting buy orders, best (highest) price first.
    pub(super) bids: SideBook<O>,

    /// Resting sell orders, best (lowest) price first.
    pub(super) asks: SideBook<O>,

    /// Aggregated top-of-book depth, maintained incrementally.
    pub(super) depth: Depth<SIZE>,

    /// Events produced by the transaction in flight, drained on completion.
    pub(super) callbacks: Vec<Event<O>>,

    /// Transaction id of the most recent command.
    pub(super) last_trans_id: TransId,
}

impl<O: Order, const SIZE: usize> OrderBook<O, SIZE> {
    /// Create an empty book for the given symbol.
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            bids: SideBook::new(Side::Buy),
            asks: SideBook::new(Side::Sell),
            depth: Depth::new(),
            callbacks: Vec::new(),
            last_trans_id: 0,
        }
    }

    /// Get the symbol of this order book.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The resting buy orders.
    pub fn bids(&self) -> &SideBook<O> {
        &self.bids
    }

    /// The resting sell orders.
    pub fn asks(&self) -> &SideBook<O> {
        &self.asks
    }

    /// The aggregated depth view.
    pub fn depth(&self) -> &Depth<SIZE> {
        &self.depth
    }

    /// Best bid price, if any limit bid is visible.
    pub fn best_bid(&self) -> Option<Price> {
        let level = &self.depth.bids()[0];
        (!level.is_blank()).then(|| level.price())
    }

    /// Best ask price, if any limit ask is visible.
    pub fn best_ask(&self) -> Option<Price> {
        let level = &self.depth.asks()[0];
        (!level.is_blank()).then(|| level.price())
    }

    /// Spread between best ask and best bid.
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.saturating_sub(bid)),
            _ => None,
        }
    }

    /// Mid price (average of best bid and best ask).
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid as f64 + ask as f64) / 2.0),
            _ => None,
        }
    }

    /// Serializable snapshot of the visible depth.
    pub fn depth_snapshot(&self) -> DepthSnapshot {
        DepthSnapshot::from_depth(&self.symbol, &self.depth)
    }

    pub(super) fn side_book(&self, side: Side) -> &SideBook<O> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    pub(super) fn side_book_mut(&mut self, side: Side) -> &mut SideBook<O> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    pub(super) fn depth_mut(&mut self) -> &mut Depth<SIZE> {
        &mut self.depth
    }

    pub(super) fn callbacks(&self) -> &Vec<Event<O>> {
        &self.callbacks
    }

    pub(super) fn callbacks_mut(&mut self) -> &mut Vec<Event<O>> {
        &mut self.callbacks
    }

    /// A fresh transaction id, shared by every event the command produces.
    pub(super) fn next_trans_id(&mut self) -> TransId {
        self.last_trans_id += 1;
        self.last_trans_id
    }
}
