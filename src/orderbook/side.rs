//! One side of the book: a price-ordered multimap of resting orders.

use super::order::Order;
use super::tracker::OrderTracker;
use super::types::{Price, Quantity, Side};
use std::collections::{BTreeMap, VecDeque};
use std::ops::Bound;
use std::sync::Arc;

/// Resting orders of a single side, keyed by sort price.
///
/// Bids iterate best-first in descending price order, asks ascending; within
/// one price, insertion order is preserved (FIFO time priority). Market orders
/// rest under their side's sort sentinel, which places them ahead of all
/// finite prices.
#[derive(Debug)]
pub struct SideBook<O: Order> {
    side: Side,
    levels: BTreeMap<Price, VecDeque<OrderTracker<O>>>,
    len: usize,
}

impl<O: Order> SideBook<O> {
    pub(crate) fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            len: 0,
        }
    }

    /// The side this book holds.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Total number of resting orders on this side.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Resting orders in priority order: best price first, FIFO within price.
    /// Yields each tracker with its sort-price key.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (Price, &OrderTracker<O>)> + '_> {
        match self.side {
            Side::Buy => Box::new(
                self.levels
                    .iter()
                    .rev()
                    .flat_map(|(price, queue)| queue.iter().map(move |t| (*price, t))),
            ),
            Side::Sell => Box::new(
                self.levels
                    .iter()
                    .flat_map(|(price, queue)| queue.iter().map(move |t| (*price, t))),
            ),
        }
    }

    /// Best (most aggressive) sort price currently resting, if any.
    pub fn best_price(&self) -> Option<Price> {
        match self.side {
            Side::Buy => self.levels.keys().next_back().copied(),
            Side::Sell => self.levels.keys().next().copied(),
        }
    }

    /// Append a tracker at its sort price, behind any orders already there.
    pub(crate) fn insert(&mut self, sort_price: Price, tracker: OrderTracker<O>) {
        self.levels.entry(sort_price).or_default().push_back(tracker);
        self.len += 1;
    }

    /// Remove the tracker for `order` from the `sort_price` partition, located
    /// by handle identity. Orders with a different sort price can never match,
    /// so the scan is bounded to the one partition.
    pub(crate) fn remove(
        &mut self,
        order: &Arc<O>,
        sort_price: Price,
    ) -> Option<OrderTracker<O>> {
        let queue = self.levels.get_mut(&sort_price)?;
        let idx = queue.iter().position(|t| Arc::ptr_eq(t.order(), order))?;
        let tracker = queue.remove(idx);
        if queue.is_empty() {
            self.levels.remove(&sort_price);
        }
        self.len -= 1;
        tracker
    }

    /// Locate `order` within its sort-price partition by handle identity.
    pub(crate) fn find(
        &self,
        order: &Arc<O>,
        sort_price: Price,
    ) -> Option<(usize, &OrderTracker<O>)> {
        self.levels
            .get(&sort_price)?
            .iter()
            .enumerate()
            .find(|(_, t)| Arc::ptr_eq(t.order(), order))
    }

    pub(crate) fn tracker(&self, sort_price: Price, idx: usize) -> Option<&OrderTracker<O>> {
        self.levels.get(&sort_price)?.get(idx)
    }

    pub(crate) fn tracker_mut(
        &mut self,
        sort_price: Price,
        idx: usize,
    ) -> Option<&mut OrderTracker<O>> {
        self.levels.get_mut(&sort_price)?.get_mut(idx)
    }

    /// Remove the tracker at a known position, dropping the partition if it
    /// becomes empty.
    pub(crate) fn remove_at(&mut self, sort_price: Price, idx: usize) -> OrderTracker<O> {
        let queue = self
            .levels
            .get_mut(&sort_price)
            .expect("removal from missing price partition");
        let tracker = queue.remove(idx).expect("removal past end of partition");
        if queue.is_empty() {
            self.levels.remove(&sort_price);
        }
        self.len -= 1;
        tracker
    }

    /// Sort prices an inbound at `inbound_sort` can cross, best first.
    pub(crate) fn crossing_prices(&self, inbound_sort: Price) -> Vec<Price> {
        match self.side {
            // Asks cross a bid when ask_sort <= bid_sort; lowest first.
            Side::Sell => self.levels.range(..=inbound_sort).map(|(p, _)| *p).collect(),
            // Bids cross an ask when bid_sort >= ask_sort; highest first.
            Side::Buy => self
                .levels
                .range(inbound_sort..)
                .rev()
                .map(|(p, _)| *p)
                .collect(),
        }
    }

    /// Aggregate of the best price strictly worse than `price`: the price
    /// itself, its order count, and its summed open quantity. Used to restore
    /// the last visible depth level after an erasure. Market sentinels sort
    /// strictly better than any finite price, so they are never returned.
    pub(crate) fn aggregate_after(&self, price: Price) -> Option<(Price, u32, Quantity)> {
        let entry = match self.side {
            Side::Buy => self.levels.range(..price).next_back(),
            Side::Sell => self
                .levels
                .range((Bound::Excluded(price), Bound::Unbounded))
                .next(),
        };
        entry.map(|(p, queue)| {
            (
                *p,
                queue.len() as u32,
                queue.iter().map(|t| t.open_qty()).sum(),
            )
        })
    }
}
