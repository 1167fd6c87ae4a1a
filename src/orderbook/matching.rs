//! Core matching loop: crossing an inbound order against resting liquidity.

use super::book::OrderBook;
use super::events::Event;
use super::order::Order;
use super::side::SideBook;
use super::tracker::OrderTracker;
use super::types::{
    is_market_sort_price, sort_price, Price, Quantity, Side, TransId, MARKET_ORDER_PRICE,
};
use std::sync::Arc;

impl<O: Order, const SIZE: usize> OrderBook<O, SIZE> {
    /// Drain crossing opportunities for `inbound` against the opposite side.
    ///
    /// Resting orders are consumed best price first, FIFO within a price,
    /// until the inbound is filled or prices stop crossing. Each cross
    /// executes at the resting order's limit price (maker price improvement),
    /// or at the inbound's limit price when the resting order is a market
    /// order. A resting all-or-none that cannot be completely filled is
    /// stepped over without losing its place in the queue.
    ///
    /// An all-or-none inbound first sweeps the opposite side read-only; if the
    /// aggregable quantity falls short of its full open quantity, no fill is
    /// committed at all.
    ///
    /// Returns `true` if any fill occurred.
    pub(super) fn match_order(
        &mut self,
        inbound: &mut OrderTracker<O>,
        trans_id: TransId,
    ) -> bool {
        let side = inbound.side();
        let inbound_sort = sort_price(side, inbound.price());

        if inbound.all_or_none() {
            let needed = inbound.open_qty();
            let inbound_is_market = inbound.price() == MARKET_ORDER_PRICE;
            let crossable =
                self.peek_crossable(side.opposite(), inbound_sort, needed, inbound_is_market);
            if crossable < needed {
                return false;
            }
        }

        match side.opposite() {
            Side::Buy => {
                Self::cross(&mut self.bids, &mut self.callbacks, inbound, inbound_sort, trans_id)
            }
            Side::Sell => {
                Self::cross(&mut self.asks, &mut self.callbacks, inbound, inbound_sort, trans_id)
            }
        }
    }

    /// Quantity an inbound could assemble from the opposite side without
    /// modifying the book, honoring the same selection rules as the commit
    /// loop. Used as the pre-commit check for all-or-none inbounds.
    fn peek_crossable(
        &self,
        opposite: Side,
        inbound_sort: Price,
        needed: Quantity,
        inbound_is_market: bool,
    ) -> Quantity {
        let book = self.side_book(opposite);
        let mut remaining = needed;

        'prices: for price in book.crossing_prices(inbound_sort) {
            if inbound_is_market && is_market_sort_price(opposite, price) {
                continue; // two market orders cannot price a trade
            }
            let mut idx = 0;
            while let Some(candidate) = book.tracker(price, idx) {
                if remaining == 0 {
                    break 'prices;
                }
                // The commit loop would step over an unfillable resting AON.
                if !(candidate.all_or_none() && candidate.open_qty() > remaining) {
                    remaining -= candidate.open_qty().min(remaining);
                }
                idx += 1;
            }
            if remaining == 0 {
                break;
            }
        }
        needed - remaining
    }

    /// Commit crossings of `inbound` against one side book, producing a fill
    /// event pair per trade and erasing resting orders as they complete.
    fn cross(
        side_book: &mut SideBook<O>,
        callbacks: &mut Vec<Event<O>>,
        inbound: &mut OrderTracker<O>,
        inbound_sort: Price,
        trans_id: TransId,
    ) -> bool {
        let mut matched = false;
        let inbound_is_market = inbound.price() == MARKET_ORDER_PRICE;

        'prices: for price in side_book.crossing_prices(inbound_sort) {
            if inbound_is_market && is_market_sort_price(side_book.side(), price) {
                continue; // two market orders cannot price a trade
            }
            let mut idx = 0;
            loop {
                let inbound_open = inbound.open_qty();
                let Some(candidate) = side_book.tracker_mut(price, idx) else {
                    break; // partition exhausted, move to the next price
                };
                if candidate.all_or_none() && candidate.open_qty() > inbound_open {
                    idx += 1;
                    continue;
                }

                let fill_qty = inbound_open.min(candidate.open_qty());
                let cross_price = if candidate.price() == MARKET_ORDER_PRICE {
                    inbound.price()
                } else {
                    candidate.price()
                };
                inbound.fill(fill_qty);
                candidate.fill(fill_qty);
                matched = true;

                let candidate_filled = candidate.filled();
                callbacks.push(Event::Fill {
                    order: Arc::clone(inbound.order()),
                    matched: Arc::clone(candidate.order()),
                    qty: fill_qty,
                    price: cross_price,
                    level_price: inbound.price(),
                    filled: inbound.filled(),
                    trans_id,
                });
                callbacks.push(Event::Fill {
                    order: Arc::clone(candidate.order()),
                    matched: Arc::clone(inbound.order()),
                    qty: fill_qty,
                    price: cross_price,
                    level_price: candidate.price(),
                    filled: candidate_filled,
                    trans_id,
                });

                if candidate_filled {
                    side_book.remove_at(price, idx);
                } else {
                    idx += 1;
                }
                if inbound.filled() {
                    break 'prices;
                }
            }
        }
        matched
    }
}
