//! Event queue and listener pipeline.
//!
//! Commands enqueue events while they mutate the book; only after the
//! structural work is complete does the book replay the queue onto the depth
//! tracker, append summary (depth / top-of-book) events, and drain everything
//! into the listener in insertion order. Listeners therefore always see causes
//! before effects, and never observe a half-applied transaction.

use super::book::OrderBook;
use super::order::Order;
use super::types::{Price, Quantity, Side, TransId, MARKET_ORDER_PRICE};
use std::sync::Arc;
use tracing::trace;

/// Reason attached to a submit rejection of a zero-quantity order.
pub(super) const REASON_SIZE_MUST_BE_POSITIVE: &str = "size must be positive";

/// Reason attached to a cancel or replace of an order that is not resting.
pub(super) const REASON_NOT_FOUND: &str = "not found";

/// Reason attached to a replace that would take open quantity below zero.
pub(super) const REASON_NOT_ENOUGH_OPEN_QTY: &str = "not enough open qty";

/// A pending listener notification.
///
/// Beyond the listener-visible payload, variants carry the quantities the
/// depth replay needs (fill-on-accept quantity, open quantity at cancel,
/// old/new open at replace), captured at event creation so later mutations of
/// the order cannot skew the ladder.
#[derive(Debug)]
pub enum Event<O: Order> {
    Accept {
        order: Arc<O>,
        price: Price,
        order_qty: Quantity,
        /// Quantity matched during acceptance, patched in after the match
        /// loop. Equal to `order_qty` when the order never rested.
        match_qty: Quantity,
        trans_id: TransId,
    },
    Reject {
        order: Arc<O>,
        reason: &'static str,
        trans_id: TransId,
    },
    Fill {
        order: Arc<O>,
        /// The counterparty of this trade.
        matched: Arc<O>,
        qty: Quantity,
        /// Execution price: the resting side's limit price, or the inbound's
        /// when the resting side is a market order.
        price: Price,
        /// The filled order's own level price, keying the depth adjustment.
        level_price: Price,
        /// Did this fill complete the order?
        filled: bool,
        trans_id: TransId,
    },
    Cancel {
        order: Arc<O>,
        open_qty: Quantity,
        level_price: Price,
        trans_id: TransId,
    },
    CancelReject {
        order: Arc<O>,
        reason: &'static str,
        trans_id: TransId,
    },
    Replace {
        order: Arc<O>,
        new_order_qty: Quantity,
        new_price: Price,
        old_price: Price,
        old_open_qty: Quantity,
        new_open_qty: Quantity,
        trans_id: TransId,
    },
    ReplaceReject {
        order: Arc<O>,
        reason: &'static str,
        trans_id: TransId,
    },
    DepthUpdate {
        trans_id: TransId,
    },
    BboUpdate {
        trans_id: TransId,
    },
}

/// Sink for the event stream of one book.
///
/// All callbacks run synchronously inside the originating command, after its
/// structural work is complete, in the order the events were produced. Default
/// bodies are empty so implementations subscribe only to what they need.
///
/// Re-entering the book from a callback is impossible: the listener is
/// mutably borrowed by the entry point for the duration of the command. An
/// embedding that wants to react with further commands buffers them and pumps
/// the buffer between calls.
pub trait OrderListener<O: Order, const SIZE: usize = 5> {
    fn on_accept(&mut self, _order: &Arc<O>) {}

    fn on_reject(&mut self, _order: &Arc<O>, _reason: &str) {}

    /// One fill notification per side of a trade: each cross produces two.
    fn on_fill(&mut self, _order: &Arc<O>, _qty: Quantity, _price: Price) {}

    fn on_cancel(&mut self, _order: &Arc<O>) {}

    fn on_cancel_reject(&mut self, _order: &Arc<O>, _reason: &str) {}

    fn on_replace(&mut self, _order: &Arc<O>, _new_order_qty: Quantity, _new_price: Price) {}

    fn on_replace_reject(&mut self, _order: &Arc<O>, _reason: &str) {}

    /// The aggregated depth view changed in this transaction.
    fn on_depth_change(&mut self, _book: &OrderBook<O, SIZE>) {}

    /// The best bid or best ask level changed in this transaction.
    fn on_bbo_change(&mut self, _book: &OrderBook<O, SIZE>) {}
}

/// Depth adjustment extracted from one structural event.
#[derive(Debug, Clone, Copy)]
enum DepthAction {
    None,
    Add {
        side: Side,
        price: Price,
        qty: Quantity,
    },
    IgnoreFills {
        side: Side,
        qty: Quantity,
    },
    Fill {
        side: Side,
        price: Price,
        qty: Quantity,
        filled: bool,
    },
    Close {
        side: Side,
        price: Price,
        qty: Quantity,
    },
    Change {
        side: Side,
        price: Price,
        delta: i64,
    },
    Replace {
        side: Side,
        old_price: Price,
        new_price: Price,
        old_open: Quantity,
        new_open: Quantity,
    },
}

impl<O: Order, const SIZE: usize> OrderBook<O, SIZE> {
    /// Replay the queued structural events onto the depth tracker, append
    /// depth/bbo summary events if anything changed, then drain the queue
    /// into the listener.
    pub(super) fn publish_and_drain<L: OrderListener<O, SIZE>>(
        &mut self,
        listener: &mut L,
        trans_id: TransId,
    ) {
        self.publish_depth(trans_id);
        let events = std::mem::take(self.callbacks_mut());
        for event in &events {
            match event {
                Event::Accept { order, .. } => listener.on_accept(order),
                Event::Reject { order, reason, .. } => listener.on_reject(order, reason),
                Event::Fill {
                    order,
                    matched,
                    qty,
                    price,
                    trans_id,
                    ..
                } => {
                    trace!(
                        "book {}: fill {} x {} (order {} matched {}, transaction {})",
                        self.symbol(),
                        qty,
                        price,
                        order.side(),
                        matched.side(),
                        trans_id
                    );
                    listener.on_fill(order, *qty, *price);
                }
                Event::Cancel { order, .. } => listener.on_cancel(order),
                Event::CancelReject { order, reason, .. } => {
                    listener.on_cancel_reject(order, reason)
                }
                Event::Replace {
                    order,
                    new_order_qty,
                    new_price,
                    ..
                } => listener.on_replace(order, *new_order_qty, *new_price),
                Event::ReplaceReject { order, reason, .. } => {
                    listener.on_replace_reject(order, reason)
                }
                Event::DepthUpdate { .. } => listener.on_depth_change(self),
                Event::BboUpdate { .. } => listener.on_bbo_change(self),
            }
        }
    }

    /// Apply every queued structural event to the aggregated depth, restoring
    /// erased levels from the side books as needed, then queue summary events.
    ///
    /// This mirrors the command's own mutations: accepts add resting quantity
    /// (market orders are never aggregated), fills decrement or close levels,
    /// cancels close them, replaces move them. An order completely filled on
    /// acceptance was never added, so its fill quantity is registered to be
    /// ignored instead of decremented.
    fn publish_depth(&mut self, trans_id: TransId) {
        for i in 0..self.callbacks().len() {
            let action = match &self.callbacks()[i] {
                Event::Accept {
                    order,
                    price,
                    order_qty,
                    match_qty,
                    ..
                } if *price != MARKET_ORDER_PRICE => {
                    if match_qty == order_qty {
                        DepthAction::IgnoreFills {
                            side: order.side(),
                            qty: *order_qty,
                        }
                    } else {
                        DepthAction::Add {
                            side: order.side(),
                            price: *price,
                            qty: *order_qty,
                        }
                    }
                }
                Event::Fill {
                    order,
                    qty,
                    level_price,
                    filled,
                    ..
                } if *level_price != MARKET_ORDER_PRICE => DepthAction::Fill {
                    side: order.side(),
                    price: *level_price,
                    qty: *qty,
                    filled: *filled,
                },
                Event::Cancel {
                    order,
                    open_qty,
                    level_price,
                    ..
                } if *level_price != MARKET_ORDER_PRICE => DepthAction::Close {
                    side: order.side(),
                    price: *level_price,
                    qty: *open_qty,
                },
                Event::Replace {
                    order,
                    old_price,
                    new_price,
                    old_open_qty,
                    new_open_qty,
                    ..
                } => {
                    let side = order.side();
                    if *new_open_qty == 0 || old_price == new_price {
                        // A reduce-to-zero keeps its level until the paired
                        // cancel closes it; never add an empty level.
                        if *old_price != MARKET_ORDER_PRICE {
                            DepthAction::Change {
                                side,
                                price: *old_price,
                                delta: *new_open_qty as i64 - *old_open_qty as i64,
                            }
                        } else {
                            DepthAction::None
                        }
                    } else if *old_price == MARKET_ORDER_PRICE {
                        DepthAction::Add {
                            side,
                            price: *new_price,
                            qty: *new_open_qty,
                        }
                    } else {
                        DepthAction::Replace {
                            side,
                            old_price: *old_price,
                            new_price: *new_price,
                            old_open: *old_open_qty,
                            new_open: *new_open_qty,
                        }
                    }
                }
                _ => DepthAction::None,
            };

            match action {
                DepthAction::None => {}
                DepthAction::Add { side, price, qty } => {
                    self.depth_mut().add_order(side, price, qty)
                }
                DepthAction::IgnoreFills { side, qty } => {
                    self.depth_mut().ignore_fill_qty(side, qty)
                }
                DepthAction::Fill {
                    side,
                    price,
                    qty,
                    filled,
                } => {
                    self.depth_mut().fill_order(side, price, qty, filled);
                }
                DepthAction::Close { side, price, qty } => {
                    self.depth_mut().close_order(side, price, qty);
                }
                DepthAction::Change { side, price, delta } => {
                    self.depth_mut().change_qty(side, price, delta)
                }
                DepthAction::Replace {
                    side,
                    old_price,
                    new_price,
                    old_open,
                    new_open,
                } => {
                    self.depth_mut()
                        .replace_order(side, old_price, new_price, old_open, new_open);
                }
            }
        }

        // Erasures may have revealed hidden levels; refill the window from the
        // side books, which now hold the whole transaction's effects.
        self.restore_depth_levels(Side::Buy);
        self.restore_depth_levels(Side::Sell);

        let depth_changed = self.depth().changed(Side::Buy) || self.depth().changed(Side::Sell);
        if depth_changed {
            self.callbacks_mut().push(Event::DepthUpdate { trans_id });
            if self.depth().bbo_changed() {
                self.callbacks_mut().push(Event::BboUpdate { trans_id });
            }
            self.depth_mut().mark_published();
        }
    }

    /// Refill blank depth slots left by erasures from the hidden levels of the
    /// side book. The depth tracker cannot know the hidden prices on its own;
    /// they come from the full side book, one level per round, until the
    /// window is full or the book is exhausted.
    fn restore_depth_levels(&mut self, side: Side) {
        while let Some(after_price) = self.depth_mut().needs_restoration(side) {
            let aggregate = self.side_book(side).aggregate_after(after_price);
            let exhausted = aggregate.is_none();
            self.depth_mut().restore_level(side, aggregate);
            if exhausted {
                break;
            }
        }
    }
}
