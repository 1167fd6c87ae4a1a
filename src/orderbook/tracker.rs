//! Per-order bookkeeping record owned by the book.

use super::order::Order;
use super::types::{Price, Quantity, Side};
use std::sync::Arc;

/// Wraps an order handle with the book-side quantities that change over the
/// order's life: filled quantity, and the effective order quantity and price.
///
/// Quantity and price are snapshotted from the handle at acceptance and
/// adjusted by replace commands. They may briefly lead the handle itself,
/// which the listener updates only when the replace event is drained; keeping
/// them here lets a price-changed order re-enter the matching loop within the
/// same transaction.
#[derive(Debug)]
pub struct OrderTracker<O: Order> {
    order: Arc<O>,
    order_qty: Quantity,
    price: Price,
    filled_qty: Quantity,
}

impl<O: Order> OrderTracker<O> {
    pub fn new(order: Arc<O>) -> Self {
        let order_qty = order.order_qty();
        let price = order.price();
        Self {
            order,
            order_qty,
            price,
            filled_qty: 0,
        }
    }

    /// The tracked order handle.
    pub fn order(&self) -> &Arc<O> {
        &self.order
    }

    /// Effective total quantity (original plus any replace deltas).
    pub fn order_qty(&self) -> Quantity {
        self.order_qty
    }

    /// Effective limit price ([`MARKET_ORDER_PRICE`](super::types::MARKET_ORDER_PRICE)
    /// for market orders).
    pub fn price(&self) -> Price {
        self.price
    }

    /// Quantity filled so far.
    pub fn filled_qty(&self) -> Quantity {
        self.filled_qty
    }

    /// Quantity still open: `order_qty - filled_qty`, saturating at zero.
    pub fn open_qty(&self) -> Quantity {
        self.order_qty.saturating_sub(self.filled_qty)
    }

    /// Has the order traded its full quantity?
    pub fn filled(&self) -> bool {
        self.filled_qty >= self.order_qty
    }

    pub fn side(&self) -> Side {
        self.order.side()
    }

    pub fn all_or_none(&self) -> bool {
        self.order.conditions().all_or_none()
    }

    pub fn immediate_or_cancel(&self) -> bool {
        self.order.conditions().immediate_or_cancel()
    }

    /// Record a fill against this order.
    pub(crate) fn fill(&mut self, qty: Quantity) {
        self.filled_qty += qty;
        assert!(
            self.filled_qty <= self.order_qty,
            "fill exceeds order quantity"
        );
    }

    /// Apply a replace size delta. The caller has already validated that the
    /// delta does not take open quantity below zero.
    pub(crate) fn change_qty(&mut self, delta: i64) {
        if delta >= 0 {
            self.order_qty += delta as Quantity;
        } else {
            let decrease = delta.unsigned_abs();
            assert!(
                self.open_qty() >= decrease,
                "size change below filled quantity"
            );
            self.order_qty -= decrease;
        }
    }

    /// Apply a replace price change.
    pub(crate) fn set_price(&mut self, price: Price) {
        self.price = price;
    }
}
