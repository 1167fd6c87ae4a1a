//! A single aggregated price level of the depth view.

use super::types::{ChangeId, Price, Quantity, INVALID_LEVEL_PRICE};
use serde::{Deserialize, Serialize};

/// One slot of the aggregated depth ladder: a price, the number of resting
/// orders at that price, their summed open quantity, and the change id of the
/// last mutation that touched the slot.
///
/// A slot whose price is [`INVALID_LEVEL_PRICE`] is blank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthLevel {
    price: Price,
    order_count: u32,
    aggregate_qty: Quantity,
    last_change: ChangeId,
}

impl DepthLevel {
    /// The price of this level, or [`INVALID_LEVEL_PRICE`] if blank.
    pub fn price(&self) -> Price {
        self.price
    }

    /// Number of resting orders aggregated at this price.
    pub fn order_count(&self) -> u32 {
        self.order_count
    }

    /// Summed open quantity of the resting orders at this price.
    pub fn aggregate_qty(&self) -> Quantity {
        self.aggregate_qty
    }

    /// Change id of the last mutation that touched this slot.
    pub fn last_change(&self) -> ChangeId {
        self.last_change
    }

    /// Has this slot changed since the consumer's last published cursor?
    pub fn changed_since(&self, last_published_change: ChangeId) -> bool {
        self.last_change > last_published_change
    }

    pub fn is_blank(&self) -> bool {
        self.price == INVALID_LEVEL_PRICE
    }

    /// Reset the slot to an empty level at `price`. The change stamp is left
    /// for the caller to assign.
    pub(crate) fn init(&mut self, price: Price) {
        self.price = price;
        self.order_count = 0;
        self.aggregate_qty = 0;
    }

    /// Account one more order with `qty` open.
    pub(crate) fn add_order(&mut self, qty: Quantity) {
        self.order_count += 1;
        self.aggregate_qty += qty;
    }

    /// Account several orders at once (level restoration).
    pub(crate) fn add_orders(&mut self, count: u32, qty: Quantity) {
        self.order_count += count;
        self.aggregate_qty += qty;
    }

    pub(crate) fn increase_qty(&mut self, qty: Quantity) {
        self.aggregate_qty += qty;
    }

    pub(crate) fn decrease_qty(&mut self, qty: Quantity) {
        assert!(self.aggregate_qty >= qty, "depth aggregate underflow");
        self.aggregate_qty -= qty;
    }

    /// Remove one order closing `qty` open quantity. Returns `true` when the
    /// level is now empty and should be erased.
    pub(crate) fn close_order(&mut self, qty: Quantity) -> bool {
        assert!(self.order_count > 0, "close on empty depth level");
        self.decrease_qty(qty);
        self.order_count -= 1;
        self.order_count == 0
    }

    pub(crate) fn set_last_change(&mut self, change_id: ChangeId) {
        self.last_change = change_id;
    }
}
