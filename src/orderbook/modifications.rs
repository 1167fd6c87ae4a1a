//! Cancelling and replacing resting orders.

use super::book::OrderBook;
use super::events::{
    Event, OrderListener, REASON_NOT_ENOUGH_OPEN_QTY, REASON_NOT_FOUND,
};
use super::order::Order;
use super::types::{sort_price, Price, Quantity, PRICE_UNCHANGED};
use std::sync::Arc;
use tracing::trace;

impl<O: Order, const SIZE: usize> OrderBook<O, SIZE> {
    /// Cancel a resting order, located by handle identity within its
    /// sort-price partition.
    ///
    /// Emits `cancel` and a depth update when found, `cancel_reject` with
    /// reason `"not found"` otherwise.
    pub fn cancel<L: OrderListener<O, SIZE>>(&mut self, order: &Arc<O>, listener: &mut L) {
        let trans_id = self.next_trans_id();
        trace!(
            "book {}: cancel {} order at {} (transaction {})",
            self.symbol,
            order.side(),
            order.price(),
            trans_id
        );

        let side = order.side();
        let key = sort_price(side, order.price());
        match self.side_book_mut(side).remove(order, key) {
            Some(tracker) => self.callbacks.push(Event::Cancel {
                order: Arc::clone(order),
                open_qty: tracker.open_qty(),
                level_price: tracker.price(),
                trans_id,
            }),
            None => self.callbacks.push(Event::CancelReject {
                order: Arc::clone(order),
                reason: REASON_NOT_FOUND,
                trans_id,
            }),
        }

        self.publish_and_drain(listener, trans_id);
    }

    /// Modify a resting order in place.
    ///
    /// `size_delta` adjusts the total order quantity
    /// ([`SIZE_UNCHANGED`](crate::SIZE_UNCHANGED) leaves it as is); `new_price`
    /// moves the order ([`PRICE_UNCHANGED`] leaves it as is). A successful
    /// replace emits `replace`, then:
    ///
    /// - a reduction that leaves zero open quantity erases the order and emits
    ///   `cancel`;
    /// - a price change re-sorts the order (losing time priority at the old
    ///   price) and re-runs the matching loop, so fills may follow;
    /// - a pure size change adjusts the depth in place.
    ///
    /// Rejections: `"not found"` if the order is not resting,
    /// `"not enough open qty"` if the reduction exceeds the open quantity.
    ///
    /// Returns `true` if any fill occurred.
    pub fn replace<L: OrderListener<O, SIZE>>(
        &mut self,
        order: &Arc<O>,
        size_delta: i64,
        new_price: Price,
        listener: &mut L,
    ) -> bool {
        let trans_id = self.next_trans_id();
        trace!(
            "book {}: replace {} order at {} (delta {}, new price {}, transaction {})",
            self.symbol,
            order.side(),
            order.price(),
            size_delta,
            new_price,
            trans_id
        );

        let side = order.side();
        let key = sort_price(side, order.price());
        let found = self
            .side_book(side)
            .find(order, key)
            .map(|(idx, t)| (idx, t.order_qty(), t.open_qty(), t.price()));

        let Some((idx, order_qty, open_qty, current_price)) = found else {
            self.callbacks.push(Event::ReplaceReject {
                order: Arc::clone(order),
                reason: REASON_NOT_FOUND,
                trans_id,
            });
            self.publish_and_drain(listener, trans_id);
            return false;
        };

        if size_delta < 0 && (open_qty as i64) + size_delta < 0 {
            self.callbacks.push(Event::ReplaceReject {
                order: Arc::clone(order),
                reason: REASON_NOT_ENOUGH_OPEN_QTY,
                trans_id,
            });
            self.publish_and_drain(listener, trans_id);
            return false;
        }

        let target_price = if new_price == PRICE_UNCHANGED {
            current_price
        } else {
            new_price
        };
        let new_order_qty = if size_delta >= 0 {
            order_qty + size_delta as Quantity
        } else {
            order_qty - size_delta.unsigned_abs()
        };
        let new_open_qty = (open_qty as i64 + size_delta) as Quantity;

        self.callbacks.push(Event::Replace {
            order: Arc::clone(order),
            new_order_qty,
            new_price: target_price,
            old_price: current_price,
            old_open_qty: open_qty,
            new_open_qty,
            trans_id,
        });

        let mut matched = false;
        if new_open_qty == 0 {
            // A replace that reduces open quantity to zero implicitly cancels.
            let _ = self.side_book_mut(side).remove_at(key, idx);
            self.callbacks.push(Event::Cancel {
                order: Arc::clone(order),
                open_qty: 0,
                level_price: current_price,
                trans_id,
            });
        } else if target_price != current_price {
            let mut tracker = self.side_book_mut(side).remove_at(key, idx);
            if size_delta != 0 {
                tracker.change_qty(size_delta);
            }
            tracker.set_price(target_price);
            matched = self.match_order(&mut tracker, trans_id);
            if tracker.open_qty() > 0 {
                let new_key = sort_price(side, target_price);
                self.side_book_mut(side).insert(new_key, tracker);
            }
        } else if size_delta != 0 {
            if let Some(tracker) = self.side_book_mut(side).tracker_mut(key, idx) {
                tracker.change_qty(size_delta);
            }
        }

        self.publish_and_drain(listener, trans_id);
        matched
    }
}
