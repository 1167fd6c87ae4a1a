//! Submitting new orders to the book.

use super::book::OrderBook;
use super::events::{Event, OrderListener, REASON_SIZE_MUST_BE_POSITIVE};
use super::order::Order;
use super::tracker::OrderTracker;
use super::types::sort_price;
use std::sync::Arc;
use tracing::trace;

impl<O: Order, const SIZE: usize> OrderBook<O, SIZE> {
    /// Submit a new order: validate, cross against the opposite side, and rest
    /// any residual quantity.
    ///
    /// Emits `accept` (or `reject` for a zero-quantity order), a fill event
    /// pair per trade, `cancel` for the residual of an immediate-or-cancel
    /// order, and depth / top-of-book updates — all drained into `listener`
    /// before this method returns.
    ///
    /// Returns `true` if any fill occurred.
    pub fn submit<L: OrderListener<O, SIZE>>(&mut self, order: &Arc<O>, listener: &mut L) -> bool {
        let trans_id = self.next_trans_id();
        trace!(
            "book {}: submit {} {} x {} (transaction {})",
            self.symbol,
            order.side(),
            order.order_qty(),
            order.price(),
            trans_id
        );

        if order.order_qty() == 0 {
            self.callbacks.push(Event::Reject {
                order: Arc::clone(order),
                reason: REASON_SIZE_MUST_BE_POSITIVE,
                trans_id,
            });
            self.publish_and_drain(listener, trans_id);
            return false;
        }

        let mut inbound = OrderTracker::new(Arc::clone(order));
        let accept_idx = self.callbacks.len();
        self.callbacks.push(Event::Accept {
            order: Arc::clone(order),
            price: inbound.price(),
            order_qty: inbound.order_qty(),
            match_qty: 0,
            trans_id,
        });

        let matched = self.match_order(&mut inbound, trans_id);

        // Note how much traded on acceptance; the depth replay needs it to
        // tell a resting order from one that never made it into the book.
        if let Event::Accept { match_qty, .. } = &mut self.callbacks[accept_idx] {
            *match_qty = inbound.filled_qty();
        }

        if inbound.open_qty() > 0 {
            if inbound.immediate_or_cancel() {
                trace!(
                    "book {}: cancelling {} residual of immediate-or-cancel order",
                    self.symbol,
                    inbound.open_qty()
                );
                self.callbacks.push(Event::Cancel {
                    order: Arc::clone(order),
                    open_qty: inbound.open_qty(),
                    level_price: inbound.price(),
                    trans_id,
                });
            } else {
                let side = inbound.side();
                let key = sort_price(side, inbound.price());
                self.side_book_mut(side).insert(key, inbound);
            }
        }

        self.publish_and_drain(listener, trans_id);
        matched
    }
}
