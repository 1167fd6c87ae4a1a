//! Shared helpers for the integration suites.

use depthbook::simple::{OrderId, SimpleOrder};
use depthbook::{DepthLevel, OrderBook, OrderListener, Price, Quantity};
use std::sync::Arc;

/// One observed listener callback.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Accept(OrderId),
    Reject(OrderId, String),
    Fill(OrderId, Quantity, Price),
    Cancel(OrderId),
    CancelReject(OrderId, String),
    Replace(OrderId, Quantity, Price),
    ReplaceReject(OrderId, String),
    DepthChange,
    BboChange,
}

/// Applies lifecycle events onto the orders and records every callback.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Recorded>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fills(&self) -> Vec<(OrderId, Quantity, Price)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Recorded::Fill(id, qty, price) => Some((*id, *qty, *price)),
                _ => None,
            })
            .collect()
    }

    pub fn traded_qty(&self) -> Quantity {
        self.fills().iter().map(|(_, qty, _)| *qty).sum()
    }
}

impl<const SIZE: usize> OrderListener<SimpleOrder, SIZE> for Recorder {
    fn on_accept(&mut self, order: &Arc<SimpleOrder>) {
        order.accept();
        self.events.push(Recorded::Accept(order.id()));
    }

    fn on_reject(&mut self, order: &Arc<SimpleOrder>, reason: &str) {
        order.reject();
        self.events.push(Recorded::Reject(order.id(), reason.into()));
    }

    fn on_fill(&mut self, order: &Arc<SimpleOrder>, qty: Quantity, price: Price) {
        order.fill(qty, price);
        self.events.push(Recorded::Fill(order.id(), qty, price));
    }

    fn on_cancel(&mut self, order: &Arc<SimpleOrder>) {
        order.cancel();
        self.events.push(Recorded::Cancel(order.id()));
    }

    fn on_cancel_reject(&mut self, order: &Arc<SimpleOrder>, reason: &str) {
        self.events
            .push(Recorded::CancelReject(order.id(), reason.into()));
    }

    fn on_replace(&mut self, order: &Arc<SimpleOrder>, new_order_qty: Quantity, new_price: Price) {
        order.replace(new_order_qty, new_price);
        self.events
            .push(Recorded::Replace(order.id(), new_order_qty, new_price));
    }

    fn on_replace_reject(&mut self, order: &Arc<SimpleOrder>, reason: &str) {
        self.events
            .push(Recorded::ReplaceReject(order.id(), reason.into()));
    }

    fn on_depth_change(&mut self, _book: &OrderBook<SimpleOrder, SIZE>) {
        self.events.push(Recorded::DepthChange);
    }

    fn on_bbo_change(&mut self, _book: &OrderBook<SimpleOrder, SIZE>) {
        self.events.push(Recorded::BboChange);
    }
}

pub fn buy(price: Price, qty: Quantity) -> Arc<SimpleOrder> {
    SimpleOrder::shared(true, price, qty)
}

pub fn sell(price: Price, qty: Quantity) -> Arc<SimpleOrder> {
    SimpleOrder::shared(false, price, qty)
}

/// Submit with a throwaway recorder, asserting the match result.
pub fn seed(book: &mut OrderBook<SimpleOrder>, order: &Arc<SimpleOrder>, match_expected: bool) {
    let mut recorder = Recorder::new();
    assert_eq!(book.submit(order, &mut recorder), match_expected);
}

/// Assert the populated prefix of a depth side and that the rest is blank.
pub fn verify_levels(levels: &[DepthLevel], expected: &[(Price, u32, Quantity)]) {
    for (i, level) in levels.iter().enumerate() {
        if let Some((price, count, qty)) = expected.get(i) {
            assert_eq!(level.price(), *price, "level {i} price");
            assert_eq!(level.order_count(), *count, "level {i} order count");
            assert_eq!(level.aggregate_qty(), *qty, "level {i} aggregate qty");
        } else {
            assert!(level.is_blank(), "level {i} should be blank");
        }
    }
}
