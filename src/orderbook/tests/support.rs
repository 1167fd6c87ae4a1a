//! Shared helpers for the unit suites: a recording listener that also applies
//! lifecycle events to `SimpleOrder` handles, order constructors, and
//! verification helpers in the style of the integration scenarios.

use crate::orderbook::{
    ChangeId, Conditions, DepthLevel, Order, OrderBook, OrderListener, Price, Quantity,
    PRICE_UNCHANGED,
};
use crate::simple::{OrderId, OrderState, SimpleOrder};
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

/// Applies events onto the orders (like an embedding must) and records them.
#[derive(Debug, Default)]
pub struct TestListener {
    pub events: Vec<Recorded>,
}

impl TestListener {
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
}

impl<const SIZE: usize> OrderListener<SimpleOrder, SIZE> for TestListener {
    fn on_accept(&mut self, order: &Arc<SimpleOrder>) {
        order.accept();
        self.events.push(Recorded::Accept(order.id()));
    }

    fn on_reject(&mut self, order: &Arc<SimpleOrder>, reason: &str) {
        order.reject();
        self.events.push(Recorded::Reject(order.id(), reason.to_string()));
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
            .push(Recorded::CancelReject(order.id(), reason.to_string()));
    }

    fn on_replace(&mut self, order: &Arc<SimpleOrder>, new_order_qty: Quantity, new_price: Price) {
        order.replace(new_order_qty, new_price);
        self.events
            .push(Recorded::Replace(order.id(), new_order_qty, new_price));
    }

    fn on_replace_reject(&mut self, order: &Arc<SimpleOrder>, reason: &str) {
        self.events
            .push(Recorded::ReplaceReject(order.id(), reason.to_string()));
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

pub fn buy_with(price: Price, qty: Quantity, conditions: Conditions) -> Arc<SimpleOrder> {
    Arc::new(SimpleOrder::with_conditions(true, price, qty, conditions))
}

pub fn sell_with(price: Price, qty: Quantity, conditions: Conditions) -> Arc<SimpleOrder> {
    Arc::new(SimpleOrder::with_conditions(false, price, qty, conditions))
}

/// Submit an order, asserting the match result and resulting order state.
pub fn add_and_verify(
    book: &mut OrderBook<SimpleOrder>,
    order: &Arc<SimpleOrder>,
    match_expected: bool,
    complete_expected: bool,
) {
    let mut listener = TestListener::new();
    assert_eq!(
        book.submit(order, &mut listener),
        match_expected,
        "unexpected match result for {order}"
    );
    let expected_state = if complete_expected {
        OrderState::Complete
    } else {
        OrderState::Accepted
    };
    assert_eq!(order.state(), expected_state, "unexpected state for {order}");
}

/// Cancel an order, asserting the resulting order state.
pub fn cancel_and_verify(
    book: &mut OrderBook<SimpleOrder>,
    order: &Arc<SimpleOrder>,
    expected_state: OrderState,
) {
    let mut listener = TestListener::new();
    book.cancel(order, &mut listener);
    assert_eq!(order.state(), expected_state, "unexpected state for {order}");
}

/// Replace an order that does not cross at its new price, asserting the
/// resulting order state and the applied quantity/price.
pub fn replace_and_verify(
    book: &mut OrderBook<SimpleOrder>,
    order: &Arc<SimpleOrder>,
    size_delta: i64,
    new_price: Price,
    expected_state: OrderState,
) -> bool {
    let expected_order_qty = (order.order_qty() as i64 + size_delta) as Quantity;
    let expected_open_qty = (order.open_qty() as i64 + size_delta) as Quantity;
    let expected_price = if new_price == PRICE_UNCHANGED {
        order.price()
    } else {
        new_price
    };

    let mut listener = TestListener::new();
    let matched = book.replace(order, size_delta, new_price, &mut listener);

    assert_eq!(order.state(), expected_state, "state for {order}");
    assert_eq!(order.order_qty(), expected_order_qty, "order qty for {order}");
    assert_eq!(order.open_qty(), expected_open_qty, "open qty for {order}");
    assert_eq!(order.price(), expected_price, "price for {order}");
    matched
}

/// Assert that the populated prefix of a depth side matches `expected` and
/// that every remaining slot is blank.
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

/// Assert the change stamps of a depth side, best level first.
pub fn verify_stamps(levels: &[DepthLevel], expected: &[ChangeId]) {
    for (i, stamp) in expected.iter().enumerate() {
        assert_eq!(levels[i].last_change(), *stamp, "level {i} change id");
    }
}
