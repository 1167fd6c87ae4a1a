//! Reference order implementation and a listener that applies events to it.
//!
//! The engine only requires the read-only [`Order`] capability; this module
//! provides a ready-made concrete order carrying the usual lifecycle state
//! (accepted, complete, cancelled), fill accounting, and a display id.
//! [`SimpleListener`] applies the book's events back onto these orders, which
//! is the contract the book expects from an embedding: in particular a
//! replace must be reflected in the handle's price before the next command
//! that references it.

use crate::orderbook::{Conditions, Cost, Order, OrderListener, Price, Quantity};
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Display identifier of a [`SimpleOrder`].
///
/// Purely informational: the book locates orders by handle identity, never by
/// id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        OrderId(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a [`SimpleOrder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OrderState {
    New = 0,
    Accepted = 1,
    Complete = 2,
    Cancelled = 3,
    Rejected = 4,
}

impl OrderState {
    fn from_u8(value: u8) -> OrderState {
        match value {
            0 => OrderState::New,
            1 => OrderState::Accepted,
            2 => OrderState::Complete,
            3 => OrderState::Cancelled,
            4 => OrderState::Rejected,
            _ => unreachable!("invalid order state"),
        }
    }
}

/// A concrete order with interior-mutable lifecycle bookkeeping.
///
/// Price and quantity are atomics so that a listener can apply replace
/// results through the shared handle while the book and tests hold clones of
/// it.
#[derive(Debug)]
pub struct SimpleOrder {
    id: OrderId,
    is_buy: bool,
    conditions: Conditions,
    state: AtomicU8,
    price: AtomicU64,
    order_qty: AtomicU64,
    filled_qty: AtomicU64,
    filled_cost: AtomicU64,
}

impl SimpleOrder {
    /// A new unconditioned order. `price` zero makes it a market order.
    pub fn new(is_buy: bool, price: Price, qty: Quantity) -> Self {
        Self::with_conditions(is_buy, price, qty, Conditions::NONE)
    }

    pub fn with_conditions(
        is_buy: bool,
        price: Price,
        qty: Quantity,
        conditions: Conditions,
    ) -> Self {
        Self {
            id: OrderId::new(),
            is_buy,
            conditions,
            state: AtomicU8::new(OrderState::New as u8),
            price: AtomicU64::new(price),
            order_qty: AtomicU64::new(qty),
            filled_qty: AtomicU64::new(0),
            filled_cost: AtomicU64::new(0),
        }
    }

    /// Shared-handle convenience constructor.
    pub fn shared(is_buy: bool, price: Price, qty: Quantity) -> Arc<Self> {
        Arc::new(Self::new(is_buy, price, qty))
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn state(&self) -> OrderState {
        OrderState::from_u8(self.state.load(Ordering::Relaxed))
    }

    /// Quantity filled so far.
    pub fn filled_qty(&self) -> Quantity {
        self.filled_qty.load(Ordering::Relaxed)
    }

    /// Total value traded so far.
    pub fn filled_cost(&self) -> Cost {
        self.filled_cost.load(Ordering::Relaxed)
    }

    /// Quantity still open.
    pub fn open_qty(&self) -> Quantity {
        self.order_qty().saturating_sub(self.filled_qty())
    }

    /// The exchange accepted this order.
    pub fn accept(&self) {
        self.state
            .store(OrderState::Accepted as u8, Ordering::Relaxed);
    }

    /// The exchange rejected this order.
    pub fn reject(&self) {
        self.state
            .store(OrderState::Rejected as u8, Ordering::Relaxed);
    }

    /// Apply a fill of `qty` at `price`.
    pub fn fill(&self, qty: Quantity, price: Price) {
        let filled = self.filled_qty.fetch_add(qty, Ordering::Relaxed) + qty;
        self.filled_cost.fetch_add(qty * price, Ordering::Relaxed);
        if filled >= self.order_qty() {
            self.state
                .store(OrderState::Complete as u8, Ordering::Relaxed);
        }
    }

    /// The exchange cancelled this order (or the residue of it).
    pub fn cancel(&self) {
        self.state
            .store(OrderState::Cancelled as u8, Ordering::Relaxed);
    }

    /// Apply a replace: the new total quantity and the effective price.
    pub fn replace(&self, new_order_qty: Quantity, new_price: Price) {
        self.order_qty.store(new_order_qty, Ordering::Relaxed);
        self.price.store(new_price, Ordering::Relaxed);
    }
}

impl Order for SimpleOrder {
    fn is_buy(&self) -> bool {
        self.is_buy
    }

    fn price(&self) -> Price {
        self.price.load(Ordering::Relaxed)
    }

    fn order_qty(&self) -> Quantity {
        self.order_qty.load(Ordering::Relaxed)
    }

    fn conditions(&self) -> Conditions {
        self.conditions
    }
}

impl fmt::Display for SimpleOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} x {}",
            self.id,
            if self.is_buy { "Buy" } else { "Sell" },
            self.order_qty(),
            self.price.load(Ordering::Relaxed),
        )
    }
}

/// Listener that applies lifecycle events onto [`SimpleOrder`] handles.
///
/// Embeddings with richer order types do the equivalent in their own
/// listener; compose this one (or copy its five one-liners) when events also
/// need to reach other consumers.
#[derive(Debug, Default)]
pub struct SimpleListener;

impl<const SIZE: usize> OrderListener<SimpleOrder, SIZE> for SimpleListener {
    fn on_accept(&mut self, order: &Arc<SimpleOrder>) {
        order.accept();
    }

    fn on_reject(&mut self, order: &Arc<SimpleOrder>, _reason: &str) {
        order.reject();
    }

    fn on_fill(&mut self, order: &Arc<SimpleOrder>, qty: Quantity, price: Price) {
        order.fill(qty, price);
    }

    fn on_cancel(&mut self, order: &Arc<SimpleOrder>) {
        order.cancel();
    }

    fn on_replace(&mut self, order: &Arc<SimpleOrder>, new_order_qty: Quantity, new_price: Price) {
        order.replace(new_order_qty, new_price);
    }
}
