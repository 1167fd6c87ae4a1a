//! The capability an order handle must expose to the book.

use super::types::{Conditions, Price, Quantity, Side, MARKET_ORDER_PRICE};

/// Minimum interface the book requires from an order.
///
/// Orders are passed to the book as `Arc<O>` handles; the book never mutates
/// them and locates them during cancel/replace by handle identity
/// (`Arc::ptr_eq`), so no hashing or ordering of orders is required.
///
/// Mutations implied by events (fills, replaces) are the listener's
/// responsibility: a handle's `price()` must reflect an applied replace before
/// the next command referencing that handle, since the book derives its scan
/// partition from it.
pub trait Order {
    /// Is this order a buy?
    fn is_buy(&self) -> bool;

    /// The limit price, or [`MARKET_ORDER_PRICE`] for a market order.
    fn price(&self) -> Price;

    /// The total original quantity of the order.
    fn order_qty(&self) -> Quantity;

    /// Condition flags. Defaults to none.
    fn conditions(&self) -> Conditions {
        Conditions::NONE
    }

    /// Is this a limit order (finite price)?
    fn is_limit(&self) -> bool {
        self.price() != MARKET_ORDER_PRICE
    }

    /// The side of the book this order belongs to.
    fn side(&self) -> Side {
        if self.is_buy() {
            Side::Buy
        } else {
            Side::Sell
        }
    }
}
