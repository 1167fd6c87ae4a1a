//! Shared scalar types, sentinels, and condition flags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

/// Price of an order or depth level. The distinguished value
/// [`MARKET_ORDER_PRICE`] (zero) denotes a market order.
pub type Price = u64;

/// Order or level quantity.
pub type Quantity = u64;

/// Total traded value of a fill (`quantity * price`).
pub type Cost = u64;

/// Side-local monotonic counter stamped on depth levels as they change.
pub type ChangeId = u64;

/// Per-book monotonic counter identifying all events produced by a single
/// externally submitted command.
pub type TransId = u64;

/// Limit price meaning "execute at any price on the opposite side".
pub const MARKET_ORDER_PRICE: Price = 0;

/// Price of a blank depth slot. Reserved outside the valid price range.
pub const INVALID_LEVEL_PRICE: Price = 0;

/// Sentinel for [`OrderBook::replace`](crate::OrderBook::replace): leave the
/// resting order's price as it is.
pub const PRICE_UNCHANGED: Price = 0;

/// Sentinel for [`OrderBook::replace`](crate::OrderBook::replace): leave the
/// resting order's quantity as it is.
pub const SIZE_UNCHANGED: i64 = 0;

/// Sort price under which buy-side market orders rest: strictly above any
/// finite bid. Never observable outside the side book.
pub(crate) const MARKET_ORDER_BID_SORT_PRICE: Price = Price::MAX;

/// Sort price under which sell-side market orders rest: strictly below any
/// finite ask. Never observable outside the side book.
pub(crate) const MARKET_ORDER_ASK_SORT_PRICE: Price = 0;

/// Which side of the book an order belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// A bid: an order to buy.
    Buy,
    /// An ask: an order to sell.
    Sell,
}

impl Side {
    /// The side an order on this side matches against.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Slot index of this side within two-sided storage: bids first.
    pub(crate) fn index(self) -> usize {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "Buy"),
            Side::Sell => write!(f, "Sell"),
        }
    }
}

/// Bitfield of order condition flags.
///
/// The engine interprets [`ALL_OR_NONE`](Conditions::ALL_OR_NONE) and
/// [`IMMEDIATE_OR_CANCEL`](Conditions::IMMEDIATE_OR_CANCEL); further bits are
/// reserved and carried through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions(pub u32);

impl Conditions {
    /// No conditions: a plain limit or market order.
    pub const NONE: Conditions = Conditions(0);

    /// The order must trade its full quantity in a single transaction or not
    /// at all.
    pub const ALL_OR_NONE: Conditions = Conditions(1);

    /// Any residual quantity after the first matching attempt is cancelled
    /// rather than rested.
    pub const IMMEDIATE_OR_CANCEL: Conditions = Conditions(2);

    /// Is the all-or-none bit set?
    pub fn all_or_none(self) -> bool {
        self.0 & Self::ALL_OR_NONE.0 != 0
    }

    /// Is the immediate-or-cancel bit set?
    pub fn immediate_or_cancel(self) -> bool {
        self.0 & Self::IMMEDIATE_OR_CANCEL.0 != 0
    }
}

impl BitOr for Conditions {
    type Output = Conditions;

    fn bitor(self, rhs: Conditions) -> Conditions {
        Conditions(self.0 | rhs.0)
    }
}

/// Key under which an order rests in its side book: the limit price, with
/// market orders collapsed to the sentinel that sorts them to the top of
/// their side.
pub(crate) fn sort_price(side: Side, price: Price) -> Price {
    if price == MARKET_ORDER_PRICE {
        match side {
            Side::Buy => MARKET_ORDER_BID_SORT_PRICE,
            Side::Sell => MARKET_ORDER_ASK_SORT_PRICE,
        }
    } else {
        price
    }
}

/// Is this sort-price key the market sentinel for the given side?
pub(crate) fn is_market_sort_price(side: Side, key: Price) -> bool {
    match side {
        Side::Buy => key == MARKET_ORDER_BID_SORT_PRICE,
        Side::Sell => key == MARKET_ORDER_ASK_SORT_PRICE,
    }
}
