//! Aggregated market-depth tracker: the best `SIZE` price levels per side.

use super::depth_level::DepthLevel;
use super::types::{
    ChangeId, Price, Quantity, Side, INVALID_LEVEL_PRICE, MARKET_ORDER_ASK_SORT_PRICE,
    MARKET_ORDER_BID_SORT_PRICE,
};
use tracing::trace;

/// Fixed-size, two-sided aggregated view of the book.
///
/// Storage is one contiguous block of `2 * SIZE` levels, bids first. Populated
/// bid slots hold strictly decreasing prices, populated ask slots strictly
/// increasing, and blank slots are always at the tail of their side.
///
/// Every mutation advances the side-local change id once and stamps each slot
/// it modified, including slots moved by an insert or erase shift. A consumer
/// holding a per-level cursor of stamps it has already published can diff the
/// ladder incrementally; the tracker itself keeps one published cursor per
/// side to decide when depth and top-of-book update events are due.
///
/// Prices worse than every visible level are outside the window: mutations for
/// them are silently ignored, and an erasure of the last visible level
/// surfaces a restoration hint so the owner can refill the vacated slot from
/// the full side book.
#[derive(Debug)]
pub struct Depth<const SIZE: usize = 5> {
    /// Bid levels then ask levels.
    levels: [[DepthLevel; SIZE]; 2],
    last_change: [ChangeId; 2],
    last_published_change: [ChangeId; 2],
    ignored_fill_qty: [Quantity; 2],
    restoration_pending: [bool; 2],
}

impl<const SIZE: usize> Default for Depth<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SIZE: usize> Depth<SIZE> {
    pub fn new() -> Self {
        assert!(SIZE >= 1, "depth size must be at least one");
        Self {
            levels: [[DepthLevel::default(); SIZE]; 2],
            last_change: [0; 2],
            last_published_change: [0; 2],
            ignored_fill_qty: [0; 2],
            restoration_pending: [false; 2],
        }
    }

    /// The bid levels, best (highest) first. Blank slots trail.
    pub fn bids(&self) -> &[DepthLevel] {
        &self.levels[Side::Buy.index()]
    }

    /// The ask levels, best (lowest) first. Blank slots trail.
    pub fn asks(&self) -> &[DepthLevel] {
        &self.levels[Side::Sell.index()]
    }

    /// The levels of one side, best first.
    pub fn side_levels(&self, side: Side) -> &[DepthLevel] {
        &self.levels[side.index()]
    }

    /// Current change id of a side.
    pub fn last_change(&self, side: Side) -> ChangeId {
        self.last_change[side.index()]
    }

    /// Change id as of the last publication.
    pub fn last_published_change(&self, side: Side) -> ChangeId {
        self.last_published_change[side.index()]
    }

    /// Has this side changed since the last publication?
    pub fn changed(&self, side: Side) -> bool {
        self.last_change[side.index()] > self.last_published_change[side.index()]
    }

    /// Has the best bid or best ask slot changed since the last publication?
    pub fn bbo_changed(&self) -> bool {
        self.levels[Side::Buy.index()][0]
            .changed_since(self.last_published_change[Side::Buy.index()])
            || self.levels[Side::Sell.index()][0]
                .changed_since(self.last_published_change[Side::Sell.index()])
    }

    /// Mark the current state as published on both sides.
    pub fn mark_published(&mut self) {
        self.last_published_change = self.last_change;
    }

    /// Account a new resting order of `qty` at `price`.
    ///
    /// Inserts a new level (shifting the tail down, possibly truncating the
    /// worst visible level) when the price betters an existing level; silently
    /// ignores prices worse than a full window.
    pub fn add_order(&mut self, side: Side, price: Price, qty: Quantity) {
        let next_change = self.last_change[side.index()] + 1;
        if let Some(idx) = self.find_level(side, price, true) {
            // A slot shift inside find_level pre-stamps moved slots with the
            // same id, so the operation advances the side counter exactly once.
            self.last_change[side.index()] = next_change;
            let level = &mut self.levels[side.index()][idx];
            level.add_order(qty);
            level.set_last_change(next_change);
        }
    }

    /// Account the removal (cancel or terminal fill) of an order with `qty`
    /// open at `price`. Returns `true` when the close erased a visible level,
    /// in which case the owner should consult [`needs_restoration`](Self::needs_restoration).
    pub fn close_order(&mut self, side: Side, price: Price, qty: Quantity) -> bool {
        let Some(idx) = self.find_level(side, price, false) else {
            return false; // beyond the visible window
        };
        if self.levels[side.index()][idx].close_order(qty) {
            self.erase_level(side, idx);
            true
        } else {
            let change = self.advance(side);
            self.levels[side.index()][idx].set_last_change(change);
            false
        }
    }

    /// Apply a signed open-quantity delta at `price` (order count unchanged).
    pub fn change_qty(&mut self, side: Side, price: Price, qty_delta: i64) {
        let Some(idx) = self.find_level(side, price, false) else {
            return; // beyond the visible window
        };
        if qty_delta == 0 {
            return;
        }
        let change = self.advance(side);
        let level = &mut self.levels[side.index()][idx];
        if qty_delta > 0 {
            level.increase_qty(qty_delta as Quantity);
        } else {
            level.decrease_qty(qty_delta.unsigned_abs());
        }
        level.set_last_change(change);
    }

    /// Move an order between price levels: close `old_open` at `old_price` and
    /// add `new_open` at `new_price`. Collapses to a quantity change when the
    /// price is unchanged. Returns `true` when the close erased a level.
    pub fn replace_order(
        &mut self,
        side: Side,
        old_price: Price,
        new_price: Price,
        old_open: Quantity,
        new_open: Quantity,
    ) -> bool {
        if old_price == new_price {
            self.change_qty(side, old_price, new_open as i64 - old_open as i64);
            false
        } else {
            self.add_order(side, new_price, new_open);
            self.close_order(side, old_price, old_open)
        }
    }

    /// Account a fill of `qty` against a resting order at `price`; `filled`
    /// says whether the fill completed the order. Pending ignored-fill
    /// quantity is consumed before any level is touched. Returns `true` when
    /// a visible level was erased.
    pub fn fill_order(&mut self, side: Side, price: Price, qty: Quantity, filled: bool) -> bool {
        let ignored = &mut self.ignored_fill_qty[side.index()];
        if *ignored > 0 {
            assert!(*ignored >= qty, "ignored more fill quantity than reserved");
            *ignored -= qty;
            false
        } else if filled {
            self.close_order(side, price, qty)
        } else {
            self.change_qty(side, price, -(qty as i64));
            false
        }
    }

    /// Reserve `qty` of upcoming fills on `side` to be ignored.
    ///
    /// Called when an inbound order is completely filled on acceptance: the
    /// order was never added to the depth, so its fill events must not
    /// decrement a level that does not exist.
    pub fn ignore_fill_qty(&mut self, side: Side, qty: Quantity) {
        assert_eq!(
            self.ignored_fill_qty[side.index()],
            0,
            "ignored fill quantity already pending"
        );
        self.ignored_fill_qty[side.index()] = qty;
        trace!("depth: ignoring next {} {} fill qty", qty, side);
    }

    /// After erasures left blank slots behind populated levels, the price to
    /// search beyond in the side book for the next hidden level to reveal, or
    /// `None` when no restoration is due.
    ///
    /// The restored aggregate must reflect the side book *after* the whole
    /// transaction, so the owner resolves restoration once the transaction's
    /// structural changes have all been applied, repeating until the window is
    /// full or the book runs out of levels.
    pub fn needs_restoration(&mut self, side: Side) -> Option<Price> {
        if !self.restoration_pending[side.index()] {
            return None;
        }
        let levels = &self.levels[side.index()];
        let Some(first_blank) = levels.iter().position(|level| level.is_blank()) else {
            // Erasures were refilled within the transaction.
            self.restoration_pending[side.index()] = false;
            return None;
        };
        if first_blank == 0 {
            // Nothing visible at all: restore from the side's best resting
            // price, anchored past the market sort sentinel.
            Some(match side {
                Side::Buy => MARKET_ORDER_BID_SORT_PRICE,
                Side::Sell => MARKET_ORDER_ASK_SORT_PRICE,
            })
        } else {
            Some(levels[first_blank - 1].price())
        }
    }

    /// Reveal a hidden level into the first blank slot, stamped with the
    /// erasing transaction's change id. `None` means the side book has no
    /// further levels and ends the pending restoration.
    pub fn restore_level(&mut self, side: Side, aggregate: Option<(Price, u32, Quantity)>) {
        let Some((price, count, qty)) = aggregate else {
            self.restoration_pending[side.index()] = false;
            return;
        };
        let change = self.last_change[side.index()];
        match self.levels[side.index()].iter().position(|level| level.is_blank()) {
            Some(idx) => {
                let level = &mut self.levels[side.index()][idx];
                level.init(price);
                level.add_orders(count, qty);
                level.set_last_change(change);
                if idx == SIZE - 1 {
                    self.restoration_pending[side.index()] = false;
                }
                trace!("depth: restored {} level {} ({} x {})", side, price, count, qty);
            }
            None => self.restoration_pending[side.index()] = false,
        }
    }

    fn advance(&mut self, side: Side) -> ChangeId {
        self.last_change[side.index()] += 1;
        self.last_change[side.index()]
    }

    /// Is `level_price` worse than `price` for ordering purposes on `side`?
    fn is_worse(side: Side, level_price: Price, price: Price) -> bool {
        match side {
            Side::Buy => level_price < price,
            Side::Sell => level_price > price,
        }
    }

    /// Locate the slot for `price` by linear scan from the best slot,
    /// optionally creating it: a blank tail slot is initialized in place, a
    /// better-than-worst price is inserted with a tail shift. Returns `None`
    /// when the price is outside the visible window.
    fn find_level(&mut self, side: Side, price: Price, should_create: bool) -> Option<usize> {
        for idx in 0..SIZE {
            let level_price = self.levels[side.index()][idx].price();
            if level_price == price {
                return Some(idx);
            }
            if should_create && level_price == INVALID_LEVEL_PRICE {
                self.levels[side.index()][idx].init(price);
                return Some(idx);
            }
            if should_create && Self::is_worse(side, level_price, price) {
                self.insert_level_before(side, idx, price);
                return Some(idx);
            }
        }
        None
    }

    /// Insert a blank level at `idx`, shifting the tail down one slot. The
    /// worst visible level may fall off the window. Moved populated slots are
    /// stamped with the id the enclosing operation is about to commit.
    fn insert_level_before(&mut self, side: Side, idx: usize, price: Price) {
        let stamp = self.last_change[side.index()] + 1;
        let levels = &mut self.levels[side.index()];
        for i in (idx..SIZE - 1).rev() {
            levels[i + 1] = levels[i];
            if levels[i + 1].price() != INVALID_LEVEL_PRICE {
                levels[i + 1].set_last_change(stamp);
            }
        }
        levels[idx].init(price);
    }

    /// Erase the level at `idx`, shifting the tail up one slot and blanking
    /// the last slot. Advances the side change id once, stamps every slot it
    /// moved, and flags the side for restoration.
    fn erase_level(&mut self, side: Side, idx: usize) {
        self.restoration_pending[side.index()] = true;
        let stamp = self.advance(side);
        let levels = &mut self.levels[side.index()];
        for i in idx..SIZE - 1 {
            // Copy only within the populated prefix; the erased slot itself is
            // always overwritten.
            if i == idx || levels[i].price() != INVALID_LEVEL_PRICE {
                levels[i] = levels[i + 1];
                levels[i].set_last_change(stamp);
            }
        }
        if levels[SIZE - 1].price() != INVALID_LEVEL_PRICE || idx == SIZE - 1 {
            levels[SIZE - 1].init(INVALID_LEVEL_PRICE);
            levels[SIZE - 1].set_last_change(stamp);
        }
    }
}
