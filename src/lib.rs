//! # Limit Order Book Matching Engine with Aggregated Depth
//!
//! A single-instrument, price-time priority limit order book. The engine accepts a
//! stream of order-lifecycle commands (submit, cancel, replace), deterministically
//! crosses inbound orders against resting liquidity, and maintains two live
//! projections: the full set of resting orders per side, and an aggregated,
//! change-stamped view of the top N price levels suitable for incremental market
//! data publication.
//!
//! ## Key Features
//!
//! - **Price-time matching**: strict FIFO within a price level, best price first
//!   across levels, with maker price improvement on every cross.
//!
//! - **Order conditions**: market orders, all-or-none (single-transaction full
//!   fill or nothing), and immediate-or-cancel (residual quantity cancelled
//!   instead of resting).
//!
//! - **Live modification**: resting orders can be cancelled or replaced in place;
//!   a price change re-enters the matching loop and may trade immediately.
//!
//! - **Aggregated depth**: a fixed-size two-sided ladder of the best N levels per
//!   side, updated incrementally with per-side monotonic change ids so consumers
//!   can publish diffs instead of snapshots.
//!
//! - **Deterministic event pipeline**: every command produces a strictly ordered
//!   sequence of listener callbacks (accept, reject, fill, cancel, replace,
//!   depth/top-of-book updates), drained only after the command's structural work
//!   is complete.
//!
//! ## Design Goals
//!
//! 1. **Determinism**: identical command sequences produce identical fills,
//!    events, and depth transitions.
//! 2. **Correctness**: quantity conservation, price-time priority, and depth
//!    aggregation invariants hold in every reachable state.
//! 3. **Simplicity of embedding**: one book per instrument, single-threaded,
//!    no internal locks or threads; scale out by sharding books.
//!
//! ## Status
//!
//! The engine is an in-process library: no transport, persistence, or clock is
//! included. Callers own the order representation (any type implementing
//! [`Order`]) and consume events through an [`OrderListener`].

mod orderbook;
pub mod simple;

pub use orderbook::{
    Conditions, Depth, DepthLevel, DepthSnapshot, Event, Order, OrderBook, OrderListener,
    OrderTracker, Side, SideBook,
};
pub use orderbook::{
    ChangeId, Cost, Price, Quantity, TransId, INVALID_LEVEL_PRICE, MARKET_ORDER_PRICE,
    PRICE_UNCHANGED, SIZE_UNCHANGED,
};
