//! Serializable snapshot of the aggregated depth for market data.

use super::depth::Depth;
use super::depth_level::DepthLevel;
use super::types::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Point-in-time copy of the visible depth ladder.
///
/// Only populated levels are included; each carries its change stamp, so a
/// consumer can seed an incremental cursor from a snapshot and diff against
/// later ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthSnapshot {
    /// The symbol or identifier for the snapshotted book.
    pub symbol: String,

    /// Populated bid levels, best (highest) first.
    pub bids: Vec<DepthLevel>,

    /// Populated ask levels, best (lowest) first.
    pub asks: Vec<DepthLevel>,
}

impl DepthSnapshot {
    pub(crate) fn from_depth<const SIZE: usize>(symbol: &str, depth: &Depth<SIZE>) -> Self {
        let populated = |levels: &[DepthLevel]| {
            levels
                .iter()
                .copied()
                .filter(|level| !level.is_blank())
                .collect()
        };
        Self {
            symbol: symbol.to_string(),
            bids: populated(depth.bids()),
            asks: populated(depth.asks()),
        }
    }

    /// Get the best bid price and aggregate quantity.
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        self.bids
            .first()
            .map(|level| (level.price(), level.aggregate_qty()))
    }

    /// Get the best ask price and aggregate quantity.
    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        self.asks
            .first()
            .map(|level| (level.price(), level.aggregate_qty()))
    }

    /// Get the mid price (average of best bid and best ask).
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some((bid as f64 + ask as f64) / 2.0),
            _ => None,
        }
    }

    /// Get the spread (best ask - best bid).
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some(ask.saturating_sub(bid)),
            _ => None,
        }
    }

    /// Total visible quantity on the bid side.
    pub fn total_bid_qty(&self) -> Quantity {
        self.bids.iter().map(|level| level.aggregate_qty()).sum()
    }

    /// Total visible quantity on the ask side.
    pub fn total_ask_qty(&self) -> Quantity {
        self.asks.iter().map(|level| level.aggregate_qty()).sum()
    }
}
