use ahash::AHashMap;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::trace;

use crate::engine::types::{Direction, Price, Quantity};
use crate::venue::FillNotifier;

/// A fill as seen by the trader who owned the order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillReport {
    pub symbol: String,
    pub direction: Direction,
    pub price: Price,
    pub quantity: Quantity,
}

/// Per-trader fill history.
#[derive(Debug, Default)]
pub struct FillInbox {
    fills: Mutex<AHashMap<String, Vec<FillReport>>>,
}

impl FillInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fills_for(&self, trader_id: &str) -> Vec<FillReport> {
        self.fills.lock().get(trader_id).cloned().unwrap_or_default()
    }

    /// Signed position change: bought minus sold.
    pub fn net_quantity(&self, trader_id: &str, symbol: &str) -> i128 {
        self.fills
            .lock()
            .get(trader_id)
            .map(|fills| {
                fills
                    .iter()
                    .filter(|f| f.symbol == symbol)
                    .map(|f| match f.direction {
                        Direction::Buy => f.quantity as i128,
                        Direction::Sell => -(f.quantity as i128),
                    })
                    .sum()
            })
            .unwrap_or(0)
    }

    pub fn total_fills(&self) -> usize {
        self.fills.lock().values().map(Vec::len).sum()
    }
}

impl FillNotifier for FillInbox {
    fn on_fill(&self, trader_id: &str, symbol: &str, price: Price, quantity: Quantity, direction: Direction) {
        trace!(trader = trader_id, symbol, price, qty = quantity, %direction, "Delivering fill");
        self.fills
            .lock()
            .entry(trader_id.to_string())
            .or_default()
            .push(FillReport { symbol: symbol.to_string(), direction, price, quantity });
    }
}
