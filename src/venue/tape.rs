use ahash::AHashMap;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::trace;

use crate::engine::types::{Price, Quantity};
use crate::venue::{StaticCatalog, TradeSink};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TapeEntry {
    pub symbol: String,
    pub price: Price,
    pub quantity: Quantity,
}

#[derive(Debug, Default)]
struct TapeState {
    entries: Vec<TapeEntry>,
    last: AHashMap<String, Price>,
    /// Last prices as they stood at the close of each period.
    periods: Vec<AHashMap<String, Price>>,
}

/// Trade record kept in memory: every reported fill, the last traded price per
/// symbol and a per-period price series.
#[derive(Debug, Default)]
pub struct TradeTape {
    state: Mutex<TapeState>,
}

impl TradeTape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds last prices with the catalog's reference prices.
    pub fn seeded(catalog: &StaticCatalog) -> Self {
        let tape = Self::new();
        {
            let mut state = tape.state.lock();
            for (symbol, price) in catalog.reference_prices() {
                state.last.insert(symbol.to_string(), price);
            }
        }
        tape
    }

    pub fn entries(&self) -> Vec<TapeEntry> {
        self.state.lock().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last_price(&self, symbol: &str) -> Option<Price> {
        self.state.lock().last.get(symbol).copied()
    }

    /// Sum of recorded quantity for a symbol. Each trade is reported once per
    /// side, so this is twice the traded volume.
    pub fn recorded_quantity(&self, symbol: &str) -> Quantity {
        self.state
            .lock()
            .entries
            .iter()
            .filter(|e| e.symbol == symbol)
            .map(|e| e.quantity)
            .sum()
    }

    /// Closes the current period, freezing the last prices into the series.
    pub fn end_period(&self) {
        let mut state = self.state.lock();
        let closing = state.last.clone();
        state.periods.push(closing);
    }

    /// Closing price of each finished period; `None` until the symbol has a price.
    pub fn price_series(&self, symbol: &str) -> Vec<Option<Price>> {
        self.state
            .lock()
            .periods
            .iter()
            .map(|p| p.get(symbol).copied())
            .collect()
    }
}

impl TradeSink for TradeTape {
    fn record(&self, symbol: &str, price: Price, quantity: Quantity) {
        let mut state = self.state.lock();
        state.last.insert(symbol.to_string(), price);
        state.entries.push(TapeEntry { symbol: symbol.to_string(), price, quantity });
        trace!(symbol, price, qty = quantity, "Recorded fill on tape");
    }
}
