//! Collaborators the core consumes: symbol membership, the trade record and
//! per-trader fill delivery. The core only sees these traits; the types in the
//! submodules are in-memory implementations.

pub mod catalog;
pub mod inbox;
pub mod tape;

pub use catalog::StaticCatalog;
pub use inbox::{FillInbox, FillReport};
pub use tape::{TapeEntry, TradeTape};

use crate::engine::types::{Direction, Price, Quantity};

/// Fixed set of tradable symbols.
pub trait StockCatalog: Send + Sync {
    fn contains(&self, symbol: &str) -> bool;

    /// Every symbol, in catalog order.
    fn symbols(&self) -> Vec<String>;
}

/// Receives one call per fill event (two per trade).
///
/// Called with the symbol's book locked. Implementations must not call back
/// into the venue for that symbol; hand the fill off (a channel, a queue) and
/// react once the admission call has returned.
pub trait TradeSink: Send + Sync {
    fn record(&self, symbol: &str, price: Price, quantity: Quantity);
}

/// Delivers a fill to the trader owning the order. Never called for unowned
/// orders.
///
/// Same locking rule as [`TradeSink`]: a trader that re-quotes on a fill must
/// queue the request and submit it after the triggering call returns.
pub trait FillNotifier: Send + Sync {
    fn on_fill(&self, trader_id: &str, symbol: &str, price: Price, quantity: Quantity, direction: Direction);
}

/// Sink and notifier that drop everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl TradeSink for Discard {
    fn record(&self, _symbol: &str, _price: Price, _quantity: Quantity) {}
}

impl FillNotifier for Discard {
    fn on_fill(&self, _trader_id: &str, _symbol: &str, _price: Price, _quantity: Quantity, _direction: Direction) {}
}
