use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::engine::book::{OrderBook, SymbolBook};
use crate::engine::matching::MatchingEngine;
use crate::engine::types::{OrderId, Owner, Price, Quantity, RestingOrder, Side, SubmitResult, Top, Trade};
use crate::error::{VenueError, VenueResult};
use crate::venue::StockCatalog;

/// Client-facing entry point. Turns limit and market requests into slices
/// inserted into the book and lets the matching engine execute them; it never
/// removes orders itself.
///
/// Each call holds the symbol's lock from validation to the last triggered
/// sweep, so two admissions on one symbol never interleave.
pub struct AdmissionRouter {
    catalog: Arc<dyn StockCatalog>,
    book: Arc<OrderBook>,
    engine: Arc<MatchingEngine>,
}

impl AdmissionRouter {
    pub fn new(catalog: Arc<dyn StockCatalog>, book: Arc<OrderBook>, engine: Arc<MatchingEngine>) -> Self {
        Self { catalog, book, engine }
    }

    fn validate(&self, symbol: &str) -> VenueResult<()> {
        if self.catalog.contains(symbol) {
            return Ok(());
        }
        warn!(symbol, "Rejecting request for unknown symbol");
        metrics::counter!("lobx_orders_rejected_total").increment(1);
        Err(VenueError::unknown_symbol(symbol))
    }

    /// Crosses as much as is marketable, one opposing order at a time, and
    /// rests whatever is left at `price`.
    #[instrument(level = "debug", skip(self))]
    pub fn submit_limit(&self, symbol: &str, price: Price, quantity: Quantity, side: Side, owner: Owner) -> VenueResult<SubmitResult> {
        self.validate(symbol)?;
        if quantity == 0 {
            return Ok(SubmitResult::default());
        }
        if !price.is_finite() {
            warn!(symbol, price, "Rejecting limit order with non-finite price");
            metrics::counter!("lobx_orders_rejected_total").increment(1);
            return Err(VenueError::InvalidPrice { price });
        }

        let mut book = self.book.lock(symbol)?;
        // Slices and the resting remainder never hold more than `quantity` on this side at once.
        book.check_room(side, quantity)?;
        let result = self.limit_locked(&mut book, price, quantity, side, &owner)?;
        metrics::counter!("lobx_orders_admitted_total", "symbol" => symbol.to_string()).increment(1);
        debug!(symbol, traded = result.traded_quantity(), rested = ?result.rested, "Limit order admitted");
        Ok(result)
    }

    /// Takes up to `quantity` from the opposite side, never more than rests
    /// there. Nothing rests afterwards.
    #[instrument(level = "debug", skip(self))]
    pub fn submit_market(&self, symbol: &str, quantity: Quantity, side: Side, owner: Owner) -> VenueResult<SubmitResult> {
        self.validate(symbol)?;
        if quantity == 0 {
            return Ok(SubmitResult::default());
        }

        let mut book = self.book.lock(symbol)?;
        book.check_room(side, quantity.min(book.total_quantity(side.opposite())))?;
        let result = self.market_locked(&mut book, quantity, side, &owner)?;
        metrics::counter!("lobx_orders_admitted_total", "symbol" => symbol.to_string()).increment(1);
        debug!(symbol, requested = quantity, traded = result.traded_quantity(), "Market order admitted");
        Ok(result)
    }

    fn limit_locked(&self, book: &mut SymbolBook, price: Price, quantity: Quantity, side: Side, owner: &Owner) -> VenueResult<SubmitResult> {
        let mut result = SubmitResult::default();
        let mut remaining = quantity;

        while remaining > 0 {
            match book.best(side.opposite()) {
                Some(opposite) if side.is_marketable(price, opposite.price) => {
                    let slice = remaining.min(opposite.quantity);
                    debug!(symbol = book.symbol(), %side, slice, against = opposite.id, "Crossing slice");
                    result.absorb(self.market_locked(book, slice, side, owner)?);
                    remaining -= slice;
                }
                _ => {
                    result.rested = book.insert(side, price, remaining, owner.clone())?;
                    result.trades.extend(self.engine.check_locked(book));
                    break;
                }
            }
        }
        Ok(result)
    }

    fn market_locked(&self, book: &mut SymbolBook, quantity: Quantity, side: Side, owner: &Owner) -> VenueResult<SubmitResult> {
        let mut result = SubmitResult::default();
        let mut remaining = quantity;

        loop {
            remaining = remaining.min(book.total_quantity(side.opposite()));
            let Some(opposite) = book.best(side.opposite()) else {
                break;
            };
            if remaining == 0 {
                break;
            }
            // Same-side order at the opposing price: crosses by construction.
            let fill = remaining.min(opposite.quantity);
            book.insert(side, opposite.price, fill, owner.clone())?;
            result.trades.extend(self.engine.check_locked(book));
            remaining -= fill;
        }
        Ok(result)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn cancel(&self, symbol: &str, side: Side, id: OrderId) -> VenueResult<RestingOrder> {
        self.validate(symbol)?;
        self.book.lock(symbol)?.cancel(side, id)
    }

    /// Changes a resting order and re-runs matching for its symbol.
    #[instrument(level = "debug", skip(self))]
    pub fn modify(
        &self,
        symbol: &str,
        side: Side,
        id: OrderId,
        new_price: Option<Price>,
        new_quantity: Option<Quantity>,
    ) -> VenueResult<Vec<Trade>> {
        self.validate(symbol)?;
        let mut book = self.book.lock(symbol)?;
        book.modify(side, id, new_price, new_quantity)?;
        Ok(self.engine.check_locked(&mut book))
    }

    pub fn best_bid(&self, symbol: &str) -> VenueResult<Option<Top>> {
        self.validate(symbol)?;
        self.book.best_bid(symbol)
    }

    pub fn best_ask(&self, symbol: &str) -> VenueResult<Option<Top>> {
        self.validate(symbol)?;
        self.book.best_ask(symbol)
    }

    pub fn spread(&self, symbol: &str) -> VenueResult<Option<Price>> {
        self.validate(symbol)?;
        self.book.spread(symbol)
    }

    pub fn depth(&self, symbol: &str, side: Side, levels: usize) -> VenueResult<Vec<(Price, Quantity)>> {
        self.validate(symbol)?;
        Ok(self.book.lock(symbol)?.depth(side, levels))
    }

    pub fn orders(&self, symbol: &str, side: Side) -> VenueResult<Vec<RestingOrder>> {
        self.validate(symbol)?;
        Ok(self.book.lock(symbol)?.orders(side))
    }

    pub fn total_quantity(&self, symbol: &str, side: Side) -> VenueResult<Quantity> {
        self.validate(symbol)?;
        Ok(self.book.lock(symbol)?.total_quantity(side))
    }
}
