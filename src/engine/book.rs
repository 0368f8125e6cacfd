use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use ahash::AHashMap;
use ordered_float::OrderedFloat;
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info, instrument, trace, warn};

use crate::engine::registry::IdentityRegistry;
use crate::engine::types::{OrderId, Owner, Price, PriceKey, Quantity, RestingOrder, Side, Top};
use crate::error::{VenueError, VenueResult};
use crate::venue::StockCatalog;

#[derive(Debug, Clone, PartialEq)]
struct Level {
    price: Price,
    /// Sorted by arrival rank.
    queue: VecDeque<RestingOrder>,
}

impl Level {
    fn quantity(&self) -> Quantity {
        self.queue.iter().map(|o| o.quantity).sum()
    }
}

/// All resting orders of one side of one symbol, best price first, then
/// earliest arrival. An empty side has no top: it behaves as a bid at -inf or
/// an ask at +inf, so it never crosses.
#[derive(Debug, Clone, PartialEq)]
struct BookSide {
    side: Side,
    levels: BTreeMap<PriceKey, Level>,
    total: Quantity,
}

impl BookSide {
    fn new(side: Side) -> Self {
        Self { side, levels: BTreeMap::new(), total: 0 }
    }

    fn best_level(&self) -> Option<&Level> {
        match self.side {
            Side::Bid => self.levels.values().next_back(),
            Side::Ask => self.levels.values().next(),
        }
    }

    fn best(&self) -> Option<&RestingOrder> {
        self.best_level().and_then(|level| level.queue.front())
    }

    fn levels_best_first(&self) -> Box<dyn Iterator<Item = &Level> + '_> {
        match self.side {
            Side::Bid => Box::new(self.levels.values().rev()),
            Side::Ask => Box::new(self.levels.values()),
        }
    }

    /// Places the order in its level by arrival rank.
    fn push(&mut self, order: RestingOrder) {
        self.total += order.quantity;
        let level = self
            .levels
            .entry(OrderedFloat(order.price))
            .or_insert_with(|| Level { price: order.price, queue: VecDeque::new() });
        let at = level.queue.partition_point(|o| o.arrival < order.arrival);
        level.queue.insert(at, order);
    }

    fn remove(&mut self, id: OrderId, key: PriceKey) -> Option<RestingOrder> {
        let level = self.levels.get_mut(&key)?;
        let at = level.queue.iter().position(|o| o.id == id)?;
        let order = level.queue.remove(at)?;
        if level.queue.is_empty() {
            self.levels.remove(&key);
        }
        self.total -= order.quantity;
        Some(order)
    }

    fn get_mut(&mut self, id: OrderId, key: PriceKey) -> Option<&mut RestingOrder> {
        self.levels.get_mut(&key)?.queue.iter_mut().find(|o| o.id == id)
    }
}

/// Bid and ask sides of a single symbol.
#[derive(Debug)]
pub struct SymbolBook {
    symbol: String,
    bids: BookSide,
    asks: BookSide,
    index: AHashMap<OrderId, (Side, PriceKey)>,
    next_arrival: u64,
    registry: Arc<IdentityRegistry>,
}

impl SymbolBook {
    pub fn new(symbol: impl Into<String>, registry: Arc<IdentityRegistry>) -> Self {
        Self {
            symbol: symbol.into(),
            bids: BookSide::new(Side::Bid),
            asks: BookSide::new(Side::Ask),
            index: AHashMap::new(),
            next_arrival: 0,
            registry,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    /// Rests a new order and returns its id. Zero quantity is a no-op
    /// (`Ok(None)`). Does not match; the caller decides when to.
    #[instrument(level = "debug", skip(self), fields(symbol = %self.symbol))]
    pub fn insert(&mut self, side: Side, price: Price, quantity: Quantity, owner: Owner) -> VenueResult<Option<OrderId>> {
        if quantity == 0 {
            trace!("Ignoring zero-quantity insert");
            return Ok(None);
        }
        if !price.is_finite() {
            warn!(price, "Rejecting non-finite price");
            return Err(VenueError::InvalidPrice { price });
        }

        self.check_room(side, quantity)?;

        let id = self.registry.allocate(owner)?;
        let arrival = self.next_arrival;
        self.next_arrival += 1;

        self.side_mut(side).push(RestingOrder { id, side, price, quantity, arrival });
        self.index.insert(id, (side, OrderedFloat(price)));
        debug!(id, %side, price, qty = quantity, arrival, "Added order to book");
        Ok(Some(id))
    }

    #[instrument(level = "trace", skip(self), fields(symbol = %self.symbol))]
    pub fn best(&self, side: Side) -> Option<Top> {
        let top = self.side(side).best().map(Top::from);
        trace!(?top, "Top of book");
        top
    }

    pub fn best_bid(&self) -> Option<Top> {
        self.best(Side::Bid)
    }

    pub fn best_ask(&self) -> Option<Top> {
        self.best(Side::Ask)
    }

    /// Best ask minus best bid; `None` while either side is empty.
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.price - bid.price),
            _ => None,
        }
    }

    /// Best bid priced at or above best ask.
    pub fn is_crossed(&self) -> bool {
        match (self.bids.best(), self.asks.best()) {
            (Some(bid), Some(ask)) => bid.price >= ask.price,
            _ => false,
        }
    }

    /// Quantity resting on one side across all levels.
    pub fn total_quantity(&self, side: Side) -> Quantity {
        self.side(side).total
    }

    /// Fails if resting `quantity` more on `side` would overflow its total.
    pub(crate) fn check_room(&self, side: Side, quantity: Quantity) -> VenueResult<()> {
        if self.side(side).total.checked_add(quantity).is_some() {
            return Ok(());
        }
        warn!(%side, qty = quantity, total = self.side(side).total, "Rejecting quantity that would overflow the side");
        Err(VenueError::QuantityOverflow { symbol: self.symbol.clone(), side })
    }

    /// Subtracts a traded quantity and drops the order once it reaches zero.
    /// Returns what is left.
    pub(crate) fn decrement_and_maybe_remove(&mut self, side: Side, id: OrderId, quantity: Quantity) -> VenueResult<Quantity> {
        let key = self.locate(side, id)?;
        let book_side = self.side_mut(side);
        let order = book_side.get_mut(id, key).ok_or(VenueError::UnknownOrder { id })?;
        let taken = quantity.min(order.quantity);
        order.quantity -= taken;
        let left = order.quantity;
        book_side.total -= taken;
        if left == 0 {
            book_side.remove(id, key);
            self.index.remove(&id);
            trace!(id, %side, "Order fully filled, removed");
        }
        Ok(left)
    }

    /// Changes price and/or quantity of a resting order; `None` leaves a field
    /// as is. The order keeps its arrival rank. A new quantity of zero removes
    /// the order.
    #[instrument(level = "debug", skip(self), fields(symbol = %self.symbol))]
    pub fn modify(&mut self, side: Side, id: OrderId, new_price: Option<Price>, new_quantity: Option<Quantity>) -> VenueResult<()> {
        let key = self.locate(side, id)?;
        if let Some(price) = new_price {
            if !price.is_finite() {
                warn!(id, price, "Rejecting non-finite price on modify");
                return Err(VenueError::InvalidPrice { price });
            }
        }
        if let (Some(quantity), Some(order)) = (new_quantity, self.get(id)) {
            if quantity > order.quantity {
                self.check_room(side, quantity - order.quantity)?;
            }
        }

        let book_side = self.side_mut(side);
        let mut order = book_side.remove(id, key).ok_or(VenueError::UnknownOrder { id })?;
        if let Some(price) = new_price {
            order.price = price;
        }
        if let Some(quantity) = new_quantity {
            order.quantity = quantity;
        }

        if order.quantity == 0 {
            self.index.remove(&id);
            debug!(id, "Order modified to zero quantity, removed");
            return Ok(());
        }
        let new_key = OrderedFloat(order.price);
        debug!(id, price = order.price, qty = order.quantity, "Order modified");
        book_side.push(order);
        self.index.insert(id, (side, new_key));
        Ok(())
    }

    #[instrument(level = "debug", skip(self), fields(symbol = %self.symbol))]
    pub fn cancel(&mut self, side: Side, id: OrderId) -> VenueResult<RestingOrder> {
        let key = self.locate(side, id)?;
        let order = self.side_mut(side).remove(id, key).ok_or(VenueError::UnknownOrder { id })?;
        self.index.remove(&id);
        debug!(id, %side, qty = order.quantity, "Order cancelled");
        Ok(order)
    }

    fn locate(&self, side: Side, id: OrderId) -> VenueResult<PriceKey> {
        match self.index.get(&id) {
            Some((s, key)) if *s == side => Ok(*key),
            _ => Err(VenueError::UnknownOrder { id }),
        }
    }

    pub fn contains(&self, id: OrderId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: OrderId) -> Option<&RestingOrder> {
        let (side, key) = self.index.get(&id)?;
        self.side(*side).levels.get(key)?.queue.iter().find(|o| o.id == id)
    }

    pub fn order_count(&self) -> usize {
        self.index.len()
    }

    /// Aggregated `(price, quantity)` of the best `levels` price levels.
    pub fn depth(&self, side: Side, levels: usize) -> Vec<(Price, Quantity)> {
        self.side(side)
            .levels_best_first()
            .take(levels)
            .map(|level| (level.price, level.quantity()))
            .collect()
    }

    /// Resting orders in matching priority.
    pub fn orders(&self, side: Side) -> Vec<RestingOrder> {
        self.side(side)
            .levels_best_first()
            .flat_map(|level| level.queue.iter().cloned())
            .collect()
    }

    /// Price and orders (arrival order) of the best level.
    pub(crate) fn best_level(&self, side: Side) -> Option<(Price, Vec<(OrderId, Quantity)>)> {
        self.side(side)
            .best_level()
            .map(|level| (level.price, level.queue.iter().map(|o| (o.id, o.quantity)).collect()))
    }

    pub(crate) fn next_arrival(&self) -> u64 {
        self.next_arrival
    }

    /// Puts back an order taken from a snapshot, keeping its id and rank.
    pub(crate) fn restore(&mut self, order: RestingOrder) -> VenueResult<()> {
        let next = match order.arrival.checked_add(1) {
            Some(next) if order.quantity > 0 && order.price.is_finite() && !self.index.contains_key(&order.id) => next,
            _ => return Err(VenueError::Snapshot(format!("bad resting order {} for {}", order.id, self.symbol))),
        };
        self.check_room(order.side, order.quantity)
            .map_err(|e| VenueError::Snapshot(e.to_string()))?;
        self.next_arrival = self.next_arrival.max(next);
        self.index.insert(order.id, (order.side, OrderedFloat(order.price)));
        let side = order.side;
        self.side_mut(side).push(order);
        Ok(())
    }

    pub(crate) fn set_next_arrival(&mut self, next: u64) {
        self.next_arrival = self.next_arrival.max(next);
    }

    /// Panics if the book's structural invariants do not hold.
    pub fn assert_invariants(&self) {
        let mut seen = 0;
        for book_side in [&self.bids, &self.asks] {
            let mut total = 0;
            for (key, level) in &book_side.levels {
                assert!(!level.queue.is_empty(), "{}: empty level {} left on {}", self.symbol, level.price, book_side.side);
                assert_eq!(key.0, level.price, "{}: level keyed at the wrong price", self.symbol);
                let mut last_arrival = None;
                for order in &level.queue {
                    assert!(order.quantity > 0, "{}: order {} rests with zero quantity", self.symbol, order.id);
                    assert_eq!(order.price, level.price, "{}: order {} in the wrong level", self.symbol, order.id);
                    assert_eq!(order.side, book_side.side, "{}: order {} on the wrong side", self.symbol, order.id);
                    assert!(last_arrival < Some(order.arrival), "{}: level {} out of arrival order", self.symbol, level.price);
                    assert!(order.arrival < self.next_arrival, "{}: arrival rank from the future", self.symbol);
                    assert_eq!(self.index.get(&order.id), Some(&(book_side.side, *key)), "{}: index out of sync", self.symbol);
                    assert!(self.registry.contains(order.id), "{}: order {} has no owner", self.symbol, order.id);
                    last_arrival = Some(order.arrival);
                    total += order.quantity;
                    seen += 1;
                }
            }
            assert_eq!(total, book_side.total, "{}: {} total out of sync", self.symbol, book_side.side);
        }
        assert_eq!(seen, self.index.len(), "{}: index holds stale ids", self.symbol);
    }
}

/// Every symbol's book, each behind its own lock. The symbol set is fixed at
/// construction, so different symbols never contend.
#[derive(Debug)]
pub struct OrderBook {
    books: AHashMap<String, Mutex<SymbolBook>>,
    symbols: Vec<String>,
    registry: Arc<IdentityRegistry>,
}

impl OrderBook {
    pub fn new(catalog: &dyn StockCatalog, registry: Arc<IdentityRegistry>) -> Self {
        let symbols = catalog.symbols();
        let books = symbols
            .iter()
            .map(|s| (s.clone(), Mutex::new(SymbolBook::new(s.clone(), Arc::clone(&registry)))))
            .collect();
        info!(symbols = symbols.len(), "Initialized order book");
        Self { books, symbols, registry }
    }

    /// Exclusive access to one symbol's book for the lifetime of the guard.
    pub fn lock(&self, symbol: &str) -> VenueResult<MutexGuard<'_, SymbolBook>> {
        self.books
            .get(symbol)
            .map(|book| book.lock())
            .ok_or_else(|| VenueError::unknown_symbol(symbol))
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn registry(&self) -> &Arc<IdentityRegistry> {
        &self.registry
    }

    pub fn insert(&self, symbol: &str, side: Side, price: Price, quantity: Quantity, owner: Owner) -> VenueResult<Option<OrderId>> {
        self.lock(symbol)?.insert(side, price, quantity, owner)
    }

    pub fn best_bid(&self, symbol: &str) -> VenueResult<Option<Top>> {
        Ok(self.lock(symbol)?.best_bid())
    }

    pub fn best_ask(&self, symbol: &str) -> VenueResult<Option<Top>> {
        Ok(self.lock(symbol)?.best_ask())
    }

    pub fn spread(&self, symbol: &str) -> VenueResult<Option<Price>> {
        Ok(self.lock(symbol)?.spread())
    }

    /// Applies one side of a trade. Only the matching engine should call this.
    pub fn decrement_and_maybe_remove(&self, symbol: &str, side: Side, id: OrderId, quantity: Quantity) -> VenueResult<Quantity> {
        self.lock(symbol)?.decrement_and_maybe_remove(side, id, quantity)
    }

    pub fn modify(&self, symbol: &str, side: Side, id: OrderId, new_price: Option<Price>, new_quantity: Option<Quantity>) -> VenueResult<()> {
        self.lock(symbol)?.modify(side, id, new_price, new_quantity)
    }

    pub fn cancel(&self, symbol: &str, side: Side, id: OrderId) -> VenueResult<RestingOrder> {
        self.lock(symbol)?.cancel(side, id)
    }

    pub fn assert_invariants(&self) {
        for symbol in &self.symbols {
            if let Ok(book) = self.lock(symbol) {
                book.assert_invariants();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrderIdConfig;
    use crate::venue::StaticCatalog;

    fn registry() -> Arc<IdentityRegistry> {
        Arc::new(IdentityRegistry::new(&OrderIdConfig { seed: Some(1), ..OrderIdConfig::default() }))
    }

    fn book() -> SymbolBook {
        SymbolBook::new("A", registry())
    }

    #[test]
    fn test_initialise() {
        let book = book();
        assert_eq!(book.best_bid(), None);
        assert_eq!(book.best_ask(), None);
        assert_eq!(book.spread(), None);
        assert!(!book.is_crossed());
        assert_eq!(book.order_count(), 0);
        book.assert_invariants();
    }

    #[test]
    fn side_total_overflow_is_rejected_before_any_change() {
        let mut book = book();
        let half = u64::MAX / 2 + 1;
        book.insert(Side::Ask, 10.0, half, Owner::trader("X")).unwrap();

        let err = book.insert(Side::Ask, 11.0, half, Owner::trader("Y")).unwrap_err();
        assert!(matches!(err, VenueError::QuantityOverflow { side: Side::Ask, .. }));
        assert_eq!(book.order_count(), 1);
        assert_eq!(book.total_quantity(Side::Ask), half);
        assert_eq!(book.registry().len(), 1);

        // The other side has its own total.
        book.insert(Side::Bid, 9.0, half, Owner::trader("Y")).unwrap();
        book.assert_invariants();
    }

    #[test]
    fn modify_growing_past_the_side_total_is_rejected() {
        let mut book = book();
        let big = book.insert(Side::Bid, 10.0, u64::MAX - 10, Owner::trader("X")).unwrap().unwrap();
        let small = book.insert(Side::Bid, 9.0, 5, Owner::trader("Y")).unwrap().unwrap();

        let err = book.modify(Side::Bid, small, None, Some(20)).unwrap_err();
        assert!(matches!(err, VenueError::QuantityOverflow { .. }));
        assert_eq!(book.get(small).map(|o| o.quantity), Some(5));

        book.modify(Side::Bid, small, None, Some(10)).unwrap();
        book.modify(Side::Bid, big, Some(11.0), Some(1)).unwrap();
        book.assert_invariants();
    }

    #[test]
    fn test_best_bid() {
        let mut book = book();
        book.insert(Side::Bid, 99.0, 10, Owner::trader("X")).unwrap();
        book.insert(Side::Bid, 100.0, 5, Owner::trader("Y")).unwrap();
        let best = book.best_bid().unwrap();
        assert_eq!((best.price, best.quantity), (100.0, 5));
    }

    #[test]
    fn best_ask_is_lowest_price() {
        let mut book = book();
        book.insert(Side::Ask, 101.0, 10, Owner::Unowned).unwrap();
        book.insert(Side::Ask, 100.0, 3, Owner::Unowned).unwrap();
        assert_eq!(book.best_ask().unwrap().price, 100.0);
        assert_eq!(book.spread(), None);
        book.insert(Side::Bid, 98.5, 1, Owner::Unowned).unwrap();
        assert_eq!(book.spread(), Some(1.5));
    }

    #[test]
    fn equal_prices_keep_arrival_order() {
        let mut book = book();
        let first = book.insert(Side::Bid, 10.0, 5, Owner::trader("A")).unwrap().unwrap();
        let second = book.insert(Side::Bid, 10.0, 5, Owner::trader("B")).unwrap().unwrap();
        assert_eq!(book.best_bid().unwrap().id, first);
        book.cancel(Side::Bid, first).unwrap();
        assert_eq!(book.best_bid().unwrap().id, second);
    }

    #[test]
    fn zero_quantity_insert_is_a_no_op() {
        let mut book = book();
        assert_eq!(book.insert(Side::Ask, 10.0, 0, Owner::Unowned).unwrap(), None);
        assert_eq!(book.order_count(), 0);
        assert!(book.registry().is_empty());
    }

    #[test]
    fn non_finite_price_is_rejected() {
        let mut book = book();
        assert!(matches!(
            book.insert(Side::Ask, f64::INFINITY, 1, Owner::Unowned),
            Err(VenueError::InvalidPrice { .. })
        ));
        assert!(book.insert(Side::Bid, f64::NAN, 1, Owner::Unowned).is_err());
        assert_eq!(book.order_count(), 0);
    }

    #[test]
    fn insert_does_not_match() {
        let mut book = book();
        book.insert(Side::Ask, 10.0, 5, Owner::Unowned).unwrap();
        book.insert(Side::Bid, 11.0, 5, Owner::Unowned).unwrap();
        assert!(book.is_crossed());
        assert_eq!(book.order_count(), 2);
    }

    #[test]
    fn decrement_removes_only_at_zero() {
        let mut book = book();
        let id = book.insert(Side::Ask, 10.0, 5, Owner::Unowned).unwrap().unwrap();
        assert_eq!(book.decrement_and_maybe_remove(Side::Ask, id, 3).unwrap(), 2);
        assert_eq!(book.total_quantity(Side::Ask), 2);
        assert_eq!(book.decrement_and_maybe_remove(Side::Ask, id, 2).unwrap(), 0);
        assert!(!book.contains(id));
        assert_eq!(book.best_ask(), None);
        book.assert_invariants();
    }

    #[test]
    fn modify_updates_only_supplied_fields() {
        let mut book = book();
        let id = book.insert(Side::Bid, 10.0, 5, Owner::Unowned).unwrap().unwrap();
        book.modify(Side::Bid, id, None, Some(8)).unwrap();
        assert_eq!(book.get(id).map(|o| (o.price, o.quantity)), Some((10.0, 8)));
        book.modify(Side::Bid, id, Some(9.5), None).unwrap();
        assert_eq!(book.get(id).map(|o| (o.price, o.quantity)), Some((9.5, 8)));
        book.modify(Side::Bid, id, None, None).unwrap();
        assert_eq!(book.get(id).map(|o| (o.price, o.quantity)), Some((9.5, 8)));
        assert_eq!(book.total_quantity(Side::Bid), 8);
        book.assert_invariants();
    }

    #[test]
    fn modified_order_keeps_its_arrival_rank() {
        let mut book = book();
        let early = book.insert(Side::Ask, 11.0, 1, Owner::Unowned).unwrap().unwrap();
        let late = book.insert(Side::Ask, 10.0, 1, Owner::Unowned).unwrap().unwrap();
        book.modify(Side::Ask, early, Some(10.0), None).unwrap();
        let ids: Vec<_> = book.orders(Side::Ask).iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![early, late]);
        book.assert_invariants();
    }

    #[test]
    fn modify_to_zero_quantity_removes() {
        let mut book = book();
        let id = book.insert(Side::Ask, 10.0, 4, Owner::Unowned).unwrap().unwrap();
        book.modify(Side::Ask, id, None, Some(0)).unwrap();
        assert!(!book.contains(id));
        assert_eq!(book.total_quantity(Side::Ask), 0);
    }

    #[test]
    fn cancel_and_modify_reject_unknown_or_wrong_side() {
        let mut book = book();
        let id = book.insert(Side::Bid, 10.0, 4, Owner::Unowned).unwrap().unwrap();
        assert!(matches!(book.cancel(Side::Ask, id), Err(VenueError::UnknownOrder { .. })));
        assert!(matches!(book.modify(Side::Bid, id + 1, Some(1.0), None), Err(VenueError::UnknownOrder { .. })));
        assert!(matches!(book.modify(Side::Bid, id, Some(f64::NAN), None), Err(VenueError::InvalidPrice { .. })));
        assert_eq!(book.get(id).map(|o| o.price), Some(10.0));
        assert_eq!(book.cancel(Side::Bid, id).unwrap().quantity, 4);
        assert!(book.cancel(Side::Bid, id).is_err());
    }

    #[test]
    fn depth_aggregates_levels_best_first() {
        let mut book = book();
        book.insert(Side::Bid, 9.0, 1, Owner::Unowned).unwrap();
        book.insert(Side::Bid, 10.0, 2, Owner::Unowned).unwrap();
        book.insert(Side::Bid, 10.0, 3, Owner::Unowned).unwrap();
        book.insert(Side::Bid, 8.0, 4, Owner::Unowned).unwrap();
        assert_eq!(book.depth(Side::Bid, 2), vec![(10.0, 5), (9.0, 1)]);
        assert_eq!(book.depth(Side::Ask, 5), vec![]);
        assert_eq!(book.total_quantity(Side::Bid), 10);
    }

    #[test]
    fn order_book_decrement_goes_through_the_symbol_lock() {
        let catalog = StaticCatalog::new(["A"]);
        let book = OrderBook::new(&catalog, registry());
        let id = book.insert("A", Side::Ask, 5.0, 3, Owner::Unowned).unwrap().unwrap();
        assert_eq!(book.decrement_and_maybe_remove("A", Side::Ask, id, 1).unwrap(), 2);
        assert_eq!(book.best_ask("A").unwrap().map(|t| t.quantity), Some(2));
        assert!(book.decrement_and_maybe_remove("A", Side::Bid, id, 1).is_err());
    }

    #[test]
    fn order_book_rejects_unknown_symbols() {
        let catalog = StaticCatalog::new(["A"]);
        let book = OrderBook::new(&catalog, registry());
        assert!(book.insert("A", Side::Bid, 1.0, 1, Owner::Unowned).unwrap().is_some());
        assert!(matches!(book.best_bid("B"), Err(VenueError::UnknownSymbol { .. })));
        assert!(matches!(book.insert("B", Side::Bid, 1.0, 1, Owner::Unowned), Err(VenueError::UnknownSymbol { .. })));
        book.assert_invariants();
    }
}
