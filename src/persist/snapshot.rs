//! Conversions between the live `OrderBook` and `BookSnapshot`.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::engine::book::{OrderBook, SymbolBook};
use crate::engine::types::{OrderId, Quantity, RestingOrder, Side};
use crate::error::{VenueError, VenueResult};
use crate::persist::types::{
    BookSnapshot, OwnerEntry, SnapshotLevel, SnapshotResting, SymbolSnapshot, SNAPSHOT_SCHEMA_VERSION,
};

/// Captures every symbol's book, one symbol lock at a time, and the owner
/// table.
pub fn from_book(book: &OrderBook) -> VenueResult<BookSnapshot> {
    let mut symbols = Vec::with_capacity(book.symbols().len());
    for symbol in book.symbols() {
        let guard = book.lock(symbol)?;
        symbols.push(SymbolSnapshot {
            symbol: symbol.clone(),
            next_arrival: guard.next_arrival(),
            bid_side: levels(&guard, Side::Bid),
            ask_side: levels(&guard, Side::Ask),
        });
    }
    let owners = book
        .registry()
        .entries()
        .into_iter()
        .map(|(order_id, owner)| OwnerEntry { order_id, owner })
        .collect();

    Ok(BookSnapshot { version: SNAPSHOT_SCHEMA_VERSION, symbols, owners })
}

fn levels(book: &SymbolBook, side: Side) -> Vec<SnapshotLevel> {
    let mut levels: Vec<SnapshotLevel> = Vec::new();
    for order in book.orders(side) {
        let resting = SnapshotResting { id: order.id, quantity: order.quantity, arrival: order.arrival };
        match levels.last_mut() {
            Some(level) if level.price == order.price => level.orders.push(resting),
            _ => levels.push(SnapshotLevel { price: order.price, orders: vec![resting] }),
        }
    }
    levels
}

/// Loads a snapshot into a freshly built, empty `OrderBook`. The snapshot is
/// checked in full before anything is written.
pub fn apply_to_book(book: &OrderBook, snap: &BookSnapshot) -> VenueResult<()> {
    validate(book, snap)?;

    for entry in &snap.owners {
        if !book.registry().restore(entry.order_id, entry.owner.clone()) {
            return Err(VenueError::Snapshot(format!("order id {} already owned", entry.order_id)));
        }
    }
    for symbol in &snap.symbols {
        let mut guard = book.lock(&symbol.symbol)?;
        for (side, side_levels) in [(Side::Bid, &symbol.bid_side), (Side::Ask, &symbol.ask_side)] {
            for level in side_levels {
                for o in &level.orders {
                    guard.restore(RestingOrder {
                        id: o.id,
                        side,
                        price: level.price,
                        quantity: o.quantity,
                        arrival: o.arrival,
                    })?;
                }
            }
        }
        guard.set_next_arrival(symbol.next_arrival);
    }

    info!(symbols = snap.symbols.len(), orders = snap.order_count(), "Applied snapshot to book");
    Ok(())
}

fn validate(book: &OrderBook, snap: &BookSnapshot) -> VenueResult<()> {
    if snap.version != SNAPSHOT_SCHEMA_VERSION {
        warn!(version = snap.version, expected = SNAPSHOT_SCHEMA_VERSION, "Snapshot schema mismatch");
        return Err(VenueError::Snapshot(format!("unsupported schema version {}", snap.version)));
    }

    let owned: HashSet<_> = snap.owners.iter().map(|e| e.order_id).collect();
    if owned.len() != snap.owners.len() {
        return Err(VenueError::Snapshot("duplicate owner entries".to_string()));
    }
    if let Some(taken) = snap.owners.iter().find(|e| book.registry().contains(e.order_id)) {
        return Err(VenueError::Snapshot(format!("order id {} already owned", taken.order_id)));
    }

    let mut resting = HashSet::new();
    let mut symbols = HashSet::new();
    for symbol in &snap.symbols {
        if !symbols.insert(symbol.symbol.as_str()) {
            return Err(VenueError::Snapshot(format!("{} listed twice", symbol.symbol)));
        }
        let guard = book.lock(&symbol.symbol)?;
        if guard.order_count() > 0 {
            return Err(VenueError::Snapshot(format!("book for {} is not empty", symbol.symbol)));
        }
        validate_side(&symbol.symbol, Side::Bid, &symbol.bid_side, &owned, &mut resting)?;
        validate_side(&symbol.symbol, Side::Ask, &symbol.ask_side, &owned, &mut resting)?;
        if let (Some(bid), Some(ask)) = (symbol.bid_side.first(), symbol.ask_side.first()) {
            if bid.price >= ask.price {
                return Err(VenueError::Snapshot(format!("{} is crossed", symbol.symbol)));
            }
        }
    }
    Ok(())
}

/// Levels strictly best-first, arrivals strictly increasing inside a level,
/// and a side total that fits in a `Quantity`.
fn validate_side(
    symbol: &str,
    side: Side,
    levels: &[SnapshotLevel],
    owned: &HashSet<OrderId>,
    resting: &mut HashSet<OrderId>,
) -> VenueResult<()> {
    let mut total: Quantity = 0;
    let mut last_price: Option<f64> = None;
    for level in levels {
        if !level.price.is_finite() {
            return Err(VenueError::Snapshot(format!("non-finite price in {symbol}")));
        }
        let ordered = match (side, last_price) {
            (_, None) => true,
            (Side::Bid, Some(last)) => level.price < last,
            (Side::Ask, Some(last)) => level.price > last,
        };
        if !ordered || level.orders.is_empty() {
            return Err(VenueError::Snapshot(format!("{side} level {} of {symbol} out of place", level.price)));
        }
        last_price = Some(level.price);

        let mut last_arrival = None;
        for o in &level.orders {
            let fresh = last_arrival < Some(o.arrival) && o.arrival < u64::MAX;
            if o.quantity == 0 || !fresh || !resting.insert(o.id) || !owned.contains(&o.id) {
                return Err(VenueError::Snapshot(format!("bad resting order {} in {symbol}", o.id)));
            }
            last_arrival = Some(o.arrival);
            total = total
                .checked_add(o.quantity)
                .ok_or_else(|| VenueError::Snapshot(format!("{side} total of {symbol} overflows")))?;
        }
    }
    Ok(())
}
