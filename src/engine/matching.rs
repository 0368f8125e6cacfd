use std::sync::Arc;
use std::time::Instant;

use smallvec::SmallVec;
use tracing::{debug, error, info, instrument, warn};

use crate::config::AllocationPolicy;
use crate::engine::book::{OrderBook, SymbolBook};
use crate::engine::types::{Fill, OrderId, Owner, Price, Quantity, Side, Trade};
use crate::error::VenueResult;
use crate::venue::{FillNotifier, TradeSink};

type Allocation = SmallVec<[(OrderId, Quantity); 8]>;

/// Executes trades on crossed books. The only component that shrinks or
/// removes resting orders as the result of a trade.
///
/// Every trade prints at the ask order's price, whichever side arrived last.
pub struct MatchingEngine {
    book: Arc<OrderBook>,
    trade_sink: Arc<dyn TradeSink>,
    notifier: Arc<dyn FillNotifier>,
    policy: AllocationPolicy,
}

impl MatchingEngine {
    pub fn new(
        book: Arc<OrderBook>,
        trade_sink: Arc<dyn TradeSink>,
        notifier: Arc<dyn FillNotifier>,
        policy: AllocationPolicy,
    ) -> Self {
        info!(?policy, "Initialized matching engine");
        Self { book, trade_sink, notifier, policy }
    }

    pub fn policy(&self) -> AllocationPolicy {
        self.policy
    }

    /// Matches one symbol, or sweeps every symbol when `symbol` is `None`.
    #[instrument(level = "debug", skip(self))]
    pub fn check_trades(&self, symbol: Option<&str>) -> VenueResult<Vec<Trade>> {
        match symbol {
            Some(symbol) => {
                let mut book = self.book.lock(symbol)?;
                Ok(self.check_locked(&mut book))
            }
            None => {
                let mut trades = Vec::new();
                for symbol in self.book.symbols() {
                    let mut book = self.book.lock(symbol)?;
                    trades.extend(self.check_locked(&mut book));
                }
                Ok(trades)
            }
        }
    }

    /// Same as `check_trades` for a book the caller already holds.
    pub fn check_locked(&self, book: &mut SymbolBook) -> Vec<Trade> {
        if book.is_crossed() {
            self.execute_trades(book)
        } else {
            Vec::new()
        }
    }

    /// Trades until the book is no longer crossed.
    pub fn execute_trades(&self, book: &mut SymbolBook) -> Vec<Trade> {
        let started = Instant::now();
        let mut trades = Vec::new();

        while book.is_crossed() {
            let before = trades.len();
            match self.policy {
                AllocationPolicy::PriceTime => self.match_front(book, &mut trades),
                AllocationPolicy::ProRata => self.match_level_pro_rata(book, &mut trades),
            }
            if trades.len() == before {
                error!(symbol = book.symbol(), "Crossed book made no progress, stopping sweep");
                debug_assert!(false, "crossed book made no progress");
                break;
            }
        }

        metrics::histogram!("lobx_match_sweep_seconds").record(started.elapsed().as_secs_f64());
        debug!(symbol = book.symbol(), trades = trades.len(), "Sweep finished");
        trades
    }

    /// Best ask against best bid, earliest arrival first at each price.
    fn match_front(&self, book: &mut SymbolBook, trades: &mut Vec<Trade>) {
        let (Some(ask), Some(bid)) = (book.best_ask(), book.best_bid()) else {
            return;
        };
        let quantity = ask.quantity.min(bid.quantity);
        trades.push(self.execute(book, ask.id, bid.id, ask.price, quantity));
    }

    /// Trades the smaller of the two best levels in full, sharing it across
    /// each level in proportion to order size, then pairs the shares in
    /// arrival order.
    fn match_level_pro_rata(&self, book: &mut SymbolBook, trades: &mut Vec<Trade>) {
        let (Some((ask_price, asks)), Some((_, bids))) = (book.best_level(Side::Ask), book.best_level(Side::Bid)) else {
            return;
        };
        let ask_total: Quantity = asks.iter().map(|(_, q)| *q).sum();
        let bid_total: Quantity = bids.iter().map(|(_, q)| *q).sum();
        let target = ask_total.min(bid_total);

        let mut ask_shares = pro_rata(&asks, target).into_iter().filter(|(_, q)| *q > 0);
        let mut bid_shares = pro_rata(&bids, target).into_iter().filter(|(_, q)| *q > 0);
        let mut ask = ask_shares.next();
        let mut bid = bid_shares.next();

        while let (Some((ask_id, ask_left)), Some((bid_id, bid_left))) = (ask, bid) {
            let quantity = ask_left.min(bid_left);
            trades.push(self.execute(book, ask_id, bid_id, ask_price, quantity));
            ask = if ask_left == quantity { ask_shares.next() } else { Some((ask_id, ask_left - quantity)) };
            bid = if bid_left == quantity { bid_shares.next() } else { Some((bid_id, bid_left - quantity)) };
        }
    }

    /// Reports both fills, then takes the quantity off both orders.
    fn execute(&self, book: &mut SymbolBook, ask_id: OrderId, bid_id: OrderId, price: Price, quantity: Quantity) -> Trade {
        let trade = Trade { symbol: book.symbol().to_string(), price, quantity, ask_id, bid_id };
        debug!(symbol = %trade.symbol, ask_id, bid_id, price, qty = quantity, "Trade executed");

        for fill in trade.fills() {
            self.report(book, &fill);
        }
        for (side, id) in [(Side::Ask, ask_id), (Side::Bid, bid_id)] {
            if let Err(e) = book.decrement_and_maybe_remove(side, id, quantity) {
                error!(symbol = %trade.symbol, id, %side, error = %e, "Traded order vanished from book");
            }
        }

        metrics::counter!("lobx_trades_total", "symbol" => trade.symbol.clone()).increment(1);
        metrics::counter!("lobx_traded_quantity_total", "symbol" => trade.symbol.clone()).increment(quantity);
        trade
    }

    fn report(&self, book: &SymbolBook, fill: &Fill) {
        self.trade_sink.record(&fill.symbol, fill.price, fill.quantity);
        match book.registry().owner_of(fill.order_id) {
            Some(Owner::Trader(trader_id)) => {
                self.notifier.on_fill(&trader_id, &fill.symbol, fill.price, fill.quantity, fill.direction);
            }
            Some(Owner::Unowned) => {}
            None => warn!(id = fill.order_id, "Filled order has no owner mapping"),
        }
    }
}

/// Splits `target` across `orders` (arrival order) in proportion to size.
/// Each share is floored; leftover units go one at a time to the earliest
/// orders that still have room. Requires `target <= sum of quantities`.
fn pro_rata(orders: &[(OrderId, Quantity)], target: Quantity) -> Allocation {
    let total: u128 = orders.iter().map(|(_, q)| *q as u128).sum();
    if total == 0 {
        return Allocation::new();
    }
    let mut shares: Allocation = orders
        .iter()
        .map(|&(id, q)| (id, (target as u128 * q as u128 / total) as Quantity))
        .collect();

    let mut left = target - shares.iter().map(|(_, s)| *s).sum::<Quantity>();
    for ((_, share), (_, q)) in shares.iter_mut().zip(orders) {
        if left == 0 {
            break;
        }
        if *share < *q {
            *share += 1;
            left -= 1;
        }
    }
    shares
}
