use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

pub type OrderId = u64;
pub type Quantity = u64;
pub type Price = f64;

/// Price as stored in the book. Keys are totally ordered; NaN never gets in.
pub(crate) type PriceKey = OrderedFloat<f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// Direction reported on a fill: bids buy, asks sell.
    pub fn direction(self) -> Direction {
        match self {
            Side::Bid => Direction::Buy,
            Side::Ask => Direction::Sell,
        }
    }

    /// True when an order on this side at `limit` would trade against a
    /// resting opposite order priced at `opposite`.
    pub fn is_marketable(self, limit: Price, opposite: Price) -> bool {
        match self {
            Side::Bid => opposite <= limit,
            Side::Ask => opposite >= limit,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "bid"),
            Side::Ask => write!(f, "ask"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "buy"),
            Direction::Sell => write!(f, "sell"),
        }
    }
}

/// Who placed an order. Synthetic/anonymous flow is `Unowned` and never
/// receives fill notifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    Trader(String),
    Unowned,
}

impl Owner {
    pub fn trader(id: impl Into<String>) -> Self {
        Owner::Trader(id.into())
    }

    pub fn trader_id(&self) -> Option<&str> {
        match self {
            Owner::Trader(id) => Some(id),
            Owner::Unowned => None,
        }
    }
}

impl From<&str> for Owner {
    fn from(id: &str) -> Self {
        Owner::Trader(id.to_string())
    }
}

impl From<String> for Owner {
    fn from(id: String) -> Self {
        Owner::Trader(id)
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Trader(id) => write!(f, "{id}"),
            Owner::Unowned => write!(f, "<unowned>"),
        }
    }
}

// Resting order in the book (mutable quantity)
#[derive(Debug, Clone, PartialEq)]
pub struct RestingOrder {
    pub id: OrderId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    /// Insertion sequence within the symbol; earlier arrival wins ties.
    pub arrival: u64,
}

// Execution between the best ask and the best bid of one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: String,
    pub price: Price,
    pub quantity: Quantity,
    pub ask_id: OrderId,
    pub bid_id: OrderId,
}

impl Trade {
    /// The two fill events a trade produces, ask side first.
    pub fn fills(&self) -> [Fill; 2] {
        [
            Fill {
                order_id: self.ask_id,
                symbol: self.symbol.clone(),
                price: self.price,
                quantity: self.quantity,
                direction: Direction::Sell,
            },
            Fill {
                order_id: self.bid_id,
                symbol: self.symbol.clone(),
                price: self.price,
                quantity: self.quantity,
                direction: Direction::Buy,
            },
        ]
    }
}

// One side of a trade as reported to sinks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub order_id: OrderId,
    pub symbol: String,
    pub price: Price,
    pub quantity: Quantity,
    pub direction: Direction,
}

/// Top of one side: best price, the quantity of the order at the front, and
/// its id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Top {
    pub id: OrderId,
    pub price: Price,
    pub quantity: Quantity,
}

impl From<&RestingOrder> for Top {
    fn from(o: &RestingOrder) -> Self {
        Top { id: o.id, price: o.price, quantity: o.quantity }
    }
}

/// Outcome of an admission call.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SubmitResult {
    /// Trades executed while admitting the order, in execution order.
    pub trades: Vec<Trade>,
    /// Id of the remainder left resting in the book, if any.
    pub rested: Option<OrderId>,
}

impl SubmitResult {
    pub fn traded_quantity(&self) -> Quantity {
        self.trades.iter().map(|t| t.quantity).sum()
    }

    pub(crate) fn absorb(&mut self, other: SubmitResult) {
        self.trades.extend(other.trades);
        if other.rested.is_some() {
            self.rested = other.rested;
        }
    }
}
