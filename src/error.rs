//! Venue error types

use thiserror::Error;

use crate::engine::types::{OrderId, Price, Side};

/// Errors surfaced to callers of the venue. Every one of them is detected
/// before the book is touched.
#[derive(Error, Debug)]
pub enum VenueError {
    #[error("unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("unknown order: {id}")]
    UnknownOrder { id: OrderId },

    #[error("invalid price: {price}")]
    InvalidPrice { price: Price },

    /// Resting the order would push the side's total past `u64::MAX`.
    #[error("quantity overflow on {side} side of {symbol}")]
    QuantityOverflow { symbol: String, side: Side },

    /// Order id allocation kept colliding. Fatal for the venue.
    #[error("order id space exhausted after {attempts} attempts")]
    IdSpaceExhausted { attempts: u32 },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("stock list error: {0}")]
    Catalog(#[from] csv::Error),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("telemetry error: {0}")]
    Telemetry(String),
}

pub type VenueResult<T> = Result<T, VenueError>;

impl VenueError {
    pub(crate) fn unknown_symbol(symbol: &str) -> Self {
        VenueError::UnknownSymbol { symbol: symbol.to_string() }
    }
}
