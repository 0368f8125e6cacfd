use serde::{Deserialize, Serialize};

use crate::engine::types::{OrderId, Owner, Price, Quantity};
use crate::error::{VenueError, VenueResult};

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub version: u32,
    pub symbols: Vec<SymbolSnapshot>,
    pub owners: Vec<OwnerEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSnapshot {
    pub symbol: String,
    pub next_arrival: u64,
    /// Best level first.
    pub bid_side: Vec<SnapshotLevel>,
    pub ask_side: Vec<SnapshotLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotLevel {
    pub price: Price,
    /// Arrival order.
    pub orders: Vec<SnapshotResting>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotResting {
    pub id: OrderId,
    pub quantity: Quantity,
    pub arrival: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerEntry {
    pub order_id: OrderId,
    pub owner: Owner,
}

impl BookSnapshot {
    pub fn to_json(&self) -> VenueResult<String> {
        serde_json::to_string(self).map_err(|e| VenueError::Snapshot(e.to_string()))
    }

    pub fn from_json(s: &str) -> VenueResult<Self> {
        serde_json::from_str(s).map_err(|e| VenueError::Snapshot(e.to_string()))
    }

    pub fn order_count(&self) -> usize {
        self.symbols
            .iter()
            .flat_map(|s| s.bid_side.iter().chain(&s.ask_side))
            .map(|l| l.orders.len())
            .sum()
    }
}
