use std::io::Read;

use ahash::{AHashMap, AHashSet};
use tracing::info;

use crate::config::VenueConfig;
use crate::error::VenueResult;
use crate::venue::StockCatalog;

/// Catalog fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    symbols: Vec<String>,
    index: AHashSet<String>,
    reference_prices: AHashMap<String, f64>,
}

impl StaticCatalog {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = StaticCatalog::default();
        for symbol in symbols {
            catalog.push(symbol.into(), None);
        }
        catalog
    }

    pub fn from_config(cfg: &VenueConfig) -> Self {
        let mut catalog = StaticCatalog::default();
        for instrument in &cfg.instruments {
            catalog.push(instrument.symbol.clone(), instrument.reference_price);
        }
        catalog
    }

    /// Reads a stock list: first row the symbols, optional second row their
    /// starting prices.
    pub fn from_csv_reader<R: Read>(reader: R) -> VenueResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = reader.records();

        let symbols: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(str::to_string).collect(),
            None => Vec::new(),
        };
        let prices: Vec<f64> = match records.next() {
            Some(record) => record?.deserialize(None)?,
            None => Vec::new(),
        };

        let mut catalog = StaticCatalog::default();
        for (i, symbol) in symbols.into_iter().enumerate() {
            catalog.push(symbol, prices.get(i).copied());
        }
        info!(symbols = catalog.symbols.len(), "Loaded stock list");
        Ok(catalog)
    }

    fn push(&mut self, symbol: String, reference_price: Option<f64>) {
        if symbol.is_empty() || !self.index.insert(symbol.clone()) {
            return;
        }
        if let Some(price) = reference_price {
            self.reference_prices.insert(symbol.clone(), price);
        }
        self.symbols.push(symbol);
    }

    pub fn reference_price(&self, symbol: &str) -> Option<f64> {
        self.reference_prices.get(symbol).copied()
    }

    pub fn reference_prices(&self) -> impl Iterator<Item = (&str, f64)> {
        self.reference_prices.iter().map(|(s, p)| (s.as_str(), *p))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl StockCatalog for StaticCatalog {
    fn contains(&self, symbol: &str) -> bool {
        self.index.contains(symbol)
    }

    fn symbols(&self) -> Vec<String> {
        self.symbols.clone()
    }
}
