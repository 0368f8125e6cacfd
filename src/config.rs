//! Venue configuration.
//!
//! Loaded through the `config` crate: serde defaults, then an optional TOML
//! file, then `LOBX__*` environment variables (`LOBX__ALLOCATION_POLICY=pro_rata`).

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::VenueResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueConfig {
    pub instruments: Vec<InstrumentConfig>,
    pub allocation_policy: AllocationPolicy,
    pub order_ids: OrderIdConfig,
    pub fees: FeeSchedule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    pub symbol: String,
    /// Last price assumed before the first trade (the simulation's starting price).
    #[serde(default)]
    pub reference_price: Option<f64>,
}

/// How quantity is shared among orders resting at the same price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationPolicy {
    /// Better price first, then earlier arrival.
    #[default]
    #[serde(alias = "price-time", alias = "fifo")]
    PriceTime,
    /// Better price first, then in proportion to order size.
    #[serde(alias = "pro-rata", alias = "pro rata", alias = "prorata")]
    ProRata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderIdConfig {
    /// Ids are drawn from `[0, space)`. Eight decimal digits by default.
    pub space: u64,
    /// Collisions tolerated before allocation fails.
    pub max_retries: u32,
    /// Fixed seed for reproducible ids; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for OrderIdConfig {
    fn default() -> Self {
        Self { space: 100_000_000, max_retries: 64, seed: None }
    }
}

/// Fee constants. Loaded and exposed, never charged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    pub taker: f64,
    pub maker: f64,
    pub retail_limit: f64,
    pub retail_market: f64,
    pub retail_cancel_limit: f64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            taker: 0.0008,
            maker: 0.0005,
            retail_limit: 3.0,
            retail_market: 2.0,
            retail_cancel_limit: 0.0,
        }
    }
}

impl VenueConfig {
    /// Loads `.env` if present, then the optional TOML file, then `LOBX__*`
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> VenueResult<Self> {
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!(path = %path.display(), "Reading venue config file");
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        let cfg: VenueConfig = builder
            .add_source(Environment::with_prefix("LOBX").separator("__"))
            .build()?
            .try_deserialize()?;

        info!(
            instruments = cfg.instruments.len(),
            policy = ?cfg.allocation_policy,
            "Loaded venue config"
        );
        Ok(cfg)
    }

    /// Parses a TOML document without consulting files or the environment.
    pub fn from_toml_str(toml: &str) -> VenueResult<Self> {
        let cfg = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(cfg)
    }

    pub fn with_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            instruments: symbols
                .into_iter()
                .map(|s| InstrumentConfig { symbol: s.into(), reference_price: None })
                .collect(),
            ..Self::default()
        }
    }

    pub fn symbols(&self) -> Vec<String> {
        self.instruments.iter().map(|i| i.symbol.clone()).collect()
    }
}
