//! Wires catalog, registry, book, matching engine and router together once,
//! at construction.

use std::sync::Arc;

use tracing::info;

use crate::config::{FeeSchedule, VenueConfig};
use crate::engine::book::OrderBook;
use crate::engine::matching::MatchingEngine;
use crate::engine::registry::IdentityRegistry;
use crate::engine::router::AdmissionRouter;
use crate::venue::{FillNotifier, StaticCatalog, TradeSink};

pub struct Exchange {
    config: VenueConfig,
    catalog: Arc<StaticCatalog>,
    registry: Arc<IdentityRegistry>,
    book: Arc<OrderBook>,
    engine: Arc<MatchingEngine>,
    router: AdmissionRouter,
}

impl Exchange {
    pub fn new(config: VenueConfig, trade_sink: Arc<dyn TradeSink>, notifier: Arc<dyn FillNotifier>) -> Self {
        let catalog = Arc::new(StaticCatalog::from_config(&config));
        Self::with_catalog(config, catalog, trade_sink, notifier)
    }

    /// Uses `catalog` instead of the config's instrument list.
    pub fn with_catalog(
        config: VenueConfig,
        catalog: Arc<StaticCatalog>,
        trade_sink: Arc<dyn TradeSink>,
        notifier: Arc<dyn FillNotifier>,
    ) -> Self {
        let registry = Arc::new(IdentityRegistry::new(&config.order_ids));
        let book = Arc::new(OrderBook::new(catalog.as_ref(), Arc::clone(&registry)));
        let engine = Arc::new(MatchingEngine::new(Arc::clone(&book), trade_sink, notifier, config.allocation_policy));
        let router = AdmissionRouter::new(catalog.clone(), Arc::clone(&book), Arc::clone(&engine));
        info!(symbols = catalog.len(), policy = ?config.allocation_policy, "Exchange ready");
        Self { config, catalog, registry, book, engine, router }
    }

    pub fn router(&self) -> &AdmissionRouter {
        &self.router
    }

    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &StaticCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &VenueConfig {
        &self.config
    }

    /// Fee constants. Not charged by the core.
    pub fn fees(&self) -> &FeeSchedule {
        &self.config.fees
    }
}
