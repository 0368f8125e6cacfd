//! Single-venue exchange core: per-symbol order books, an admission router
//! that slices limit and market orders into book inserts, and a matching
//! engine that executes crossed books under price-time priority.
//!
//! ```rust
//! use std::sync::Arc;
//! use lobx_exchange::{Exchange, Owner, Side, VenueConfig};
//! use lobx_exchange::venue::{FillInbox, TradeTape};
//!
//! let mut config = VenueConfig::with_symbols(["A"]);
//! config.order_ids.seed = Some(1);
//! let inbox = Arc::new(FillInbox::new());
//! let exchange = Exchange::new(config, Arc::new(TradeTape::new()), inbox.clone());
//!
//! let router = exchange.router();
//! router.submit_limit("A", 101.0, 50, Side::Ask, Owner::trader("X")).unwrap();
//! let result = router.submit_market("A", 20, Side::Bid, Owner::trader("Z")).unwrap();
//!
//! assert_eq!(result.traded_quantity(), 20);
//! assert_eq!(inbox.net_quantity("Z", "A"), 20);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod exchange;
pub mod persist;
pub mod telemetry;
pub mod venue;

pub use config::{AllocationPolicy, VenueConfig};
pub use engine::types::{Direction, OrderId, Owner, Price, Quantity, Side, SubmitResult, Top, Trade};
pub use error::{VenueError, VenueResult};
pub use exchange::Exchange;
