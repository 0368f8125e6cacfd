//! Serializable image of the whole venue: every symbol's resting orders plus
//! the order owner table. Conversion only; storing it is up to the caller.

pub mod snapshot;
pub mod types;

pub use types::*;
