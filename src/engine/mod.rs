pub mod book;
pub mod matching;
pub mod registry;
pub mod router;
pub mod types;
