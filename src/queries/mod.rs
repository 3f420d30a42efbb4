//! Query interfaces over a price source.

pub mod prices;

pub use prices::{FetchOutcome, PriceQuery};
