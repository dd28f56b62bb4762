//! Market data provider abstraction and implementations.
//!
//! - The `MarketDataProvider` trait that all providers implement
//! - `yahoo` - Yahoo Finance implementation

mod traits;

pub mod yahoo;

pub use traits::MarketDataProvider;
