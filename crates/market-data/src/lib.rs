//! Quotegate Market Data Crate
//!
//! Provider-agnostic access to ticker metadata and price history, with a
//! Yahoo Finance implementation.
//!
//! # Core Types
//!
//! - [`MarketDataProvider`] - The provider seam (info query + history query)
//! - [`TickerInfo`] - Loosely-typed ticker metadata
//! - [`Bar`] - One OHLCV row of a price series
//! - [`Interval`] - Bar sampling granularity
//! - [`HistoryRange`] - Lookback period or explicit date window
//! - [`MarketDataError`] - Error taxonomy shared by all providers

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{Bar, HistoryRange, Interval, TickerInfo};
pub use provider::yahoo::YahooProvider;
pub use provider::MarketDataProvider;
