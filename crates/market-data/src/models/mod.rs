//! Market data models
//!
//! - `info` - Loosely-typed ticker metadata (TickerInfo)
//! - `bar` - One OHLCV row of a price series (Bar)
//! - `interval` - Bar sampling granularity (Interval)
//! - `range` - Span of a history request (HistoryRange)

mod bar;
mod info;
mod interval;
mod range;

pub use bar::Bar;
pub use info::TickerInfo;
pub use interval::Interval;
pub use range::HistoryRange;
