//! Market data provider trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{Bar, HistoryRange, Interval, TickerInfo};

/// Trait for market data providers.
///
/// Implement this trait to plug in a new market data source. Symbols are
/// passed through exactly as the caller supplied them.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use quotegate_market_data::provider::MarketDataProvider;
///
/// struct MyProvider {
///     api_key: String,
/// }
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     // ... implement get_info and get_history
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and error messages.
    fn id(&self) -> &'static str;

    /// Fetch the ticker's metadata.
    ///
    /// Fields the provider does not know about are simply absent from the
    /// returned [`TickerInfo`].
    async fn get_info(&self, symbol: &str) -> Result<TickerInfo, MarketDataError>;

    /// Fetch a price series.
    ///
    /// Bars are ordered by timestamp ascending. A provider may report "nothing
    /// there" either as an empty vector or as an error for which
    /// [`MarketDataError::is_empty_result`] holds.
    async fn get_history(
        &self,
        symbol: &str,
        range: HistoryRange,
        interval: Interval,
    ) -> Result<Vec<Bar>, MarketDataError>;
}
