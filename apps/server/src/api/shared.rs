use quotegate_market_data::{Bar, HistoryRange, Interval, MarketDataProvider};

use crate::error::ApiResult;

/// Fetch a price series, folding the provider's "nothing there" errors into an
/// empty series so callers decide how to report it.
pub(crate) async fn fetch_series(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    range: HistoryRange,
    interval: Interval,
) -> ApiResult<Vec<Bar>> {
    match provider.get_history(symbol, range, interval).await {
        Ok(bars) => Ok(bars),
        Err(e) if e.is_empty_result() => {
            tracing::debug!("{} returned no rows for {}: {}", provider.id(), symbol, e);
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}
