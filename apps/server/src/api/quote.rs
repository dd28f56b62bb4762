use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{Local, NaiveDateTime};
use quotegate_market_data::{Bar, HistoryRange, Interval, TickerInfo};

use crate::{
    api::shared::fetch_series,
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{info_or_na, Envelope, QuoteSnapshot},
};

/// Get real-time stock market data.
#[utoipa::path(
    get,
    path = "/api/realstock/{symbol}",
    params(("symbol" = String, Path, description = "Ticker symbol")),
    responses(
        (status = 200, description = "Quote snapshot"),
        (status = 400, description = "Provider failure"),
        (status = 404, description = "No price data for the symbol")
    )
)]
pub(crate) async fn get_quote_snapshot(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Envelope<QuoteSnapshot>>> {
    let bars = fetch_series(
        state.provider.as_ref(),
        &symbol,
        HistoryRange::last_day(),
        Interval::OneDay,
    )
    .await?;

    let Some(latest) = bars.last() else {
        return Err(ApiError::NotFound(format!(
            "No data found for symbol: {}",
            symbol
        )));
    };

    let info = state.provider.get_info(&symbol).await?;
    let snapshot = build_quote_snapshot(symbol, latest, &info, Local::now().naive_local());
    Ok(Json(Envelope::success(snapshot)))
}

pub(crate) fn build_quote_snapshot(
    symbol: String,
    latest: &Bar,
    info: &TickerInfo,
    now: NaiveDateTime,
) -> QuoteSnapshot {
    // A previous close of zero cannot anchor a percentage
    let previous_close = info.get_f64("previousClose").filter(|close| *close != 0.0);
    let price_change = previous_close.map(|prev| latest.close - prev);
    let percent_change = previous_close
        .zip(price_change)
        .map(|(prev, change)| round2(change / prev * 100.0));

    QuoteSnapshot {
        symbol,
        company_name: info_or_na(info, "longName"),
        current_price: latest.close,
        open: latest.open,
        high: latest.high,
        low: latest.low,
        volume: latest.volume,
        previous_close: info_or_na(info, "previousClose"),
        market_cap: info_or_na(info, "marketCap"),
        fifty_two_week_high: info_or_na(info, "fiftyTwoWeekHigh"),
        fifty_two_week_low: info_or_na(info, "fiftyTwoWeekLow"),
        market_state: info_or_na(info, "marketState"),
        exchange: info_or_na(info, "exchange"),
        currency: info_or_na(info, "currency"),
        timestamp: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        price_change: price_change.map(round2),
        percent_change,
    }
}

/// Two decimal places, ties to even on the exact binary value.
fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/realstock/{symbol}", get(get_quote_snapshot))
}
