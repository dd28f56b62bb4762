use std::sync::Arc;

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use chrono::{Duration, Local, NaiveDate};
use quotegate_market_data::{Bar, HistoryRange, Interval};
use serde_json::Value;

use crate::{
    api::shared::fetch_series,
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{Envelope, HistoricalData, HistoryPoint, HistoryRequestBody},
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// Get historical market data for a date range.
#[utoipa::path(
    post,
    path = "/api/historical_data",
    responses(
        (status = 200, description = "Price history"),
        (status = 400, description = "Invalid request or provider failure"),
        (status = 404, description = "No rows in the requested range")
    )
)]
pub(crate) async fn get_historical_data(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<Envelope<HistoricalData>>> {
    let request = parse_body(&body)?;
    let params = HistoryParams::resolve(request, Local::now().date_naive())?;

    let mut bars = fetch_series(
        state.provider.as_ref(),
        &params.symbol,
        params.provider_range(),
        params.interval,
    )
    .await?;
    bars.retain(|bar| params.covers(bar));

    if bars.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No historical data found for symbol: {} in the specified date range",
            params.symbol
        )));
    }

    Ok(Json(Envelope::success(HistoricalData {
        symbol: params.symbol,
        start_date: params.start_date.format(DATE_FORMAT).to_string(),
        end_date: params.end_date.format(DATE_FORMAT).to_string(),
        interval: params.interval,
        history: bars.iter().map(history_point).collect(),
    })))
}

/// A fully-resolved history request.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HistoryParams {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub interval: Interval,
}

impl HistoryParams {
    /// Apply defaults relative to `today` and validate the request.
    pub fn resolve(body: HistoryRequestBody, today: NaiveDate) -> ApiResult<Self> {
        let symbol = non_empty(body.symbol)
            .ok_or_else(|| ApiError::InvalidInput("Symbol is required".to_string()))?;

        let start_date = match non_empty(body.start_date) {
            Some(raw) => parse_date("start_date", &raw)?,
            None => today - Duration::days(DEFAULT_LOOKBACK_DAYS),
        };
        let end_date = match non_empty(body.end_date) {
            Some(raw) => parse_date("end_date", &raw)?,
            None => today,
        };
        // Anything that is not a known interval string, including non-strings, means daily
        let interval = body
            .interval
            .as_ref()
            .and_then(Value::as_str)
            .map(Interval::parse_or_default)
            .unwrap_or_default();

        Ok(Self {
            symbol,
            start_date,
            end_date,
            interval,
        })
    }

    /// Provider window, one day wider on each side so that bars stamped on a
    /// neighbouring UTC day still come back.
    pub fn provider_range(&self) -> HistoryRange {
        HistoryRange::between_dates(
            self.start_date - Duration::days(1),
            self.end_date + Duration::days(1),
        )
    }

    /// Whether the bar's exchange date lies in `[start_date, end_date)`.
    pub fn covers(&self, bar: &Bar) -> bool {
        (self.start_date..self.end_date).contains(&bar.local_date())
    }
}

fn parse_body(body: &[u8]) -> ApiResult<HistoryRequestBody> {
    let no_data = || ApiError::InvalidInput("No data provided".to_string());

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(no_data());
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::InvalidInput(format!("Invalid JSON body: {}", e)))?;
    if value.is_null() {
        return Err(no_data());
    }
    serde_json::from_value(value)
        .map_err(|e| ApiError::InvalidInput(format!("Invalid request body: {}", e)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_date(field: &str, raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
        ApiError::InvalidInput(format!(
            "Invalid {}: '{}' (expected YYYY-MM-DD)",
            field, raw
        ))
    })
}

fn history_point(bar: &Bar) -> HistoryPoint {
    HistoryPoint {
        date: bar.local_date().format(DATE_FORMAT).to_string(),
        open: bar.open,
        high: bar.high,
        low: bar.low,
        close: bar.close,
        volume: bar.volume,
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/historical_data", post(get_historical_data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn body(symbol: Option<&str>) -> HistoryRequestBody {
        HistoryRequestBody {
            symbol: symbol.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let params = HistoryParams::resolve(body(Some("AAPL")), date(2024, 6, 30)).unwrap();
        assert_eq!(params.symbol, "AAPL");
        assert_eq!(params.start_date, date(2023, 7, 1));
        assert_eq!(params.end_date, date(2024, 6, 30));
        assert_eq!(params.interval, Interval::OneDay);
    }

    #[test]
    fn test_explicit_values() {
        let request = HistoryRequestBody {
            symbol: Some("MSFT".into()),
            start_date: Some("2024-01-02".into()),
            end_date: Some("2024-02-01".into()),
            interval: Some(json!("1wk")),
        };
        let params = HistoryParams::resolve(request, date(2024, 6, 30)).unwrap();
        assert_eq!(params.start_date, date(2024, 1, 2));
        assert_eq!(params.end_date, date(2024, 2, 1));
        assert_eq!(params.interval, Interval::OneWeek);
    }

    #[test]
    fn test_unknown_interval_falls_back_to_daily() {
        let request = HistoryRequestBody {
            interval: Some(json!("bogus")),
            ..body(Some("AAPL"))
        };
        let params = HistoryParams::resolve(request, date(2024, 6, 30)).unwrap();
        assert_eq!(params.interval, Interval::OneDay);
    }

    #[test]
    fn test_non_string_interval_falls_back_to_daily() {
        for interval in [json!(5), json!(null), json!(["1wk"]), json!({"value": "1wk"})] {
            let request = HistoryRequestBody {
                interval: Some(interval),
                ..body(Some("AAPL"))
            };
            let params = HistoryParams::resolve(request, date(2024, 6, 30)).unwrap();
            assert_eq!(params.interval, Interval::OneDay);
        }
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let request = HistoryRequestBody {
            start_date: Some("".into()),
            end_date: Some("".into()),
            ..body(Some("AAPL"))
        };
        let params = HistoryParams::resolve(request, date(2024, 6, 30)).unwrap();
        assert_eq!(params.start_date, date(2023, 7, 1));
        assert_eq!(params.end_date, date(2024, 6, 30));

        let err = HistoryParams::resolve(body(Some("")), date(2024, 6, 30)).unwrap_err();
        assert_eq!(err.to_string(), "Symbol is required");
    }

    #[test]
    fn test_whitespace_is_not_trimmed() {
        let params = HistoryParams::resolve(body(Some(" ")), date(2024, 6, 30)).unwrap();
        assert_eq!(params.symbol, " ");

        let request = HistoryRequestBody {
            end_date: Some(" ".into()),
            ..body(Some("AAPL"))
        };
        let err = HistoryParams::resolve(request, date(2024, 6, 30)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid end_date: ' ' (expected YYYY-MM-DD)"
        );
    }

    #[test]
    fn test_provider_range_is_padded() {
        let params = HistoryParams {
            symbol: "BHP.AX".into(),
            start_date: date(2024, 3, 4),
            end_date: date(2024, 3, 6),
            interval: Interval::OneDay,
        };
        assert_eq!(
            params.provider_range(),
            HistoryRange::between_dates(date(2024, 3, 3), date(2024, 3, 7))
        );
    }

    #[test]
    fn test_covers_uses_exchange_date() {
        let params = HistoryParams {
            symbol: "BHP.AX".into(),
            start_date: date(2024, 3, 4),
            end_date: date(2024, 3, 6),
            interval: Interval::OneDay,
        };
        // Sydney session opens stamp the previous UTC day
        let at = |d: u32| {
            Bar::new(Utc.with_ymd_and_hms(2024, 3, d, 23, 0, 0).unwrap(), 1.0, 1.0, 1.0, 1.0, 1)
                .with_utc_offset(11 * 3600)
        };
        assert!(!params.covers(&at(2)));
        assert!(params.covers(&at(3)));
        assert!(params.covers(&at(4)));
        assert!(!params.covers(&at(5)));
    }

    #[test]
    fn test_missing_symbol() {
        let err = HistoryParams::resolve(body(None), date(2024, 6, 30)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert_eq!(err.to_string(), "Symbol is required");
    }

    #[test]
    fn test_bad_date() {
        let request = HistoryRequestBody {
            start_date: Some("01/02/2024".into()),
            ..body(Some("AAPL"))
        };
        let err = HistoryParams::resolve(request, date(2024, 6, 30)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid start_date: '01/02/2024' (expected YYYY-MM-DD)"
        );
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(b"").unwrap_err().to_string(), "No data provided");
        assert_eq!(parse_body(b"  \n").unwrap_err().to_string(), "No data provided");
        assert_eq!(parse_body(b"null").unwrap_err().to_string(), "No data provided");
        assert!(parse_body(b"{not json").is_err());
        assert!(parse_body(b"[1, 2]").is_err());

        let parsed = parse_body(br#"{"symbol": "AAPL", "interval": 5}"#).unwrap();
        assert_eq!(parsed.symbol.as_deref(), Some("AAPL"));
        assert_eq!(parsed.interval, Some(json!(5)));
    }

    #[test]
    fn test_history_point_uses_exchange_date() {
        let bar = Bar::new(
            Utc.with_ymd_and_hms(2024, 3, 4, 21, 0, 0).unwrap(),
            1.5,
            1.75,
            1.25,
            1.6,
            42,
        )
        .with_utc_offset(13 * 3600);

        assert_eq!(
            history_point(&bar),
            HistoryPoint {
                date: "2024-03-05".into(),
                open: 1.5,
                high: 1.75,
                low: 1.25,
                close: 1.6,
                volume: 42,
            }
        );
    }
}
