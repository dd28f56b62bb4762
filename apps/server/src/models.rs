use serde::{Deserialize, Serialize};
use serde_json::Value;

use quotegate_market_data::{Interval, TickerInfo};

/// Placeholder for any field the provider did not supply.
pub const NOT_AVAILABLE: &str = "N/A";

/// Value of an info key, or the `"N/A"` sentinel.
pub fn info_or_na(info: &TickerInfo, key: &str) -> Value {
    or_na(info.get(key))
}

pub fn or_na(value: Option<&Value>) -> Value {
    value
        .cloned()
        .unwrap_or_else(|| Value::String(NOT_AVAILABLE.to_string()))
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Officer {
    pub name: Value,
    pub title: Value,
    pub year_born: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyProfile {
    pub symbol: String,
    pub name: Value,
    pub industry: Value,
    pub sector: Value,
    pub business_summary: Value,
    pub website: Value,
    pub market_cap: Value,
    pub employees: Value,
    pub country: Value,
    pub city: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub officers: Option<Vec<Officer>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteSnapshot {
    pub symbol: String,
    pub company_name: Value,
    pub current_price: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub volume: u64,
    pub previous_close: Value,
    pub market_cap: Value,
    pub fifty_two_week_high: Value,
    pub fifty_two_week_low: Value,
    pub market_state: Value,
    pub exchange: Value,
    pub currency: Value,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_change: Option<f64>,
}

/// Body of `POST /api/historical_data`. Every field is optional on the wire.
///
/// `interval` stays untyped so an unusable value falls back to daily instead
/// of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryRequestBody {
    pub symbol: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub interval: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalData {
    pub symbol: String,
    pub start_date: String,
    pub end_date: String,
    pub interval: Interval,
    pub history: Vec<HistoryPoint>,
}
