//! Yahoo Finance API response models.
//!
//! The quoteSummary endpoint groups ticker metadata into modules
//! (`price`, `summaryDetail`, `assetProfile`, ...). Numeric fields arrive
//! wrapped as `{"raw": 123.45, "fmt": "123.45"}`, or as `{}` when Yahoo has no
//! value. [`flatten_modules`] folds the modules into a single [`TickerInfo`].

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::TickerInfo;

/// Modules requested from quoteSummary, in precedence order when two modules
/// carry the same key.
pub const INFO_MODULES: [&str; 6] = [
    "price",
    "summaryDetail",
    "assetProfile",
    "summaryProfile",
    "quoteType",
    "defaultKeyStatistics",
];

/// Main response wrapper for quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResponse {
    pub quote_summary: YahooQuoteSummary,
}

/// Quote summary container
#[derive(Debug, Deserialize)]
pub struct YahooQuoteSummary {
    #[serde(default)]
    pub result: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    pub error: Option<YahooApiError>,
}

/// Error object Yahoo embeds in the body, e.g. for unknown symbols
#[derive(Debug, Deserialize)]
pub struct YahooApiError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

impl YahooApiError {
    pub fn is_not_found(&self) -> bool {
        self.code.eq_ignore_ascii_case("Not Found")
    }
}

/// Fold quoteSummary modules into one flat key/value map.
pub fn flatten_modules(modules: &Map<String, Value>) -> TickerInfo {
    let mut info = TickerInfo::new();
    for name in INFO_MODULES {
        let Some(Value::Object(fields)) = modules.get(name) else {
            continue;
        };
        for (key, value) in fields {
            if key == "maxAge" {
                continue;
            }
            if let Some(value) = unwrap_value(value) {
                info.insert_if_absent(key.clone(), value);
            }
        }
    }
    info
}

/// Collapse `{raw, fmt}` wrappers to the raw value and drop empty objects
/// and nulls, recursively.
fn unwrap_value(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) if map.contains_key("raw") => {
            map.get("raw").filter(|raw| !raw.is_null()).cloned()
        }
        Value::Object(map) if map.is_empty() => None,
        Value::Object(map) => Some(Value::Object(
            map.iter()
                .filter(|(key, _)| key.as_str() != "maxAge")
                .filter_map(|(key, value)| unwrap_value(value).map(|v| (key.clone(), v)))
                .collect(),
        )),
        Value::Array(items) => Some(Value::Array(
            items.iter().filter_map(unwrap_value).collect(),
        )),
        other => Some(other.clone()),
    }
}
