//! Yahoo Finance market data provider.
//!
//! Two Yahoo surfaces are used:
//! - the chart API, through the `yahoo_finance_api` connector, for price series
//! - the quoteSummary API, with cookie/crumb authentication, for ticker metadata

mod models;

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use reqwest::{header, StatusCode};
use time::OffsetDateTime;
use tracing::{debug, warn};
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{Bar, HistoryRange, Interval, TickerInfo};
use crate::provider::MarketDataProvider;

use models::{flatten_modules, YahooQuoteSummaryResponse, INFO_MODULES};

const PROVIDER_ID: &str = "YAHOO";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Global cache for Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    client: reqwest::Client,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, MarketDataError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| provider_error(format!(
            "Failed to initialize Yahoo connector: {}",
            e
        )))?;
        Ok(Self {
            connector,
            client: reqwest::Client::new(),
        })
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        if let Some(crumb) = YAHOO_CRUMB.read().ok().and_then(|guard| guard.clone()) {
            return Ok(crumb);
        }
        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        debug!("Fetching Yahoo cookie and crumb");

        // Step 1: Get cookie from fc.yahoo.com
        let response = self
            .client
            .get(COOKIE_URL)
            .send()
            .await
            .map_err(request_error)?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| provider_error("Failed to parse Yahoo cookie"))?;

        // Step 2: Get crumb using cookie
        let crumb = self
            .client
            .get(CRUMB_URL)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(request_error)?
            .text()
            .await
            .map_err(|e| provider_error(format!("Failed to read crumb: {}", e)))?;

        if crumb.trim().is_empty() {
            return Err(provider_error("Yahoo returned an empty crumb"));
        }

        let crumb_data = CrumbData { cookie, crumb };
        if let Ok(mut guard) = YAHOO_CRUMB.write() {
            *guard = Some(crumb_data.clone());
        }

        Ok(crumb_data)
    }

    /// Clear the cached crumb (used when authentication fails)
    fn clear_crumb(&self) {
        if let Ok(mut guard) = YAHOO_CRUMB.write() {
            *guard = None;
        }
    }

    // ========================================================================
    // Info Fetching
    // ========================================================================

    async fn fetch_quote_summary(&self, symbol: &str) -> Result<TickerInfo, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "{}/{}?modules={}&crumb={}",
            QUOTE_SUMMARY_URL,
            encode(symbol),
            INFO_MODULES.join(","),
            encode(&crumb.crumb)
        );

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .map_err(request_error)?;

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                self.clear_crumb();
                return Err(provider_error("Yahoo authentication expired"));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(MarketDataError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                });
            }
            _ => {}
        }

        // Unknown symbols come back as 404 with the error in the JSON body
        let data: YahooQuoteSummaryResponse = response
            .json()
            .await
            .map_err(|e| provider_error(format!("Failed to parse info response: {}", e)))?;

        if let Some(error) = data.quote_summary.error {
            return Err(if error.is_not_found() {
                MarketDataError::SymbolNotFound(symbol.to_string())
            } else {
                provider_error(format!("{}: {}", error.code, error.description))
            });
        }

        let modules = data
            .quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

        Ok(flatten_modules(&modules))
    }

    // ========================================================================
    // History Fetching
    // ========================================================================

    /// Convert chrono DateTime<Utc> to time::OffsetDateTime for the Yahoo API.
    fn chrono_to_offset_datetime(dt: DateTime<Utc>) -> Result<OffsetDateTime, MarketDataError> {
        OffsetDateTime::from_unix_timestamp(dt.timestamp()).map_err(|e| {
            MarketDataError::ValidationFailed {
                message: format!("Date out of range: {} ({})", dt, e),
            }
        })
    }

    /// Convert a Yahoo quote to our Bar model.
    fn yahoo_quote_to_bar(
        yahoo_quote: &yahoo::Quote,
        utc_offset_secs: i32,
    ) -> Result<Bar, MarketDataError> {
        let timestamp: DateTime<Utc> = Utc
            .timestamp_opt(yahoo_quote.timestamp as i64, 0)
            .single()
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: format!("Invalid timestamp: {}", yahoo_quote.timestamp),
            })?;

        if !yahoo_quote.close.is_finite() {
            return Err(MarketDataError::ValidationFailed {
                message: format!("Invalid close price at {}", timestamp),
            });
        }

        Ok(Bar::new(
            timestamp,
            yahoo_quote.open,
            yahoo_quote.high,
            yahoo_quote.low,
            yahoo_quote.close,
            yahoo_quote.volume,
        )
        .with_utc_offset(utc_offset_secs))
    }
}

// ============================================================================
// MarketDataProvider Implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_info(&self, symbol: &str) -> Result<TickerInfo, MarketDataError> {
        debug!("Fetching info for {} from Yahoo", symbol);
        self.fetch_quote_summary(symbol).await
    }

    async fn get_history(
        &self,
        symbol: &str,
        range: HistoryRange,
        interval: Interval,
    ) -> Result<Vec<Bar>, MarketDataError> {
        debug!(
            "Fetching {} history for {} over {:?} from Yahoo",
            interval, symbol, range
        );

        let response = match &range {
            HistoryRange::Period(period) => {
                self.connector
                    .get_quote_range(symbol, interval.as_str(), period)
                    .await
            }
            HistoryRange::Between { start, end } => {
                let start = Self::chrono_to_offset_datetime(*start)?;
                let end = Self::chrono_to_offset_datetime(*end)?;
                self.connector
                    .get_quote_history_interval(symbol, start, end, interval.as_str())
                    .await
            }
        }
        .map_err(|e| map_chart_error(symbol, e))?;

        let utc_offset_secs = response
            .metadata()
            .ok()
            .and_then(|meta| i32::try_from(meta.gmtoffset).ok())
            .unwrap_or(0);

        match response.quotes() {
            Ok(yahoo_quotes) => {
                let bars: Vec<Bar> = yahoo_quotes
                    .iter()
                    .filter_map(|q| match Self::yahoo_quote_to_bar(q, utc_offset_secs) {
                        Ok(bar) => Some(bar),
                        Err(e) => {
                            warn!("Skipping bar due to conversion error: {:?}", e);
                            None
                        }
                    })
                    .collect();

                if bars.is_empty() {
                    return Err(MarketDataError::NoDataForRange);
                }

                Ok(bars)
            }
            Err(yahoo::YahooError::NoQuotes) | Err(yahoo::YahooError::NoResult) => {
                warn!("No history returned for '{}' over {:?}", symbol, range);
                Err(MarketDataError::NoDataForRange)
            }
            Err(e) => Err(provider_error(e.to_string())),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn provider_error(message: impl Into<String>) -> MarketDataError {
    MarketDataError::ProviderError {
        provider: PROVIDER_ID.to_string(),
        message: message.into(),
    }
}

fn request_error(e: reqwest::Error) -> MarketDataError {
    if e.is_timeout() {
        MarketDataError::Timeout {
            provider: PROVIDER_ID.to_string(),
        }
    } else {
        MarketDataError::Network(e)
    }
}

/// Classify a chart API failure. The connector reports HTTP failures as
/// `FetchFailed` carrying the status line.
fn map_chart_error(symbol: &str, e: yahoo::YahooError) -> MarketDataError {
    match e {
        yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult => {
            MarketDataError::SymbolNotFound(symbol.to_string())
        }
        yahoo::YahooError::FetchFailed(ref status) => classify_status(symbol, status)
            .unwrap_or_else(|| provider_error(e.to_string())),
        other => provider_error(other.to_string()),
    }
}

fn classify_status(symbol: &str, status: &str) -> Option<MarketDataError> {
    let code = status.split_whitespace().next()?;
    match code {
        "404" => Some(MarketDataError::SymbolNotFound(symbol.to_string())),
        // Yahoo answers 400 for windows it cannot serve, e.g. 1m bars older than 30 days
        "400" | "422" => Some(MarketDataError::NoDataForRange),
        "429" => Some(MarketDataError::RateLimited {
            provider: PROVIDER_ID.to_string(),
        }),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
