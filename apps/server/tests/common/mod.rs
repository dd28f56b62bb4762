#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Datelike, Local, TimeZone, Utc};
use quotegate_market_data::{
    Bar, HistoryRange, Interval, MarketDataError, MarketDataProvider, TickerInfo,
};
use quotegate_server::{api::app_router, config::Config, AppState};
use serde_json::Value;
use tower::ServiceExt;

/// What the stub returns from `get_history`.
pub enum StubHistory {
    Bars(Vec<Bar>),
    NotFound,
    Unavailable,
}

pub struct StubProvider {
    pub info: Option<TickerInfo>,
    pub history: StubHistory,
    pub history_calls: Mutex<Vec<(String, HistoryRange, Interval)>>,
    /// Added to every call before answering.
    pub delay: Duration,
}

impl StubProvider {
    pub fn new(info: Option<TickerInfo>, history: StubHistory) -> Self {
        Self {
            info,
            history,
            history_calls: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn recorded_calls(&self) -> Vec<(String, HistoryRange, Interval)> {
        self.history_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketDataProvider for StubProvider {
    fn id(&self) -> &'static str {
        "STUB"
    }

    async fn get_info(&self, symbol: &str) -> Result<TickerInfo, MarketDataError> {
        tokio::time::sleep(self.delay).await;
        self.info
            .clone()
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }

    async fn get_history(
        &self,
        symbol: &str,
        range: HistoryRange,
        interval: Interval,
    ) -> Result<Vec<Bar>, MarketDataError> {
        self.history_calls
            .lock()
            .unwrap()
            .push((symbol.to_string(), range, interval));
        tokio::time::sleep(self.delay).await;
        match &self.history {
            StubHistory::Bars(bars) => Ok(bars.clone()),
            StubHistory::NotFound => Err(MarketDataError::SymbolNotFound(symbol.to_string())),
            StubHistory::Unavailable => Err(MarketDataError::Timeout {
                provider: "STUB".to_string(),
            }),
        }
    }
}

pub fn daily_bar(y: i32, m: u32, d: u32, close: f64) -> Bar {
    Bar::new(
        Utc.with_ymd_and_hms(y, m, d, 14, 30, 0).unwrap(),
        close - 1.0,
        close + 1.0,
        close - 2.0,
        close,
        1_000_000,
    )
}

/// A daily bar dated `days_ago` before today, so it falls inside the default
/// one-year lookback.
pub fn recent_bar(days_ago: i64, close: f64) -> Bar {
    let day = Local::now().date_naive() - chrono::Duration::days(days_ago);
    daily_bar(day.year(), day.month(), day.day(), close)
}

pub fn router_with(provider: Arc<StubProvider>) -> Router {
    router_with_config(provider, &Config::default())
}

pub fn router_with_config(provider: Arc<StubProvider>, config: &Config) -> Router {
    let state = Arc::new(AppState::new(provider));
    app_router(state, config)
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}
