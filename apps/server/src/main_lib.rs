use std::sync::Arc;

use quotegate_market_data::{MarketDataProvider, YahooProvider};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub provider: Arc<dyn MarketDataProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }
}

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state() -> anyhow::Result<Arc<AppState>> {
    let provider: Arc<dyn MarketDataProvider> = Arc::new(YahooProvider::new()?);
    tracing::info!("Market data provider in use: {}", provider.id());
    Ok(Arc::new(AppState::new(provider)))
}
