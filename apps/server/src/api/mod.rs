mod company;
mod history;
mod quote;
mod shared;

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use quotegate_market_data::MarketDataError;
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{config::Config, error::ApiError, main_lib::AppState};

#[derive(OpenApi)]
#[openapi(paths(
    home,
    healthz,
    company::get_company_info,
    quote::get_quote_snapshot,
    history::get_historical_data
))]
pub struct ApiDoc;

/// Endpoint listing.
#[utoipa::path(get, path = "/", responses((status = 200, description = "Endpoint listing")))]
pub(crate) async fn home() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Financial Data API",
        "endpoints": {
            "/api/company_info/<symbol>": "Get detailed company information",
            "/api/realstock/<symbol>": "Get real-time stock market data",
            "/api/historical_data": "Get historical market data (POST request with date range)"
        }
    }))
}

#[utoipa::path(get, path = "/healthz", responses((status = 200, description = "Health")))]
pub(crate) async fn healthz() -> &'static str {
    "ok"
}

fn cors_layer(config: &Config) -> CorsLayer {
    let allow_origin = if config.cors_allow.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[derive(Clone, Copy)]
struct Deadline {
    limit: Duration,
    provider: &'static str,
}

/// Abandon requests that outlive the configured timeout. The caller gets the
/// usual error envelope rather than a bare 408.
async fn enforce_deadline(
    State(deadline): State<Deadline>,
    request: Request,
    next: Next,
) -> Response {
    match tokio::time::timeout(deadline.limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => ApiError::from(MarketDataError::Timeout {
            provider: deadline.provider.to_string(),
        })
        .into_response(),
    }
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let openapi = ApiDoc::openapi();
    let deadline = Deadline {
        limit: config.request_timeout,
        provider: state.provider.id(),
    };

    Router::new()
        .route("/", get(home))
        .route("/healthz", get(healthz))
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .merge(company::router())
        .merge(quote::router())
        .merge(history::router())
        .with_state(state)
        .layer(cors_layer(config))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(middleware::from_fn_with_state(deadline, enforce_deadline))
        .layer(TraceLayer::new_for_http())
}
