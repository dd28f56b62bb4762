use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use quotegate_market_data::MarketDataError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    // Provider failures surface their own text as the message
    #[error("{0}")]
    MarketData(#[from] MarketDataError),
}

/// Machine-readable failure category carried in every error envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    UpstreamUnavailable,
    UpstreamDataError,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::InvalidInput(_) => ErrorKind::InvalidInput,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::MarketData(e) if e.is_transient() => ErrorKind::UpstreamUnavailable,
            ApiError::MarketData(_) => ErrorKind::UpstreamDataError,
        }
    }

    /// Only an empty result set is a 404; every other failure is a 400.
    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
    kind: ErrorKind,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        tracing::warn!(status = status.as_u16(), ?kind, "{}", self);
        let body = Json(ErrorBody {
            status: "error",
            message: self.to_string(),
            kind,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
