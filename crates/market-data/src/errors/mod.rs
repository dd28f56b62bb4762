//! Error types for the market data crate.
//!
//! [`MarketDataError`] is the single error enum returned by every provider
//! call. Callers that need to react to the *kind* of failure rather than its
//! text use [`MarketDataError::is_empty_result`] and
//! [`MarketDataError::is_transient`].

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The symbol exists but the provider has no rows for the requested range.
    #[error("No data for date range")]
    NoDataForRange,

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider answered, but the payload could not be used.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns true when the error means "the provider has nothing for this
    /// request" rather than "the request failed".
    ///
    /// Price-history consumers treat these the same as an empty series.
    ///
    /// ```
    /// use quotegate_market_data::errors::MarketDataError;
    ///
    /// assert!(MarketDataError::NoDataForRange.is_empty_result());
    /// assert!(MarketDataError::SymbolNotFound("ZZZZ".to_string()).is_empty_result());
    /// ```
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::SymbolNotFound(_) | Self::NoDataForRange)
    }

    /// Returns true when the provider could not be reached or refused to
    /// serve the request, as opposed to answering with bad or missing data.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Timeout { .. } | Self::Network(_) => true,
            Self::SymbolNotFound(_)
            | Self::NoDataForRange
            | Self::ProviderError { .. }
            | Self::ValidationFailed { .. } => false,
        }
    }
}
