//! Error taxonomy of the dashboard.
//!
//! Adapters fail with [`ProviderError`]; the orchestration re-signals each
//! failure as one of the three user-facing [`DashboardError`] kinds.

use reqwest::StatusCode;
use thiserror::Error;

use crate::locale::{self, Key, Language};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AggregateError {
    #[error("no daily records to aggregate")]
    NoData,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("response contained no days")]
    NoData,

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("city '{city}' not found")]
    CityNotFound {
        city: String,
        #[source]
        source: ProviderError,
    },

    #[error("two-week forecast unavailable")]
    ForecastUnavailable(#[source] ProviderError),

    #[error("monthly data unavailable")]
    MonthlyUnavailable(#[source] ProviderError),
}

impl DashboardError {
    /// Message suitable for showing to the user in the active language.
    pub fn user_message(&self, lang: Language) -> &'static str {
        let key = match self {
            DashboardError::CityNotFound { .. } => Key::CityNotFound,
            DashboardError::ForecastUnavailable(_) => Key::ForecastFailed,
            DashboardError::MonthlyUnavailable(_) => Key::MonthlyFailed,
        };
        locale::text(lang, key)
    }
}
