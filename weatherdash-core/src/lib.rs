//! Core library for the `weatherdash` terminal dashboard.
//!
//! This crate defines:
//! - Adapters for the current-conditions, forecast and archive providers
//! - Monthly aggregation of archive data and weather-code mapping
//! - English/Persian string tables and the derived city clock
//! - Configuration, display preferences and the dashboard view state
//!
//! It is used by `weatherdash-cli`, but can also be reused by other front ends.

pub mod aggregate;
pub mod clock;
pub mod codes;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod locale;
pub mod model;
pub mod preferences;
pub mod provider;
pub mod user;

pub use clock::{ClockState, ClockTicker};
pub use codes::WeatherCode;
pub use config::{Config, ProviderConfig};
pub use dashboard::{Dashboard, DashboardStore, FetchOutcome, RefreshStatus, ViewState};
pub use error::{AggregateError, DashboardError, ProviderError};
pub use locale::Language;
pub use model::{Coord, DailyRecord, DashboardState, ForecastEntry, MonthlyPoint, WeatherSnapshot};
pub use preferences::{PreferenceHub, Preferences, Theme};
pub use provider::{ArchiveSource, CurrentConditionsSource, ForecastSource, ProviderId};
