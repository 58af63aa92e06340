//! Fetch orchestration and the dashboard's view state.
//!
//! A fetch cycle looks up the snapshot first and, when it carries coordinates,
//! fetches the forecast and the archive together. [`DashboardStore`] installs
//! cycle results so that a snapshot is never shown next to another city's
//! forecast, and a cycle that finishes after a newer one is dropped.

use anyhow::anyhow;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::watch;

use crate::{
    aggregate,
    config::Config,
    error::{DashboardError, ProviderError},
    locale::Language,
    model::{Coord, DashboardState, ForecastEntry, MonthlyPoint, WeatherSnapshot},
    preferences::Preferences,
    provider::{
        ArchiveSource, CurrentConditionsSource, ForecastSource, OpenMeteoArchive,
        OpenMeteoForecast, OpenWeatherProvider, ProviderId,
        open_meteo::{ARCHIVE_BASE_URL, FORECAST_BASE_URL},
        openweather,
    },
};

/// Result of a fetch cycle whose snapshot succeeded.
///
/// When `error` is set, `state.forecast` and `state.monthly` are empty.
#[derive(Debug)]
pub struct FetchOutcome {
    pub state: DashboardState,
    pub error: Option<DashboardError>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    current: Arc<dyn CurrentConditionsSource>,
    forecast: Arc<dyn ForecastSource>,
    archive: Arc<dyn ArchiveSource>,
}

impl Dashboard {
    pub fn new(
        current: Arc<dyn CurrentConditionsSource>,
        forecast: Arc<dyn ForecastSource>,
        archive: Arc<dyn ArchiveSource>,
    ) -> Self {
        Self { current, forecast, archive }
    }

    /// Build the three upstream adapters from config.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let id = ProviderId::OpenWeather;
        let api_key = config.provider_api_key(id).ok_or_else(|| {
            anyhow!(
                "No API key configured for provider '{id}'.\n\
                 Hint: run `weatherdash configure` or set {}.",
                crate::config::API_KEY_ENV
            )
        })?;

        let current = OpenWeatherProvider::with_base_url(
            api_key.to_owned(),
            config.provider_base_url(id).unwrap_or(openweather::DEFAULT_BASE_URL),
        )?;
        let forecast = OpenMeteoForecast::with_base_url(
            config
                .provider_base_url(ProviderId::OpenMeteoForecast)
                .unwrap_or(FORECAST_BASE_URL),
        )?;
        let archive = OpenMeteoArchive::with_base_url(
            config
                .provider_base_url(ProviderId::OpenMeteoArchive)
                .unwrap_or(ARCHIVE_BASE_URL),
            config.archive_year,
        )?;

        Ok(Self::new(Arc::new(current), Arc::new(forecast), Arc::new(archive)))
    }

    /// Run one fetch cycle for `city`.
    ///
    /// Fails only when the snapshot lookup fails; forecast or archive failures
    /// are reported in [`FetchOutcome::error`] alongside an emptied state.
    pub async fn fetch(&self, city: &str, lang: Language) -> Result<FetchOutcome, DashboardError> {
        let snapshot = self.current.current(city, lang).await.map_err(|source| {
            tracing::warn!(%city, error = %source, "snapshot lookup failed");
            DashboardError::CityNotFound { city: city.to_string(), source }
        })?;

        let Some(coord) = snapshot.coord else {
            tracing::debug!(%city, "snapshot has no coordinates, skipping forecast and archive");
            return Ok(FetchOutcome { state: empty_state(city, snapshot), error: None });
        };

        let (forecast, monthly) =
            tokio::join!(self.forecast.forecast(coord, lang), self.monthly(coord, lang));

        let outcome = match (forecast, monthly) {
            (Ok(forecast), Ok(monthly)) => FetchOutcome {
                state: DashboardState { city: city.to_string(), snapshot, forecast, monthly },
                error: None,
            },
            (Err(e), _) => {
                tracing::warn!(%city, error = %e, "forecast fetch failed");
                FetchOutcome {
                    state: empty_state(city, snapshot),
                    error: Some(DashboardError::ForecastUnavailable(e)),
                }
            }
            (Ok(_), Err(e)) => {
                tracing::warn!(%city, error = %e, "monthly data fetch failed");
                FetchOutcome {
                    state: empty_state(city, snapshot),
                    error: Some(DashboardError::MonthlyUnavailable(e)),
                }
            }
        };

        Ok(outcome)
    }

    async fn monthly(
        &self,
        coord: Coord,
        lang: Language,
    ) -> Result<Vec<MonthlyPoint>, ProviderError> {
        let records = self.archive.daily_records(coord).await?;
        let mut points = aggregate::monthly_averages(&records, self.archive.reference_year())?;
        aggregate::label_months(&mut points, lang);
        Ok(points)
    }
}

fn empty_state(city: &str, snapshot: WeatherSnapshot) -> DashboardState {
    DashboardState {
        city: city.to_string(),
        snapshot,
        forecast: Vec::new(),
        monthly: Vec::new(),
    }
}

/// What the dashboard currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub city: Option<String>,
    pub snapshot: Option<WeatherSnapshot>,
    pub forecast: Vec<ForecastEntry>,
    pub monthly: Vec<MonthlyPoint>,
    /// Ticket of the refresh that produced this state; 0 before the first one.
    pub ticket: u64,
}

#[derive(Debug)]
pub enum RefreshStatus {
    /// The cycle's result is on display. `warning` carries a forecast or
    /// monthly failure.
    Installed { warning: Option<DashboardError> },
    /// The snapshot lookup failed; the previous snapshot stays, forecast and
    /// monthly are cleared.
    Failed(DashboardError),
    /// A newer refresh finished first; this result was dropped.
    Superseded,
}

/// Holds the view state and applies refreshes with last-write-wins by ticket.
#[derive(Debug)]
pub struct DashboardStore {
    dashboard: Dashboard,
    prefs: watch::Receiver<Preferences>,
    next_ticket: AtomicU64,
    tx: watch::Sender<ViewState>,
}

impl DashboardStore {
    pub fn new(dashboard: Dashboard, prefs: watch::Receiver<Preferences>) -> Self {
        let (tx, _rx) = watch::channel(ViewState::default());
        Self { dashboard, prefs, next_ticket: AtomicU64::new(1), tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> ViewState {
        self.tx.borrow().clone()
    }

    /// Fetch `city` and install the result unless a newer refresh already has.
    pub async fn refresh(&self, city: &str) -> RefreshStatus {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst);
        let lang = self.prefs.borrow().language;

        tracing::debug!(%city, ticket, "refresh started");
        let result = self.dashboard.fetch(city, lang).await;

        let mut status = None;
        self.tx.send_if_modified(|view| {
            if ticket < view.ticket {
                return false;
            }
            view.ticket = ticket;
            view.forecast.clear();
            view.monthly.clear();

            match result {
                Ok(FetchOutcome { state, error }) => {
                    view.city = Some(state.city);
                    view.snapshot = Some(state.snapshot);
                    view.forecast = state.forecast;
                    view.monthly = state.monthly;
                    status = Some(RefreshStatus::Installed { warning: error });
                }
                Err(err) => status = Some(RefreshStatus::Failed(err)),
            }
            true
        });

        status.unwrap_or_else(|| {
            tracing::debug!(%city, ticket, "refresh superseded by a newer one");
            RefreshStatus::Superseded
        })
    }
}
