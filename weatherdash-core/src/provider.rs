use async_trait::async_trait;
use reqwest::{Client, Response};
use std::{fmt::Debug, time::Duration};

use crate::{
    error::ProviderError,
    locale::Language,
    model::{Coord, DailyRecord, ForecastEntry, WeatherSnapshot},
};

pub mod open_meteo;
pub mod openweather;

pub use open_meteo::{OpenMeteoArchive, OpenMeteoForecast};
pub use openweather::OpenWeatherProvider;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    OpenMeteoForecast,
    OpenMeteoArchive,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::OpenMeteoForecast => "open-meteo-forecast",
            ProviderId::OpenMeteoArchive => "open-meteo-archive",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[
            ProviderId::OpenWeather,
            ProviderId::OpenMeteoForecast,
            ProviderId::OpenMeteoArchive,
        ]
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::OpenWeather)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Current conditions looked up by city name.
#[async_trait]
pub trait CurrentConditionsSource: Send + Sync + Debug {
    async fn current(&self, city: &str, lang: Language) -> Result<WeatherSnapshot, ProviderError>;
}

/// Daily forecast for a location, in upstream order.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn forecast(
        &self,
        coord: Coord,
        lang: Language,
    ) -> Result<Vec<ForecastEntry>, ProviderError>;
}

/// One reference year of daily archive readings for a location.
#[async_trait]
pub trait ArchiveSource: Send + Sync + Debug {
    fn reference_year(&self) -> i32;

    async fn daily_records(&self, coord: Coord) -> Result<Vec<DailyRecord>, ProviderError>;
}

pub(crate) fn http_client() -> Result<Client, ProviderError> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Read the body of `res`, turning a non-2xx status into [`ProviderError::Status`].
pub(crate) async fn success_body(res: Response) -> Result<String, ProviderError> {
    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        return Err(ProviderError::Status { status, body: truncate_body(&body) });
    }

    Ok(body)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
