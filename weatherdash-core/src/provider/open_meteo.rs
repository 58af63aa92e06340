//! Open-Meteo daily forecast and historical archive adapters.
//!
//! Both endpoints answer with parallel arrays under `daily`, indexed by day.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    aggregate::records_from_columns,
    codes::WeatherCode,
    error::ProviderError,
    locale::{self, Language},
    model::{Coord, DailyRecord, ForecastEntry, round_temp},
};

use super::{ArchiveSource, ForecastSource, http_client, success_body};

pub const FORECAST_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const ARCHIVE_BASE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

pub const FORECAST_DAYS: u8 = 14;

#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    base_url: String,
    days: u8,
    http: Client,
}

impl OpenMeteoForecast {
    pub fn with_base_url(base_url: &str) -> Result<Self, ProviderError> {
        Ok(Self {
            base_url: base_url.to_string(),
            days: FORECAST_DAYS,
            http: http_client()?,
        })
    }

    async fn fetch_daily(&self, coord: Coord) -> Result<OmForecastDaily, ProviderError> {
        tracing::debug!(
            lat = coord.lat,
            lon = coord.lon,
            days = self.days,
            "requesting Open-Meteo forecast"
        );

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", coord.lat.to_string()),
                ("longitude", coord.lon.to_string()),
                ("daily", "temperature_2m_max,weathercode".to_string()),
                ("forecast_days", self.days.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?;

        let body = success_body(res).await?;
        let parsed: OmForecastResponse = serde_json::from_str(&body)?;
        Ok(parsed.daily)
    }
}

#[derive(Debug, Deserialize)]
struct OmForecastDaily {
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    weathercode: Vec<Option<i32>>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    daily: OmForecastDaily,
}

fn forecast_entries(
    daily: OmForecastDaily,
    lang: Language,
) -> Result<Vec<ForecastEntry>, ProviderError> {
    daily
        .time
        .iter()
        .enumerate()
        .map(|(i, iso)| {
            let date = NaiveDate::parse_from_str(iso, "%Y-%m-%d")
                .map_err(|e| ProviderError::Malformed(format!("forecast date '{iso}': {e}")))?;
            let code = daily
                .weathercode
                .get(i)
                .copied()
                .flatten()
                .map_or(WeatherCode::MISSING, WeatherCode);
            let max_temp_c = daily.temperature_2m_max.get(i).copied().flatten().map(round_temp);

            Ok(ForecastEntry {
                date,
                weekday: locale::weekday_short(lang, date.weekday()).to_string(),
                max_temp_c,
                code,
                label: code.label(lang).to_string(),
                icon: code.icon().to_string(),
            })
        })
        .collect()
}

#[async_trait]
impl ForecastSource for OpenMeteoForecast {
    async fn forecast(
        &self,
        coord: Coord,
        lang: Language,
    ) -> Result<Vec<ForecastEntry>, ProviderError> {
        let daily = self.fetch_daily(coord).await?;
        forecast_entries(daily, lang)
    }
}

#[derive(Debug, Clone)]
pub struct OpenMeteoArchive {
    base_url: String,
    year: i32,
    http: Client,
}

impl OpenMeteoArchive {
    pub fn with_base_url(base_url: &str, year: i32) -> Result<Self, ProviderError> {
        Ok(Self {
            base_url: base_url.to_string(),
            year,
            http: http_client()?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct OmArchiveDaily {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_mean: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmArchiveResponse {
    #[serde(default)]
    daily: Option<OmArchiveDaily>,
}

#[async_trait]
impl ArchiveSource for OpenMeteoArchive {
    fn reference_year(&self) -> i32 {
        self.year
    }

    async fn daily_records(&self, coord: Coord) -> Result<Vec<DailyRecord>, ProviderError> {
        tracing::debug!(
            lat = coord.lat,
            lon = coord.lon,
            year = self.year,
            "requesting Open-Meteo archive"
        );

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", coord.lat.to_string()),
                ("longitude", coord.lon.to_string()),
                ("start_date", format!("{}-01-01", self.year)),
                ("end_date", format!("{}-12-31", self.year)),
                (
                    "daily",
                    "temperature_2m_mean,temperature_2m_max,temperature_2m_min".to_string(),
                ),
                ("timezone", "auto".to_string()),
                ("models", "era5".to_string()),
            ])
            .send()
            .await?;

        let body = success_body(res).await?;
        let parsed: OmArchiveResponse = serde_json::from_str(&body)?;
        let daily = parsed.daily.unwrap_or_default();

        if daily.time.is_empty() {
            return Err(ProviderError::NoData);
        }

        Ok(records_from_columns(
            &daily.time,
            &daily.temperature_2m_mean,
            &daily.temperature_2m_max,
            &daily.temperature_2m_min,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::UNKNOWN_ICON;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEHRAN: Coord = Coord { lat: 35.69, lon: 51.42 };

    #[tokio::test]
    async fn forecast_maps_parallel_arrays() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("forecast_days", "14"))
            .and(query_param("daily", "temperature_2m_max,weathercode"))
            .and(query_param("timezone", "auto"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "daily": {
                    "time": ["2024-01-01", "2024-01-02", "2024-01-03"],
                    "temperature_2m_max": [10.4, null, 12.5],
                    "weathercode": [0, 61, 1234]
                }
            })))
            .mount(&server)
            .await;

        let provider =
            OpenMeteoForecast::with_base_url(&format!("{}/v1/forecast", server.uri())).unwrap();
        let entries = provider.forecast(TEHRAN, Language::En).await.unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].weekday, "Mon");
        assert_eq!(entries[0].max_temp_c, Some(10));
        assert_eq!(entries[0].icon, "☀️");
        assert_eq!(entries[0].label, "Clear sky");
        assert_eq!(entries[1].max_temp_c, None);
        assert_eq!(entries[1].icon, "🌧");
        assert_eq!(entries[2].max_temp_c, Some(13));
        assert_eq!(entries[2].icon, UNKNOWN_ICON);
        assert_eq!(entries[2].label, "Unknown");
    }

    #[tokio::test]
    async fn forecast_is_not_padded_to_fourteen() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "daily": { "time": ["2024-01-01"], "temperature_2m_max": [3.0], "weathercode": [3] }
            })))
            .mount(&server)
            .await;

        let provider = OpenMeteoForecast::with_base_url(&server.uri()).unwrap();
        let entries = provider.forecast(TEHRAN, Language::Fa).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].weekday, "دوشنبه");
        assert_eq!(entries[0].label, "ابری");
    }

    #[tokio::test]
    async fn forecast_with_bad_date_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "daily": { "time": ["yesterday"], "temperature_2m_max": [3.0], "weathercode": [3] }
            })))
            .mount(&server)
            .await;

        let provider = OpenMeteoForecast::with_base_url(&server.uri()).unwrap();
        let err = provider.forecast(TEHRAN, Language::En).await.unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }

    #[tokio::test]
    async fn archive_requests_the_reference_year() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .and(query_param("start_date", "2023-01-01"))
            .and(query_param("end_date", "2023-12-31"))
            .and(query_param("models", "era5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "daily": {
                    "time": ["2023-01-01", "2023-01-02"],
                    "temperature_2m_mean": [5.4, null],
                    "temperature_2m_max": [8.0, 9.0],
                    "temperature_2m_min": [2.0, 3.0]
                }
            })))
            .mount(&server)
            .await;

        let provider =
            OpenMeteoArchive::with_base_url(&format!("{}/v1/archive", server.uri()), 2023).unwrap();
        let records = provider.daily_records(TEHRAN).await.unwrap();

        assert_eq!(provider.reference_year(), 2023);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].representative(), Some(5.4));
        assert_eq!(records[1].representative(), Some(6.0));
    }

    #[tokio::test]
    async fn archive_without_days_is_no_data() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let provider = OpenMeteoArchive::with_base_url(&server.uri(), 2024).unwrap();
        let err = provider.daily_records(TEHRAN).await.unwrap_err();
        assert!(matches!(err, ProviderError::NoData));
    }

    #[tokio::test]
    async fn archive_server_error_is_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let provider = OpenMeteoArchive::with_base_url(&server.uri(), 2024).unwrap();
        let err = provider.daily_records(TEHRAN).await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { .. }));
    }
}
