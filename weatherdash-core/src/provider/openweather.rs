use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::ProviderError,
    locale::Language,
    model::{Coord, WeatherSnapshot, round_temp},
};

use super::{CurrentConditionsSource, http_client, success_body};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const DEFAULT_ICON: &str = "01d";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self, ProviderError> {
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: http_client()?,
        })
    }

    async fn fetch_current(
        &self,
        city: &str,
        lang: Language,
    ) -> Result<OwCurrentResponse, ProviderError> {
        let url = format!("{}/weather", self.base_url);

        tracing::debug!(%city, %lang, "requesting OpenWeather current conditions");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
                ("lang", lang.as_str()),
            ])
            .send()
            .await?;

        let body = success_body(res).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_max: f64,
    temp_min: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    timezone: i32,
    coord: Option<OwCoord>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

fn snapshot_from(parsed: OwCurrentResponse) -> WeatherSnapshot {
    let first = parsed.weather.into_iter().next();
    let (description, icon) = match first {
        Some(w) => (w.description, w.icon),
        None => (None, None),
    };

    WeatherSnapshot {
        city_name: parsed.name,
        temperature_c: round_temp(parsed.main.temp),
        high_c: round_temp(parsed.main.temp_max),
        low_c: round_temp(parsed.main.temp_min),
        feels_like_c: round_temp(parsed.main.feels_like),
        condition: description.unwrap_or_else(|| "Unknown".to_string()),
        icon_url: icon_url(icon.as_deref().unwrap_or(DEFAULT_ICON)),
        utc_offset_secs: parsed.timezone,
        coord: parsed.coord.map(|c| Coord { lat: c.lat, lon: c.lon }),
    }
}

pub fn icon_url(icon: &str) -> String {
    format!("https://openweathermap.org/img/wn/{icon}@2x.png")
}

#[async_trait]
impl CurrentConditionsSource for OpenWeatherProvider {
    async fn current(&self, city: &str, lang: Language) -> Result<WeatherSnapshot, ProviderError> {
        let parsed = self.fetch_current(city, lang).await?;
        Ok(snapshot_from(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tehran() -> serde_json::Value {
        serde_json::json!({
            "name": "Tehran",
            "timezone": 12600,
            "coord": { "lat": 35.69, "lon": 51.42 },
            "main": { "temp": 21.6, "temp_max": 24.2, "temp_min": 18.5, "feels_like": 20.4 },
            "weather": [ { "description": "clear sky", "icon": "01n" } ]
        })
    }

    #[tokio::test]
    async fn maps_current_conditions() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Tehran"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "KEY"))
            .and(query_param("lang", "fa"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tehran()))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::with_base_url("KEY".into(), &server.uri()).unwrap();
        let snap = provider.current("Tehran", Language::Fa).await.unwrap();

        assert_eq!(snap.city_name, "Tehran");
        assert_eq!(snap.temperature_c, 22);
        assert_eq!(snap.high_c, 24);
        assert_eq!(snap.low_c, 19);
        assert_eq!(snap.feels_like_c, 20);
        assert_eq!(snap.condition, "clear sky");
        assert_eq!(snap.icon_url, "https://openweathermap.org/img/wn/01n@2x.png");
        assert_eq!(snap.utc_offset_secs, 12600);
        assert_eq!(snap.coord, Some(Coord { lat: 35.69, lon: 51.42 }));
    }

    #[tokio::test]
    async fn missing_weather_and_coord_use_defaults() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Nowhere",
                "timezone": -3600,
                "main": { "temp": 0.0, "temp_max": 1.0, "temp_min": -1.0, "feels_like": -2.0 },
                "weather": []
            })))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::with_base_url("KEY".into(), &server.uri()).unwrap();
        let snap = provider.current("Nowhere", Language::En).await.unwrap();

        assert_eq!(snap.condition, "Unknown");
        assert!(snap.icon_url.contains("01d"));
        assert_eq!(snap.coord, None);
        assert_eq!(snap.utc_offset_secs, -3600);
    }

    #[tokio::test]
    async fn not_found_is_status_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
            )
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::with_base_url("KEY".into(), &server.uri()).unwrap();
        let err = provider.current("Atlantis", Language::En).await.unwrap_err();

        assert!(matches!(err, ProviderError::Status { status, .. } if status.as_u16() == 404));
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"name\": 1}"))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::with_base_url("KEY".into(), &server.uri()).unwrap();
        let err = provider.current("Tehran", Language::En).await.unwrap_err();

        assert!(matches!(err, ProviderError::Parse(_)));
    }
}
