use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::codes::WeatherCode;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions for one city at fetch time. Temperatures are whole °C.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city_name: String,
    pub temperature_c: i32,
    pub high_c: i32,
    pub low_c: i32,
    pub feels_like_c: i32,
    pub condition: String,
    pub icon_url: String,
    /// Seconds to add to UTC to get the city's wall-clock time.
    pub utc_offset_secs: i32,
    pub coord: Option<Coord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub date: NaiveDate,
    pub weekday: String,
    /// `None` when the upstream series had a gap for this day.
    pub max_temp_c: Option<i32>,
    pub code: WeatherCode,
    pub label: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    /// `YYYY-MM` of the reference year.
    pub month: String,
    pub label: Option<String>,
    pub avg_temp_c: Option<i32>,
}

/// One day of archive data; any reading may be missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub mean: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
}

/// The (snapshot, forecast, monthly) triple produced by one fetch cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    pub city: String,
    pub snapshot: WeatherSnapshot,
    pub forecast: Vec<ForecastEntry>,
    pub monthly: Vec<MonthlyPoint>,
}

/// Round to the nearest whole degree, halves towards positive infinity.
pub fn round_temp(value: f64) -> i32 {
    // `f64::round` sends negative halves away from zero; pull those back up.
    let r = value.round();
    let r = if value - r == 0.5 { r + 1.0 } else { r };
    r as i32
}
