//! WMO weather code → icon glyph and localized label.
//!
//! See <https://open-meteo.com/en/docs#weathervariables> for the code table.
//! Unknown codes never fail: they map to [`UNKNOWN_ICON`] and the locale's
//! "unknown" label.

use serde::{Deserialize, Serialize};

use crate::locale::{self, Key, Language};

pub const UNKNOWN_ICON: &str = "❔";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherCode(pub i32);

impl WeatherCode {
    /// Stand-in for a day the upstream left without a code.
    pub const MISSING: WeatherCode = WeatherCode(-1);

    pub fn icon(self) -> &'static str {
        icon(self)
    }

    pub fn label(self, lang: Language) -> &'static str {
        label(self, lang)
    }
}

pub fn icon(code: WeatherCode) -> &'static str {
    match code.0 {
        0 => "☀️",
        1 => "🌤",
        2 => "⛅",
        3 => "☁️",
        45 | 48 => "🌫",
        51 => "🌦",
        61 | 63 | 65 => "🌧",
        71 => "❄️",
        80 => "🌦",
        95 => "⛈",
        _ => UNKNOWN_ICON,
    }
}

pub fn label(code: WeatherCode, lang: Language) -> &'static str {
    let known = match lang {
        Language::En => label_en(code.0),
        Language::Fa => label_fa(code.0),
    };
    known.unwrap_or_else(|| locale::text(lang, Key::Unknown))
}

fn label_en(code: i32) -> Option<&'static str> {
    let s = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => return None,
    };
    Some(s)
}

fn label_fa(code: i32) -> Option<&'static str> {
    let s = match code {
        0 => "آسمان صاف",
        1 => "عمدتاً صاف",
        2 => "نیمه‌ابری",
        3 => "ابری",
        45 => "مه",
        48 => "مه یخ‌زده",
        51 => "نم‌نم باران خفیف",
        53 => "نم‌نم باران متوسط",
        55 => "نم‌نم باران شدید",
        56 => "نم‌نم باران یخ‌زده خفیف",
        57 => "نم‌نم باران یخ‌زده شدید",
        61 => "باران خفیف",
        63 => "باران متوسط",
        65 => "باران شدید",
        66 => "باران یخ‌زده خفیف",
        67 => "باران یخ‌زده شدید",
        71 => "برف خفیف",
        73 => "برف متوسط",
        75 => "برف سنگین",
        77 => "دانه‌های برف",
        80 => "رگبار خفیف",
        81 => "رگبار متوسط",
        82 => "رگبار شدید",
        85 => "بارش برف خفیف",
        86 => "بارش برف شدید",
        95 => "رعد و برق",
        96 => "رعد و برق با تگرگ خفیف",
        99 => "رعد و برق با تگرگ شدید",
        _ => return None,
    };
    Some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_have_icons() {
        assert_eq!(icon(WeatherCode(0)), "☀️");
        assert_eq!(icon(WeatherCode(48)), "🌫");
        assert_eq!(icon(WeatherCode(95)), "⛈");
    }

    #[test]
    fn unknown_code_falls_back() {
        let code = WeatherCode(1234);
        assert_eq!(code.icon(), UNKNOWN_ICON);
        assert_eq!(code.label(Language::En), "Unknown");
        assert_eq!(code.label(Language::Fa), "نامشخص");
    }

    #[test]
    fn labelled_code_without_icon_uses_fallback_icon() {
        // 73 has a description but no dedicated glyph.
        let code = WeatherCode(73);
        assert_eq!(code.icon(), UNKNOWN_ICON);
        assert_eq!(code.label(Language::En), "Moderate snow fall");
    }

    #[test]
    fn negative_code_does_not_panic() {
        assert_eq!(WeatherCode(-1).icon(), UNKNOWN_ICON);
        assert_eq!(WeatherCode(-1).label(Language::En), "Unknown");
    }
}
