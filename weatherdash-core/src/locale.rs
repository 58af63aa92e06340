//! English and Persian string tables.
//!
//! Every user-visible string in the dashboard goes through [`text`] or one of the
//! calendar helpers here, keyed by the active [`Language`].

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fa,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fa => "fa",
        }
    }

    pub const fn all() -> &'static [Language] {
        &[Language::En, Language::Fa]
    }

    /// Name of this language written in `lang`.
    pub fn display_name(&self, lang: Language) -> &'static str {
        match self {
            Language::En => text(lang, Key::English),
            Language::Fa => text(lang, Key::Persian),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Language {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "fa" | "persian" | "farsi" => Ok(Language::Fa),
            _ => Err(anyhow::anyhow!(
                "Unknown language '{value}'. Supported languages: en, fa."
            )),
        }
    }
}

/// Keys of the UI string table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    AppTitle,
    Search,
    Loading,
    High,
    Low,
    FeelsLike,
    AvgMonthly,
    ForecastTitle,
    ForecastEmpty,
    Today,
    Mode,
    LanguageLabel,
    English,
    Persian,
    Exit,
    CityRequired,
    CityNotFound,
    ForecastFailed,
    MonthlyFailed,
    NameRequired,
    NameTooShort,
    NameTooLong,
    Unknown,
}

pub fn text(lang: Language, key: Key) -> &'static str {
    match lang {
        Language::En => english(key),
        Language::Fa => persian(key),
    }
}

fn english(key: Key) -> &'static str {
    match key {
        Key::AppTitle => "Weather Dashboard",
        Key::Search => "Search city",
        Key::Loading => "Loading...",
        Key::High => "High",
        Key::Low => "Low",
        Key::FeelsLike => "Feels like",
        Key::AvgMonthly => "Average monthly temperature",
        Key::ForecastTitle => "Two-week forecast",
        Key::ForecastEmpty => "No forecast data available",
        Key::Today => "Today",
        Key::Mode => "Mode",
        Key::LanguageLabel => "Language",
        Key::English => "English",
        Key::Persian => "Persian",
        Key::Exit => "Exit",
        Key::CityRequired => "Please enter a city name",
        Key::CityNotFound => "City not found",
        Key::ForecastFailed => "Failed to load the two-week forecast",
        Key::MonthlyFailed => "Failed to load monthly data",
        Key::NameRequired => "Username is required",
        Key::NameTooShort => "Username must be at least 2 characters",
        Key::NameTooLong => "Username must be at most 31 characters",
        Key::Unknown => "Unknown",
    }
}

fn persian(key: Key) -> &'static str {
    match key {
        Key::AppTitle => "داشبورد آب‌وهوا",
        Key::Search => "جستجوی شهر",
        Key::Loading => "در حال بارگذاری...",
        Key::High => "بیشینه",
        Key::Low => "کمینه",
        Key::FeelsLike => "دمای احساسی",
        Key::AvgMonthly => "میانگین دمای ماهانه",
        Key::ForecastTitle => "پیش‌بینی دو هفته‌ای",
        Key::ForecastEmpty => "داده‌ای برای پیش‌بینی موجود نیست",
        Key::Today => "امروز",
        Key::Mode => "حالت",
        Key::LanguageLabel => "زبان",
        Key::English => "انگلیسی",
        Key::Persian => "فارسی",
        Key::Exit => "خروج",
        Key::CityRequired => "لطفاً نام شهر را وارد کنید",
        Key::CityNotFound => "شهر پیدا نشد",
        Key::ForecastFailed => "دریافت پیش‌بینی دو هفته‌ای ناموفق بود",
        Key::MonthlyFailed => "دریافت داده‌های ماهانه ناموفق بود",
        Key::NameRequired => "نام کاربری الزامی است",
        Key::NameTooShort => "نام کاربری باید حداقل ۲ کاراکتر باشد",
        Key::NameTooLong => "نام کاربری نباید بیش از ۳۱ کاراکتر باشد",
        Key::Unknown => "نامشخص",
    }
}

pub fn welcome(lang: Language, name: &str) -> String {
    match lang {
        Language::En => format!("Welcome, {name}!"),
        Language::Fa => format!("{name}، خوش آمدید!"),
    }
}

const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTHS_FA: [&str; 12] = [
    "ژانویه", "فوریه", "مارس", "آوریل", "مه", "ژوئن", "ژوئیه", "اوت", "سپتامبر", "اکتبر",
    "نوامبر", "دسامبر",
];

/// Short month name for a zero-based month index. Out-of-range indices wrap.
pub fn month_name(lang: Language, month0: usize) -> &'static str {
    let table = match lang {
        Language::En => &MONTHS_EN,
        Language::Fa => &MONTHS_FA,
    };
    table[month0 % 12]
}

pub fn weekday_long(lang: Language, day: Weekday) -> &'static str {
    match lang {
        Language::En => match day {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        },
        Language::Fa => weekday_fa(day),
    }
}

pub fn weekday_short(lang: Language, day: Weekday) -> &'static str {
    match lang {
        Language::En => match day {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        },
        // Persian has no abbreviated weekday forms in common use.
        Language::Fa => weekday_fa(day),
    }
}

fn weekday_fa(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "دوشنبه",
        Weekday::Tue => "سه‌شنبه",
        Weekday::Wed => "چهارشنبه",
        Weekday::Thu => "پنجشنبه",
        Weekday::Fri => "جمعه",
        Weekday::Sat => "شنبه",
        Weekday::Sun => "یکشنبه",
    }
}

/// Replace ASCII digits with the language's native digits.
pub fn localize_digits(lang: Language, s: &str) -> String {
    match lang {
        Language::En => s.to_string(),
        Language::Fa => s
            .chars()
            .map(|c| match c.to_digit(10) {
                Some(d) => char::from_u32(0x06F0 + d).unwrap_or(c),
                None => c,
            })
            .collect(),
    }
}

pub fn format_number(lang: Language, n: i64) -> String {
    localize_digits(lang, &n.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_as_str_roundtrip() {
        for lang in Language::all() {
            let parsed = Language::try_from(lang.as_str()).expect("roundtrip should succeed");
            assert_eq!(*lang, parsed);
        }
    }

    #[test]
    fn unknown_language_error() {
        let err = Language::try_from("de").unwrap_err();
        assert!(err.to_string().contains("Unknown language"));
    }

    #[test]
    fn persian_digits() {
        assert_eq!(localize_digits(Language::Fa, "12:05"), "۱۲:۰۵");
        assert_eq!(format_number(Language::Fa, -7), "-۷");
        assert_eq!(format_number(Language::En, 2024), "2024");
    }

    #[test]
    fn month_names_cover_the_year() {
        assert_eq!(month_name(Language::En, 0), "Jan");
        assert_eq!(month_name(Language::En, 11), "Dec");
        assert_eq!(month_name(Language::Fa, 0), "ژانویه");
    }

    #[test]
    fn error_messages_differ_per_language() {
        assert_eq!(text(Language::En, Key::CityNotFound), "City not found");
        assert_ne!(
            text(Language::En, Key::CityNotFound),
            text(Language::Fa, Key::CityNotFound)
        );
    }
}
