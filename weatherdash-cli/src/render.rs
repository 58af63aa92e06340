//! Terminal rendering of the dashboard view.

use crossterm::style::{Color, Stylize};
use std::fmt::{self, Write};

use weatherdash_core::{
    ClockState, ForecastEntry, Language, MonthlyPoint, Preferences, Theme,
    ViewState, WeatherSnapshot,
    locale::{self, Key},
};

const BAR_WIDTH: i32 = 24;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub title: Color,
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub error: Color,
    pub bar: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                title: Color::DarkBlue,
                accent: Color::DarkCyan,
                text: Color::Black,
                muted: Color::DarkGrey,
                error: Color::DarkRed,
                bar: Color::DarkYellow,
            },
            Theme::Dark => Self {
                title: Color::Cyan,
                accent: Color::Yellow,
                text: Color::White,
                muted: Color::Grey,
                error: Color::Red,
                bar: Color::Yellow,
            },
        }
    }
}

fn temp(lang: Language, value: i32) -> String {
    format!("{}°C", locale::format_number(lang, i64::from(value)))
}

pub fn error_line(message: &str, prefs: Preferences) -> String {
    let palette = Palette::for_theme(prefs.theme);
    format!("{}", format!("✖ {message}").with(palette.error).bold())
}

pub fn view(view: &ViewState, clock: &ClockState, prefs: Preferences) -> String {
    let mut out = String::new();
    // Writing into a String never fails.
    let _ = write_view(&mut out, view, clock, prefs);
    out
}

fn write_view(
    out: &mut String,
    view: &ViewState,
    clock: &ClockState,
    prefs: Preferences,
) -> fmt::Result {
    if let Some(snapshot) = &view.snapshot {
        header(out, snapshot, clock, prefs)?;
        monthly(out, &view.monthly, prefs)?;
    }
    forecast(out, &view.forecast, prefs)
}

pub fn clock_line(city: &str, clock: &ClockState, prefs: Preferences) -> String {
    let palette = Palette::for_theme(prefs.theme);
    format!(
        "{}  {}",
        city.with(palette.title).bold(),
        format!("{} · {} · {}", clock.day, clock.date, clock.hour).with(palette.muted)
    )
}

fn header(
    out: &mut String,
    s: &WeatherSnapshot,
    clock: &ClockState,
    prefs: Preferences,
) -> fmt::Result {
    let lang = prefs.language;
    let palette = Palette::for_theme(prefs.theme);

    writeln!(out, "{}", clock_line(&s.city_name, clock, prefs))?;
    writeln!(
        out,
        "  {}  {}",
        temp(lang, s.temperature_c).with(palette.accent).bold(),
        s.condition.as_str().with(palette.text)
    )?;
    writeln!(
        out,
        "  {}: {}  {}: {}  ·  {} {}",
        locale::text(lang, Key::High),
        temp(lang, s.high_c),
        locale::text(lang, Key::Low),
        temp(lang, s.low_c),
        locale::text(lang, Key::FeelsLike),
        temp(lang, s.feels_like_c),
    )?;
    writeln!(out, "  {}", s.icon_url.as_str().with(palette.muted))?;
    writeln!(out)
}

fn monthly(out: &mut String, points: &[MonthlyPoint], prefs: Preferences) -> fmt::Result {
    let lang = prefs.language;
    let palette = Palette::for_theme(prefs.theme);

    let year = points
        .first()
        .and_then(|p| p.month.split('-').next())
        .map(|y| locale::localize_digits(lang, y))
        .unwrap_or_default();
    writeln!(
        out,
        "{} {}",
        locale::text(lang, Key::AvgMonthly).with(palette.title).bold(),
        format!("({year})").with(palette.muted)
    )?;

    let values: Vec<i32> = points.iter().filter_map(|p| p.avg_temp_c).collect();
    let min = values.iter().copied().min().unwrap_or(0);
    let max = values.iter().copied().max().unwrap_or(0);

    for (i, point) in points.iter().enumerate() {
        let label = point
            .label
            .clone()
            .unwrap_or_else(|| locale::month_name(lang, i).to_string());

        match point.avg_temp_c {
            Some(v) => {
                let len = 1 + (v - min) * (BAR_WIDTH - 1) / (max - min).max(1);
                let bar = "█".repeat(len as usize);
                writeln!(out, "  {label:<8} {} {}", bar.with(palette.bar), temp(lang, v))?;
            }
            None => writeln!(out, "  {label:<8} {}", "--".with(palette.muted))?,
        }
    }
    writeln!(out)
}

fn forecast(out: &mut String, entries: &[ForecastEntry], prefs: Preferences) -> fmt::Result {
    let lang = prefs.language;
    let palette = Palette::for_theme(prefs.theme);

    writeln!(out, "{}", locale::text(lang, Key::ForecastTitle).with(palette.title).bold())?;

    if entries.is_empty() {
        return writeln!(out, "  {}", locale::text(lang, Key::ForecastEmpty).with(palette.muted));
    }

    for (i, entry) in entries.iter().enumerate() {
        let day = if i == 0 { locale::text(lang, Key::Today) } else { entry.weekday.as_str() };
        // Pad before styling; escape codes would otherwise count towards the width.
        let max = entry.max_temp_c.map_or_else(|| "--".to_string(), |v| temp(lang, v));
        writeln!(
            out,
            "  {day:<10} {}  {}  {}",
            entry.icon,
            format!("{max:>6}").with(palette.accent),
            entry.label.as_str().with(palette.muted)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use weatherdash_core::WeatherCode;

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            city_name: "Tehran".into(),
            temperature_c: 22,
            high_c: 24,
            low_c: 19,
            feels_like_c: 20,
            condition: "clear sky".into(),
            icon_url: "https://openweathermap.org/img/wn/01d@2x.png".into(),
            utc_offset_secs: 12_600,
            coord: None,
        }
    }

    fn clock() -> ClockState {
        ClockState { day: "Friday".into(), date: "Mar 15, 2024".into(), hour: "10:07 PM".into() }
    }

    fn monthly_points() -> Vec<MonthlyPoint> {
        (1..=12)
            .map(|m| MonthlyPoint {
                month: format!("2024-{m:02}"),
                label: None,
                avg_temp_c: (m != 6).then_some(m as i32),
            })
            .collect()
    }

    #[test]
    fn empty_forecast_shows_placeholder() {
        let view = ViewState { snapshot: Some(snapshot()), ..ViewState::default() };
        let out = self::view(&view, &clock(), Preferences::default());

        assert!(out.contains("Tehran"));
        assert!(out.contains("22°C"));
        assert!(out.contains("No forecast data available"));
    }

    #[test]
    fn monthly_gap_renders_dashes_and_fallback_labels() {
        let view = ViewState {
            snapshot: Some(snapshot()),
            monthly: monthly_points(),
            ..ViewState::default()
        };
        let out = self::view(&view, &clock(), Preferences::default());

        assert!(out.contains("(2024)"));
        assert!(out.contains("Jun"));
        assert!(out.contains("--"));
        assert!(out.contains("12°C"));
    }

    #[test]
    fn first_forecast_day_is_today_in_persian() {
        let code = WeatherCode(0);
        let entry = ForecastEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            weekday: "دوشنبه".into(),
            max_temp_c: Some(10),
            code,
            label: code.label(Language::Fa).into(),
            icon: code.icon().into(),
        };
        let prefs = Preferences { language: Language::Fa, theme: Theme::Dark };
        let view = ViewState { forecast: vec![entry.clone(), entry], ..ViewState::default() };
        let out = self::view(&view, &clock(), prefs);

        assert!(out.contains("امروز"));
        assert!(out.contains("دوشنبه"));
        assert!(out.contains("۱۰°C"));
    }

    #[test]
    fn forecast_temperatures_are_right_aligned() {
        let code = WeatherCode(3);
        let entry = |max_temp_c| ForecastEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            weekday: "Mon".into(),
            max_temp_c,
            code,
            label: code.label(Language::En).into(),
            icon: code.icon().into(),
        };
        let view = ViewState {
            forecast: vec![entry(Some(5)), entry(Some(-12)), entry(None)],
            ..ViewState::default()
        };
        let out = self::view(&view, &clock(), Preferences::default());

        assert!(out.contains("   5°C"));
        assert!(out.contains(" -12°C"));
        assert!(out.contains("    --"));
    }
}
