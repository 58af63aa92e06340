use anyhow::{Context, anyhow};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text, validator::Validation};
use std::{io::Write, time::Duration};

use weatherdash_core::{
    ClockState, ClockTicker, Config, Dashboard, DashboardStore, Language, PreferenceHub,
    Preferences, ProviderId, RefreshStatus, Theme,
    locale::{self, Key},
    user::validate_user_name,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store your name and get a greeting.
    Login {
        /// 2 to 31 characters.
        name: String,
    },

    /// Show current conditions, the two-week forecast and monthly averages.
    Show {
        /// City name; defaults to the configured city.
        city: Option<String>,
    },

    /// Search cities interactively. Type `:lang fa`, `:theme toggle` or `:quit`.
    Search,

    /// Live local clock for a city. Stop with Ctrl-C.
    Clock {
        /// City name; defaults to the configured city.
        city: Option<String>,
    },

    /// Switch the display language.
    Lang {
        /// "en" or "fa".
        language: String,
    },

    /// Switch the color theme.
    Theme {
        #[arg(value_enum)]
        mode: ThemeArg,
    },

    /// Set API key, language, theme and default city interactively.
    Configure,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Login { name } => login(&mut config, &name),
            Command::Show { city } => show(&config, city).await,
            Command::Search => search(&mut config).await,
            Command::Clock { city } => clock(&config, city).await,
            Command::Lang { language } => {
                let language = Language::try_from(language.as_str())?;
                config.preferences.language = language;
                config.save()?;
                println!(
                    "{}: {}",
                    locale::text(language, Key::LanguageLabel),
                    language.display_name(language)
                );
                Ok(())
            }
            Command::Theme { mode } => {
                let theme = match mode {
                    ThemeArg::Light => Theme::Light,
                    ThemeArg::Dark => Theme::Dark,
                    ThemeArg::Toggle => config.preferences.theme.toggled(),
                };
                config.preferences.theme = theme;
                config.save()?;
                println!("{}: {theme}", locale::text(config.preferences.language, Key::Mode));
                Ok(())
            }
            Command::Configure => configure(&mut config),
        }
    }
}

fn login(config: &mut Config, name: &str) -> anyhow::Result<()> {
    let lang = config.preferences.language;
    let name = validate_user_name(name).map_err(|e| anyhow!(e.user_message(lang)))?;

    config.user_name = Some(name.clone());
    config.save()?;

    println!("{}", locale::welcome(lang, &name));
    Ok(())
}

fn store_for(config: &Config, hub: &PreferenceHub) -> anyhow::Result<DashboardStore> {
    let dashboard = Dashboard::from_config(config)?;
    Ok(DashboardStore::new(dashboard, hub.subscribe()))
}

/// Refresh `city` and print whatever the store shows afterwards.
async fn refresh_and_render(store: &DashboardStore, city: &str, prefs: Preferences) {
    eprintln!("{}", locale::text(prefs.language, Key::Loading));

    match store.refresh(city).await {
        RefreshStatus::Installed { warning } => {
            if let Some(err) = warning {
                tracing::debug!(error = ?err, "partial dashboard");
                eprintln!("{}", render::error_line(err.user_message(prefs.language), prefs));
            }
        }
        RefreshStatus::Failed(err) => {
            tracing::debug!(error = ?err, "refresh failed");
            eprintln!("{}", render::error_line(err.user_message(prefs.language), prefs));
        }
        RefreshStatus::Superseded => {}
    }

    let view = store.snapshot();
    let offset = view.snapshot.as_ref().map(|s| s.utc_offset_secs);
    let clock = offset
        .map(|o| ClockState::compute(Utc::now(), o, prefs.language))
        .unwrap_or_default();

    println!("{}", render::view(&view, &clock, prefs));
}

async fn show(config: &Config, city: Option<String>) -> anyhow::Result<()> {
    let hub = PreferenceHub::new(config.preferences);
    let store = store_for(config, &hub)?;
    let city = city.unwrap_or_else(|| config.default_city.clone());

    refresh_and_render(&store, &city, hub.current()).await;
    Ok(())
}

async fn search(config: &mut Config) -> anyhow::Result<()> {
    let hub = PreferenceHub::new(config.preferences);
    let store = store_for(config, &hub)?;

    let lang = hub.current().language;
    println!("{}", locale::text(lang, Key::AppTitle));
    if let Some(name) = &config.user_name {
        println!("{}", locale::welcome(lang, name));
    }

    loop {
        let prefs = hub.current();
        let empty_msg = locale::text(prefs.language, Key::CityRequired);

        let input = Text::new(locale::text(prefs.language, Key::Search))
            .with_placeholder(&config.default_city)
            .with_validator(move |s: &str| {
                if s.trim().is_empty() {
                    Ok(Validation::Invalid(empty_msg.into()))
                } else {
                    Ok(Validation::Valid)
                }
            })
            .prompt();

        let input = match input {
            Ok(s) => s,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city"),
        };
        let input = input.trim();

        if let Some(cmd) = input.strip_prefix(':') {
            if !apply_command(cmd, &hub)? {
                break;
            }
            config.preferences = hub.current();
            config.save()?;
            continue;
        }

        refresh_and_render(&store, input, prefs).await;
    }

    println!("{}", locale::text(hub.current().language, Key::Exit));
    Ok(())
}

/// Handle a `:command` typed into the search prompt. Returns `false` to quit.
fn apply_command(cmd: &str, hub: &PreferenceHub) -> anyhow::Result<bool> {
    let mut parts = cmd.split_whitespace();

    match (parts.next(), parts.next()) {
        (Some("quit" | "q" | "exit"), _) => return Ok(false),
        (Some("lang"), Some(value)) => {
            hub.set_language(Language::try_from(value)?);
        }
        (Some("theme"), Some("toggle")) | (Some("theme"), None) => {
            hub.toggle_theme();
        }
        (Some("theme"), Some(value)) => {
            hub.set_theme(Theme::try_from(value)?);
        }
        _ => {
            eprintln!("Commands: :lang <en|fa>, :theme [light|dark|toggle], :quit");
        }
    }

    Ok(true)
}

async fn clock(config: &Config, city: Option<String>) -> anyhow::Result<()> {
    let hub = PreferenceHub::new(config.preferences);
    let store = store_for(config, &hub)?;
    let city = city.unwrap_or_else(|| config.default_city.clone());

    let prefs = hub.current();
    if let RefreshStatus::Failed(err) = store.refresh(&city).await {
        return Err(anyhow!(err.user_message(prefs.language)));
    }
    let Some(snapshot) = store.snapshot().snapshot else {
        return Ok(());
    };

    let ticker =
        ClockTicker::spawn(snapshot.utc_offset_secs, hub.subscribe(), Duration::from_secs(1));
    let mut rx = ticker.subscribe();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut stdout = std::io::stdout();
    loop {
        let line = render::clock_line(&snapshot.city_name, &rx.borrow_and_update(), prefs);
        print!("\r{line}   ");
        stdout.flush()?;

        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    ticker.stop();
    println!();
    Ok(())
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    if !key.trim().is_empty() {
        config.upsert_provider_api_key(ProviderId::OpenWeather, key.trim().to_string());
    }

    let language = Select::new("Language:", Language::all().to_vec()).prompt()?;
    let theme = Select::new("Theme:", vec![Theme::Light, Theme::Dark]).prompt()?;
    let city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()?;

    config.preferences = Preferences { language, theme };
    if !city.trim().is_empty() {
        config.default_city = city.trim().to_string();
    }
    config.save()?;

    let path = Config::config_file_path()?;
    println!("Saved configuration to {}", path.display());
    for line in provider_status(config) {
        println!("{line}");
    }
    Ok(())
}

fn provider_status(config: &Config) -> Vec<String> {
    ProviderId::all()
        .iter()
        .map(|&id| {
            let status = if config.is_provider_configured(id) {
                "ready"
            } else {
                "missing API key"
            };
            format!("  {id:<20} {status}")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_city() {
        let cli = Cli::try_parse_from(["weatherdash", "show", "Shiraz"]).unwrap();
        assert!(matches!(cli.command, Command::Show { city: Some(ref c) } if c == "Shiraz"));
    }

    #[test]
    fn parses_theme_toggle() {
        let cli = Cli::try_parse_from(["weatherdash", "theme", "toggle"]).unwrap();
        assert!(matches!(cli.command, Command::Theme { mode: ThemeArg::Toggle }));
    }

    #[test]
    fn rejects_unknown_theme() {
        assert!(Cli::try_parse_from(["weatherdash", "theme", "sepia"]).is_err());
    }

    #[test]
    fn prompt_commands_update_preferences() {
        let hub = PreferenceHub::default();

        assert!(apply_command("lang fa", &hub).unwrap());
        assert_eq!(hub.current().language, Language::Fa);

        assert!(apply_command("theme", &hub).unwrap());
        assert_eq!(hub.current().theme, Theme::Dark);

        assert!(apply_command("theme light", &hub).unwrap());
        assert_eq!(hub.current().theme, Theme::Light);

        assert!(!apply_command("quit", &hub).unwrap());
        assert!(apply_command("lang xx", &hub).is_err());
    }

    #[test]
    fn provider_status_flags_missing_key() {
        let mut config = Config::default();
        let lines = provider_status(&config);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("openweather") && lines[0].ends_with("missing API key"));
        assert!(lines[1].ends_with("ready"));

        config.upsert_provider_api_key(ProviderId::OpenWeather, "KEY".into());
        assert!(provider_status(&config)[0].ends_with("ready"));
    }
}
