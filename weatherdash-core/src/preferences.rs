//! Process-wide display preferences (language and theme).
//!
//! Views do not read a global; they hold a [`watch::Receiver`] obtained from
//! [`PreferenceHub::subscribe`] and are notified on every change.

use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};
use tokio::sync::watch;

use crate::locale::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Theme {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(anyhow::anyhow!("Unknown theme '{value}'. Supported themes: light, dark.")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub theme: Theme,
}

/// Owner of the current [`Preferences`]; the single place they change.
#[derive(Debug)]
pub struct PreferenceHub {
    tx: watch::Sender<Preferences>,
}

impl PreferenceHub {
    pub fn new(initial: Preferences) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> Preferences {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Preferences> {
        self.tx.subscribe()
    }

    /// Returns `true` if the language actually changed.
    pub fn set_language(&self, language: Language) -> bool {
        self.tx.send_if_modified(|p| {
            let changed = p.language != language;
            p.language = language;
            changed
        })
    }

    /// Returns `true` if the theme actually changed.
    pub fn set_theme(&self, theme: Theme) -> bool {
        self.tx.send_if_modified(|p| {
            let changed = p.theme != theme;
            p.theme = theme;
            changed
        })
    }

    pub fn toggle_theme(&self) -> Theme {
        self.tx.send_modify(|p| p.theme = p.theme.toggled());
        self.current().theme
    }
}

impl Default for PreferenceHub {
    fn default() -> Self {
        Self::new(Preferences::default())
    }
}
