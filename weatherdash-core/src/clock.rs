//! Wall-clock labels for a city, derived from its UTC offset.
//!
//! [`ClockState::compute`] is pure. [`ClockTicker`] recomputes it on a fixed
//! cadence in a background task that lives exactly as long as the ticker.

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::{
    locale::{self, Language},
    preferences::Preferences,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockState {
    pub day: String,
    pub date: String,
    pub hour: String,
}

impl ClockState {
    pub fn compute(now: DateTime<Utc>, utc_offset_secs: i32, lang: Language) -> Self {
        let local = city_time(now, utc_offset_secs);
        let month = locale::month_name(lang, local.month0() as usize);

        let (date, hour) = match lang {
            Language::En => {
                let (pm, h12) = local.hour12();
                (
                    format!("{month} {:02}, {}", local.day(), local.year()),
                    format!("{h12}:{:02} {}", local.minute(), if pm { "PM" } else { "AM" }),
                )
            }
            Language::Fa => {
                let date = format!("{:02} {month} {}", local.day(), local.year());
                let hour = format!("{}:{:02}", local.hour(), local.minute());
                (locale::localize_digits(lang, &date), locale::localize_digits(lang, &hour))
            }
        };

        Self {
            day: locale::weekday_long(lang, local.weekday()).to_string(),
            date,
            hour,
        }
    }
}

/// The city's local wall-clock time for the instant `now`.
pub fn city_time(now: DateTime<Utc>, utc_offset_secs: i32) -> NaiveDateTime {
    now.naive_utc() + Duration::seconds(i64::from(utc_offset_secs))
}

/// Repeating clock task bound to one snapshot's offset.
///
/// The language is read from the preference subscription at every tick, so a
/// language switch shows up on the next tick. Dropping the ticker aborts the task.
#[derive(Debug)]
pub struct ClockTicker {
    handle: JoinHandle<()>,
    rx: watch::Receiver<ClockState>,
}

impl ClockTicker {
    pub fn spawn(
        utc_offset_secs: i32,
        prefs: watch::Receiver<Preferences>,
        period: std::time::Duration,
    ) -> Self {
        let first = ClockState::compute(Utc::now(), utc_offset_secs, prefs.borrow().language);
        let (tx, rx) = watch::channel(first);

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                let lang = prefs.borrow().language;
                let state = ClockState::compute(Utc::now(), utc_offset_secs, lang);
                if tx.send(state).is_err() {
                    tracing::debug!("clock has no viewers left, stopping");
                    break;
                }
            }
        });

        Self { handle, rx }
    }

    pub fn subscribe(&self) -> watch::Receiver<ClockState> {
        self.rx.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
