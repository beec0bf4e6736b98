//! Runtime configuration resolved from global flags and environment.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rota_engine::api::Presenter;
use rota_engine::timezone;

pub struct Config {
    /// JSON snapshot holding staff, events and assignments.
    pub data_path: PathBuf,
    /// Zone for naive datetime input and for rendered output.
    pub timezone: Tz,
    /// Clock used to derive event status.
    pub now: DateTime<Utc>,
}

impl Config {
    pub fn resolve(data_path: PathBuf, tz: &str, now: Option<&str>) -> Result<Self> {
        let timezone = timezone::parse_timezone(tz).context("Failed to read --tz")?;
        let now = match now {
            Some(text) => timezone::parse_instant(text, timezone).context("Failed to read --now")?,
            None => Utc::now(),
        };
        tracing::debug!(data = %data_path.display(), %timezone, %now, "resolved config");
        Ok(Self {
            data_path,
            timezone,
            now,
        })
    }

    pub fn presenter(&self) -> Presenter {
        Presenter::new(self.timezone)
    }
}
