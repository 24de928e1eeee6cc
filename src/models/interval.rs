use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A contiguous span during which a single application held focus.
///
/// Produced by the capture loop. Closed intervals are immutable; the most
/// recent one may still be open (`end_time == None`), in which case it is
/// treated as ending "now".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityInterval {
    pub id: String,
    pub bundle_id: String,
    pub app_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl ActivityInterval {
    pub fn new(
        bundle_id: impl Into<String>,
        app_name: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self> {
        if end_time < start_time {
            bail!(
                "interval ends before it starts ({} < {})",
                end_time.to_rfc3339(),
                start_time.to_rfc3339()
            );
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            bundle_id: bundle_id.into(),
            app_name: app_name.into(),
            start_time,
            end_time: Some(end_time),
        })
    }

    /// An interval that is still being recorded.
    pub fn open(
        bundle_id: impl Into<String>,
        app_name: impl Into<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            bundle_id: bundle_id.into(),
            app_name: app_name.into(),
            start_time,
            end_time: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn close(&mut self, end_time: DateTime<Utc>) -> Result<()> {
        if self.end_time.is_some() {
            bail!("interval {} is already closed", self.id);
        }
        if end_time < self.start_time {
            bail!("cannot close interval {} before its start", self.id);
        }
        self.end_time = Some(end_time);
        Ok(())
    }

    /// End timestamp with an open end resolved to `now`.
    ///
    /// Never earlier than `start_time`, even if `now` lags behind it.
    pub fn resolved_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.end_time.unwrap_or(now).max(self.start_time)
    }

    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        self.resolved_end(now) - self.start_time
    }
}
