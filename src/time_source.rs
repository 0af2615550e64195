//! Persisted countdown target and display timezone.
//!
//! Both values are plain strings in a [`KeyValueStore`]. Reads never fail: a
//! missing, empty or unparseable entry yields the compiled-in default.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::config::WidgetConfig;
use crate::storage::KeyValueStore;

/// 2025-02-10T00:00:00+08:00, used if the configured default itself is bad.
const FALLBACK_TARGET_MS: i64 = 1_739_116_800_000;

const LOCAL_INPUT_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a target instant.
///
/// Accepts RFC 3339 (`2025-02-10T00:00:00+08:00`, `...Z`), a bare date (UTC
/// midnight), or a `datetime-local` form value (`2025-02-10T00:00`) which is
/// read in the viewer's local zone.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in LOCAL_INPUT_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            // Skipped local times (DST gaps) have no instant.
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Storage form of an instant, identical to JavaScript's `toISOString()`.
pub fn to_iso_string(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub struct TimeSource {
    store: Box<dyn KeyValueStore>,
    target_key: String,
    timezone_key: String,
    default_target: DateTime<Utc>,
    default_timezone: String,
}

impl TimeSource {
    pub fn new(store: Box<dyn KeyValueStore>, config: &WidgetConfig) -> Self {
        let default_target = parse_instant(&config.default_target).unwrap_or_else(|| {
            tracing::warn!(
                raw = %config.default_target,
                "configured default target does not parse"
            );
            DateTime::from_timestamp_millis(FALLBACK_TARGET_MS).unwrap_or_default()
        });
        Self {
            store,
            target_key: config.target_key.clone(),
            timezone_key: config.timezone_key.clone(),
            default_target,
            default_timezone: config.default_timezone.clone(),
        }
    }

    pub fn default_target(&self) -> DateTime<Utc> {
        self.default_target
    }

    pub fn default_timezone(&self) -> &str {
        &self.default_timezone
    }

    pub fn current_target(&self) -> DateTime<Utc> {
        let Some(raw) = self.store.get(&self.target_key).filter(|s| !s.is_empty()) else {
            return self.default_target;
        };
        match parse_instant(&raw) {
            Some(instant) => instant,
            None => {
                tracing::warn!(%raw, "stored target is malformed, using default");
                self.default_target
            }
        }
    }

    pub fn current_timezone(&self) -> String {
        self.store
            .get(&self.timezone_key)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.default_timezone.clone())
    }

    pub fn set_target_instant(&mut self, instant: DateTime<Utc>) {
        self.store.set(&self.target_key, &to_iso_string(&instant));
    }

    /// Persist `raw` if it parses; otherwise leave storage untouched.
    /// Returns whether anything was written.
    pub fn set_target(&mut self, raw: &str) -> bool {
        match parse_instant(raw) {
            Some(instant) => {
                self.set_target_instant(instant);
                true
            }
            None => {
                tracing::debug!(%raw, "ignoring unparseable target");
                false
            }
        }
    }

    pub fn set_timezone(&mut self, selector: &str) {
        self.store.set(&self.timezone_key, selector);
    }

    /// Forget both values so reads return the defaults again.
    pub fn clear(&mut self) {
        self.store.remove(&self.target_key);
        self.store.remove(&self.timezone_key);
    }
}
