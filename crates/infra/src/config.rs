//! Engine configuration.
//!
//! Values come from `STOCKYARD_*` environment variables; anything missing or
//! malformed falls back to the default with a warning.

use serde::{Deserialize, Serialize};

use stockyard_inventory::DEFAULT_MAX_DEPTH;
use stockyard_observability::{LogFormat, LogSettings};

pub const ENV_MAX_DEPTH: &str = "STOCKYARD_MAX_DEPTH";
pub const ENV_ALERT_LIST_LIMIT: &str = "STOCKYARD_ALERT_LIST_LIMIT";
pub const ENV_RECENT_ALERT_LIMIT: &str = "STOCKYARD_RECENT_ALERT_LIMIT";
pub const ENV_LOG: &str = "STOCKYARD_LOG";
pub const ENV_LOG_FORMAT: &str = "STOCKYARD_LOG_FORMAT";

pub const DEFAULT_ALERT_LIST_LIMIT: usize = 50;
pub const DEFAULT_RECENT_ALERT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Deepest location hierarchy the aggregator will build.
    pub max_depth: usize,
    /// Alerts returned by one listing call.
    pub alert_list_limit: usize,
    /// Unread alerts included in the inventory summary.
    pub recent_alert_limit: usize,
    pub log: LogSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            alert_list_limit: DEFAULT_ALERT_LIST_LIMIT,
            recent_alert_limit: DEFAULT_RECENT_ALERT_LIMIT,
            log: LogSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Read the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log = LogSettings {
            filter: lookup(ENV_LOG)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.log.filter),
            format: match lookup(ENV_LOG_FORMAT) {
                None => defaults.log.format,
                Some(raw) => LogFormat::parse(&raw).unwrap_or_else(|| {
                    tracing::warn!(
                        key = ENV_LOG_FORMAT,
                        value = %raw,
                        "unrecognized log format; using json"
                    );
                    defaults.log.format
                }),
            },
        };

        Self {
            max_depth: positive(&lookup, ENV_MAX_DEPTH, defaults.max_depth),
            alert_list_limit: positive(&lookup, ENV_ALERT_LIST_LIMIT, defaults.alert_list_limit),
            recent_alert_limit: positive(
                &lookup,
                ENV_RECENT_ALERT_LIMIT,
                defaults.recent_alert_limit,
            ),
            log,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_alert_list_limit(mut self, limit: usize) -> Self {
        self.alert_list_limit = limit;
        self
    }

    pub fn with_recent_alert_limit(mut self, limit: usize) -> Self {
        self.recent_alert_limit = limit;
        self
    }

    pub fn with_log(mut self, log: LogSettings) -> Self {
        self.log = log;
        self
    }
}

fn positive<F>(lookup: &F, key: &str, default: usize) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };

    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => value,
        _ => {
            tracing::warn!(key, value = %raw, default, "invalid setting; using default");
            default
        }
    }
}
