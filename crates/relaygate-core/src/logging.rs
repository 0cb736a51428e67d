//! Tracing subscriber setup for gateways embedding the relay core.
//!
//! The default filter keeps third-party crates at `warn` and this crate at
//! `info`, so breaker transitions show up without dependency chatter.
//! `RELAYGATE_LOG` replaces the configured directives wholesale.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable overriding [`LogConfig::directives`].
pub const LOG_ENV_VAR: &str = "RELAYGATE_LOG";

/// Output encoding of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level for every target without an override.
    pub level: String,
    /// Per-target levels, e.g. `relaygate-core → debug`.
    pub targets: BTreeMap<String, String>,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            targets: BTreeMap::from([("relaygate_core".to_string(), "info".to_string())]),
            format: LogFormat::Text,
        }
    }
}

impl LogConfig {
    /// Raise this crate's events to `debug` (cache misses, fetches, per-node failures).
    pub fn verbose(mut self) -> Self {
        self.targets.insert("relaygate_core".into(), "debug".into());
        self
    }

    /// Filter directives, e.g. `warn,relaygate_core=info`.
    pub fn directives(&self) -> String {
        self.targets
            .iter()
            .fold(self.level.clone(), |mut acc, (target, level)| {
                acc.push_str(&format!(",{}={}", target.replace('-', "_"), level));
                acc
            })
    }

    fn filter(&self) -> Result<EnvFilter, LogInitError> {
        match std::env::var(LOG_ENV_VAR) {
            Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
                .map_err(|e| LogInitError::Directives { directives, reason: e.to_string() }),
            _ => {
                let directives = self.directives();
                EnvFilter::try_new(&directives)
                    .map_err(|e| LogInitError::Directives { directives, reason: e.to_string() })
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("invalid log directives {directives:?}: {reason}")]
    Directives { directives: String, reason: String },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
}

/// Install the global subscriber described by `config`.
pub fn init_tracing(config: &LogConfig) -> Result<(), LogInitError> {
    let filter = config.filter()?;
    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Text => registry.with(fmt::layer()).try_init(),
    };
    installed.map_err(|_| LogInitError::AlreadyInstalled)
}
