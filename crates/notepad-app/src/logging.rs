//! Tracing subscriber setup for the `notepad` binary.
//!
//! Environment variables:
//!   LOG_FORMAT  - "json" or "text" (default: "text")
//!   LOG_FILE    - path to log file (optional, enables daily-rotated file logging)
//!   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
//!   RUST_LOG    - standard env filter (default: [`DEFAULT_FILTER`])
//!
//! Console output goes to stderr so it never interleaves with the note
//! listings written to stdout.

use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "notepad=info,notepad_app=info,notepad_client=info";

const DEFAULT_LOG_FILE_NAME: &str = "notepad.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub file: Option<PathBuf>,
    /// `None` leaves ANSI detection to the formatter (off for files).
    pub ansi: Option<bool>,
    /// Used when `RUST_LOG` is unset or unparsable.
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            file: None,
            ansi: None,
            default_filter: DEFAULT_FILTER.to_string(),
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            format: lookup("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
            file: lookup("LOG_FILE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            ansi: lookup("LOG_ANSI").map(|v| v == "true" || v == "1"),
            ..Self::default()
        }
    }

    /// Directory and file name prefix for the rolling appender.
    fn file_target(&self) -> Option<(PathBuf, String)> {
        let path = self.file.as_deref()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(DEFAULT_LOG_FILE_NAME)
            .to_string();
        Some((dir, name))
    }
}

/// Install the global subscriber. Keep the returned guard alive for as long
/// as file logging should flush.
pub fn init(config: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));
    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some((dir, name)) = config.file_target() {
        let file_appender = tracing_appender::rolling::daily(&dir, &name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        match config.format {
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .try_init()?,
            LogFormat::Text => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(config.ansi.unwrap_or(false)),
                )
                .try_init()?,
        }
        Some(guard)
    } else {
        match config.format {
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()?,
            LogFormat::Text => {
                let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
                if let Some(ansi) = config.ansi {
                    layer = layer.with_ansi(ansi);
                }
                registry.with(layer).try_init()?
            }
        }
        None
    };

    info!(
        log_format = ?config.format,
        log_file = config
            .file
            .as_deref()
            .and_then(Path::to_str)
            .unwrap_or("(stderr)"),
        "Logging initialized"
    );
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> LogConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LogConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(config_from(&[]), LogConfig::default());
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(config_from(&[("LOG_FORMAT", "json")]).format, LogFormat::Json);
        assert_eq!(config_from(&[("LOG_FORMAT", "JSON")]).format, LogFormat::Json);
        assert_eq!(config_from(&[("LOG_FORMAT", "pretty")]).format, LogFormat::Text);
    }

    #[test]
    fn test_ansi_override() {
        assert_eq!(config_from(&[("LOG_ANSI", "true")]).ansi, Some(true));
        assert_eq!(config_from(&[("LOG_ANSI", "1")]).ansi, Some(true));
        assert_eq!(config_from(&[("LOG_ANSI", "false")]).ansi, Some(false));
        assert_eq!(config_from(&[]).ansi, None);
    }

    #[test]
    fn test_file_target_split() {
        let config = config_from(&[("LOG_FILE", "/var/log/notepad/app.log")]);
        assert_eq!(
            config.file_target(),
            Some((PathBuf::from("/var/log/notepad"), "app.log".to_string()))
        );

        let bare = config_from(&[("LOG_FILE", "app.log")]);
        assert_eq!(
            bare.file_target(),
            Some((PathBuf::from("."), "app.log".to_string()))
        );

        assert_eq!(config_from(&[("LOG_FILE", "  ")]).file_target(), None);
    }
}
