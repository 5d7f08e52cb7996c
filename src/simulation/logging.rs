//! Logging and tracing configuration
//!
//! This module provides centralized logging configuration for the simulation.
//! `RUST_LOG` overrides the default filter when set.

use std::io;
use tracing::{info, Level};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for the application
    pub level: Level,
    /// Whether to enable JSON formatting
    pub json_format: bool,
    /// Whether to log to file
    pub log_to_file: bool,
    /// Log file directory (if logging to file)
    pub log_directory: Option<String>,
    /// Log file prefix (if logging to file)
    pub log_file_prefix: String,
    /// Whether to enable span events
    pub enable_span_events: bool,
    /// Whether to enable ansi colors in console output
    pub enable_ansi: bool,
    /// Custom environment filter
    pub env_filter: Option<String>,
}

/// Keeps the non-blocking log writers flushing; drop it at process exit
#[derive(Debug)]
pub struct LoggingGuard {
    _guards: Vec<WorkerGuard>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
            log_to_file: false,
            log_directory: None,
            log_file_prefix: "venue-position-faker".to_string(),
            enable_span_events: false,
            enable_ansi: true,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration selected by the command line flags.
    ///
    /// `--debug` wins over `--verbose`; without either only warnings are shown.
    pub fn from_flags(verbose: bool, debug: bool, json: bool, log_dir: Option<&str>) -> Self {
        let mut config = if debug {
            Self::new().with_level(Level::DEBUG).with_span_events()
        } else if verbose {
            Self::new().with_level(Level::INFO)
        } else {
            Self::new().with_level(Level::WARN)
        };

        if json {
            config = config.with_json_format().without_ansi();
        }
        if let Some(dir) = log_dir {
            config = config.with_file_logging(dir);
        }
        config
    }

    /// Set the log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enable JSON formatting
    pub fn with_json_format(mut self) -> Self {
        self.json_format = true;
        self
    }

    /// Enable file logging
    pub fn with_file_logging(mut self, directory: impl Into<String>) -> Self {
        self.log_to_file = true;
        self.log_directory = Some(directory.into());
        self
    }

    /// Set log file prefix
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_file_prefix = prefix.into();
        self
    }

    /// Enable span events
    pub fn with_span_events(mut self) -> Self {
        self.enable_span_events = true;
        self
    }

    /// Disable ANSI colors
    pub fn without_ansi(mut self) -> Self {
        self.enable_ansi = false;
        self
    }

    /// Set custom environment filter
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Filter directive used when neither a custom filter nor `RUST_LOG` is set
    pub fn default_directive(&self) -> String {
        format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), self.level)
    }

    /// Initialize the global tracing subscriber
    ///
    /// Console output goes to stderr (pretty or JSON); file output, when
    /// enabled, is always JSON and rolls daily.
    pub fn init(self) -> Result<LoggingGuard, Box<dyn std::error::Error + Send + Sync>> {
        let env_filter = match &self.env_filter {
            Some(filter) => EnvFilter::try_new(filter)?,
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_directive())),
        };

        let span_events = if self.enable_span_events { FmtSpan::FULL } else { FmtSpan::NONE };
        let mut guards = Vec::new();

        let (console_writer, console_guard) = non_blocking(io::stderr());
        guards.push(console_guard);

        let console_layer = if self.json_format {
            fmt::layer()
                .json()
                .with_writer(console_writer)
                .with_span_events(span_events.clone())
                .boxed()
        } else {
            fmt::layer()
                .pretty()
                .with_writer(console_writer)
                .with_ansi(self.enable_ansi)
                .with_span_events(span_events.clone())
                .boxed()
        };

        let file_layer = if self.log_to_file {
            let log_dir = self.log_directory.as_deref().unwrap_or("logs");
            let (file_writer, file_guard) =
                non_blocking(rolling::daily(log_dir, &self.log_file_prefix));
            guards.push(file_guard);
            Some(fmt::layer().json().with_writer(file_writer).with_span_events(span_events).boxed())
        } else {
            None
        };

        Registry::default().with(env_filter).with(console_layer).with(file_layer).try_init()?;

        info!(
            level = %self.level,
            json = self.json_format,
            file = self.log_to_file,
            "Logging initialized"
        );
        Ok(LoggingGuard { _guards: guards })
    }
}

/// Macro for creating structured log events with simulation context
#[macro_export]
macro_rules! sim_event {
    ($level:ident, $message:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::$level!(
            message = $message,
            component = "simulation",
            $($key = $value,)*
        );
    };
    ($level:ident, $message:expr) => {
        tracing::$level!(
            message = $message,
            component = "simulation",
        );
    };
}

/// Macro for creating structured log events scoped to one device
#[macro_export]
macro_rules! device_event {
    ($level:ident, $message:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::$level!(
            message = $message,
            component = "device",
            $($key = $value,)*
        );
    };
}

/// Macro for creating the span that wraps one simulation step
#[macro_export]
macro_rules! step_span {
    ($step:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::debug_span!(
            "step",
            component = "performance",
            step = $step,
            $($key = $value,)*
        )
    };
    ($step:expr) => {
        tracing::debug_span!(
            "step",
            component = "performance",
            step = $step,
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_logging_config_creation() {
        let config = LoggingConfig::new();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.json_format);
        assert!(!config.log_to_file);
        assert!(config.log_directory.is_none());
        assert_eq!(config.log_file_prefix, "venue-position-faker");
        assert!(!config.enable_span_events);
        assert!(config.enable_ansi);
        assert!(config.env_filter.is_none());
    }

    #[test]
    fn test_logging_config_builder_pattern() {
        let config = LoggingConfig::new()
            .with_level(Level::DEBUG)
            .with_json_format()
            .with_file_logging("test_logs")
            .with_file_prefix("test_prefix")
            .with_span_events()
            .without_ansi()
            .with_env_filter("debug");

        assert_eq!(config.level, Level::DEBUG);
        assert!(config.json_format);
        assert!(config.log_to_file);
        assert_eq!(config.log_directory, Some("test_logs".to_string()));
        assert_eq!(config.log_file_prefix, "test_prefix");
        assert!(config.enable_span_events);
        assert!(!config.enable_ansi);
        assert_eq!(config.env_filter, Some("debug".to_string()));
    }

    #[test]
    fn test_flag_presets() {
        let quiet = LoggingConfig::from_flags(false, false, false, None);
        assert_eq!(quiet.level, Level::WARN);
        assert_eq!(quiet.default_directive(), "venue_position_faker=WARN");

        let verbose = LoggingConfig::from_flags(true, false, false, None);
        assert_eq!(verbose.level, Level::INFO);
        assert!(!verbose.enable_span_events);

        let debug = LoggingConfig::from_flags(true, true, true, Some("logs/run"));
        assert_eq!(debug.level, Level::DEBUG);
        assert!(debug.enable_span_events);
        assert!(debug.json_format);
        assert!(!debug.enable_ansi);
        assert!(debug.log_to_file);
        assert_eq!(debug.log_directory.as_deref(), Some("logs/run"));
    }

    #[test]
    fn test_default_logging_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.json_format);
        assert!(!config.log_to_file);
    }
}
