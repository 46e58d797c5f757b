//! Logging and tracing infrastructure
//!
//! Structured logging for the portal crates, with configurable output
//! formats and optional file logging.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Whether to include file and line location
    pub include_location: bool,
    /// Whether to include thread names
    pub include_thread: bool,
    /// Whether to log to file
    pub log_to_file: bool,
    /// Log file path, required when `log_to_file` is set
    pub log_file_path: Option<String>,
    /// Per-target filter directives, e.g. "kwoon_portal=debug"
    pub filter_directives: Vec<String>,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format for machine processing
    Json,
    /// Human-readable multi-line format
    Pretty,
    /// Single-line format
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
            include_thread: false,
            log_to_file: false,
            log_file_path: None,
            filter_directives: vec![
                "kwoon_core=debug".to_string(),
                "kwoon_auth=debug".to_string(),
                "kwoon_portal=debug".to_string(),
            ],
        }
    }
}

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level when set.
/// Call once at startup; a second call returns an error from the
/// underlying registry.
pub fn init_logging(
    config: &LoggingConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    for directive in &config.filter_directives {
        filter = filter.add_directive(directive.parse()?);
    }

    let base = fmt::layer()
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_thread_names(config.include_thread);

    let layer: Box<dyn Layer<_> + Send + Sync> = if config.log_to_file {
        let path = config
            .log_file_path
            .as_ref()
            .ok_or("log_to_file is set but log_file_path is missing")?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        match config.format {
            LogFormat::Json => base.json().with_writer(file).boxed(),
            LogFormat::Pretty => base.pretty().with_writer(file).boxed(),
            LogFormat::Compact => base.compact().with_writer(file).boxed(),
        }
    } else {
        match config.format {
            LogFormat::Json => base.json().with_writer(std::io::stdout).boxed(),
            LogFormat::Pretty => base.pretty().with_writer(std::io::stdout).boxed(),
            LogFormat::Compact => base.compact().with_writer(std::io::stdout).boxed(),
        }
    };

    tracing_subscriber::registry().with(filter).with(layer).init();

    Ok(())
}
