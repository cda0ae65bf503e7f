//! Error types for the Canoga game engine

use thiserror::Error;

/// Main error type for the Canoga engine
#[derive(Debug, Clone, Error)]
pub enum CanogaError {
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: String,
    },

    #[error("Save file error: {message}")]
    SaveFormat {
        message: String,
        line: Option<String>,
    },

    #[error("I/O error: {message}")]
    Io { message: String },
}

impl CanogaError {
    /// Build a validation error scoped to one named field.
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        CanogaError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Build a save-format error tagged with the offending line.
    pub fn save_format(message: impl Into<String>, line: impl Into<String>) -> Self {
        CanogaError::SaveFormat {
            message: message.into(),
            line: Some(line.into()),
        }
    }
}

impl From<std::io::Error> for CanogaError {
    fn from(err: std::io::Error) -> Self {
        CanogaError::Io {
            message: err.to_string(),
        }
    }
}

/// Type alias for the main result type used throughout the library
pub type GameResult<T> = Result<T, CanogaError>;

/// Logging configuration and initialization
pub mod logging {
    use tracing::Level;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    use std::env;

    /// Logging output format
    #[derive(Debug, Clone)]
    pub enum LogFormat {
        Human,
        Json,
    }

    /// Logging output destination
    #[derive(Debug, Clone)]
    pub enum LogOutput {
        Stdout,
        Stderr,
    }

    /// Logging configuration
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        pub level: Level,
        pub format: LogFormat,
        pub output: LogOutput,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                format: LogFormat::Human,
                output: LogOutput::Stderr,
            }
        }
    }

    /// Initialize structured logging with the given configuration
    pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let env_filter = EnvFilter::builder()
            .with_default_directive(config.level.into())
            .from_env_lossy()
            .add_directive("canoga=trace".parse()?);

        let registry = tracing_subscriber::registry().with(env_filter);

        match config.format {
            LogFormat::Human => {
                let fmt_layer = fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true);

                match config.output {
                    LogOutput::Stdout => registry.with(fmt_layer.with_writer(std::io::stdout)).init(),
                    LogOutput::Stderr => registry.with(fmt_layer.with_writer(std::io::stderr)).init(),
                }
            }
            LogFormat::Json => {
                let fmt_layer = fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true);

                match config.output {
                    LogOutput::Stdout => registry.with(fmt_layer.with_writer(std::io::stdout)).init(),
                    LogOutput::Stderr => registry.with(fmt_layer.with_writer(std::io::stderr)).init(),
                }
            }
        }

        Ok(())
    }

    /// Initialize logging with environment-based configuration
    pub fn init_from_env() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let level = env::var("CANOGA_LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string())
            .parse::<Level>()
            .unwrap_or(Level::INFO);

        let format = match env::var("CANOGA_LOG_FORMAT").as_ref().map(|s| s.as_str()) {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Human,
        };

        let output = match env::var("CANOGA_LOG_OUTPUT").as_ref().map(|s| s.as_str()) {
            Ok("stdout") => LogOutput::Stdout,
            _ => LogOutput::Stderr,
        };

        let config = LoggingConfig { level, format, output };
        init_logging(config)
    }
}
