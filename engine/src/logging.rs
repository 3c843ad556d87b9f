use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_level: String,
    pub with_ansi: bool,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            with_ansi: std::env::var("NO_COLOR").is_err(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        EnvFilter::try_new(&self.log_level)
            .map(|_| ())
            .map_err(|e| format!("Invalid log filter '{}': {}", self.log_level, e))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            with_ansi: true,
        }
    }
}

/// Installs the global subscriber. Logs go to stderr so stdout can carry the report.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    config.validate()?;

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.with_ansi),
        )
        .try_init()?;

    Ok(())
}
