use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{LogFormat, LoggingConfig};

/// Filter used when `RUST_LOG` is unset; sqlx statement logging stays quiet
fn default_filter(level: &str) -> String {
    format!("{},sqlx=warn", level)
}

/// Install the global subscriber
///
/// Logs go to stderr so command output on stdout stays machine readable.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(&config.level)))?;

    match config.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .try_init()?;
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .try_init()?;
        }
    }

    tracing::debug!("Logging initialized with level: {}", config.level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        let directive = default_filter("debug");
        assert_eq!(directive, "debug,sqlx=warn");
        assert!(EnvFilter::try_new(directive).is_ok());
    }
}
