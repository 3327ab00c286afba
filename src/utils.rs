//! Utils

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Arguments for the optimiser example
#[derive(Debug, Parser)]
pub struct ExampleOptimiseArgs {
    /// Cart fixture to optimise
    #[clap(short, long, default_value = "office")]
    pub fixture: String,

    /// Category to optimise for
    #[clap(short, long, default_value = "standard")]
    pub category: String,

    /// Number of cart lines to use
    #[clap(short, long)]
    pub n: Option<usize>,

    /// Admin cost per account, in minor units
    #[clap(short, long)]
    pub admin_cost: Option<i64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Errors raised while initialising logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to initialise tracing subscriber.
    #[error("failed to initialise tracing subscriber: {0}")]
    TracingSubscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Install a global `tracing` subscriber writing to stderr.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(log_level: &str, log_format: LogFormat) -> Result<(), LoggingError> {
    match log_format {
        LogFormat::Compact => init_with_layer(
            log_level,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(true),
        ),
        LogFormat::Json => init_with_layer(
            log_level,
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true),
        ),
    }
}

fn build_env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_err| EnvFilter::new(log_level))
}

fn init_with_layer<L>(log_level: &str, fmt_layer: L) -> Result<(), LoggingError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_env_filter(log_level))
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn args_have_defaults() {
        let args = ExampleOptimiseArgs::parse_from(["optimise"]);

        assert_eq!(args.fixture, "office");
        assert_eq!(args.category, "standard");
        assert!(args.n.is_none());
        assert!(args.admin_cost.is_none());
    }

    #[test]
    fn args_parse_overrides() {
        let args = ExampleOptimiseArgs::parse_from([
            "optimise",
            "-f",
            "banquet",
            "-c",
            "dual",
            "-a",
            "7500",
            "--log-format",
            "json",
        ]);

        assert_eq!(args.fixture, "banquet");
        assert_eq!(args.category, "dual");
        assert_eq!(args.admin_cost, Some(7_500));
        assert!(matches!(args.log_format, LogFormat::Json));
    }
}
