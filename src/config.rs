use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// Student roster sidecar: JSON requests on stdin, one JSON response per line on stdout.
#[derive(Parser, Debug)]
#[command(name = "rosterd")]
#[command(version)]
pub struct Config {
    /// Log filter directive; `RUST_LOG` wins when set
    #[arg(long, env = "ROSTERD_LOG", default_value = "info")]
    pub log_filter: String,
}

/// Logs go to stderr; stdout carries the protocol.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
