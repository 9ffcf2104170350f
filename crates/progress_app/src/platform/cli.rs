use std::path::PathBuf;

use clap::Parser;

use super::logging::LogDestination;

/// Streams download progress for one or more profile URLs.
#[derive(Debug, Parser)]
#[command(name = "progress-client", version)]
pub struct Cli {
    /// Profile URLs, processed one after another.
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<String>,

    /// Download endpoint that answers with the event stream.
    #[arg(long, env = "PROGRESS_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Connect timeout in seconds. The stream itself has no timeout.
    #[arg(long, value_name = "SECS", env = "PROGRESS_CONNECT_TIMEOUT")]
    pub connect_timeout: Option<u64>,

    /// RON config file. Defaults to ./progress_client.ron when present.
    #[arg(short, long, value_name = "PATH", env = "PROGRESS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug or trace.
    #[arg(long, env = "PROGRESS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Where log output goes.
    #[arg(long, value_enum)]
    pub log_destination: Option<LogDestination>,
}
