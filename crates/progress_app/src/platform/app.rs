use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use progress_engine::{FrameDecoder, ReqwestTransport, SessionDriver};
use stream_logging::{stream_info, stream_warn};

use super::cli::Cli;
use super::config::AppConfig;
use super::logging;
use super::terminal::TerminalSink;

pub async fn run_app() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?.apply_cli(&cli);
    logging::initialize(config.log_destination, config.level_filter()?);

    let transport = ReqwestTransport::new(config.transport_settings())
        .with_context(|| format!("cannot use endpoint {:?}", config.endpoint))?;
    stream_info!(
        "progress-client starting endpoint={} urls={}",
        transport.endpoint(),
        cli.urls.len()
    );
    let driver = SessionDriver::new(
        Arc::new(transport),
        FrameDecoder::new(config.frame_format()),
    );
    let sink = Arc::new(TerminalSink::new());

    let mut failures = 0usize;
    for url in &cli.urls {
        // Sessions never overlap: each one is awaited before the next starts.
        let Some(handle) = driver.start(url, sink.clone())? else {
            stream_warn!("Skipping blank url argument");
            continue;
        };
        let report = handle.wait().await?;
        if !report.is_success() {
            failures += 1;
        }
    }

    if failures > 0 {
        stream_warn!("{} of {} sessions failed", failures, cli.urls.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
