//! Mentionwatch CLI entrypoint: polls notifications until interrupted.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use mentionwatch::{
    MentionwatchConfig, NoopTelemetrySink, OctocrabNotificationGateway, Poller,
    StderrJsonlTelemetrySink, TelemetrySink, WatchError,
};
use ortho_config::OrthoConfig;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "MENTIONWATCH_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => report_failure(&error, &mut io::stderr().lock()),
    }
}

/// Writes the error for the operator; the exit code is a failure whether or
/// not the write succeeds.
fn report_failure(error: &WatchError, out: &mut impl Write) -> ExitCode {
    let _ignored = writeln!(out, "{error}");
    ExitCode::FAILURE
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<(), WatchError> {
    let config = load_config()?;
    config.validate()?;

    let token = config.resolve_token()?;
    let api_base = config.api_base()?;
    let gateway = OctocrabNotificationGateway::for_token(&token, api_base)?;
    let telemetry: Arc<dyn TelemetrySink> = if config.telemetry {
        Arc::new(StderrJsonlTelemetrySink)
    } else {
        Arc::new(NoopTelemetrySink)
    };

    let mut poller = Poller::new(gateway, config.review_agent())
        .with_interval(config.poll_interval())
        .with_telemetry(telemetry);

    poller.run_until(shutdown_signal()).await;
    Ok(())
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`WatchError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<MentionwatchConfig, WatchError> {
    MentionwatchConfig::load().map_err(|error| WatchError::Configuration {
        message: error.to_string(),
    })
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for ctrl-c; stopping");
    }
}
