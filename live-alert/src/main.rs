//! Live-alert daemon: polls Twitch for the watch-list and notifies when a
//! channel goes live. Runs until Ctrl+C or SIGTERM.

use std::process::ExitCode;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use live_alert::background;
use live_alert::notification::Dispatcher;
use live_alert::shutdown;
use live_alert::status::TwitchStatusSource;
use live_alert::tracker::LivenessTracker;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Step 0: Tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting twitch-live-alert");

    // Steps 1-3: Foundation
    let (config, channels) = match live_alert::init_foundation() {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    // Step 4: Token check (non-fatal)
    live_alert::check_credentials(&channels, config.request_timeout).await;

    // Step 5: Poll loop wiring
    let source = TwitchStatusSource::from_config(&config, channels.credentials)?;
    let tracker = LivenessTracker::new(channels.watch_list, source);
    let dispatcher = Dispatcher::from_config(&config);

    let shutdown_token = CancellationToken::new();
    let signal_handle = shutdown::spawn_signal_handler(shutdown_token.clone());

    background::live_poll_loop(tracker, dispatcher, config.poll_interval, shutdown_token).await;

    signal_handle.abort();
    tracing::info!("Shutdown complete");
    Ok(ExitCode::SUCCESS)
}
