//! # toxws
//!
//! Terminal client for a `ws-tox` daemon. Reads lines from stdin, writes the
//! transcript to stdout and logs to stderr.

#![deny(unsafe_code)]

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use toxws_client::{CorrelationClient, websocket};
use toxws_session::{DisplaySink, SessionController, SessionOptions};
use toxws_settings::ToxwsSettings;

/// Interactive client for a ws-tox daemon.
#[derive(Parser, Debug)]
#[command(name = "toxws", about = "Interactive client for a ws-tox daemon")]
struct Cli {
    /// Daemon WebSocket URL (overrides settings).
    #[arg(long)]
    url: Option<String>,

    /// Path to the settings file (default `~/.toxws/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log filter, e.g. `info` or `toxws_client=debug` (overrides settings).
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Apply command-line overrides, the highest-priority settings layer.
    fn apply_overrides(&self, settings: &mut ToxwsSettings) {
        if let Some(url) = &self.url {
            settings.server.url.clone_from(url);
        }
        if let Some(level) = &self.log_level {
            settings.logging.level.clone_from(level);
        }
    }
}

/// Writes transcript lines to stdout.
struct StdoutSink;

impl DisplaySink for StdoutSink {
    fn display(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let settings_path = args
        .settings
        .clone()
        .unwrap_or_else(toxws_settings::settings_path);
    let mut settings = toxws_settings::load_settings_from_path(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;
    args.apply_overrides(&mut settings);
    settings.validate().context("Invalid settings")?;

    toxws_core::logging::init_subscriber(&settings.logging.level);

    let timeout = Duration::from_millis(settings.server.connect_timeout_ms);
    let (channel, mut pump) = websocket::connect(&settings.server.url, timeout)
        .await
        .context("Failed to connect to daemon")?;

    let client = Arc::new(CorrelationClient::spawn(channel));
    let display: Arc<dyn DisplaySink> = Arc::new(StdoutSink);
    let mut session = SessionController::with_options(
        client,
        display.clone(),
        SessionOptions::from(&settings.session),
    );
    let _events = session.forward_notifications();

    display.display(&format!(
        "Connected to {}. Type {}help for commands.",
        settings.server.url, settings.session.command_prefix
    ));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interrupted = false;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(line) => {
                        let _sent = session.handle_user_line(&line);
                    }
                    None => {
                        tracing::info!("stdin closed");
                        break;
                    }
                }
            }
            _ = &mut pump => {
                display.display("Connection to daemon closed.");
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                interrupted = true;
                break;
            }
        }
    }

    // Piped input ends long before the daemon answers; show what is owed.
    if !interrupted {
        let _ = drain_replies(session, timeout).await;
    }

    Ok(())
}

/// Wait up to `timeout` for the session's outstanding replies to be shown.
///
/// Returns `false` if some were still owed when the time ran out.
async fn drain_replies(session: SessionController, timeout: Duration) -> bool {
    let drained = tokio::time::timeout(timeout, session.finish()).await.is_ok();
    if !drained {
        tracing::warn!(
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            "gave up waiting for outstanding replies"
        );
    }
    drained
}
