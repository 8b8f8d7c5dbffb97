use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;

use warden_backend::{Command, CommandProxy, PresenceFeed};
use warden_control::config::Config;
use warden_control::handle_command;
use warden_control::presence::{LogPresence, apply_presence};

fn init_tracing(log_file: Option<&Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let file = path
                .file_name()
                .map(|f| f.to_os_string())
                .unwrap_or_else(|| "warden.log".into());
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let _log_guard = init_tracing(config.log_file.as_deref());

    tracing::info!(
        backend = %config.backend_url,
        profile = ?config.profile,
        "warden-control starting"
    );

    let proxy = CommandProxy::new(&config.backend_url, config.profile, config.command_timeout);

    // One probe on boot so a dead backend shows up in the logs immediately
    // instead of on the first command.
    let probe = handle_command(&proxy, Command::Status).await;
    tracing::info!(reply = %probe, "startup status probe");

    let (tx, rx) = mpsc::channel(16);
    let feed_task = PresenceFeed::new(&config.backend_url, config.feed_retry, tx).spawn();
    let apply_task = tokio::spawn(apply_presence(rx, Arc::new(LogPresence)));

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");

    // Abandons the in-flight feed read at its next await point.
    feed_task.abort();
    apply_task.abort();

    Ok(())
}
