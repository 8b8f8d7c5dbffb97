use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use warden_status::{PresenceView, ServerState, render, state_icon};

/// Outward presence channel. Injected into the apply loop so nothing in the
/// feed path ever touches a global handle.
#[async_trait]
pub trait PresenceSink: Send + Sync {
    async fn set_presence(&self, view: PresenceView) -> anyhow::Result<()>;
}

/// Sink used when no chat front end is wired in: logs each transition.
pub struct LogPresence;

#[async_trait]
impl PresenceSink for LogPresence {
    async fn set_presence(&self, view: PresenceView) -> anyhow::Result<()> {
        tracing::info!(label = %view.label, indicator = ?view.indicator, "presence updated");
        Ok(())
    }
}

/// Drain decoded states from the feed and apply them outward, in arrival
/// order. A failing sink is logged and skipped; it must never stall or kill
/// status consumption.
pub async fn apply_presence(mut rx: mpsc::Receiver<ServerState>, sink: Arc<dyn PresenceSink>) {
    while let Some(state) = rx.recv().await {
        let mut view = render(&state);
        view.label = format!("{} {}", state_icon(&state), view.label);

        if let Err(e) = sink.set_presence(view).await {
            tracing::warn!(error = %e, "presence update failed");
        }
    }
}
