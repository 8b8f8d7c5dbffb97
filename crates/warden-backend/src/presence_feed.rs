use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::{Instrument, info_span};

use warden_status::{ServerState, decode};

const DATA_MARKER: &str = "data:";

#[derive(Debug, thiserror::Error)]
enum FeedError {
    #[error("connect failed: {0}")]
    Connect(reqwest::Error),
    #[error("feed endpoint returned {0}")]
    BadStatus(reqwest::StatusCode),
    #[error("stream read failed: {0}")]
    Read(reqwest::Error),
    #[error("state consumer dropped")]
    SinkClosed,
}

/// Long-lived consumer of the backend presence feed.
///
/// Owns its connection and retry state exclusively. Decoded states flow out
/// through a bounded channel in arrival order; the only suppression is the
/// skip-if-unchanged check against the last forwarded state.
pub struct PresenceFeed {
    client: reqwest::Client,
    endpoint: String,
    retry_delay: Duration,
    last_sent: Option<ServerState>,
    tx: mpsc::Sender<ServerState>,
}

impl PresenceFeed {
    pub fn new(base: &str, retry_delay: Duration, tx: mpsc::Sender<ServerState>) -> Self {
        // Connecting is bounded; the stream itself gets no read timeout
        // since the feed may sit idle between events for a long time.
        let client = reqwest::Client::builder()
            .user_agent("warden-control")
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");
        Self {
            client,
            endpoint: format!("{}/presence", base.trim_end_matches('/')),
            retry_delay,
            last_sent: None,
            tx,
        }
    }

    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        let span = info_span!("presence_feed", endpoint = %self.endpoint);
        tokio::spawn(self.run().instrument(span))
    }

    /// Run until the receiving side of the channel goes away. Every failure,
    /// including a clean end of stream, reconnects after the configured
    /// delay; the delay is constant.
    pub async fn run(mut self) {
        loop {
            match self.run_once().await {
                Ok(()) => {
                    tracing::warn!(endpoint = %self.endpoint, "presence feed ended, reconnecting");
                }
                Err(FeedError::SinkClosed) => {
                    tracing::info!("presence consumer dropped, stopping feed");
                    return;
                }
                Err(e) => {
                    tracing::warn!(endpoint = %self.endpoint, error = %e, "presence feed disconnected");
                }
            }
            tokio::time::sleep(self.retry_delay).await;
        }
    }

    async fn run_once(&mut self) -> Result<(), FeedError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(FeedError::Connect)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::BadStatus(status));
        }

        let mut body = resp.bytes_stream();
        let mut buf: Vec<u8> = Vec::new();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(FeedError::Read)?;
            buf.extend_from_slice(&chunk);

            // Chunk boundaries do not line up with event lines; hold partial
            // lines in the buffer until their newline arrives.
            while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buf.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&line);
                self.handle_line(line.trim()).await?;
            }
        }

        Ok(())
    }

    async fn handle_line(&mut self, line: &str) -> Result<(), FeedError> {
        // Everything that is not a data line (blank keep-alives, comments,
        // event names) is dropped here and never reaches the sink.
        let Some(rest) = line.strip_prefix(DATA_MARKER) else {
            return Ok(());
        };

        let state = decode(rest.trim());
        if self.last_sent.as_ref() == Some(&state) {
            return Ok(());
        }

        self.last_sent = Some(state.clone());
        self.tx.send(state).await.map_err(|_| FeedError::SinkClosed)
    }
}
