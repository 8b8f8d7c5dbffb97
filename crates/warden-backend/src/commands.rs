use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

use warden_status::{ServerState, decode};

use crate::protocol::ProtocolProfile;

/// One control operation exposed to the command front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Status,
    Players,
}

impl Command {
    pub fn endpoint(self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Stop => "stop",
            Command::Status => "status",
            Command::Players => "players",
        }
    }

    fn is_post(self) -> bool {
        matches!(self, Command::Start | Command::Stop)
    }
}

/// Classified result of one proxy call. Produced fresh per call and rendered
/// into a reply at the boundary; never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// The state change was accepted.
    Done,
    /// `/status` succeeded and its body decoded to this state.
    State(ServerState),
    /// `/players` succeeded; an empty list means nobody is online.
    Players(Vec<String>),
    AlreadyInDesiredState,
    NotReady,
    BackendError(String),
    ConnectionError(String),
    /// The backend answered success but the body was not the JSON we expect.
    NonJsonBody,
    UnexpectedStatus(u16),
}

/// Single-shot request proxy for the backend control surface.
///
/// Stateless between calls: each `execute` owns its own request lifecycle,
/// bounded by the client timeout, with no retry.
pub struct CommandProxy {
    client: reqwest::Client,
    base: String,
    profile: ProtocolProfile,
}

impl CommandProxy {
    pub fn new(base: &str, profile: ProtocolProfile, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("warden-control")
            .timeout(timeout)
            .build()
            .expect("failed to build reqwest client");
        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
            profile,
        }
    }

    pub async fn execute(&self, command: Command) -> CommandOutcome {
        let url = format!("{}/{}", self.base, command.endpoint());
        let req = if command.is_post() {
            self.client.post(&url)
        } else {
            self.client.get(&url)
        };

        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(%url, error = %e, "backend request failed");
                return CommandOutcome::ConnectionError(e.to_string());
            }
        };

        let status = resp.status();
        if status == self.profile.success(command) {
            return self.classify_success(command, resp).await;
        }
        if status == self.profile.conflict() {
            // Conflict means "does not apply in the current state": the
            // server is already started/stopped, or not up for a query.
            return match command {
                Command::Start | Command::Stop => CommandOutcome::AlreadyInDesiredState,
                Command::Status | Command::Players => CommandOutcome::NotReady,
            };
        }
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            return CommandOutcome::BackendError(backend_error_message(resp).await);
        }

        tracing::warn!(%url, status = status.as_u16(), "unexpected backend status");
        CommandOutcome::UnexpectedStatus(status.as_u16())
    }

    async fn classify_success(&self, command: Command, resp: reqwest::Response) -> CommandOutcome {
        match command {
            Command::Start | Command::Stop => CommandOutcome::Done,
            Command::Status => {
                let body = match resp.text().await {
                    Ok(body) => body,
                    Err(e) => return CommandOutcome::ConnectionError(e.to_string()),
                };
                match self.status_token(&body) {
                    Some(token) => CommandOutcome::State(decode(&token)),
                    None => CommandOutcome::NonJsonBody,
                }
            }
            Command::Players => {
                let body = match resp.text().await {
                    Ok(body) => body,
                    Err(e) => return CommandOutcome::ConnectionError(e.to_string()),
                };
                match serde_json::from_str::<Value>(&body) {
                    Ok(Value::Array(items)) => CommandOutcome::Players(
                        items
                            .into_iter()
                            .filter_map(|v| v.as_str().map(str::to_string))
                            .collect(),
                    ),
                    // Valid JSON that is not a list counts as nobody online.
                    Ok(_) => CommandOutcome::Players(Vec::new()),
                    Err(_) => CommandOutcome::NonJsonBody,
                }
            }
        }
    }

    fn status_token(&self, body: &str) -> Option<String> {
        if !self.profile.wraps_status_body() {
            return Some(body.trim().to_string());
        }
        serde_json::from_str::<Value>(body)
            .ok()?
            .get("status")?
            .as_str()
            .map(str::to_string)
    }
}

async fn backend_error_message(resp: reqwest::Response) -> String {
    let body = resp.text().await.unwrap_or_default();
    serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| "backend reported an internal error".to_string())
}
