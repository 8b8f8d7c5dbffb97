/// Decoded state of the managed game server.
///
/// Both the presence feed and the `/status` reply speak in these terms.
/// Anything the backend emits that does not decode lands in `Unknown` with
/// the raw token preserved for logging and display.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ServerState {
    Starting,
    /// Up and accepting players, with the current player count.
    Healthy(u32),
    Inactive,
    Failed,
    Unknown(String),
}

/// Parse one status token, possibly carrying a player count.
///
/// Total: every input maps to some state and nothing panics. A `healthy`
/// token with a missing or malformed count decodes to `Unknown` rather than
/// guessing a count of zero.
pub fn decode(raw: &str) -> ServerState {
    let token = raw.trim();
    let norm = token.to_ascii_lowercase();
    match norm.as_str() {
        "starting" => ServerState::Starting,
        "inactive" => ServerState::Inactive,
        "failed" => ServerState::Failed,
        s if s.starts_with("healthy") => match s["healthy".len()..].trim().parse::<u32>() {
            Ok(n) => ServerState::Healthy(n),
            Err(_) => ServerState::Unknown(token.to_string()),
        },
        _ => ServerState::Unknown(token.to_string()),
    }
}

/// Activity indicator shown next to the outward presence label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Indicator {
    Online,
    Idle,
    Busy,
    Unknown,
}

/// Renderable presence pair. Derived from a `ServerState` on demand, never
/// stored anywhere.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PresenceView {
    pub label: String,
    pub indicator: Indicator,
}

pub fn render(state: &ServerState) -> PresenceView {
    let (label, indicator) = match state {
        ServerState::Starting => ("Server Spinning up".to_string(), Indicator::Online),
        ServerState::Healthy(0) => ("Server Online".to_string(), Indicator::Online),
        ServerState::Healthy(n) => (format!("Server Online ({n} online)"), Indicator::Online),
        ServerState::Inactive => ("Server Offline".to_string(), Indicator::Idle),
        ServerState::Failed => ("Server Failed (check logs)".to_string(), Indicator::Busy),
        ServerState::Unknown(_) => ("⁉️".to_string(), Indicator::Idle),
    };
    PresenceView { label, indicator }
}

/// One-glyph icon for a state, composed in front of reply and activity text.
pub fn state_icon(state: &ServerState) -> &'static str {
    match state {
        ServerState::Starting => "🟡",
        ServerState::Healthy(_) => "🟢",
        ServerState::Inactive => "🟠",
        ServerState::Failed => "🔴",
        ServerState::Unknown(_) => "❓",
    }
}
