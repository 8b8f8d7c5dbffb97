use reqwest::StatusCode;

use crate::commands::Command;

/// Which backend dialect to speak.
///
/// Two deployments of the backend disagree on their status-code sets and on
/// the shape of the `/status` body. Neither is authoritative, so both stay
/// supported behind configuration instead of hardcoding one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolProfile {
    /// 204 on success for state changes, 409 on conflict, `/status` replies
    /// with a bare status token.
    Modern,
    /// 200 on success, 400 on conflict, `/status` wraps its token in a JSON
    /// object (`{"status": "<token>"}`).
    Legacy,
}

impl ProtocolProfile {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "modern" => Some(Self::Modern),
            "legacy" => Some(Self::Legacy),
            _ => None,
        }
    }

    /// Expected success code for one command. Queries carry a body in both
    /// dialects, so they always answer 200; only the state changes differ.
    pub fn success(self, command: Command) -> StatusCode {
        match (self, command) {
            (Self::Modern, Command::Start | Command::Stop) => StatusCode::NO_CONTENT,
            _ => StatusCode::OK,
        }
    }

    pub fn conflict(self) -> StatusCode {
        match self {
            Self::Modern => StatusCode::CONFLICT,
            Self::Legacy => StatusCode::BAD_REQUEST,
        }
    }

    /// Whether `/status` wraps its token in a JSON object.
    pub fn wraps_status_body(self) -> bool {
        matches!(self, Self::Legacy)
    }
}
