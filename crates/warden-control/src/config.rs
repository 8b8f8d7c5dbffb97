use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use warden_backend::ProtocolProfile;

const DEFAULT_FEED_RETRY_SECS: u64 = 5;
const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration, read from the environment at startup.
///
/// Validation failures here are the only fatal errors in the process; once
/// running, nothing below this layer aborts.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute base URL of the backend control surface.
    pub backend_url: String,
    /// Token for the outward presence channel. Opaque here; handed to
    /// whichever front end gets wired in.
    pub presence_token: String,
    pub profile: ProtocolProfile,
    pub feed_retry: Duration,
    pub command_timeout: Duration,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let backend_url = required(&get, "WARDEN_BACKEND_URL").map(normalize_base_url)?;
        let presence_token = required(&get, "WARDEN_PRESENCE_TOKEN")?;

        let profile = match trimmed(&get, "WARDEN_PROTOCOL") {
            None => ProtocolProfile::Modern,
            Some(raw) => ProtocolProfile::parse(&raw)
                .with_context(|| format!("WARDEN_PROTOCOL must be modern or legacy, got {raw:?}"))?,
        };

        let feed_retry = secs(&get, "WARDEN_FEED_RETRY_SECS", DEFAULT_FEED_RETRY_SECS)?;
        let command_timeout = secs(&get, "WARDEN_COMMAND_TIMEOUT_SECS", DEFAULT_COMMAND_TIMEOUT_SECS)?;

        let log_file = trimmed(&get, "WARDEN_LOG_FILE").map(PathBuf::from);

        Ok(Self {
            backend_url,
            presence_token,
            profile,
            feed_retry,
            command_timeout,
            log_file,
        })
    }
}

fn trimmed(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn required(get: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<String> {
    trimmed(get, key).with_context(|| format!("{key} is required"))
}

fn secs(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> anyhow::Result<Duration> {
    match trimmed(get, key) {
        None => Ok(Duration::from_secs(default)),
        Some(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .with_context(|| format!("{key} must be a number of seconds, got {raw:?}")),
    }
}

/// A bare host is assumed to mean plain HTTP.
fn normalize_base_url(raw: String) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw
    } else {
        format!("http://{raw}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let cfg = config(&[
            ("WARDEN_BACKEND_URL", "https://backend.example"),
            ("WARDEN_PRESENCE_TOKEN", "secret"),
        ])
        .unwrap();

        assert_eq!(cfg.backend_url, "https://backend.example");
        assert_eq!(cfg.profile, ProtocolProfile::Modern);
        assert_eq!(cfg.feed_retry, Duration::from_secs(5));
        assert_eq!(cfg.command_timeout, Duration::from_secs(10));
        assert!(cfg.log_file.is_none());
    }

    #[test]
    fn bare_host_is_prefixed() {
        let cfg = config(&[
            ("WARDEN_BACKEND_URL", " backend.example:3000 "),
            ("WARDEN_PRESENCE_TOKEN", "secret"),
        ])
        .unwrap();
        assert_eq!(cfg.backend_url, "http://backend.example:3000");
    }

    #[test]
    fn missing_backend_url_is_fatal() {
        let err = config(&[("WARDEN_PRESENCE_TOKEN", "secret")]).unwrap_err();
        assert!(err.to_string().contains("WARDEN_BACKEND_URL"));
    }

    #[test]
    fn blank_token_is_fatal() {
        let err = config(&[
            ("WARDEN_BACKEND_URL", "backend.example"),
            ("WARDEN_PRESENCE_TOKEN", "   "),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("WARDEN_PRESENCE_TOKEN"));
    }

    #[test]
    fn profile_and_delays_are_read() {
        let cfg = config(&[
            ("WARDEN_BACKEND_URL", "backend.example"),
            ("WARDEN_PRESENCE_TOKEN", "secret"),
            ("WARDEN_PROTOCOL", "legacy"),
            ("WARDEN_FEED_RETRY_SECS", "2"),
            ("WARDEN_COMMAND_TIMEOUT_SECS", "30"),
            ("WARDEN_LOG_FILE", "warden.log"),
        ])
        .unwrap();

        assert_eq!(cfg.profile, ProtocolProfile::Legacy);
        assert_eq!(cfg.feed_retry, Duration::from_secs(2));
        assert_eq!(cfg.command_timeout, Duration::from_secs(30));
        assert_eq!(cfg.log_file, Some(PathBuf::from("warden.log")));
    }

    #[test]
    fn unknown_profile_is_fatal() {
        let err = config(&[
            ("WARDEN_BACKEND_URL", "backend.example"),
            ("WARDEN_PRESENCE_TOKEN", "secret"),
            ("WARDEN_PROTOCOL", "v3"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("WARDEN_PROTOCOL"));
    }
}
