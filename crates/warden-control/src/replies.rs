use warden_backend::{Command, CommandOutcome};
use warden_status::{render, state_icon};

/// Render one command outcome as the text handed back to whoever issued the
/// command. Every failure kind collapses to a reply here; nothing propagates
/// past this boundary.
pub fn reply_for(command: Command, outcome: &CommandOutcome) -> String {
    match outcome {
        CommandOutcome::Done => match command {
            Command::Start => "🚀 **Server started**".to_string(),
            Command::Stop => "🛑 **Server stopped successfully**".to_string(),
            // Queries answer with their payload variants, not Done.
            Command::Status | Command::Players => "✅ **Done**".to_string(),
        },
        CommandOutcome::State(state) => {
            format!("{} **{}**", state_icon(state), render(state).label)
        }
        CommandOutcome::Players(names) if names.is_empty() => "🥶 No Players Online".to_string(),
        CommandOutcome::Players(names) => {
            let mut msg = format!("Players Online: {}", names.len());
            msg.push_str("```");
            for name in names {
                msg.push_str("\n- ");
                msg.push_str(name);
            }
            msg.push_str("```");
            msg
        }
        CommandOutcome::AlreadyInDesiredState => match command {
            Command::Start => "ℹ️ **Server already started**".to_string(),
            _ => "⚠️ **Server already down**".to_string(),
        },
        CommandOutcome::NotReady => "⚠️ **Server isn't online**".to_string(),
        CommandOutcome::BackendError(msg) => format!("🔥 **Backend Error:** {msg}"),
        CommandOutcome::ConnectionError(_) => {
            "❌ Connection Error: Backend is unreachable.".to_string()
        }
        CommandOutcome::NonJsonBody => "Received non-JSON response".to_string(),
        CommandOutcome::UnexpectedStatus(code) => format!("Unexpected status: {code}"),
    }
}
