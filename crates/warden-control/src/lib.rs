pub mod config;
pub mod presence;
pub mod replies;

use warden_backend::{Command, CommandProxy};

/// Entry point for the (external) command front end: run one control command
/// and collapse its outcome into the reply text. Each call is independent;
/// a failure here never affects the feed loop or other in-flight commands.
pub async fn handle_command(proxy: &CommandProxy, command: Command) -> String {
    let outcome = proxy.execute(command).await;
    replies::reply_for(command, &outcome)
}
