pub mod commands;
pub mod presence_feed;
pub mod protocol;

pub use commands::{Command, CommandOutcome, CommandProxy};
pub use presence_feed::PresenceFeed;
pub use protocol::ProtocolProfile;
