pub mod config;
pub mod error;
pub mod hub;
pub mod replay;

pub use config::FeedConfig;
pub use error::FeedError;
pub use hub::{NotificationHub, decode_command};
pub use replay::{ReplaySummary, replay_lines};
