pub mod notifications;
pub mod vote;

pub use notifications::NotificationStore;
pub use vote::{VoteResolver, VoteState, resolve_vote};
