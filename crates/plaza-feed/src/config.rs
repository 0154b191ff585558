use crate::error::FeedError;

pub const BROADCAST_CAPACITY_VAR: &str = "PLAZA_BROADCAST_CAPACITY";
const DEFAULT_BROADCAST_CAPACITY: usize = 256;

/// Runtime settings for a [`NotificationHub`](crate::hub::NotificationHub).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// Updates buffered per subscriber before slow readers start lagging
    pub broadcast_capacity: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

impl FeedConfig {
    /// Read settings from the process environment. Call `dotenvy::dotenv()`
    /// first if a `.env` file should be honored.
    pub fn from_env() -> Result<Self, FeedError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, FeedError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(BROADCAST_CAPACITY_VAR) {
            config.broadcast_capacity = match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(FeedError::InvalidConfig {
                        key: BROADCAST_CAPACITY_VAR,
                        value: raw,
                    });
                }
            };
        }

        Ok(config)
    }
}
