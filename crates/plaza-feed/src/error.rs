use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("malformed feed command: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("feed input unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },
}
