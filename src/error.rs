use thiserror::Error;

/// Why a poll (or a feed lifecycle call) did not succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// No response arrived: DNS, connect, timeout, TLS
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-2xx status
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The body could not be decoded as JSON
    #[error("malformed payload: {0}")]
    Payload(String),

    /// The poll task panicked or was aborted before it finished
    #[error("poll task failed: {0}")]
    Interrupted(String),

    #[error("the feed timer is already running")]
    AlreadyRunning,
}

pub type FeedResult<T> = Result<T, FeedError>;
