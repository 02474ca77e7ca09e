use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection failed: {0}")]
    Connection(String),
    #[error("cache `{op}` failed: {message}")]
    Command { op: &'static str, message: String },
    #[error("cache `{op}` timed out after {after_ms}ms")]
    Timeout { op: &'static str, after_ms: u64 },
}

impl CacheError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    pub fn command(op: &'static str, message: impl Into<String>) -> Self {
        Self::Command {
            op,
            message: message.into(),
        }
    }
}
