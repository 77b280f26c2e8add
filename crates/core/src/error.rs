use thiserror::Error;

/// Misuse of a [`Timer`](crate::Timer).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    #[error("timer is not running, use start() before stop()")]
    NotRunning,

    #[error("timer is already running, use stop() before start()")]
    AlreadyRunning,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemParseError {
    #[error("empty work item")]
    Empty,

    #[error("not a number or URL: {0}")]
    Unrecognized(String),
}
