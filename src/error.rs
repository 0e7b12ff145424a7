use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("stats unavailable: {0}")]
    DataUnavailable(String),

    #[error("display device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("invalid display config '{field}': {reason}")]
    ConfigInvalid { field: &'static str, reason: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("display scheduler already running")]
    AlreadyRunning,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DisplayError>;
