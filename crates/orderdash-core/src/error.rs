use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
