use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Please login first")]
    LoginRequired,

    #[error("{0}")]
    Validation(String),

    #[error("Failed to initiate login: {0}")]
    LoginInitiation(String),

    #[error("{0}")]
    Conversion(String),

    #[error("A conversion is already in progress")]
    Busy,

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
