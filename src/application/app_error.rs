use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Referral code not found.")]
    RefCodeNotFound,

    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Copy, Debug)]
pub enum ErrorCode {
    InvalidEmail,
    InvalidInput,
    NotFound,
    StoreError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidEmail => "INVALID_EMAIL",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::StoreError => "STORE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Store(format!("malformed stored value: {e}"))
    }
}

pub type AppResult<T> = Result<T, AppError>;
