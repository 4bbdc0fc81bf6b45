//! Capabilities the handlers depend on. Concrete HTTP implementations live
//! in `crate::clients`; tests substitute in-memory doubles.

pub mod notification;
pub mod record_store;
pub mod secondary;
pub mod summary_model;

use thiserror::Error;

/// Failure reported by any external collaborator.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for AdapterError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            AdapterError::Timeout(error.to_string())
        } else if error.is_decode() {
            AdapterError::InvalidResponse(error.to_string())
        } else {
            AdapterError::Request(error.to_string())
        }
    }
}
