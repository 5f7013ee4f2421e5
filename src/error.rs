//! Error taxonomy
//!
//! Only configuration and file access can fail. Per-tick work is total:
//! malformed landmarks are dropped in `LandmarkFrame::sanitized` instead of
//! surfacing here.

/// Errors raised while setting up a match or touching files
#[derive(thiserror::Error, Debug)]
pub enum SimError {
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    #[error("file access failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
