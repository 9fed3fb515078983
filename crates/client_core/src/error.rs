use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiFailure {
    #[error("request failed with HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("request task ended without a response: {0}")]
    Aborted(String),
}

impl ApiFailure {
    pub fn status(status: u16) -> Self {
        Self::Status {
            status,
            body: String::new(),
        }
    }

    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            Self::Decode(_) | Self::Aborted(_) => None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        ErrorCode::from_status(self.http_status())
    }
}

impl From<&ApiFailure> for ApiError {
    fn from(value: &ApiFailure) -> Self {
        ApiError::new(value.http_status(), value.to_string())
    }
}
