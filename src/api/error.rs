//! Submission error types

/// Message shown when the backend gave no usable explanation
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors from backend calls. Every variant is recoverable: form data is
/// kept and the user may retry.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// No response at all (connection refused, timeout, body build failure)
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// Non-2xx response
    #[error("backend returned {status}")]
    Http {
        status: u16,
        message: Option<String>,
    },
    /// 2xx response carrying `status: false`
    #[error("backend rejected the request")]
    Rejected { message: Option<String> },
    /// 2xx response whose body was not the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),
    /// Endpoint path could not be joined onto the base URL
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
    /// An attached file could not be read
    #[error("could not read {path}: {source}")]
    Attachment {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SubmissionError {
    /// Text for the notification: the backend's message when it sent one
    pub fn user_message(&self) -> String {
        match self {
            Self::Http {
                message: Some(m), ..
            }
            | Self::Rejected { message: Some(m) } if !m.trim().is_empty() => m.clone(),
            Self::Attachment { path, .. } => format!("Could not read the attached file {path}."),
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }
}
