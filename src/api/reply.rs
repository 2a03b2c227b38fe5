//! Application-level reply envelope

use super::error::SubmissionError;
use serde::Deserialize;
use serde_json::Value;

/// Body of every backend response: business outcome travels in `status`,
/// independent of the HTTP status code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiReply {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl ApiReply {
    #[cfg(test)]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Turn a logical failure into an error
    pub fn into_result(self) -> Result<Self, SubmissionError> {
        if self.status {
            Ok(self)
        } else {
            Err(SubmissionError::Rejected {
                message: self.message,
            })
        }
    }
}

/// Pull a `message` out of an arbitrary error body, if it is JSON
pub fn message_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_false_is_rejected() {
        let reply: ApiReply =
            serde_json::from_str(r#"{"status": false, "message": "Duplicate transaction"}"#)
                .unwrap();
        match reply.into_result() {
            Err(SubmissionError::Rejected { message }) => {
                assert_eq!(message.as_deref(), Some("Duplicate transaction"))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_missing_status_counts_as_failure() {
        let reply: ApiReply = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(reply.into_result().is_err());
    }

    #[test]
    fn test_message_from_body() {
        assert_eq!(
            message_from_body(r#"{"status":false,"message":"Bad input"}"#).as_deref(),
            Some("Bad input")
        );
        assert_eq!(message_from_body("<html>502</html>"), None);
    }
}
