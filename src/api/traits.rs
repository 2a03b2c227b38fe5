//! Trait abstraction for the backend client to enable mocking in tests

use super::endpoint::Endpoint;
use super::error::SubmissionError;
use super::payload::Payload;
use super::reply::ApiReply;
use crate::state::{Record, ResourceKind};
use async_trait::async_trait;

/// Backend operations used by forms and resource lists
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiClientTrait: Send + Sync {
    /// Issue one submission. A `status: false` reply comes back as
    /// `SubmissionError::Rejected`.
    async fn send(&self, endpoint: &Endpoint, payload: Payload)
        -> Result<ApiReply, SubmissionError>;

    /// Fetch every record of a resource
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Record>, SubmissionError>;

    /// Delete one record
    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<ApiReply, SubmissionError>;
}
