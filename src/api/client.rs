//! HTTP client for communicating with the foundation backend
//!
//! Every call is a single request; business success or failure is read
//! from the reply envelope, transport and HTTP failures map to their own
//! error variants.

use super::endpoint::Endpoint;
use super::error::SubmissionError;
use super::payload::{into_form, Payload};
use super::reply::{message_from_body, ApiReply};
use super::traits::ApiClientTrait;
use crate::config::ApiSettings;
use crate::state::{Record, ResourceKind};
use async_trait::async_trait;
use serde_json::Map;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Client for the foundation REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new client from resolved settings
    pub fn new(settings: &ApiSettings) -> Result<Self, SubmissionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(SubmissionError::Transport)?;

        Ok(Self {
            http,
            base_url: settings.api_base_url.clone(),
        })
    }

    fn url(&self, endpoint: &Endpoint) -> Result<Url, SubmissionError> {
        Ok(self.base_url.join(endpoint.path.trim_start_matches('/'))?)
    }

    async fn execute(
        &self,
        endpoint: &Endpoint,
        payload: Option<Payload>,
    ) -> Result<ApiReply, SubmissionError> {
        let url = self.url(endpoint)?;
        let request = self.http.request(endpoint.method.as_reqwest(), url);
        let request = match payload {
            Some(Payload::Json(map)) => request.json(&map),
            Some(Payload::Multipart(parts)) => request.multipart(into_form(parts).await?),
            // Path-addressed calls carry no body
            None => request,
        };

        debug!("{endpoint}: sending");
        let resp = request.send().await.map_err(|e| {
            warn!("{endpoint}: transport error: {e}");
            SubmissionError::Transport(e)
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            warn!("{endpoint}: returned {status}");
            return Err(SubmissionError::Http {
                status,
                message: message_from_body(&body),
            });
        }

        let reply: ApiReply = resp
            .json()
            .await
            .map_err(|e| SubmissionError::Decode(e.to_string()))?;

        if !reply.status {
            info!(
                "{endpoint}: rejected: {}",
                reply.message.as_deref().unwrap_or("<no message>")
            );
        }
        reply.into_result()
    }
}

#[async_trait]
impl ApiClientTrait for ApiClient {
    async fn send(
        &self,
        endpoint: &Endpoint,
        payload: Payload,
    ) -> Result<ApiReply, SubmissionError> {
        self.execute(endpoint, Some(payload)).await
    }

    async fn list(&self, kind: ResourceKind) -> Result<Vec<Record>, SubmissionError> {
        let endpoint = Endpoint::list(kind.endpoint_name());
        let reply = self
            .execute(&endpoint, Some(Payload::Json(Map::new())))
            .await?;
        let records = reply
            .data
            .as_ref()
            .map(Record::list_from_value)
            .unwrap_or_default();
        info!("Loaded {} {} records", records.len(), kind.label());
        Ok(records)
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<ApiReply, SubmissionError> {
        let endpoint = Endpoint::remove(kind.endpoint_name(), id);
        self.execute(&endpoint, None).await
    }
}
