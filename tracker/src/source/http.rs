//! REST data source
//!
//! Talks to a backend exposing the paths in [`crate::state::schema::paths`].
//! Transport failures and unexpected statuses surface as
//! `SourceUnavailable`; 404 on a record maps to not-found.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::EscalationSource;
use crate::error::{TrackerError, TrackerResult};
use crate::state::schema::paths;
use crate::state::{CallerProfile, EscalationFields, EscalationId, EscalationRecord, Role};

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: EscalationId,
}

#[derive(Debug, Serialize, Deserialize)]
struct RoleResponse {
    role: Role,
}

fn transport(e: reqwest::Error) -> TrackerError {
    TrackerError::unavailable(e.to_string())
}

/// Data source backed by a REST API
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> TrackerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport)?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fail on any non-success status other than the ones the caller handles
    async fn check(response: reqwest::Response) -> TrackerResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, "Escalation backend returned an error");
        Err(TrackerError::unavailable(format!(
            "backend returned {}: {}",
            status,
            body.trim()
        )))
    }

    async fn json<T: DeserializeOwned>(response: reqwest::Response) -> TrackerResult<T> {
        let bytes = response.bytes().await.map_err(transport)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl EscalationSource for HttpSource {
    async fn list(&self) -> TrackerResult<Vec<EscalationRecord>> {
        let response = self
            .client
            .get(self.url(&paths::escalations()))
            .send()
            .await
            .map_err(transport)?;
        let records: Vec<EscalationRecord> = Self::json(Self::check(response).await?).await?;
        debug!(count = records.len(), "Fetched escalations");
        Ok(records)
    }

    async fn get(&self, id: EscalationId) -> TrackerResult<Option<EscalationRecord>> {
        let response = self
            .client
            .get(self.url(&paths::escalation(id.0)))
            .send()
            .await
            .map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(Self::json(Self::check(response).await?).await?))
    }

    async fn create(&self, fields: EscalationFields) -> TrackerResult<EscalationId> {
        let response = self
            .client
            .post(self.url(&paths::escalations()))
            .json(&fields)
            .send()
            .await
            .map_err(transport)?;
        let created: CreatedResponse = Self::json(Self::check(response).await?).await?;
        Ok(created.id)
    }

    async fn update(&self, id: EscalationId, fields: EscalationFields) -> TrackerResult<()> {
        let response = self
            .client
            .put(self.url(&paths::escalation(id.0)))
            .json(&fields)
            .send()
            .await
            .map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TrackerError::RecordNotFound { id });
        }
        Self::check(response).await?;
        Ok(())
    }

    async fn delete(&self, id: EscalationId) -> TrackerResult<()> {
        let response = self
            .client
            .delete(self.url(&paths::escalation(id.0)))
            .send()
            .await
            .map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TrackerError::RecordNotFound { id });
        }
        Self::check(response).await?;
        Ok(())
    }

    async fn caller_profile(&self, subject: &str) -> TrackerResult<Option<CallerProfile>> {
        let response = self
            .client
            .get(self.url(&paths::profile(subject)))
            .send()
            .await
            .map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let profile: Option<CallerProfile> = Self::json(Self::check(response).await?).await?;
        Ok(profile)
    }

    async fn save_caller_profile(
        &self,
        subject: &str,
        profile: CallerProfile,
    ) -> TrackerResult<()> {
        let response = self
            .client
            .put(self.url(&paths::profile(subject)))
            .json(&profile)
            .send()
            .await
            .map_err(transport)?;
        Self::check(response).await?;
        Ok(())
    }

    async fn caller_role(&self, subject: &str) -> TrackerResult<Role> {
        let response = self
            .client
            .get(self.url(&paths::role(subject)))
            .send()
            .await
            .map_err(transport)?;
        let body: RoleResponse = Self::json(Self::check(response).await?).await?;
        Ok(body.role)
    }
}
