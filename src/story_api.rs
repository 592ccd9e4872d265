//! HTTP client for the user-story validation server under test.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Bounded wait for the validation call; the server runs a full
/// hybrid-search plus LLM pipeline per request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const HEALTH_PATH: &str = "/api/health";

#[derive(Debug, Serialize)]
pub struct ValidationRequest<'a> {
    #[serde(rename = "userStory")]
    pub user_story: &'a str,
}

/// Response from the validation endpoint. Every field is optional; the
/// caller substitutes empty values for whatever is missing.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub validation: Option<Value>,
    #[serde(default, rename = "relatedStories")]
    pub related_stories: Vec<RelatedStory>,
}

/// One hybrid-search hit returned alongside the validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RelatedStory {
    #[serde(default)]
    pub story: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Thin client over the endpoint under test.
pub struct ValidationClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ValidationClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the story for validation and decode the response body.
    pub async fn validate(
        &self,
        user_story: &str,
    ) -> Result<ValidationResponse, ValidationError> {
        let response = self
            .http
            .post(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .json(&ValidationRequest { user_story })
            .send()
            .await
            .map_err(|e| ValidationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ValidationError::Request(format!("HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| ValidationError::InvalidBody(e.to_string()))
    }

    /// Probe the server's health route on the same host. Used only to
    /// sharpen the diagnostic when a validation call fails.
    pub async fn health(&self) -> Result<bool, ValidationError> {
        let url = reqwest::Url::parse(&self.endpoint)
            .and_then(|u| u.join(HEALTH_PATH))
            .map_err(|e| ValidationError::Request(e.to_string()))?;

        let response = self
            .http
            .get(url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| ValidationError::Request(e.to_string()))?;

        let body: HealthResponse = response
            .json()
            .await
            .map_err(|e| ValidationError::InvalidBody(e.to_string()))?;

        Ok(body.status == "ok")
    }
}
