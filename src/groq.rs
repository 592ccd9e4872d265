//! Groq Chat Completions API integration (OpenAI-compatible wire format).

use std::sync::OnceLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{EvalError, ProviderError, Result};
use crate::model::EvalModel;

pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

// ---------------------------------------------------------------------------
// Groq chat completions request/response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct GroqRequest {
    pub model: String,
    pub messages: Vec<GroqMessage>,
    pub temperature: f64,
}

#[derive(Debug, Serialize)]
pub struct GroqMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct GroqResponse {
    pub choices: Vec<GroqChoice>,
}

#[derive(Debug, Deserialize)]
pub struct GroqChoice {
    pub message: GroqResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct GroqResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GroqErrorBody {
    pub error: GroqErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct GroqErrorDetail {
    pub message: String,
}

// ---------------------------------------------------------------------------
// GroqModel
// ---------------------------------------------------------------------------

/// Adapter presenting the Groq hosted chat-completion API through the
/// [`EvalModel`] contract.
///
/// The transport client is constructed lazily on the first call and reused
/// for the adapter's lifetime. Cloning shares the underlying connection
/// pool once it exists.
#[derive(Clone)]
pub struct GroqModel {
    api_key: String,
    model_id: String,
    api_url: String,
    client: OnceLock<reqwest::blocking::Client>,
}

impl GroqModel {
    pub fn new(api_key: String, model_id: String) -> Self {
        Self {
            api_key,
            model_id,
            api_url: GROQ_API_URL.into(),
            client: OnceLock::new(),
        }
    }

    /// Point the adapter at a different OpenAI-compatible endpoint.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// One user-role message carrying the prompt, greedy decoding.
    pub fn build_request(&self, prompt: &str) -> GroqRequest {
        GroqRequest {
            model: self.model_id.clone(),
            messages: vec![GroqMessage {
                role: "user".into(),
                content: prompt.into(),
            }],
            temperature: 0.0,
        }
    }
}

#[async_trait]
impl EvalModel for GroqModel {
    type Client = reqwest::blocking::Client;

    fn load_model(&self) -> &Self::Client {
        self.client.get_or_init(reqwest::blocking::Client::new)
    }

    fn generate(&self, prompt: &str) -> Result<String> {
        let request_body = self.build_request(prompt);

        let response = self
            .load_model()
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .map_err(|e| EvalError::Provider(ProviderError::ApiRequest(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "failed to read response body".into());
            let error_msg = serde_json::from_str::<GroqErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(EvalError::Provider(match status.as_u16() {
                401 => ProviderError::Auth(error_msg),
                429 => ProviderError::RateLimited {
                    retry_after_secs: None,
                },
                _ => ProviderError::ApiRequest(format!("HTTP {status}: {error_msg}")),
            }));
        }

        let api_response: GroqResponse = response
            .json()
            .map_err(|e| EvalError::Provider(ProviderError::InvalidResponse(e.to_string())))?;

        extract_first_choice(&api_response)
    }

    async fn a_generate(&self, prompt: &str) -> Result<String> {
        // Populate the shared handle before cloning; a clone of an empty
        // lock would build and discard its own client on every call.
        self.load_model();
        let model = self.clone();
        let prompt = prompt.to_owned();
        tokio::task::spawn_blocking(move || model.generate(&prompt))
            .await
            .map_err(|e| EvalError::Other(format!("provider task failed: {e}")))?
    }

    fn model_name(&self) -> &str {
        &self.model_id
    }
}

/// First choice's message content; an empty choice list is malformed.
fn extract_first_choice(response: &GroqResponse) -> Result<String> {
    response
        .choices
        .first()
        .and_then(|c| c.message.content.clone())
        .ok_or_else(|| {
            EvalError::Provider(ProviderError::InvalidResponse(
                "response contained no choices".into(),
            ))
        })
}
