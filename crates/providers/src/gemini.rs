//! Gemini `generateContent` client over plain REST.

use {
    async_trait::async_trait,
    secrecy::{ExposeSecret, Secret},
    serde_json::{Value, json},
    tracing::debug,
};

use crate::{
    CompletionClient,
    error::{Error, Result},
    prompt::{CompletionRequest, render_prompt},
};

/// Public Gemini API base.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Connection settings for the Gemini client.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_base: String,
    pub api_key: Secret<String>,
    pub model: String,
    pub request_timeout_ms: u64,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: Secret::new(String::new()),
            model: DEFAULT_MODEL.to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

/// HTTP client for the Gemini text-completion API.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.expose_secret().trim().is_empty() {
            return Err(Error::MissingApiKey);
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(
                config.request_timeout_ms.max(1),
            ))
            .build()?;

        Ok(Self { client, config })
    }

    fn generate_content_url(&self) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        format!("{base}/models/{}:generateContent", self.config.model)
    }

    fn models_url(&self) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        format!("{base}/models")
    }

    /// List model names that support `generateContent`.
    pub async fn list_generate_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.models_url())
            .query(&[("key", self.config.api_key.expose_secret().as_str())])
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: raw,
            });
        }

        let value: Value =
            serde_json::from_str(&raw).map_err(|e| Error::InvalidResponse(e.to_string()))?;
        let models = value
            .get("models")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::InvalidResponse("missing models array".to_string()))?;

        Ok(models
            .iter()
            .filter(|model| {
                model
                    .get("supportedGenerationMethods")
                    .and_then(Value::as_array)
                    .is_some_and(|methods| {
                        methods.iter().any(|m| m.as_str() == Some("generateContent"))
                    })
            })
            .filter_map(|model| model.get("name").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let prompt = render_prompt(request);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            turns = request.turns.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(self.generate_content_url())
            .query(&[("key", self.config.api_key.expose_secret().as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: raw,
            });
        }

        extract_answer_text(&raw)
    }
}

/// Pull the plain-text answer out of a `generateContent` response body.
fn extract_answer_text(raw: &str) -> Result<String> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| Error::InvalidResponse(e.to_string()))?;

    let text = value
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(Error::InvalidResponse(
            "no text in response candidates".to_string(),
        ));
    }
    Ok(text)
}
