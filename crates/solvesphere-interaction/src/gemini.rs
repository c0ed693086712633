//! Low-level Gemini REST client.
//!
//! Calls the `generateContent` endpoint directly, for both the structured
//! solve and the image render. One request/response DTO family covers both;
//! the solver layer decides which model and which generation config to send.

use crate::classify::{classify_message, classify_status};
use crate::retry::AttemptError;
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use solvesphere_core::solve::{GroundingLink, InlineImage, SolveFailure};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_SOLVE_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Thin client over the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    solve_model: String,
    image_model: String,
}

impl GeminiClient {
    /// Creates a client with the default model names.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            solve_model: DEFAULT_SOLVE_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }

    /// Overrides the solve model after construction.
    pub fn with_solve_model(mut self, model: impl Into<String>) -> Self {
        self.solve_model = model.into();
        self
    }

    /// Overrides the image model after construction.
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    pub fn solve_model(&self) -> &str {
        &self.solve_model
    }

    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    /// Sends one generateContent request.
    ///
    /// The cancellation token is observed before the request is issued and
    /// immediately after it returns; an abort mid-flight drops the request
    /// and yields the cancelled outcome.
    pub(crate) async fn generate(
        &self,
        model: &str,
        body: &GenerateContentRequest,
        cancel: &CancellationToken,
    ) -> Result<GenerateContentResponse, AttemptError> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = model,
            api_key = self.api_key
        );

        if cancel.is_cancelled() {
            return Err(AttemptError::terminal(SolveFailure::Cancelled));
        }

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(AttemptError::terminal(SolveFailure::Cancelled)),
            sent = self.http.post(url).json(body).send() => sent,
        }
        .map_err(|err| {
            let message = format!("Gemini API request failed: {err}");
            let failure = if err.is_connect() || err.is_timeout() {
                SolveFailure::NetworkFailure(message)
            } else {
                // No structured status here; fall back to the raw text.
                classify_message(&message)
            };
            AttemptError::terminal(failure)
        })?;

        if cancel.is_cancelled() {
            return Err(AttemptError::terminal(SolveFailure::Cancelled));
        }

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            AttemptError::terminal(SolveFailure::MalformedResponse(format!(
                "Failed to parse Gemini response envelope: {err}"
            )))
        })?;

        Ok(parsed)
    }
}

// ----------------------------------------------------------------------
// Request DTOs
// ----------------------------------------------------------------------

#[derive(Clone, Serialize)]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

#[derive(Clone, Serialize)]
pub(crate) struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Clone, Serialize)]
#[serde(untagged)]
pub(crate) enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineDataPayload {
    pub mime_type: String,
    pub data: String,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageConfig {
    pub aspect_ratio: String,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Tool {
    pub google_search: serde_json::Value,
}

impl Tool {
    /// The search grounding tool; its config object is empty.
    pub fn google_search() -> Self {
        Self {
            google_search: serde_json::json!({}),
        }
    }
}

// ----------------------------------------------------------------------
// Response DTOs
// ----------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
    #[serde(rename = "promptFeedback")]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    pub content: Option<ContentResponse>,
    #[serde(rename = "groundingMetadata")]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentResponse {
    #[serde(default)]
    pub parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PartResponse {
    pub text: Option<String>,
    #[serde(rename = "inlineData")]
    pub inline_data: Option<InlineDataResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineDataResponse {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroundingMetadata {
    #[serde(rename = "groundingChunks")]
    pub grounding_chunks: Option<Vec<GroundingChunk>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroundingChunk {
    pub web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PromptFeedback {
    #[serde(rename = "blockReason")]
    pub block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    code: Option<i32>,
    message: Option<String>,
    status: Option<String>,
}

// ----------------------------------------------------------------------
// Response readers
// ----------------------------------------------------------------------

/// Returns the block reason when the prompt was refused by the filter.
pub(crate) fn blocked_reason(response: &GenerateContentResponse) -> Option<String> {
    response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.clone())
}

/// The first text part of the first candidate.
pub(crate) fn first_text(response: &GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .as_ref()?
        .first()?
        .content
        .as_ref()?
        .parts
        .iter()
        .find_map(|part| part.text.clone())
}

/// The first inline image payload found in any candidate part.
pub(crate) fn first_inline_image(response: &GenerateContentResponse) -> Option<InlineImage> {
    response
        .candidates
        .as_ref()?
        .iter()
        .filter_map(|candidate| candidate.content.as_ref())
        .flat_map(|content| content.parts.iter())
        .find_map(|part| {
            part.inline_data
                .as_ref()
                .map(|data| InlineImage::new(data.mime_type.clone(), data.data.clone()))
        })
}

/// Grounding citations from the first candidate. Chunks without a URI are
/// dropped; a missing title falls back to "Resource".
pub(crate) fn grounding_links(response: &GenerateContentResponse) -> Vec<GroundingLink> {
    response
        .candidates
        .as_ref()
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.grounding_metadata.as_ref())
        .and_then(|metadata| metadata.grounding_chunks.as_ref())
        .map(|chunks| {
            chunks
                .iter()
                .filter_map(|chunk| chunk.web.as_ref())
                .filter_map(|web| {
                    let uri = web.uri.clone()?;
                    if uri.is_empty() {
                        return None;
                    }
                    Some(GroundingLink {
                        uri,
                        title: web
                            .title
                            .clone()
                            .unwrap_or_else(|| "Resource".to_string()),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> AttemptError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    AttemptError {
        failure: classify_status(status, &message),
        retry_after,
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    // Retry-After HTTP-date parsing is omitted for simplicity
    None
}
