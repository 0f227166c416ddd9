use std::fmt;

use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Gemini API key is missing")]
    MissingApiKey,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("Gemini response contained no content parts")]
    EmptyResponse {
        feedback: Option<PromptFeedback>,
        finish_reason: Option<String>,
    },
}

impl GeminiError {
    /// Prompt feedback attached to an empty response, if Gemini sent any.
    pub fn feedback(&self) -> Option<&PromptFeedback> {
        match self {
            GeminiError::EmptyResponse { feedback, .. } => feedback.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
    #[serde(default)]
    pub safety_ratings: Vec<SafetyRating>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SafetyRating {
    pub category: String,
    pub probability: String,
}

impl fmt::Display for PromptFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let block_reason = self.block_reason.as_deref().unwrap_or("none");
        write!(f, "block reason: {block_reason}")?;

        if !self.safety_ratings.is_empty() {
            let ratings = self
                .safety_ratings
                .iter()
                .map(|rating| format!("{}={}", rating.category, rating.probability))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "; safety ratings: {ratings}")?;
        }

        Ok(())
    }
}

impl GenerateContentResponse {
    /// Join the text of every part of the first candidate, in order.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::EmptyResponse`] when the first candidate carries
    /// no parts, keeping whatever prompt feedback Gemini returned.
    pub fn into_text(self) -> Result<String, GeminiError> {
        let GenerateContentResponse {
            candidates,
            prompt_feedback,
        } = self;

        let first = candidates.into_iter().next();
        let finish_reason = first
            .as_ref()
            .and_then(|candidate| candidate.finish_reason.clone());
        let parts = first
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts)
            .unwrap_or_default();

        if parts.is_empty() {
            return Err(GeminiError::EmptyResponse {
                feedback: prompt_feedback,
                finish_reason,
            });
        }

        debug!("Gemini returned {} content part(s)", parts.len());
        Ok(parts.into_iter().filter_map(|part| part.text).collect())
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        }
    }
}

fn endpoint_url(base_url: &str, model: &str) -> String {
    format!(
        "{base}/models/{model}:generateContent",
        base = base_url.trim_end_matches('/')
    )
}

/// Anything that can turn an instruction prompt into generated text.
pub trait TextGenerator {
    fn generate_content(&self, prompt: &str) -> Result<GenerateContentResponse, GeminiError>;

    fn generate_text(&self, prompt: &str) -> Result<String, GeminiError> {
        self.generate_content(prompt)?.into_text()
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// The underlying client has no request timeout: a long generation is
    /// awaited until Gemini answers or the connection drops.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::MissingApiKey`] when the key is empty or
    /// whitespace only, or an HTTP error if the client cannot be built.
    pub fn new(api_key: &str, model: &str) -> Result<Self, GeminiError> {
        if api_key.trim().is_empty() {
            return Err(GeminiError::MissingApiKey);
        }

        let http = Client::builder().timeout(None).build()?;

        Ok(Self {
            http,
            api_key: api_key.trim().to_string(),
            model: model.to_string(),
            base_url: API_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        endpoint_url(&self.base_url, &self.model)
    }
}

impl TextGenerator for GeminiClient {
    /// Submit a `generateContent` request.
    ///
    /// Transport failures, non-success statuses and undecodable bodies are all
    /// surfaced via `reqwest`.
    fn generate_content(&self, prompt: &str) -> Result<GenerateContentResponse, GeminiError> {
        let url = self.endpoint();
        debug!("POST {url} (model {})", self.model);

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest::new(prompt))
            .send()?;

        let response = response.error_for_status()?;
        let parsed = response.json::<GenerateContentResponse>()?;
        debug!("Gemini returned {} candidate(s)", parsed.candidates.len());
        Ok(parsed)
    }
}

/// Generate text for `prompt` with the given model.
///
/// # Errors
///
/// Returns [`GeminiError::MissingApiKey`] for a blank key, an HTTP error from
/// `reqwest`, or [`GeminiError::EmptyResponse`] when no parts come back.
pub fn generate_text(api_key: &str, model: &str, prompt: &str) -> Result<String, GeminiError> {
    GeminiClient::new(api_key, model)?.generate_text(prompt)
}

#[cfg(test)]
mod tests;
