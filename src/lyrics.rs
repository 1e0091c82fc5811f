//! Lyrics generation through the Anthropic Messages API.
//!
//! # Architecture
//!
//! - [`LyricsModel`]: The capability the pipeline depends on
//! - [`AnthropicLyrics`]: `POST /v1/messages` with a fixed model and token budget
//!
//! A single attempt is made; a failed call ends the run.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, instrument};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Error)]
pub enum LyricsError {
    #[error("missing Anthropic API key")]
    MissingKey,
    #[error("Anthropic request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Trait for turning a prompt into lyrics.
pub trait LyricsModel {
    /// Send `prompt` and return the completion text verbatim.
    async fn complete(&self, prompt: &str) -> Result<String, LyricsError>;
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Concatenate the text blocks of a Messages API response, unvalidated.
fn completion_text(response: MessagesResponse) -> String {
    response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect()
}

/// Anthropic client configured with one model and token budget.
#[derive(Debug, Clone)]
pub struct AnthropicLyrics {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicLyrics {
    pub fn new(client: Client, api_key: impl Into<String>, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
        }
    }
}

impl LyricsModel for AnthropicLyrics {
    #[instrument(level = "info", skip_all, fields(model = %self.model, max_tokens = self.max_tokens))]
    async fn complete(&self, prompt: &str) -> Result<String, LyricsError> {
        if self.api_key.is_empty() {
            return Err(LyricsError::MissingKey);
        }

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let t0 = Instant::now();
        let res: Result<String, LyricsError> = async {
            let response: MessagesResponse = self
                .client
                .post(MESSAGES_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            Ok(completion_text(response))
        }
        .await;
        let dt = t0.elapsed();

        match &res {
            Ok(text) => info!(
                elapsed_ms = dt.as_millis() as u64,
                bytes = text.len(),
                "Lyrics generated"
            ),
            Err(e) => error!(elapsed_ms = dt.as_millis() as u64, error = %e, "Lyrics request failed"),
        }
        res
    }
}
