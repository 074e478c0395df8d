//! LLM-backed sentence splitting
//!
//! Talks to an OpenAI-compatible chat-completions API to break flattened
//! caption text into subtitle-sized sentences.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::traits::SentenceSplitter;

/// Marker the model is asked to place between sentences
const SENTENCE_SEPARATOR: &str = "[BR]";

/// Configuration for the sentence-splitting API
#[derive(Debug, Clone)]
pub struct SplitterConfig {
    /// Chat model name (e.g., "gpt-4o-mini")
    pub model: String,
    /// API base URL
    pub api_url: String,
    /// Bearer token; optional for local OpenAI-compatible servers
    pub api_key: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Word budget per sentence, passed to the model in the prompt
    pub max_line_words: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            timeout: Duration::from_secs(120),
            max_line_words: 16,
        }
    }
}

/// Sentence splitter backed by a chat-completions API
pub struct LlmSentenceSplitter {
    config: SplitterConfig,
    client: reqwest::Client,
    /// Replies already seen for (model, text), served when use_cache is set
    cache: Mutex<HashMap<(String, String), Vec<String>>>,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl LlmSentenceSplitter {
    /// Create a new splitter with the given configuration
    pub fn new(config: SplitterConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            client,
            cache: Mutex::new(HashMap::new()),
        })
    }

    fn system_prompt(&self) -> String {
        format!(
            "You segment raw speech-recognition text into subtitle lines.\n\
             Rules:\n\
             - Break the text into complete sentences or natural clauses.\n\
             - Keep every line at {} words or fewer.\n\
             - Do not add, remove, reorder, or correct any words.\n\
             - Output the lines in order, separated by {}.\n\
             - Output nothing else.",
            self.config.max_line_words, SENTENCE_SEPARATOR
        )
    }

    /// Parse a model reply into ordered sentences. Splits on the separator
    /// marker, falling back to line breaks when the model ignored it.
    fn parse_reply(reply: &str) -> Vec<String> {
        let pieces: Vec<&str> = if reply.contains(SENTENCE_SEPARATOR) {
            reply.split(SENTENCE_SEPARATOR).collect()
        } else {
            reply.lines().collect()
        };

        pieces
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    async fn request_split(&self, text: &str) -> Result<Vec<String>> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.system_prompt(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
            temperature: 0.2,
        };

        let url = format!("{}/chat/completions", self.config.api_url);
        tracing::debug!(
            "requesting sentence split: model={}, {} chars",
            self.config.model,
            text.len()
        );

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder
            .send()
            .await
            .context("Failed to send sentence-split request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("sentence-split API returned {}: {}", status, body);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("Failed to parse sentence-split response")?;

        if let Some(error) = parsed.error {
            anyhow::bail!("sentence-split API error: {}", error.message);
        }

        let content = parsed
            .choices
            .and_then(|choices| choices.into_iter().next())
            .map(|choice| choice.message.content)
            .context("sentence-split response had no choices")?;

        let sentences = Self::parse_reply(&content);
        if sentences.is_empty() {
            anyhow::bail!("sentence-split reply contained no sentences");
        }

        Ok(sentences)
    }
}

#[async_trait]
impl SentenceSplitter for LlmSentenceSplitter {
    async fn split(&self, text: &str, use_cache: bool) -> Result<Vec<String>> {
        let key = (self.config.model.clone(), text.to_string());

        if use_cache {
            if let Some(hit) = self.cache.lock().get(&key) {
                tracing::debug!("sentence cache hit ({} sentences)", hit.len());
                return Ok(hit.clone());
            }
        }

        let sentences = self.request_split(text).await?;
        tracing::info!("extracted {} sentences from chunk", sentences.len());

        if use_cache {
            self.cache.lock().insert(key, sentences.clone());
        }

        Ok(sentences)
    }
}
