//! Client for Ollama's `/api/chat` endpoint, blocking and streaming.

use anyhow::{Context, Result};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::config;

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

// One NDJSON line of a streaming response. The final line has `done: true`
// and usually an empty message.
#[derive(Debug, Deserialize)]
struct ChatStreamChunk {
    #[serde(default)]
    message: Option<ResponseMessage>,
    #[serde(default)]
    done: bool,
}

/// Incremental events forwarded to the presenter during a streaming chat.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    Token(String),
    Done,
    Error(String),
}

/// Explicitly constructed chat client; tests point `base_url` at a mock
/// server instead of a live Ollama.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Client for the configured (env-overridable) endpoint and model.
    pub fn from_env() -> Self {
        Self::new(config::OLLAMA_URL.clone(), config::CHAT_MODEL.clone())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request(&self, prompt: &str, stream: bool) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream,
        }
    }

    /// Send one user message and await the complete reply.
    pub async fn chat(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        debug!(model = %self.model, %url, "sending chat request");

        let response = self
            .http
            .post(&url)
            .json(&self.request(prompt, false))
            .send()
            .await
            .with_context(|| format!("Failed to send request to Ollama API at {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(%status, %body, "Ollama API request failed");
            anyhow::bail!("Ollama API request failed with status {status}: {body}");
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("Failed to parse JSON response from Ollama API")?;
        Ok(parsed.message.content)
    }

    /// Send one user message and forward incremental content over `tx` as
    /// [`ChatEvent`]s. The NDJSON body is consumed to completion; there is no
    /// timeout or cancellation at this layer.
    pub async fn chat_stream(&self, prompt: &str, tx: mpsc::Sender<ChatEvent>) -> Result<()> {
        let url = format!("{}/api/chat", self.base_url);
        debug!(model = %self.model, %url, "sending streaming chat request");

        let response = match self
            .http
            .post(&url)
            .json(&self.request(prompt, true))
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                let _ = tx.send(ChatEvent::Error(err.to_string())).await;
                return Err(err)
                    .with_context(|| format!("Failed to send request to Ollama API at {url}"));
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(%status, %body, "Ollama API request failed");
            let message = format!("Ollama API request failed with status {status}: {body}");
            let _ = tx.send(ChatEvent::Error(message.clone())).await;
            anyhow::bail!(message);
        }

        let mut stream = response.bytes_stream();
        // Lines can be split across byte chunks; keep the unterminated tail.
        let mut pending = String::new();

        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(bytes) => {
                    pending.push_str(&String::from_utf8_lossy(&bytes));
                    while let Some(pos) = pending.find('\n') {
                        let line: String = pending.drain(..=pos).collect();
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<ChatStreamChunk>(line) {
                            Ok(parsed) => {
                                if let Some(message) = parsed.message {
                                    if !message.content.is_empty() {
                                        let _ = tx.send(ChatEvent::Token(message.content)).await;
                                    }
                                }
                                if parsed.done {
                                    let _ = tx.send(ChatEvent::Done).await;
                                    return Ok(());
                                }
                            }
                            Err(err) => {
                                warn!("Failed to parse JSON line: {line} - Error: {err}");
                            }
                        }
                    }
                }
                Err(err) => {
                    error!("Stream error: {err}");
                    let _ = tx.send(ChatEvent::Error(err.to_string())).await;
                    anyhow::bail!("Stream error: {err}");
                }
            }
        }

        // Stream ended without a done marker; treat it as complete.
        let _ = tx.send(ChatEvent::Done).await;
        Ok(())
    }
}
