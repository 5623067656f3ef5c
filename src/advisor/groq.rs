//! Groq chat-completion client (OpenAI-compatible REST surface)

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Model used for all advisory completions
const COMPLETION_MODEL: &str = "llama3-8b-8192";

/// A remote chat-completion model
pub trait ChatModel {
    /// Submit a single-turn prompt and return the raw response text
    async fn complete(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Result<String>;
}

/// Client for the Groq chat-completion endpoint
pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

impl GroqClient {
    /// Create a new client for the given API key
    #[must_use]
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("Farecast/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            base_url: GROQ_BASE_URL.to_string(),
        }
    }
}

impl ChatModel for GroqClient {
    async fn complete(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Result<String> {
        let request = ChatRequest {
            model: COMPLETION_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Chat completion request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Chat completion failed with status {}",
                response.status()
            ));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("Chat completion returned no choices"))
    }
}
