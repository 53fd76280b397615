//! LLM-backed commentary provider for OpenAI and Anthropic.

use crate::commentary::{CommentaryError, CommentaryProvider, GameSnapshot};
use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// System prompt pinning the commentator's register.
const SYSTEM_PROMPT: &str = "Provide only a witty, playful trash talk message \
    for a Tic Tac Toe match. Never be mean or offensive.";

/// Default persona framing, used when the caller supplies no style override.
const DEFAULT_PERSONA: &str = "You are a playful, sassy AI designed to provide \
    witty \"trash talk\" for a Tic Tac Toe game, never crossing the line into \
    mean or offensive.\nGiven the following game state and event, generate a \
    single, clever, concise chat message as if trash talking your opponent, \
    tailored to the situation.";

/// Substituted when the service answers successfully but without any text.
const FALLBACK_LINE: &str = "Oops! AI lost its words.";

/// LLM provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI (GPT models).
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
}

impl LlmProvider {
    /// Environment variable holding this provider's API key.
    pub fn env_var(self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "OPENAI_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "gpt-3.5-turbo",
            LlmProvider::Anthropic => "claude-3-5-haiku-20241022",
        }
    }
}

/// Configuration for the LLM client.
///
/// A missing API key is not a construction error: the client fails with
/// [`CommentaryError::MissingCredential`] on the first generate call, which
/// the orchestrator then surfaces as a chat message.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    provider: LlmProvider,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl LlmConfig {
    /// Creates a new LLM configuration.
    #[instrument(skip(api_key), fields(provider = ?provider, model = %model))]
    pub fn new(
        provider: LlmProvider,
        api_key: Option<String>,
        model: String,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        debug!("Creating LLM config");
        Self {
            provider,
            api_key,
            model,
            max_tokens,
            temperature,
        }
    }

    /// Builds a configuration from the environment, loading `.env` first.
    ///
    /// Model and sampling defaults suit one-line banter: a small completion
    /// budget and a high temperature.
    pub fn from_env(provider: LlmProvider) -> Self {
        dotenvy::dotenv().ok();
        let api_key = std::env::var(provider.env_var()).ok();
        Self::new(
            provider,
            api_key,
            provider.default_model().to_string(),
            32,
            0.9,
        )
    }

    /// Gets the provider.
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Gets the model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Commentary provider backed by an LLM completion API.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
}

impl LlmClient {
    /// Creates a new LLM client.
    #[instrument(skip(config), fields(provider = ?config.provider()))]
    pub fn new(config: LlmConfig) -> Self {
        info!("Creating LLM client");
        Self { config }
    }

    fn api_key(&self) -> Result<&str, CommentaryError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(CommentaryError::MissingCredential {
                env_var: self.config.provider.env_var(),
            })
    }

    /// Generates a completion using OpenAI.
    #[instrument(skip(self, user_prompt))]
    async fn generate_openai(&self, user_prompt: &str) -> Result<String, CommentaryError> {
        let api_key = self.api_key()?;
        let client =
            OpenAIClient::with_config(OpenAIConfig::new().with_api_key(api_key.to_string()));

        debug!("Building chat completion request");
        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()
                    .map_err(|e| CommentaryError::InvalidRequest {
                        message: format!("Failed to build system message: {e}"),
                    })?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_prompt)
                    .build()
                    .map_err(|e| CommentaryError::InvalidRequest {
                        message: format!("Failed to build user message: {e}"),
                    })?,
            ),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .max_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .build()
            .map_err(|e| CommentaryError::InvalidRequest {
                message: format!("Failed to build request: {e}"),
            })?;

        debug!("Sending request to OpenAI");
        let response = client.chat().create(request).await.map_err(|e| {
            error!(error = ?e, "OpenAI API error");
            map_openai_error(e)
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone());

        match content {
            Some(text) => {
                info!(content_length = text.len(), "Generated completion");
                Ok(text.trim().to_string())
            }
            None => {
                // A success response with no text is not worth failing the chat over.
                debug!("No content in OpenAI response, using fallback line");
                Ok(FALLBACK_LINE.to_string())
            }
        }
    }

    /// Generates a completion using Anthropic Claude.
    #[instrument(skip(self, user_prompt))]
    async fn generate_anthropic(&self, user_prompt: &str) -> Result<String, CommentaryError> {
        let api_key = self.api_key()?.to_string();
        let client = reqwest::Client::new();

        debug!("Building Anthropic API request");
        let request_body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": SYSTEM_PROMPT,
            "messages": [
                {
                    "role": "user",
                    "content": user_prompt
                }
            ]
        });

        debug!("Sending request to Anthropic");
        let response = client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Anthropic API request failed");
                CommentaryError::Transport {
                    message: format!("Anthropic API request failed: {e}"),
                }
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read Anthropic response");
            CommentaryError::Transport {
                message: format!("Failed to read response: {e}"),
            }
        })?;

        if !status.is_success() {
            error!(status = %status, response = %response_text, "Anthropic API error");
            return Err(CommentaryError::Api {
                status: Some(status.as_u16()),
                body: response_text,
            });
        }

        debug!(response_length = response_text.len(), "Parsing Anthropic response");
        let response_json: serde_json::Value =
            serde_json::from_str(&response_text).map_err(|e| {
                error!(error = ?e, "Failed to parse Anthropic response");
                CommentaryError::Transport {
                    message: format!("Failed to parse response: {e}"),
                }
            })?;

        match response_json["content"][0]["text"].as_str() {
            Some(text) => {
                info!(content_length = text.len(), "Generated completion");
                Ok(text.trim().to_string())
            }
            None => {
                debug!("No text content in Anthropic response, using fallback line");
                Ok(FALLBACK_LINE.to_string())
            }
        }
    }
}

/// Splits service-reported errors from transport-level failures. The client
/// library parses error responses into its own type and drops the HTTP
/// status, so `Api` carries the message body alone on this path.
fn map_openai_error(err: OpenAIError) -> CommentaryError {
    match err {
        OpenAIError::ApiError(api) => CommentaryError::Api {
            status: None,
            body: api.message,
        },
        other => CommentaryError::Transport {
            message: format!("OpenAI API error: {other}"),
        },
    }
}

/// Assembles the user prompt: persona framing (or the caller's override),
/// then the serialized game state and the triggering event.
fn build_user_prompt(
    snapshot: &GameSnapshot,
    event_description: &str,
    style: Option<&str>,
) -> Result<String, CommentaryError> {
    let state_json =
        serde_json::to_string(snapshot).map_err(|e| CommentaryError::InvalidRequest {
            message: format!("Failed to serialize snapshot: {e}"),
        })?;
    let framing = style.unwrap_or(DEFAULT_PERSONA);
    Ok(format!(
        "{framing}\n\nGame State: {state_json}\nLast Event: {event_description}\nTrash Talk Response:\n"
    ))
}

#[async_trait]
impl CommentaryProvider for LlmClient {
    #[instrument(skip(self, snapshot, style), fields(provider = ?self.config.provider, model = %self.config.model))]
    async fn generate(
        &self,
        snapshot: &GameSnapshot,
        event_description: &str,
        style: Option<&str>,
    ) -> Result<String, CommentaryError> {
        debug!("Generating commentary");
        let user_prompt = build_user_prompt(snapshot, event_description, style)?;
        match self.config.provider {
            LlmProvider::OpenAI => self.generate_openai(&user_prompt).await,
            LlmProvider::Anthropic => self.generate_anthropic(&user_prompt).await,
        }
    }
}
