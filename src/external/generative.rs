//! Generative model client trait for the oracle chat
//!
//! Message shapes follow the Gemini `generateContent` wire format so that
//! history can be round-tripped to clients unchanged.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::config::config::OracleConfig;
use crate::error::{AppError, Result};

/// Speaker of a message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
    Function,
}

/// Function call requested by the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

/// Result of a function call sent back to the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

/// One part of a message
///
/// Parts are matched by the key they carry. Extra keys next to it (for example
/// `thoughtSignature`) are ignored, and parts of unknown kinds are kept as raw
/// JSON so history round-trips unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ChatPart {
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: FunctionCall,
    },
    FunctionResponse {
        #[serde(rename = "functionResponse")]
        function_response: FunctionResponse,
    },
    Text {
        text: String,
    },
    Other(Value),
}

impl ChatPart {
    pub fn text(text: impl Into<String>) -> Self {
        ChatPart::Text { text: text.into() }
    }

    pub fn function_call(call: FunctionCall) -> Self {
        ChatPart::FunctionCall {
            function_call: call,
        }
    }
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub parts: Vec<ChatPart>,
}

impl ChatMessage {
    pub fn user(text: &str) -> Self {
        Self {
            role: ChatRole::User,
            parts: vec![ChatPart::text(text)],
        }
    }

    pub fn function_response(name: &str, response: Value) -> Self {
        Self {
            role: ChatRole::Function,
            parts: vec![ChatPart::FunctionResponse {
                function_response: FunctionResponse {
                    name: name.to_string(),
                    response,
                },
            }],
        }
    }

    /// First function call in the message, if any
    pub fn function_call(&self) -> Option<&FunctionCall> {
        self.parts.iter().find_map(|part| match part {
            ChatPart::FunctionCall { function_call } => Some(function_call),
            _ => None,
        })
    }

    /// Concatenated text parts
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ChatPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Tool definition exposed to the model
#[derive(Debug, Clone, Serialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Hosted generative model
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate the next model message for the conversation
    async fn generate(
        &self,
        system_prompt: &str,
        contents: &[ChatMessage],
        tools: &[ToolDeclaration],
    ) -> Result<ChatMessage>;

    /// Get the model name for logging
    fn model_name(&self) -> &str;
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ChatMessage>,
}

/// Gemini REST implementation of GenerativeModel
pub struct GeminiModel {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl GeminiModel {
    pub fn new(base_url: &str, api_key: &str, model: &str, temperature: f32, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature,
        })
    }

    pub fn from_config(config: &OracleConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            &config.api_key,
            &config.model,
            config.temperature,
            Duration::from_secs(config.timeout.max(1)),
        )
    }
}

#[async_trait]
impl GenerativeModel for GeminiModel {
    async fn generate(
        &self,
        system_prompt: &str,
        contents: &[ChatMessage],
        tools: &[ToolDeclaration],
    ) -> Result<ChatMessage> {
        let mut request_body = serde_json::json!({
            "systemInstruction": { "parts": [{ "text": system_prompt }] },
            "contents": contents,
            "generationConfig": { "temperature": self.temperature },
        });
        if !tools.is_empty() {
            request_body["tools"] = serde_json::json!([{ "functionDeclarations": tools }]);
        }

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "generative model request failed ({}): {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response.json().await?;
        body.candidates
            .into_iter()
            .find_map(|candidate| candidate.content)
            .filter(|content| !content.parts.is_empty())
            .ok_or_else(|| AppError::Upstream("generative model returned no candidates".into()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
