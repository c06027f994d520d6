use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::{Backend, GeneratedText};
use crate::error::TexttyError;

const PROVIDER: &str = "openai";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Hosted chat-completion API authenticated with a bearer token.
pub struct OpenAIBackend {
    client: Client,
    host: String,
    api_key: String,
}

impl OpenAIBackend {
    pub fn new(host: &str, api_key: &str) -> Self {
        if api_key.is_empty() {
            warn!("No OpenAI API key configured, requests will likely be rejected");
        }

        OpenAIBackend {
            client: Client::new(),
            host: host.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl Backend for OpenAIBackend {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        model: &str,
    ) -> Result<GeneratedText, TexttyError> {
        let request = ChatRequest {
            model,
            messages: vec![
                Message {
                    role: "system",
                    content: system_instruction,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
        };
        debug!("openai request: {:?}", request);

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.host))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TexttyError::transport(PROVIDER, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            error!("openai returned HTTP {}", status);
            return Err(TexttyError::backend_status(PROVIDER, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TexttyError::transport(PROVIDER, e))?;
        debug!("openai response: {}", body);

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| TexttyError::response_format(PROVIDER, e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| TexttyError::response_format(PROVIDER, "no content in first choice"))?;

        Ok(GeneratedText { content })
    }
}
