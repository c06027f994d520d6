mod ollama;
mod openai;

use async_trait::async_trait;
use log::info;

use crate::config::Config;
use crate::error::TexttyError;

pub use ollama::OllamaBackend;
pub use openai::OpenAIBackend;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedText {
    pub content: String,
}

#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        model: &str,
    ) -> Result<GeneratedText, TexttyError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Ollama,
    OpenAI,
}

impl BackendKind {
    pub fn parse(value: &str) -> Result<Self, TexttyError> {
        match value.trim().to_lowercase().as_str() {
            "ollama" => Ok(BackendKind::Ollama),
            "openai" => Ok(BackendKind::OpenAI),
            other => Err(TexttyError::Configuration(format!(
                "Unknown AI provider: {}",
                other
            ))),
        }
    }
}

/// The single backend selected by configuration.
pub struct BackendClient {
    backend: Box<dyn Backend>,
}

impl BackendClient {
    pub fn new(backend: Box<dyn Backend>) -> Self {
        BackendClient { backend }
    }

    pub fn from_config(config: &Config) -> Result<Self, TexttyError> {
        let backend: Box<dyn Backend> = match BackendKind::parse(&config.provider)? {
            BackendKind::Ollama => Box::new(OllamaBackend::new(
                &config.ollama_host,
                config.ollama_headers(),
            )),
            BackendKind::OpenAI => Box::new(OpenAIBackend::new(
                &config.openai_host,
                &config.openai_api_key,
            )),
        };

        Ok(Self::new(backend))
    }

    pub fn provider(&self) -> &'static str {
        self.backend.name()
    }

    pub async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        model: &str,
    ) -> Result<GeneratedText, TexttyError> {
        info!("Generating with {} (model {})", self.backend.name(), model);
        self.backend.generate(prompt, system_instruction, model).await
    }
}
