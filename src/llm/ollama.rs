use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;

use super::{Backend, GeneratedText};
use crate::error::TexttyError;

const PROVIDER: &str = "ollama";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

/// Local inference server speaking the `/api/generate` protocol.
pub struct OllamaBackend {
    client: Client,
    host: String,
    headers: Vec<(String, String)>,
}

impl OllamaBackend {
    pub fn new(host: &str, headers: Vec<(String, String)>) -> Self {
        OllamaBackend {
            client: Client::new(),
            host: host.trim_end_matches('/').to_string(),
            headers,
        }
    }
}

#[async_trait]
impl Backend for OllamaBackend {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        model: &str,
    ) -> Result<GeneratedText, TexttyError> {
        let request = GenerateRequest {
            model,
            prompt,
            system: system_instruction,
            stream: false,
        };
        debug!("ollama request: {:?}", request);

        let mut builder = self
            .client
            .post(format!("{}/api/generate", self.host))
            .json(&request);
        for (key, value) in &self.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TexttyError::transport(PROVIDER, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            error!("ollama returned HTTP {}", status);
            return Err(TexttyError::backend_status(PROVIDER, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TexttyError::transport(PROVIDER, e))?;
        debug!("ollama response: {}", body);

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| TexttyError::response_format(PROVIDER, e.to_string()))?;

        let content = value["response"]
            .as_str()
            .ok_or_else(|| TexttyError::response_format(PROVIDER, "missing `response` field"))?;

        Ok(GeneratedText {
            content: content.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_generate_returns_response_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_json(json!({
                "model": "llama3.2",
                "prompt": "he go to store",
                "system": "Be terse.",
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3.2",
                "response": "fixed text",
                "done": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = OllamaBackend::new(&server.uri(), Vec::new());
        let generated = backend
            .generate("he go to store", "Be terse.", "llama3.2")
            .await
            .unwrap();

        assert_eq!(
            generated,
            GeneratedText {
                content: "fixed text".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_generate_sends_custom_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(header("X-Api-Key", "abc123"))
            .and(header("X-Team", "docs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let headers = crate::config::parse_headers("X-Api-Key:abc123,X-Team: docs");
        let backend = OllamaBackend::new(&format!("{}/", server.uri()), headers);
        let generated = backend.generate("p", "s", "m").await.unwrap();
        assert_eq!(generated.content, "ok");
    }

    #[tokio::test]
    async fn test_server_error_is_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let backend = OllamaBackend::new(&server.uri(), Vec::new());
        match backend.generate("p", "s", "m").await {
            Err(TexttyError::Backend { provider, status, .. }) => {
                assert_eq!(provider, "ollama");
                assert_eq!(status, Some(500));
            }
            other => panic!("Expected backend error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_field_is_format_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": true})))
            .mount(&server)
            .await;

        let backend = OllamaBackend::new(&server.uri(), Vec::new());
        let result = backend.generate("p", "s", "m").await;
        assert!(matches!(result, Err(TexttyError::ResponseFormat { .. })));
    }

    #[tokio::test]
    async fn test_non_json_body_is_format_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
            .mount(&server)
            .await;

        let backend = OllamaBackend::new(&server.uri(), Vec::new());
        let result = backend.generate("p", "s", "m").await;
        assert!(matches!(result, Err(TexttyError::ResponseFormat { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_backend_error() {
        let backend = OllamaBackend::new("http://127.0.0.1:1", Vec::new());
        let result = backend.generate("p", "s", "m").await;
        assert!(matches!(
            result,
            Err(TexttyError::Backend { status: None, .. })
        ));
    }
}
