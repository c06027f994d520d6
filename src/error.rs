use thiserror::Error;

#[derive(Error, Debug)]
pub enum TexttyError {
    #[error("Error connecting to {provider}: {message}")]
    Backend {
        provider: &'static str,
        status: Option<u16>,
        message: String,
    },
    #[error("Unexpected response from {provider}: {message}")]
    ResponseFormat {
        provider: &'static str,
        message: String,
    },
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl TexttyError {
    pub fn backend_status(provider: &'static str, status: u16) -> Self {
        TexttyError::Backend {
            provider,
            status: Some(status),
            message: format!("server returned HTTP {}", status),
        }
    }

    pub fn transport(provider: &'static str, err: reqwest::Error) -> Self {
        TexttyError::Backend {
            provider,
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }

    pub fn response_format(provider: &'static str, message: impl Into<String>) -> Self {
        TexttyError::ResponseFormat {
            provider,
            message: message.into(),
        }
    }
}
