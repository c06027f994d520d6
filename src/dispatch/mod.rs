use log::debug;

use crate::catalog::TransformationRequest;
use crate::config::Config;
use crate::error::TexttyError;
use crate::llm::BackendClient;
use crate::utils::wrap::{wrap, wrap_width};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayResult {
    /// For display
    pub wrapped: String,
    /// For the clipboard
    pub raw: String,
}

pub struct RequestDispatcher<'a> {
    config: &'a Config,
    client: BackendClient,
}

impl<'a> RequestDispatcher<'a> {
    pub fn new(config: &'a Config, client: BackendClient) -> Self {
        RequestDispatcher { config, client }
    }

    pub fn from_config(config: &'a Config) -> Result<Self, TexttyError> {
        Ok(Self::new(config, BackendClient::from_config(config)?))
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub async fn dispatch(
        &self,
        request: &TransformationRequest,
    ) -> Result<DisplayResult, TexttyError> {
        let resolved = request.resolve(self.config);
        debug!(
            "Dispatching {:?} to {} as {:?}",
            request.transformation,
            self.client.provider(),
            resolved
        );

        let generated = self
            .client
            .generate(&resolved.prompt, &resolved.system_instruction, &resolved.model)
            .await?;

        let width = wrap_width(self.config.wrap_length.as_deref());
        Ok(DisplayResult {
            wrapped: wrap(&generated.content, width),
            raw: generated.content,
        })
    }
}
