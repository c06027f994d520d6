//! Launcher-facing result items and the two events a launcher sends us:
//! a keyword query while the user types, and activation of an item.

use log::{debug, error};

use crate::catalog::{PromptCatalog, TransformationRequest, ICON};
use crate::dispatch::RequestDispatcher;
use crate::error::TexttyError;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Dispatch(TransformationRequest),
    CopyToClipboard(String),
    DoNothing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultItem {
    pub icon: &'static str,
    pub name: String,
    pub description: String,
    pub on_enter: Action,
}

pub struct Launcher<'a> {
    dispatcher: RequestDispatcher<'a>,
}

impl<'a> Launcher<'a> {
    pub fn new(dispatcher: RequestDispatcher<'a>) -> Self {
        Launcher { dispatcher }
    }

    pub fn keyword(&self) -> &str {
        &self.dispatcher.config().keyword
    }

    /// Strips the trigger keyword so only the user's text remains.
    pub fn strip_keyword<'q>(&self, query: &'q str) -> &'q str {
        let keyword = self.keyword();
        if keyword.is_empty() {
            return query;
        }

        match query.strip_prefix(keyword) {
            Some("") => "",
            Some(rest) if rest.starts_with(' ') => &rest[1..],
            _ => query,
        }
    }

    pub fn on_keyword_query(&self, query: &str) -> Vec<ResultItem> {
        let text = self.strip_keyword(query);
        debug!("Keyword query text: {:?}", text);

        PromptCatalog::entries()
            .iter()
            .map(|entry| ResultItem {
                icon: entry.icon_hint,
                name: entry.label.to_string(),
                description: entry.description.to_string(),
                on_enter: Action::Dispatch(entry.build(text)),
            })
            .collect()
    }

    pub async fn on_item_enter(&self, request: &TransformationRequest) -> Vec<ResultItem> {
        match self.dispatcher.dispatch(request).await {
            Ok(result) => vec![ResultItem {
                icon: ICON,
                name: "Textty:".to_string(),
                description: result.wrapped,
                on_enter: Action::CopyToClipboard(result.raw),
            }],
            Err(e) => {
                error!("Generation failed: {}", e);
                let description = match &e {
                    TexttyError::Backend {
                        status: Some(401 | 403),
                        ..
                    } => format!("{} (check the API key)", e),
                    _ => e.to_string(),
                };
                vec![ResultItem {
                    icon: ICON,
                    name: "Textty error".to_string(),
                    description,
                    on_enter: Action::DoNothing,
                }]
            }
        }
    }
}
