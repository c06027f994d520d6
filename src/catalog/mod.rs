use crate::config::Config;

pub const ICON: &str = "images/textty.png";

const GRAMMAR_PREAMBLE: &str = "You are a grammar expert. Fix the grammar of the text. Keep the same tone, style, and structure of the text. IMPORTANT: Only return the fixed text, do not include any other text in your response. Here's the text to fix:";

const CASUAL_PREAMBLE: &str = "You are a writing style expert. Convert the following text to a more casual, conversational tone. IMPORTANT: Only return the converted text, do not include any other text in your response. Here's the text to convert:";

const FORMAL_PREAMBLE: &str = "You are a writing style expert. Convert the following text to a more formal, professional tone. IMPORTANT: Only return the converted text, do not include any other text in your response. Here's the text to convert:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transformation {
    FixGrammar,
    Casual,
    Formal,
    FreeForm,
}

impl Transformation {
    fn preamble(&self) -> Option<&'static str> {
        match self {
            Transformation::FixGrammar => Some(GRAMMAR_PREAMBLE),
            Transformation::Casual => Some(CASUAL_PREAMBLE),
            Transformation::Formal => Some(FORMAL_PREAMBLE),
            Transformation::FreeForm => None,
        }
    }
}

/// What a menu entry hands to the dispatcher when activated.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformationRequest {
    pub raw_text: String,
    pub transformation: Transformation,
    pub model: Option<String>,
    /// Appended to the configured default instruction
    pub system_instruction: Option<String>,
}

/// The exact triple sent to a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub prompt: String,
    pub system_instruction: String,
    pub model: String,
}

impl TransformationRequest {
    pub fn new(raw_text: &str, transformation: Transformation) -> Self {
        TransformationRequest {
            raw_text: raw_text.to_string(),
            transformation,
            model: None,
            system_instruction: None,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        let model = model.trim();
        self.model = (!model.is_empty()).then(|| model.to_string());
        self
    }

    pub fn with_system_instruction(mut self, instruction: &str) -> Self {
        let instruction = instruction.trim();
        self.system_instruction = (!instruction.is_empty()).then(|| instruction.to_string());
        self
    }

    pub fn prompt(&self) -> String {
        match self.transformation.preamble() {
            Some(preamble) => format!("{} {}", preamble, self.raw_text),
            None => self.raw_text.clone(),
        }
    }

    pub fn resolve(&self, config: &Config) -> ResolvedRequest {
        let system_instruction = match &self.system_instruction {
            Some(extra) if config.default_prompt.is_empty() => extra.clone(),
            Some(extra) => format!("{} {}", config.default_prompt, extra),
            None => config.default_prompt.clone(),
        };

        ResolvedRequest {
            prompt: self.prompt(),
            system_instruction,
            model: self
                .model
                .clone()
                .unwrap_or_else(|| config.default_model.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub label: &'static str,
    pub description: &'static str,
    pub icon_hint: &'static str,
    pub transformation: Transformation,
}

impl CatalogEntry {
    pub fn build(&self, raw_text: &str) -> TransformationRequest {
        TransformationRequest::new(raw_text, self.transformation)
    }
}

const ENTRIES: [CatalogEntry; 4] = [
    CatalogEntry {
        label: "Fix Grammar",
        description: "Fix grammar ✅",
        icon_hint: ICON,
        transformation: Transformation::FixGrammar,
    },
    CatalogEntry {
        label: "More Casual",
        description: "Make this more conversational 🏖️",
        icon_hint: ICON,
        transformation: Transformation::Casual,
    },
    CatalogEntry {
        label: "More Formal",
        description: "Make this more professional 👔",
        icon_hint: ICON,
        transformation: Transformation::Formal,
    },
    CatalogEntry {
        label: "Ask",
        description: "Send the text as a prompt 💬",
        icon_hint: ICON,
        transformation: Transformation::FreeForm,
    },
];

pub struct PromptCatalog;

impl PromptCatalog {
    pub fn entries() -> &'static [CatalogEntry] {
        &ENTRIES
    }

    pub fn find(label: &str) -> Option<&'static CatalogEntry> {
        ENTRIES
            .iter()
            .find(|entry| entry.label.eq_ignore_ascii_case(label.trim()))
    }
}
