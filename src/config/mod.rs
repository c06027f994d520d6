use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_OPENAI_HOST: &str = "https://api.openai.com";

/// Settings read once at startup and shared by reference afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend kind, `ollama` or `openai`
    pub provider: String,
    pub ollama_host: String,
    /// Extra headers for the local server as `key:value,key:value`
    pub ollama_headers: String,
    pub openai_host: String,
    pub openai_api_key: String,
    pub default_model: String,
    /// System instruction sent with every request
    pub default_prompt: String,
    /// Kept raw; see `utils::wrap::wrap_width`
    #[serde(deserialize_with = "deserialize_wrap_length")]
    pub wrap_length: Option<String>,
    /// Trigger word typed before the text
    pub keyword: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: "ollama".to_string(),
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            ollama_headers: String::new(),
            openai_host: DEFAULT_OPENAI_HOST.to_string(),
            openai_api_key: String::new(),
            default_model: "llama3.2".to_string(),
            default_prompt: "You are a helpful writing assistant.".to_string(),
            wrap_length: Some("80".to_string()),
            keyword: "tx".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawWrapLength {
    Integer(i64),
    Float(f64),
    Text(String),
}

fn deserialize_wrap_length<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawWrapLength>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        RawWrapLength::Integer(n) => n.to_string(),
        RawWrapLength::Float(f) => f.to_string(),
        RawWrapLength::Text(s) => s,
    }))
}

impl Config {
    /// Reads the config file, then applies environment overrides.
    ///
    /// An explicit `path` must exist. Without one the default location is
    /// tried and silently skipped when absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_config_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Config::default()
                }
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {:?}", path))?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("textty").join("config.toml"))
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides: [(&str, &mut String); 8] = [
            ("TEXTTY_PROVIDER", &mut self.provider),
            ("TEXTTY_OLLAMA_HOST", &mut self.ollama_host),
            ("TEXTTY_OLLAMA_HEADERS", &mut self.ollama_headers),
            ("TEXTTY_OPENAI_HOST", &mut self.openai_host),
            ("OPENAI_API_KEY", &mut self.openai_api_key),
            ("TEXTTY_MODEL", &mut self.default_model),
            ("TEXTTY_PROMPT", &mut self.default_prompt),
            ("TEXTTY_KEYWORD", &mut self.keyword),
        ];

        for (key, field) in overrides {
            if let Some(value) = lookup(key) {
                debug!("Config override from {}", key);
                *field = value;
            }
        }

        if let Some(value) = lookup("TEXTTY_WRAP_LENGTH") {
            self.wrap_length = Some(value);
        }
    }

    pub fn ollama_headers(&self) -> Vec<(String, String)> {
        parse_headers(&self.ollama_headers)
    }
}

/// Parses `key:value` pairs separated by commas. Values may contain `:`.
/// Entries that would not form a valid HTTP header are skipped here so they
/// never reach the request builder.
pub fn parse_headers(raw: &str) -> Vec<(String, String)> {
    let mut headers = Vec::new();

    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        let Some((key, value)) = entry.split_once(':') else {
            warn!("Ignoring malformed header entry: {}", entry);
            continue;
        };
        let (key, value) = (key.trim(), value.trim());

        if HeaderName::from_bytes(key.as_bytes()).is_err() {
            warn!("Ignoring header with invalid name: {:?}", key);
            continue;
        }
        if HeaderValue::from_str(value).is_err() {
            warn!("Ignoring header {} with invalid value", key);
            continue;
        }

        headers.push((key.to_string(), value.to_string()));
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.ollama_host, DEFAULT_OLLAMA_HOST);
        assert_eq!(config.keyword, "tx");
        assert_eq!(config.wrap_length.as_deref(), Some("80"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            provider = "openai"
            default_model = "gpt-4o-mini"
            "#,
        )
        .unwrap();
        assert_eq!(config.provider, "openai");
        assert_eq!(config.default_model, "gpt-4o-mini");
        assert_eq!(config.openai_host, DEFAULT_OPENAI_HOST);
        assert_eq!(config.keyword, "tx");
    }

    #[test]
    fn test_wrap_length_accepts_numbers_and_strings() {
        let config: Config = toml::from_str("wrap_length = 60").unwrap();
        assert_eq!(config.wrap_length.as_deref(), Some("60"));

        let config: Config = toml::from_str("wrap_length = \"wide\"").unwrap();
        assert_eq!(config.wrap_length.as_deref(), Some("wide"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ollama_host = \"http://gpu-box:11434\"").unwrap();
        writeln!(file, "keyword = \"fix\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.ollama_host, "http://gpu-box:11434");
        assert_eq!(config.keyword, "fix");
    }

    #[test]
    fn test_from_file_rejects_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "provider = ").unwrap();
        assert!(Config::from_file(file.path()).is_err());
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("TEXTTY_PROVIDER", "openai"),
            ("OPENAI_API_KEY", "sk-test"),
            ("TEXTTY_WRAP_LENGTH", "abc"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.provider, "openai");
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.wrap_length.as_deref(), Some("abc"));
        assert_eq!(config.default_model, "llama3.2");
    }

    #[test]
    fn test_parse_headers() {
        let headers = parse_headers("X-Api-Key: abc123, Host:example.com:8080");
        assert_eq!(
            headers,
            vec![
                ("X-Api-Key".to_string(), "abc123".to_string()),
                ("Host".to_string(), "example.com:8080".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_headers_skips_empty_and_malformed() {
        assert!(parse_headers("").is_empty());
        let headers = parse_headers("novalue, ,:orphan,Ok:1");
        assert_eq!(headers, vec![("Ok".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_parse_headers_skips_invalid_names_and_values() {
        let headers = parse_headers("Bad Name:x, X-Ok:1, Bad(Chars):y, X-Line:a\nb");
        assert_eq!(headers, vec![("X-Ok".to_string(), "1".to_string())]);
    }
}
