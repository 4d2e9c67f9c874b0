//! Provider configuration

use secrecy::SecretString;

const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Configuration for a text-generation provider
#[derive(Clone)]
pub struct ProviderConfig {
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub model: String,
    pub max_tokens: Option<usize>,
    pub temperature: Option<f32>,
    pub timeout_seconds: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            max_tokens: None,
            temperature: None,
            timeout_seconds: Some(120),
        }
    }
}

impl ProviderConfig {
    pub fn gemini(api_key: SecretString) -> Self {
        Self {
            api_key: Some(api_key),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_defaults() {
        let config = ProviderConfig::gemini(SecretString::from("key"));
        assert_eq!(config.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.timeout_seconds, Some(120));
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_builders() {
        let config = ProviderConfig::gemini(SecretString::from("key"))
            .with_model("gemini-1.5-pro")
            .with_base_url("http://localhost:9999")
            .with_temperature(0.3);
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9999"));
        assert_eq!(config.temperature, Some(0.3));
    }
}
