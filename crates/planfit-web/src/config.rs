//! Server configuration from the process environment.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::WebError;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_SESSION_TTL_SECS: u64 = 7200;

/// Runtime configuration, sourced from the environment (a `.env` file is
/// loaded first when present). Missing secrets fail startup rather than the
/// first request that needs them.
#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Session-signing secret (`SECRET_KEY`).
    pub secret_key: SecretString,
    /// Provider credential (`GEMINI_API_KEY`, falling back to `GOOGLE_API_KEY`).
    pub api_key: SecretString,
    pub model: String,
    pub session_ttl: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, WebError> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let host = std::env::var("PLANFIT_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let secret_key = std::env::var("SECRET_KEY")
            .map(SecretString::from)
            .map_err(|_| WebError::Config("SECRET_KEY not set".to_string()))?;

        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map(SecretString::from)
            .map_err(|_| {
                WebError::Config("GEMINI_API_KEY or GOOGLE_API_KEY not set".to_string())
            })?;

        let model = std::env::var("PLANFIT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let session_ttl = std::env::var("PLANFIT_SESSION_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_SESSION_TTL_SECS));

        Ok(Self {
            host,
            port,
            secret_key,
            api_key,
            model,
            session_ttl,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: 8080,
            secret_key: SecretString::from("secret"),
            api_key: SecretString::from("key"),
            model: DEFAULT_MODEL.to_string(),
            session_ttl: Duration::from_secs(60),
        }
    }

    #[test]
    fn test_bind_addr() {
        assert_eq!(test_config().bind_addr(), "127.0.0.1:8080");
    }
}
