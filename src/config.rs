//! Configuration loading and management.
//!
//! Loads configuration from embedded config.toml with environment variable overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use url::Url;

/// Embedded configuration file content.
const CONFIG_TOML: &str = include_str!("../config.toml");

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub lldap: LldapConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
}

/// Connection settings for the LLDAP admin API.
#[derive(Clone, Deserialize)]
pub struct LldapConfig {
    pub url: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Pre-issued bearer token. When set, the login step is skipped.
    #[serde(default)]
    pub token: String,
}

// Credentials stay out of log output.
impl std::fmt::Debug for LldapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LldapConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl LldapConfig {
    /// The configured token, if any.
    pub fn pre_issued_token(&self) -> Option<&str> {
        let token = self.token.trim();
        (!token.is_empty()).then_some(token)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    /// Load configuration from embedded config.toml with environment variable overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::parse(CONFIG_TOML)?;

        if let Ok(url) = env::var("LLDAP_URL") {
            config.lldap.url = url;
        }

        if let Ok(username) = env::var("LLDAP_USERNAME") {
            config.lldap.username = username;
        }

        if let Ok(password) = env::var("LLDAP_PASSWORD") {
            config.lldap.password = password;
        }

        if let Ok(token) = env::var("LLDAP_TOKEN") {
            config.lldap.token = token;
        }

        if let Ok(log_level) = env::var("RUST_LOG") {
            config.logging.level = log_level;
        }

        config.validate()?;

        Ok(config)
    }

    fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse embedded config.toml")
    }

    /// Validate that required configuration is present.
    fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.lldap.url)
            .with_context(|| format!("Invalid LLDAP URL '{}'", self.lldap.url))?;

        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!(
                "LLDAP URL must use http or https, got '{}'",
                url.scheme()
            );
        }

        if self.lldap.pre_issued_token().is_some() {
            return Ok(());
        }

        if self.lldap.username.trim().is_empty() {
            anyhow::bail!(
                "LLDAP username not configured. Set LLDAP_USERNAME environment variable \
                 or update config.toml"
            );
        }

        if self.lldap.password.is_empty() {
            anyhow::bail!(
                "LLDAP password not configured. Set LLDAP_PASSWORD (or LLDAP_TOKEN) \
                 environment variable"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            app: AppConfig {
                name: "test".into(),
            },
            lldap: LldapConfig {
                url: "https://ldap.example.com".into(),
                username: "admin".into(),
                password: "secret".into(),
                token: String::new(),
            },
            logging: LoggingConfig {
                level: "info".into(),
            },
        }
    }

    #[test]
    fn test_config_parsing() {
        // The embedded defaults have no password, so only parsing is checked here
        let config = Config::parse(CONFIG_TOML).expect("Config parsing failed");
        assert_eq!(config.app.name, "lldap-sync");
        assert_eq!(config.lldap.pre_issued_token(), None);
    }

    #[test]
    fn test_validate_accepts_credentials() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_validate_requires_password_without_token() {
        let mut config = test_config();
        config.lldap.password = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("password"));

        config.lldap.token = "issued".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = test_config();
        config.lldap.url = "not a url".into();
        assert!(config.validate().is_err());

        config.lldap.url = "ftp://ldap.example.com".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pre_issued_token_ignores_blank() {
        let mut config = test_config();
        config.lldap.token = "   ".into();
        assert_eq!(config.lldap.pre_issued_token(), None);

        config.lldap.token = "abc".into();
        assert_eq!(config.lldap.pre_issued_token(), Some("abc"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", test_config().lldap);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
