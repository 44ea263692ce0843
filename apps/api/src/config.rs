use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

use crate::auth::password::DEFAULT_COST;

const DEFAULT_JWT_SECRET: &str = "dev-secret-key";
const DEFAULT_LLM_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_LLM_MODEL: &str = "claude-3-5-sonnet-20241022";
const DEFAULT_ATLAS_API_URL: &str = "https://cloud.mongodb.com/api/atlas/v2";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {key} value: {message}")]
    Invalid { key: String, message: String },
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct AtlasConfig {
    pub api_url: String,
    pub api_token: String,
    pub project_id: String,
    pub region: String,
}

/// Runtime configuration read from the environment
///
/// Optional integrations are `None` when their credentials are absent.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub port: u16,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
    pub admin_emails: Vec<String>,
    pub email: Option<EmailConfig>,
    pub llm: Option<LlmConfig>,
    pub atlas: Option<AtlasConfig>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| {
            warn!("JWT_SECRET not set, using the development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        let email = var("EMAIL_API_URL").map(|api_url| EmailConfig {
            api_url,
            api_key: var("EMAIL_API_KEY"),
            from: var("EMAIL_FROM").unwrap_or_else(|| "noreply@hackathon.local".to_string()),
        });

        let llm = var("LLM_API_KEY").map(|api_key| LlmConfig {
            api_url: var("LLM_API_URL").unwrap_or_else(|| DEFAULT_LLM_API_URL.to_string()),
            api_key,
            model: var("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
        });

        let atlas = match (var("ATLAS_API_TOKEN"), var("ATLAS_PROJECT_ID")) {
            (Some(api_token), Some(project_id)) => Some(AtlasConfig {
                api_url: var("ATLAS_API_URL").unwrap_or_else(|| DEFAULT_ATLAS_API_URL.to_string()),
                api_token,
                project_id,
                region: var("ATLAS_REGION").unwrap_or_else(|| "US_EAST_1".to_string()),
            }),
            _ => None,
        };

        let config = Self {
            database_url: var("DATABASE_URL"),
            database_max_connections: try_load("DATABASE_MAX_CONNECTIONS", "5")?,
            port: try_load("PORT", "3000")?,
            jwt_secret,
            bcrypt_cost: try_load("BCRYPT_COST", &DEFAULT_COST.to_string())?,
            admin_emails: parse_list(&var("ADMIN_EMAILS").unwrap_or_default()),
            email,
            llm,
            atlas,
        };

        if config.database_url.is_none() {
            warn!("DATABASE_URL not set, using the in-memory store");
        }
        for (name, enabled) in [
            ("email delivery", config.email.is_some()),
            ("LLM", config.llm.is_some()),
            ("cluster provisioning", config.atlas.is_some()),
        ] {
            info!("{name}: {}", if enabled { "enabled" } else { "disabled" });
        }

        Ok(config)
    }

    /// A configuration with every integration disabled
    pub fn for_tests() -> Self {
        Self {
            database_url: None,
            database_max_connections: 1,
            port: 0,
            jwt_secret: "test-secret".to_string(),
            bcrypt_cost: 4,
            admin_emails: Vec::new(),
            email: None,
            llm: None,
            atlas: None,
        }
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails.iter().any(|e| e.eq_ignore_ascii_case(email))
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            key: key.to_string(),
            message: e.to_string(),
        })
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_list_is_trimmed_and_lowercased() {
        assert_eq!(
            parse_list(" Ada@Example.com, ,grace@example.com "),
            vec!["ada@example.com", "grace@example.com"]
        );
    }

    #[test]
    fn admin_email_match_ignores_case() {
        let mut config = Config::for_tests();
        config.admin_emails = vec!["ada@example.com".to_string()];
        assert!(config.is_admin_email("ADA@example.com"));
        assert!(!config.is_admin_email("eve@example.com"));
    }
}
