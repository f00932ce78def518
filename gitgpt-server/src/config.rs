use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};
use gitgpt_core::GitgptError;
use gitgpt_llm::GROQ_BASE_URL;
use secrecy::{ExposeSecret, SecretString};

use crate::gateway::{GatewayOptions, DEFAULT_CLASSIFIER_MODEL, DEFAULT_TRANSLATE_MODEL};
use crate::routes::HttpLimits;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Process configuration, read once at startup from flags, the environment
/// and an optional `.env` file.
#[derive(Clone, Debug, Parser)]
#[command(name = "gitgpt-server", version, about = "Natural language to git command gateway")]
pub struct ServerConfig {
    #[arg(long, env = "GITGPT_BIND", default_value = "0.0.0.0:5001")]
    pub bind: SocketAddr,

    /// Credential for the LLM backend.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true, value_parser = parse_secret)]
    pub api_key: SecretString,

    #[arg(long, env = "GITGPT_BASE_URL", default_value = GROQ_BASE_URL)]
    pub base_url: String,

    #[arg(long, env = "GITGPT_TRANSLATE_MODEL", default_value = DEFAULT_TRANSLATE_MODEL)]
    pub translate_model: String,

    #[arg(long, env = "GITGPT_CLASSIFIER_MODEL", default_value = DEFAULT_CLASSIFIER_MODEL)]
    pub classifier_model: String,

    /// Run the safety classifier on /security-check instead of reporting
    /// every command as unsafe.
    #[arg(long, env = "GITGPT_CLASSIFIER_ENABLED", default_value_t = false, action = ArgAction::Set)]
    pub classifier_enabled: bool,

    /// Advertise the tool catalog on classifier calls.
    #[arg(long, env = "GITGPT_CLASSIFIER_TOOLS", default_value_t = true, action = ArgAction::Set)]
    pub classifier_tools: bool,

    #[arg(long, env = "GITGPT_REQUEST_TIMEOUT_SECS", default_value_t = 60)]
    pub request_timeout_secs: u64,

    /// Attempts per backend call; 1 disables retries.
    #[arg(long, env = "GITGPT_MAX_ATTEMPTS", default_value_t = 1)]
    pub max_attempts: usize,

    #[arg(long, env = "GITGPT_MAX_CONCURRENCY", default_value_t = 64)]
    pub max_concurrency: usize,

    #[arg(long, env = "GITGPT_MAX_BODY_BYTES", default_value_t = 1024 * 1024)]
    pub max_body_bytes: usize,

    #[arg(long, env = "GITGPT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

fn parse_secret(value: &str) -> Result<SecretString, Infallible> {
    Ok(SecretString::new(value.to_string()))
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), GitgptError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(GitgptError::InvalidConfig(
                "GROQ_API_KEY must not be empty".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(GitgptError::InvalidConfig(
                "request timeout must be at least one second".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(GitgptError::InvalidConfig(
                "max attempts must be at least 1".to_string(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(GitgptError::InvalidConfig(
                "max concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn gateway_options(&self) -> GatewayOptions {
        GatewayOptions {
            translate_model: self.translate_model.clone(),
            classifier_model: self.classifier_model.clone(),
            classifier_enabled: self.classifier_enabled,
            classifier_tools: self.classifier_tools,
        }
    }

    pub fn limits(&self) -> HttpLimits {
        HttpLimits {
            max_body_bytes: self.max_body_bytes,
            max_concurrency: self.max_concurrency,
        }
    }
}
