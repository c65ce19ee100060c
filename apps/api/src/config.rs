use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::markup::ContentPolicy;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub generation_service_url: String,
    pub generation_timeout: Duration,
    /// Delay before the first retry of a failed generation call.
    pub generation_retry_delay: Duration,
    /// Entity-escape generated text before wrapping it in markup.
    pub escape_html: bool,
    /// Single allowed CORS origin; permissive when unset.
    pub cors_allow_origin: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timeout_secs = lookup("GENERATION_TIMEOUT_SECS")
            .unwrap_or_else(|| "120".to_string())
            .parse::<u64>()
            .context("GENERATION_TIMEOUT_SECS must be a whole number of seconds")?;
        let retry_delay_ms = lookup("GENERATION_RETRY_DELAY_MS")
            .unwrap_or_else(|| "1000".to_string())
            .parse::<u64>()
            .context("GENERATION_RETRY_DELAY_MS must be a whole number of milliseconds")?;

        Ok(Config {
            generation_service_url: lookup("GENERATION_SERVICE_URL")
                .context("Required environment variable 'GENERATION_SERVICE_URL' is not set")?,
            generation_timeout: Duration::from_secs(timeout_secs),
            generation_retry_delay: Duration::from_millis(retry_delay_ms),
            escape_html: match lookup("MARKUP_ESCAPE_HTML") {
                Some(value) => parse_flag("MARKUP_ESCAPE_HTML", &value)?,
                None => false,
            },
            cors_allow_origin: lookup("CORS_ALLOW_ORIGIN").filter(|origin| !origin.is_empty()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn content_policy(&self) -> ContentPolicy {
        if self.escape_html {
            ContentPolicy::EscapeHtml
        } else {
            ContentPolicy::Verbatim
        }
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{key} must be a boolean, got '{other}'"),
    }
}
