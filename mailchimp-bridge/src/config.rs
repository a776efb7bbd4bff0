//! Server configuration

use std::time::Duration;

use mailchimp_client::{MailChimpConfig, RemoteResult};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// API key used in development when none is configured
const DEV_API_KEY: &str = "00000000000000000000000000000000-us1";

/// Bridge server configuration
#[derive(Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP port
    pub http_port: u16,
    /// SQLite database file
    pub database_path: String,
    /// MailChimp API key (`<key>-<dc>`)
    pub mailchimp_api_key: String,
    /// Overrides the API root derived from the key's data center
    pub mailchimp_api_url: Option<String>,
    /// MailChimp request timeout
    pub mailchimp_timeout: Duration,
    /// Log level (trace | debug | info | warn | error)
    pub log_level: String,
    /// Directory for daily rolling log files
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup` (environment in production, a map in tests)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BoxError> {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let mailchimp_api_key = match lookup("MAILCHIMP_API_KEY").filter(|v| !v.is_empty()) {
            Some(key) => key,
            None if environment == "development" => DEV_API_KEY.to_string(),
            None => return Err(format!("MAILCHIMP_API_KEY must be set in {environment} environment").into()),
        };

        Ok(Self {
            http_port: lookup("HTTP_PORT").and_then(|p| p.parse().ok()).unwrap_or(8080),
            database_path: lookup("DATABASE_PATH").unwrap_or_else(|| "mailchimp.db".into()),
            mailchimp_api_key,
            mailchimp_api_url: lookup("MAILCHIMP_API_URL").filter(|s| !s.is_empty()),
            mailchimp_timeout: Duration::from_millis(
                lookup("MAILCHIMP_TIMEOUT_MS")
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(30_000),
            ),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: lookup("LOG_DIR").filter(|s| !s.is_empty()),
            environment,
        })
    }

    /// Gateway settings derived from this configuration
    pub fn mailchimp(&self) -> RemoteResult<MailChimpConfig> {
        Ok(
            MailChimpConfig::new(self.mailchimp_api_key.clone(), self.mailchimp_api_url.clone())?
                .with_timeout(self.mailchimp_timeout),
        )
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("environment", &self.environment)
            .field("http_port", &self.http_port)
            .field("database_path", &self.database_path)
            .field("mailchimp_api_key", &"***")
            .field("mailchimp_api_url", &self.mailchimp_api_url)
            .field("mailchimp_timeout", &self.mailchimp_timeout)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}
