//! Gateway configuration

use std::time::Duration;

use crate::{RemoteCallError, RemoteResult};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the MailChimp Marketing API
#[derive(Clone)]
pub struct MailChimpConfig {
    /// API key (`<key>-<dc>`), sent as the basic-auth password
    pub api_key: String,

    /// API root, e.g. `https://us1.api.mailchimp.com/3.0`
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,
}

impl MailChimpConfig {
    /// Build a configuration, deriving the base URL from the key's data
    /// center unless one is given explicitly.
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> RemoteResult<Self> {
        let api_key = api_key.into();
        let base_url = match base_url {
            Some(url) => url,
            None => {
                let dc = data_center(&api_key).ok_or(RemoteCallError::InvalidApiKey)?;
                format!("https://{dc}.api.mailchimp.com/3.0")
            }
        };

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

// Keep the key out of logs
impl std::fmt::Debug for MailChimpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailChimpConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Data center suffix of an API key (`abc123-us6` -> `us6`)
pub fn data_center(api_key: &str) -> Option<&str> {
    api_key
        .rsplit_once('-')
        .map(|(_, dc)| dc)
        .filter(|dc| !dc.is_empty() && dc.chars().all(|c| c.is_ascii_alphanumeric()))
}
