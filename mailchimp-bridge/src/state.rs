//! Application state

use std::sync::Arc;

use mailchimp_client::{HttpGateway, MailChimpGateway};

use crate::config::Config;
use crate::db::DbService;
use crate::services::{ListService, MemberService};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: DbService,
    pub lists: ListService,
    pub members: MemberService,
}

impl AppState {
    /// Open the database and connect the HTTP gateway
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let db = DbService::new(&config.database_path).await?;
        let gateway = HttpGateway::new(config.mailchimp()?)?;
        tracing::info!(timeout_ms = config.mailchimp_timeout.as_millis() as u64, "MailChimp gateway ready");

        Ok(Self::with_gateway(db, Arc::new(gateway)))
    }

    /// Wire services over an existing database and gateway
    pub fn with_gateway(db: DbService, gateway: Arc<dyn MailChimpGateway>) -> Self {
        Self {
            lists: ListService::new(db.lists(), gateway.clone()),
            members: MemberService::new(db.members(), db.lists(), gateway),
            db,
        }
    }
}
