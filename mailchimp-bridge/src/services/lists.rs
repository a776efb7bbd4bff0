//! List Service - create/update/remove/show for MailChimp lists

use std::sync::Arc;

use mailchimp_client::{MailChimpGateway, RemoteCallError, created_id, paths};
use serde_json::{Map, Value};
use shared::error::AppError;
use shared::models::{MailChimpEntity, MailChimpList};

use super::remote_failed;
use crate::db::{ListRepository, Repository};
use crate::error::ServiceResult;

#[derive(Clone)]
pub struct ListService {
    lists: ListRepository,
    gateway: Arc<dyn MailChimpGateway>,
}

impl ListService {
    pub fn new(lists: ListRepository, gateway: Arc<dyn MailChimpGateway>) -> Self {
        Self { lists, gateway }
    }

    /// Resolve a list by local id or answer `MailChimpList[<id>] not found`
    pub async fn get(&self, list_id: &str) -> ServiceResult<MailChimpList> {
        self.lists
            .find(list_id)
            .await?
            .ok_or_else(|| AppError::not_found(MailChimpList::KIND, list_id).into())
    }

    pub async fn create(&self, attrs: &Map<String, Value>) -> ServiceResult<Map<String, Value>> {
        let mut list = MailChimpList::new(attrs);
        list.validate()?;

        self.lists.save(&mut list).await?;

        let mail_chimp_id = self
            .gateway
            .post(&paths::lists(), &list.to_remote_map())
            .await
            .and_then(|response| created_id(&response))
            .map_err(|e| remote_failed(&list, e))?;

        list.set_mail_chimp_id(mail_chimp_id);
        self.lists.save(&mut list).await?;

        tracing::info!(list_id = list.id(), mail_chimp_id = list.mail_chimp_id(), "List created");
        Ok(list.to_local_map())
    }

    pub async fn update(&self, list_id: &str, attrs: &Map<String, Value>) -> ServiceResult<Map<String, Value>> {
        let mut list = self.get(list_id).await?;
        list.fill(attrs);
        list.validate()?;

        self.lists.save(&mut list).await?;

        let remote_id = remote_id(&list).map_err(|e| remote_failed(&list, e))?;
        self.gateway
            .patch(&paths::list(&remote_id), &list.to_remote_map())
            .await
            .map_err(|e| remote_failed(&list, e))?;

        Ok(list.to_local_map())
    }

    pub async fn remove(&self, list_id: &str) -> ServiceResult<()> {
        let list = self.get(list_id).await?;

        self.lists.delete(&list).await?;

        let remote_id = remote_id(&list).map_err(|e| remote_failed(&list, e))?;
        self.gateway
            .delete(&paths::list(&remote_id))
            .await
            .map_err(|e| remote_failed(&list, e))?;

        tracing::info!(list_id, "List removed");
        Ok(())
    }

    pub async fn show(&self, list_id: &str) -> ServiceResult<Map<String, Value>> {
        Ok(self.get(list_id).await?.to_local_map())
    }
}

fn remote_id(list: &MailChimpList) -> Result<String, RemoteCallError> {
    list.mail_chimp_id().map(str::to_string).ok_or_else(|| {
        RemoteCallError::not_synced(MailChimpList::KIND, list.id().unwrap_or_default())
    })
}
