//! Member Service - create/update/remove/show for members of a list

use std::sync::Arc;

use mailchimp_client::{MailChimpGateway, RemoteCallError, created_id, paths};
use serde_json::{Map, Value};
use shared::error::AppError;
use shared::models::{MailChimpEntity, MailChimpList, MailChimpMember, MemberStatus};

use super::remote_failed;
use crate::db::{ListRepository, MemberFilter, MemberRepository, Repository};
use crate::error::ServiceResult;

#[derive(Clone)]
pub struct MemberService {
    members: MemberRepository,
    lists: ListRepository,
    gateway: Arc<dyn MailChimpGateway>,
}

impl MemberService {
    pub fn new(
        members: MemberRepository,
        lists: ListRepository,
        gateway: Arc<dyn MailChimpGateway>,
    ) -> Self {
        Self {
            members,
            lists,
            gateway,
        }
    }

    /// Resolve a member by its id *and* the id of its list
    pub async fn get(&self, list_id: &str, member_id: &str) -> ServiceResult<MailChimpMember> {
        self.members
            .find_one_by(&MemberFilter::in_list(member_id, list_id))
            .await?
            .ok_or_else(|| AppError::not_found(MailChimpMember::KIND, member_id).into())
    }

    pub async fn create(&self, list_id: &str, attrs: &Map<String, Value>) -> ServiceResult<Map<String, Value>> {
        let mut member = MailChimpMember::new(attrs);
        member.validate()?;

        let list = self.lists.find(list_id).await?.ok_or_else(AppError::invalid_list)?;
        member.assign_to_list(&list);

        self.members.save(&mut member).await?;

        let remote_list_id = list_remote_id(&list).map_err(|e| remote_failed(&member, e))?;
        let mail_chimp_id = self
            .gateway
            .post(&paths::members(&remote_list_id), &member.to_remote_map())
            .await
            .and_then(|response| created_id(&response))
            .map_err(|e| remote_failed(&member, e))?;

        member.set_mail_chimp_id(mail_chimp_id);
        self.members.save(&mut member).await?;

        tracing::info!(
            member_id = member.id(),
            list_id,
            mail_chimp_id = member.mail_chimp_id(),
            status = member.status().map(MemberStatus::as_str),
            "Member created"
        );
        Ok(member.to_local_map())
    }

    pub async fn update(
        &self,
        list_id: &str,
        member_id: &str,
        attrs: &Map<String, Value>,
    ) -> ServiceResult<Map<String, Value>> {
        let mut member = self.get(list_id, member_id).await?;
        member.fill(attrs);
        member.validate()?;

        self.members.save(&mut member).await?;

        let path = self.remote_path(&member).await?;
        self.gateway
            .patch(&path, &member.to_remote_map())
            .await
            .map_err(|e| remote_failed(&member, e))?;

        Ok(member.to_local_map())
    }

    pub async fn remove(&self, list_id: &str, member_id: &str) -> ServiceResult<()> {
        let member = self.get(list_id, member_id).await?;
        // Resolved before the local delete; the list row is still needed for its remote id
        let path = self.remote_path(&member).await;

        self.members.delete(&member).await?;

        self.gateway
            .delete(&path?)
            .await
            .map_err(|e| remote_failed(&member, e))?;

        tracing::info!(member_id, list_id, "Member removed");
        Ok(())
    }

    pub async fn show(&self, list_id: &str, member_id: &str) -> ServiceResult<Map<String, Value>> {
        Ok(self.get(list_id, member_id).await?.to_local_map())
    }

    /// `lists/{remoteListId}/members/{remoteMemberId}` for a stored member
    async fn remote_path(&self, member: &MailChimpMember) -> ServiceResult<String> {
        let list_id = member.list_id().unwrap_or_default();
        let list = self.lists.find(list_id).await?;

        list.as_ref()
            .ok_or_else(|| RemoteCallError::not_synced(MailChimpList::KIND, list_id))
            .and_then(list_remote_id)
            .and_then(|remote_list_id| {
                member
                    .mail_chimp_id()
                    .map(|remote_member_id| paths::member(&remote_list_id, remote_member_id))
                    .ok_or_else(|| {
                        RemoteCallError::not_synced(MailChimpMember::KIND, member.id().unwrap_or_default())
                    })
            })
            .map_err(|e| remote_failed(member, e))
    }
}

fn list_remote_id(list: &MailChimpList) -> Result<String, RemoteCallError> {
    list.mail_chimp_id().map(str::to_string).ok_or_else(|| {
        RemoteCallError::not_synced(MailChimpList::KIND, list.id().unwrap_or_default())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::error::ServiceError;
    use mailchimp_client::{InMemoryGateway, Method};
    use serde_json::json;
    use shared::error::ErrorCode;

    struct Fixture {
        service: MemberService,
        gateway: Arc<InMemoryGateway>,
        db: DbService,
        list_id: String,
    }

    /// A stored list already synced as `list-remote`
    async fn setup() -> Fixture {
        let db = DbService::in_memory().await.unwrap();
        let gateway = Arc::new(InMemoryGateway::new());

        let mut list = MailChimpList::new(json!({ "name": "Audience" }).as_object().unwrap());
        list.set_mail_chimp_id("list-remote".into());
        db.lists().create(&mut list).await.unwrap();

        Fixture {
            service: MemberService::new(db.members(), db.lists(), gateway.clone()),
            gateway,
            list_id: list.id().unwrap().to_string(),
            db,
        }
    }

    fn attrs(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn member_data() -> Map<String, Value> {
        attrs(json!({ "email_address": "a@b.com", "status": "subscribed" }))
    }

    fn app_error(err: ServiceError) -> AppError {
        err.into()
    }

    async fn member_count(db: &DbService) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM mailchimp_member")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        count
    }

    #[tokio::test]
    async fn test_create_uses_gateway_id() {
        let f = setup().await;

        let created = f.service.create(&f.list_id, &member_data()).await.unwrap();
        assert_eq!(created["mail_chimp_id"], "mc-1");
        assert_eq!(created["list_id"], f.list_id.as_str());
        assert_eq!(created["status"], "subscribed");
        assert_eq!(created["vip"], Value::Null);

        let call = f.gateway.last_call().unwrap();
        assert_eq!(call.method, Method::POST);
        assert_eq!(call.path, "lists/list-remote/members");
        assert_eq!(call.body.unwrap(), member_data());
    }

    #[tokio::test]
    async fn test_create_under_unknown_list() {
        let f = setup().await;

        let err = app_error(f.service.create("missing", &member_data()).await.unwrap_err());
        assert_eq!(err.code, ErrorCode::InvalidList);
        assert_eq!(err.message, "Invalid list given");
        assert_eq!(member_count(&f.db).await, 0);
        assert!(f.gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_validates_before_list_lookup() {
        let f = setup().await;

        let err = app_error(
            f.service
                .create("missing", &attrs(json!({ "email_address": "a@b.com", "status": "invalid" })))
                .await
                .unwrap_err(),
        );
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.errors.unwrap().contains_key("status"));
    }

    #[tokio::test]
    async fn test_create_remote_failure_keeps_unsynced_member() {
        let f = setup().await;
        f.gateway.fail_with("a@b.com is already a list member.");

        let err = app_error(f.service.create(&f.list_id, &member_data()).await.unwrap_err());
        assert_eq!(err.code, ErrorCode::RemoteCallFailed);
        assert_eq!(err.message, "a@b.com is already a list member.");

        let members = f.db.members().find_by_list(&f.list_id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert!(members[0].mail_chimp_id().is_none());
    }

    #[tokio::test]
    async fn test_create_under_unsynced_list_keeps_local_member() {
        let f = setup().await;
        let mut list = MailChimpList::new(json!({ "name": "Offline" }).as_object().unwrap());
        f.db.lists().create(&mut list).await.unwrap();
        let list_id = list.id().unwrap();

        let err = app_error(f.service.create(list_id, &member_data()).await.unwrap_err());
        assert_eq!(err.code, ErrorCode::RemoteCallFailed);
        assert_eq!(err.message, format!("MailChimpList[{list_id}] is not synced with MailChimp"));
        assert!(f.gateway.calls().is_empty());

        let members = f.db.members().find_by_list(list_id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert!(members[0].mail_chimp_id().is_none());
    }

    #[tokio::test]
    async fn test_show_requires_matching_list() {
        let f = setup().await;
        let created = f.service.create(&f.list_id, &member_data()).await.unwrap();
        let member_id = created["member_id"].as_str().unwrap();

        let shown = f.service.show(&f.list_id, member_id).await.unwrap();
        assert_eq!(shown, created);

        let err = app_error(f.service.show("other-list", member_id).await.unwrap_err());
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, format!("MailChimpMember[{member_id}] not found"));
    }

    #[tokio::test]
    async fn test_update_patches_remote_member() {
        let f = setup().await;
        let created = f.service.create(&f.list_id, &member_data()).await.unwrap();
        let member_id = created["member_id"].as_str().unwrap();

        let updated = f
            .service
            .update(&f.list_id, member_id, &attrs(json!({ "email_type": "text" })))
            .await
            .unwrap();
        assert_eq!(updated["email_type"], "text");
        assert_eq!(updated["email_address"], "a@b.com");

        let call = f.gateway.last_call().unwrap();
        assert_eq!(call.method, Method::PATCH);
        assert_eq!(call.path, "lists/list-remote/members/mc-1");
    }

    #[tokio::test]
    async fn test_update_invalid_status_is_not_persisted() {
        let f = setup().await;
        let created = f.service.create(&f.list_id, &member_data()).await.unwrap();
        let member_id = created["member_id"].as_str().unwrap();
        f.gateway.reset();

        let err = app_error(
            f.service
                .update(&f.list_id, member_id, &attrs(json!({ "status": "invalid" })))
                .await
                .unwrap_err(),
        );
        assert_eq!(
            err.errors.unwrap()["status"],
            vec!["The selected status is invalid."]
        );
        assert!(f.gateway.calls().is_empty());
        assert_eq!(
            f.service.show(&f.list_id, member_id).await.unwrap()["status"],
            "subscribed"
        );
    }

    #[tokio::test]
    async fn test_update_remote_failure_keeps_local_change() {
        let f = setup().await;
        let created = f.service.create(&f.list_id, &member_data()).await.unwrap();
        let member_id = created["member_id"].as_str().unwrap();
        f.gateway.fail_with("Invalid Resource");

        let err = app_error(
            f.service
                .update(&f.list_id, member_id, &attrs(json!({ "vip": true })))
                .await
                .unwrap_err(),
        );
        assert_eq!(err.code, ErrorCode::RemoteCallFailed);
        assert_eq!(f.service.show(&f.list_id, member_id).await.unwrap()["vip"], true);
    }

    #[tokio::test]
    async fn test_remove_deletes_locally_even_if_remote_fails() {
        let f = setup().await;
        let created = f.service.create(&f.list_id, &member_data()).await.unwrap();
        let member_id = created["member_id"].as_str().unwrap();
        f.gateway.fail_with("Resource Not Found");

        let err = app_error(f.service.remove(&f.list_id, member_id).await.unwrap_err());
        assert_eq!(err.code, ErrorCode::RemoteCallFailed);
        assert_eq!(member_count(&f.db).await, 0);

        let call = f.gateway.last_call().unwrap();
        assert_eq!(call.method, Method::DELETE);
        assert_eq!(call.path, "lists/list-remote/members/mc-1");
    }

    #[tokio::test]
    async fn test_remove_unsynced_member() {
        let f = setup().await;
        f.gateway.fail_with("Service Unavailable");
        let _ = f.service.create(&f.list_id, &member_data()).await.unwrap_err();
        f.gateway.reset();

        let member = f.db.members().find_by_list(&f.list_id).await.unwrap().remove(0);
        let member_id = member.id().unwrap();

        let err = app_error(f.service.remove(&f.list_id, member_id).await.unwrap_err());
        assert_eq!(
            err.message,
            format!("MailChimpMember[{member_id}] is not synced with MailChimp")
        );
        assert_eq!(member_count(&f.db).await, 0);
        assert!(f.gateway.calls().is_empty());
    }
}
