//! MailChimp Member model

use std::str::FromStr;
use std::sync::LazyLock;

use serde_json::{Map, Value};

use super::{MailChimpEntity, MailChimpList, attributes};
use crate::validation::{Rule, RuleSet};

attributes! {
    /// Member attributes MailChimp knows about
    pub struct MemberAttributes {
        email_address,
        status,
        email_type,
        merge_fields,
        interests,
        language,
        vip,
        location,
        marketing_permissions,
        ip_signup,
        timestamp_signup,
        ip_opt,
        timestamp_opt,
        tags,
    }
}

/// Subscription status of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Subscribed,
    Unsubscribed,
    Cleaned,
    Pending,
}

impl MemberStatus {
    pub const ALLOWED: &'static [&'static str] = &["subscribed", "unsubscribed", "cleaned", "pending"];

    pub fn as_str(self) -> &'static str {
        match self {
            MemberStatus::Subscribed => "subscribed",
            MemberStatus::Unsubscribed => "unsubscribed",
            MemberStatus::Cleaned => "cleaned",
            MemberStatus::Pending => "pending",
        }
    }
}

impl FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subscribed" => Ok(MemberStatus::Subscribed),
            "unsubscribed" => Ok(MemberStatus::Unsubscribed),
            "cleaned" => Ok(MemberStatus::Cleaned),
            "pending" => Ok(MemberStatus::Pending),
            other => Err(format!("unknown member status: {other}")),
        }
    }
}

static MEMBER_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    use Rule::*;

    RuleSet::new()
        .field("email_address", [Required, Email])
        .field("status", [Required, String, In(MemberStatus::ALLOWED)])
        .field("email_type", [String, In(&["html", "text"])])
        .field("merge_fields", [Array])
        .field("interests", [Array])
        .field("language", [String, Size(2)])
        .field("vip", [Boolean])
        .field("location", [Array])
        .field("location.latitude", [RequiredWith("location"), Numeric, Between(-90.0, 90.0)])
        .field("location.longitude", [RequiredWith("location"), Numeric, Between(-180.0, 180.0)])
        .field("marketing_permissions", [Array])
        .field(
            "marketing_permissions.*.marketing_permission_id",
            [RequiredWith("marketing_permissions"), String],
        )
        .field(
            "marketing_permissions.*.enabled",
            [RequiredWith("marketing_permissions"), Boolean],
        )
        .field("ip_signup", [String, Ip])
        .field("timestamp_signup", [DateTime])
        .field("ip_opt", [String, Ip])
        .field("timestamp_opt", [DateTime])
        .field("tags", [Array])
});

/// Local mirror of a MailChimp list member
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MailChimpMember {
    member_id: Option<String>,
    mail_chimp_id: Option<String>,
    list_id: Option<String>,
    pub attributes: MemberAttributes,
}

impl MailChimpMember {
    pub fn new(attrs: &Map<String, Value>) -> Self {
        let mut member = Self::default();
        member.fill(attrs);
        member
    }

    /// Rebuild a member read back from the store
    pub fn restore(
        member_id: String,
        mail_chimp_id: Option<String>,
        list_id: String,
        attributes: MemberAttributes,
    ) -> Self {
        Self {
            member_id: Some(member_id),
            mail_chimp_id,
            list_id: Some(list_id),
            attributes,
        }
    }

    /// Bind the member to its owning list (by local id)
    pub fn assign_to_list(&mut self, list: &MailChimpList) -> &mut Self {
        self.list_id = list.id().map(str::to_string);
        self
    }

    /// Local id of the owning list
    pub fn list_id(&self) -> Option<&str> {
        self.list_id.as_deref()
    }

    pub fn ensure_id(&mut self, generate: impl FnOnce() -> String) -> &str {
        self.member_id.get_or_insert_with(generate)
    }

    /// Parsed status, `None` when absent or not one of the allowed values
    pub fn status(&self) -> Option<MemberStatus> {
        self.attributes
            .status
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }
}

impl MailChimpEntity for MailChimpMember {
    const KIND: &'static str = "MailChimpMember";

    fn id(&self) -> Option<&str> {
        self.member_id.as_deref()
    }

    fn mail_chimp_id(&self) -> Option<&str> {
        self.mail_chimp_id.as_deref()
    }

    fn set_mail_chimp_id(&mut self, id: String) {
        self.mail_chimp_id = Some(id);
    }

    fn fill(&mut self, attrs: &Map<String, Value>) {
        self.attributes.fill(attrs);
    }

    fn to_local_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("member_id".into(), self.member_id.clone().into());
        map.insert("mail_chimp_id".into(), self.mail_chimp_id.clone().into());
        map.insert("list_id".into(), self.list_id.clone().into());
        map.extend(self.attributes.to_map());
        map
    }

    fn to_remote_map(&self) -> Map<String, Value> {
        self.attributes.to_present_map()
    }

    fn validation_rules() -> &'static RuleSet {
        &MEMBER_RULES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn member(data: Value) -> MailChimpMember {
        MailChimpMember::new(data.as_object().unwrap())
    }

    #[test]
    fn test_minimal_member_is_valid() {
        let m = member(json!({ "email_address": "a@b.com", "status": "subscribed" }));
        assert!(m.validate().is_ok());
        assert_eq!(m.status(), Some(MemberStatus::Subscribed));
    }

    #[test]
    fn test_invalid_status_names_status() {
        let m = member(json!({ "email_address": "a@b.com", "status": "invalid" }));
        let errors = m.validate().unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors["status"], vec!["The selected status is invalid."]);
        assert_eq!(m.status(), None);
    }

    #[test]
    fn test_location_out_of_range() {
        let m = member(json!({
            "email_address": "a@b.com",
            "status": "pending",
            "location": { "latitude": 91, "longitude": -180.5 }
        }));
        let errors = m.validate().unwrap_err();

        assert!(errors.contains_key("location.latitude"));
        assert!(errors.contains_key("location.longitude"));
    }

    #[test]
    fn test_location_requires_both_coordinates() {
        let m = member(json!({
            "email_address": "a@b.com",
            "status": "pending",
            "location": { "latitude": 12.5 }
        }));
        let errors = m.validate().unwrap_err();

        assert!(!errors.contains_key("location.latitude"));
        assert_eq!(
            errors["location.longitude"],
            vec!["The location.longitude field is required when location is present."]
        );
    }

    #[test]
    fn test_location_boundaries_are_inclusive() {
        let m = member(json!({
            "email_address": "a@b.com",
            "status": "pending",
            "location": { "latitude": -90, "longitude": 180 }
        }));
        assert!(m.validate().is_ok());
    }

    #[test]
    fn test_optional_field_rules() {
        let m = member(json!({
            "email_address": "not-an-email",
            "status": "cleaned",
            "email_type": "pdf",
            "language": "eng",
            "vip": "maybe",
            "ip_signup": "999.0.0.1",
            "timestamp_opt": "yesterday",
            "tags": "vip"
        }));
        let errors = m.validate().unwrap_err();

        for field in [
            "email_address",
            "email_type",
            "language",
            "vip",
            "ip_signup",
            "timestamp_opt",
            "tags",
        ] {
            assert!(errors.contains_key(field), "{field}");
        }
        assert!(!errors.contains_key("status"));
    }

    #[test]
    fn test_assign_to_list() {
        let mut list = MailChimpList::default();
        list.ensure_id(|| "list-1".to_string());

        let mut m = member(json!({ "email_address": "a@b.com", "status": "subscribed" }));
        assert!(m.list_id().is_none());

        m.assign_to_list(&list);
        assert_eq!(m.list_id(), Some("list-1"));
        assert_eq!(m.to_local_map()["list_id"], "list-1");
        assert!(!m.to_remote_map().contains_key("list_id"));
    }

    #[test]
    fn test_round_trip_restores_declared_attributes() {
        let source = json!({
            "email_address": "a@b.com",
            "status": "subscribed",
            "merge_fields": { "FNAME": "Ann" },
            "location": { "latitude": 1.5, "longitude": 2.5 },
            "tags": ["a", "b"],
            "unique_email_id": "ignored"
        });
        let m = member(source.clone());

        let local = m.to_local_map();
        let rebuilt = MailChimpMember::new(&local);

        assert_eq!(rebuilt.attributes, m.attributes);
        assert!(!local.contains_key("unique_email_id"));
        for field in MemberAttributes::FIELDS {
            assert!(local.contains_key(*field), "{field}");
        }
        assert_eq!(local["merge_fields"], source["merge_fields"]);
    }

    #[test]
    fn test_status_from_str() {
        for status in MemberStatus::ALLOWED {
            let parsed: MemberStatus = status.parse().unwrap();
            assert_eq!(parsed.as_str(), *status);
        }
        assert!("archived".parse::<MemberStatus>().is_err());
    }
}
