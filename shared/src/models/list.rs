//! MailChimp List (audience) model

use std::sync::LazyLock;

use serde_json::{Map, Value};

use super::{MailChimpEntity, attributes};
use crate::validation::{Rule, RuleSet};

attributes! {
    /// Audience attributes MailChimp knows about
    pub struct ListAttributes {
        name,
        permission_reminder,
        use_archive_bar,
        contact,
        campaign_defaults,
        notify_on_subscribe,
        notify_on_unsubscribe,
        email_type_option,
        visibility,
        double_optin,
        marketing_permissions,
    }
}

static LIST_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    use Rule::*;

    RuleSet::new()
        .field("name", [Required, String])
        .field("permission_reminder", [Required, String])
        .field("use_archive_bar", [Boolean])
        .field("contact", [Required, Array])
        .field("contact.company", [RequiredWith("contact"), String])
        .field("contact.address1", [RequiredWith("contact"), String])
        .field("contact.address2", [String])
        .field("contact.city", [RequiredWith("contact"), String])
        .field("contact.state", [RequiredWith("contact"), String])
        .field("contact.zip", [RequiredWith("contact"), String])
        .field("contact.country", [RequiredWith("contact"), String])
        .field("contact.phone", [String])
        .field("campaign_defaults", [Array])
        .field("campaign_defaults.from_name", [RequiredWith("campaign_defaults"), String])
        .field("campaign_defaults.from_email", [RequiredWith("campaign_defaults"), Email])
        .field("campaign_defaults.subject", [RequiredWith("campaign_defaults"), String])
        .field("campaign_defaults.language", [RequiredWith("campaign_defaults"), String])
        .field("notify_on_subscribe", [Email])
        .field("notify_on_unsubscribe", [Email])
        .field("email_type_option", [Boolean])
        .field("visibility", [String, In(&["pub", "prv"])])
        .field("double_optin", [Boolean])
        .field("marketing_permissions", [Boolean])
});

/// Local mirror of a MailChimp audience
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MailChimpList {
    list_id: Option<String>,
    mail_chimp_id: Option<String>,
    pub attributes: ListAttributes,
}

impl MailChimpList {
    /// Build a new, not yet persisted list from request attributes
    pub fn new(attrs: &Map<String, Value>) -> Self {
        let mut list = Self::default();
        list.fill(attrs);
        list
    }

    /// Rebuild a list read back from the store
    pub fn restore(list_id: String, mail_chimp_id: Option<String>, attributes: ListAttributes) -> Self {
        Self {
            list_id: Some(list_id),
            mail_chimp_id,
            attributes,
        }
    }

    /// Assign the local id once; later calls keep the existing id
    pub fn ensure_id(&mut self, generate: impl FnOnce() -> String) -> &str {
        self.list_id.get_or_insert_with(generate)
    }
}

impl MailChimpEntity for MailChimpList {
    const KIND: &'static str = "MailChimpList";

    fn id(&self) -> Option<&str> {
        self.list_id.as_deref()
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
        map.insert("list_id".into(), self.list_id.clone().into());
        map.insert("mail_chimp_id".into(), self.mail_chimp_id.clone().into());
        map.extend(self.attributes.to_map());
        map
    }

    fn to_remote_map(&self) -> Map<String, Value> {
        self.attributes.to_present_map()
    }

    fn validation_rules() -> &'static RuleSet {
        &LIST_RULES
    }
}
