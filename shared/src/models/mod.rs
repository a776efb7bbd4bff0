//! Entity models
//!
//! Local mirrors of MailChimp resources. Each entity keeps its MailChimp
//! attributes as raw JSON values until they pass validation, so a payload with
//! a wrongly typed field still produces a field-level error instead of a
//! deserialization failure.

pub mod list;
pub mod member;

pub use list::{ListAttributes, MailChimpList};
pub use member::{MailChimpMember, MemberAttributes, MemberStatus};

use serde_json::{Map, Value};

use crate::validation::{FieldErrors, RuleSet};

/// Capability shared by every mirrored MailChimp resource
pub trait MailChimpEntity {
    /// Entity name used in lookup errors (`MailChimpList[<id>] not found`)
    const KIND: &'static str;

    /// Local identifier, assigned on first persistence
    fn id(&self) -> Option<&str>;

    /// Identifier assigned by MailChimp on the first successful create
    fn mail_chimp_id(&self) -> Option<&str>;

    /// Record the identifier MailChimp answered with
    fn set_mail_chimp_id(&mut self, id: String);

    /// Partial assignment: declared keys are applied, unknown keys ignored
    fn fill(&mut self, attrs: &Map<String, Value>);

    /// Every declared attribute plus identifiers
    fn to_local_map(&self) -> Map<String, Value>;

    /// Only what MailChimp expects: no identifiers, no nulls
    fn to_remote_map(&self) -> Map<String, Value>;

    fn validation_rules() -> &'static RuleSet;

    /// Check the MailChimp-shaped representation against the rule set
    fn validate(&self) -> Result<(), FieldErrors> {
        Self::validation_rules().validate(&self.to_remote_map())
    }
}

/// Declare an attribute struct from a field list.
///
/// Field names are the snake_case keys used on the wire and in the store;
/// `FIELDS` lists them in declaration order.
macro_rules! attributes {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident { $($field:ident),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $(pub $field: Option<serde_json::Value>,)*
        }

        impl $name {
            pub const FIELDS: &'static [&'static str] = &[$(stringify!($field)),*];

            /// Apply every declared key present in `attrs`; `null` clears it
            pub fn fill(&mut self, attrs: &serde_json::Map<String, serde_json::Value>) {
                $(
                    if let Some(value) = attrs.get(stringify!($field)) {
                        self.$field = (!value.is_null()).then(|| value.clone());
                    }
                )*
            }

            /// `(name, value)` pairs in declaration order
            pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&serde_json::Value>)> {
                [$((stringify!($field), self.$field.as_ref())),*].into_iter()
            }

            pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
                self.iter().find(|(field, _)| *field == name).and_then(|(_, value)| value)
            }

            /// Declared attributes, absent ones rendered as `null`
            pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
                self.iter()
                    .map(|(field, value)| {
                        (field.to_string(), value.cloned().unwrap_or(serde_json::Value::Null))
                    })
                    .collect()
            }

            /// Declared attributes that hold a value
            pub fn to_present_map(&self) -> serde_json::Map<String, serde_json::Value> {
                self.iter()
                    .filter_map(|(field, value)| value.map(|v| (field.to_string(), v.clone())))
                    .collect()
            }
        }
    };
}

pub(crate) use attributes;
