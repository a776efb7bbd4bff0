//! Declarative field validation
//!
//! Each entity declares a [`RuleSet`]: an ordered list of dotted field paths
//! and the [`Rule`]s that apply to them. The set is evaluated against the
//! MailChimp-shaped attribute map, never against the local representation.
//!
//! ```
//! use serde_json::json;
//! use shared::validation::{Rule, RuleSet};
//!
//! let rules = RuleSet::new()
//!     .field("status", [Rule::Required, Rule::In(&["subscribed", "pending"])])
//!     .field("location", [Rule::Array])
//!     .field("location.latitude", [Rule::RequiredWith("location"), Rule::Numeric, Rule::Between(-90.0, 90.0)]);
//!
//! let data = json!({ "status": "subscribed", "location": { "latitude": 120 } });
//! let errors = rules.validate(data.as_object().unwrap()).unwrap_err();
//! assert_eq!(errors["location.latitude"], vec!["The location.latitude must be between -90 and 90."]);
//! ```

mod path;
mod rules;

use std::collections::BTreeMap;

use serde_json::{Map, Value};

pub use rules::{DATE_TIME_FORMAT, Rule};

/// Field path -> human-readable reasons
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Ordered set of `(path, rules)` declarations
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: Vec<(&'static str, Vec<Rule>)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the rules for a dotted path (`*` matches every array entry)
    pub fn field(mut self, path: &'static str, rules: impl Into<Vec<Rule>>) -> Self {
        self.fields.push((path, rules.into()));
        self
    }

    /// Declared paths, in declaration order
    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(path, _)| *path)
    }

    /// Rules declared for `path`
    pub fn rules_for(&self, path: &str) -> Option<&[Rule]> {
        self.fields
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, rules)| rules.as_slice())
    }

    /// Check `data` against every declaration, collecting all failures
    pub fn validate(&self, data: &Map<String, Value>) -> Result<(), FieldErrors> {
        let root = Value::Object(data.clone());
        let mut errors = FieldErrors::new();

        for (pattern, rules) in &self.fields {
            for (concrete, value) in path::resolve(&root, pattern) {
                let failures = rules::check(&root, &concrete, value, rules);
                if !failures.is_empty() {
                    errors.entry(concrete).or_default().extend(failures);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
