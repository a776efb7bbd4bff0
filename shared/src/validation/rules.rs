//! Individual field rules and their messages

use std::net::IpAddr;

use chrono::NaiveDateTime;
use serde_json::Value;
use validator::ValidateEmail;

use super::path;

/// Timestamp format MailChimp accepts for `timestamp_signup`/`timestamp_opt`
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single constraint on a field
///
/// Everything except `Required`/`RequiredWith` is skipped when the field is
/// absent or `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Field must be present and not blank
    Required,
    /// Field must be present when the given top-level field is present
    RequiredWith(&'static str),
    String,
    /// JSON object or array
    Array,
    /// `true`/`false`, `0`/`1` or `"0"`/`"1"`
    Boolean,
    /// Number or numeric string
    Numeric,
    /// Inclusive numeric range
    Between(f64, f64),
    Email,
    /// One of the listed values
    In(&'static [&'static str]),
    /// Exact character count (string) or element count (array)
    Size(usize),
    /// IPv4 or IPv6 literal
    Ip,
    /// `YYYY-MM-DD HH:MM:SS`
    DateTime,
}

pub(crate) fn check(root: &Value, field: &str, value: Option<&Value>, rules: &[Rule]) -> Vec<String> {
    let name = display_name(field);
    let mut failures = Vec::new();

    let value = match value {
        Some(v) if !v.is_null() => v,
        _ => {
            for rule in rules {
                match rule {
                    Rule::Required => failures.push(format!("The {name} field is required.")),
                    Rule::RequiredWith(other) if is_filled(path::lookup(root, other)) => {
                        failures.push(format!(
                            "The {name} field is required when {} is present.",
                            display_name(other)
                        ))
                    }
                    _ => {}
                }
            }
            return failures;
        }
    };

    for rule in rules {
        let message = match rule {
            Rule::Required if is_blank(value) => Some(format!("The {name} field is required.")),
            Rule::Required | Rule::RequiredWith(_) => None,
            Rule::String if !value.is_string() => Some(format!("The {name} must be a string.")),
            Rule::Array if !(value.is_object() || value.is_array()) => {
                Some(format!("The {name} must be an array."))
            }
            Rule::Boolean if !is_boolean(value) => {
                Some(format!("The {name} field must be true or false."))
            }
            Rule::Numeric if as_number(value).is_none() => {
                Some(format!("The {name} must be a number."))
            }
            Rule::Between(min, max) => match as_number(value) {
                Some(n) if n < *min || n > *max => {
                    Some(format!("The {name} must be between {min} and {max}."))
                }
                _ => None,
            },
            Rule::Email if !value.as_str().is_some_and(is_email) => {
                Some(format!("The {name} must be a valid email address."))
            }
            Rule::In(allowed) if !as_text(value).is_some_and(|v| allowed.contains(&v.as_str())) => {
                Some(format!("The selected {name} is invalid."))
            }
            Rule::Size(size) if !has_size(value, *size) => {
                Some(format!("The {name} must be {size} characters."))
            }
            Rule::Ip if !value.as_str().is_some_and(|s| s.parse::<IpAddr>().is_ok()) => {
                Some(format!("The {name} must be a valid IP address."))
            }
            Rule::DateTime if !value.as_str().is_some_and(is_date_time) => {
                Some(format!(
                    "The {name} does not match the format YYYY-MM-DD HH:MM:SS."
                ))
            }
            _ => None,
        };
        failures.extend(message);
    }

    failures
}

/// Top-level snake_case names read as words; nested paths stay verbatim
fn display_name(field: &str) -> String {
    if field.contains('.') {
        field.to_string()
    } else {
        field.replace('_', " ")
    }
}

/// Present and not blank: `{}`, `[]` and `""` do not trigger `RequiredWith`
fn is_filled(value: Option<&Value>) -> bool {
    value.is_some_and(|v| !is_blank(v))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
        _ => false,
    }
}

fn is_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Number(n) => n.as_i64().is_some_and(|n| n == 0 || n == 1),
        Value::String(s) => s == "0" || s == "1",
        _ => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn has_size(value: &Value, size: usize) -> bool {
    match value {
        Value::String(s) => s.chars().count() == size,
        Value::Array(items) => items.len() == size,
        _ => false,
    }
}

/// chrono skips whitespace and accepts short fields, so the parsed value
/// must format back to the exact input
fn is_date_time(value: &str) -> bool {
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
        .is_ok_and(|dt| dt.format(DATE_TIME_FORMAT).to_string() == value)
}

fn is_email(value: &str) -> bool {
    value.to_owned().validate_email()
}
