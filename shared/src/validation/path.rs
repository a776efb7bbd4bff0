//! Dotted path resolution with `*` wildcards

use serde_json::Value;

/// Expand `pattern` against `root`, yielding each concrete path with the
/// value found there (`None` when the key is missing).
///
/// A `*` segment expands to every entry of the array (or object) at that
/// point; it expands to nothing when the container is missing.
pub(crate) fn resolve<'a>(root: &'a Value, pattern: &str) -> Vec<(String, Option<&'a Value>)> {
    let mut current: Vec<(String, Option<&'a Value>)> = vec![(String::new(), Some(root))];

    for segment in pattern.split('.') {
        let mut next = Vec::with_capacity(current.len());
        for (prefix, value) in current {
            if segment == "*" {
                match value {
                    Some(Value::Array(items)) => {
                        for (index, item) in items.iter().enumerate() {
                            next.push((join(&prefix, &index.to_string()), Some(item)));
                        }
                    }
                    Some(Value::Object(entries)) => {
                        for (key, item) in entries {
                            next.push((join(&prefix, key), Some(item)));
                        }
                    }
                    _ => {}
                }
            } else {
                let child = value.and_then(|v| v.get(segment));
                next.push((join(&prefix, segment), child));
            }
        }
        current = next;
    }

    current
}

/// Look up a concrete (wildcard-free) path
pub(crate) fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |value, segment| match value {
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => value.get(segment),
    })
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}
