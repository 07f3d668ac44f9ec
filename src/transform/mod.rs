//! Token efficiency
//!
//! Shrinks a successful response body before it reaches the user:
//! count-only, truncation of array results, and field projection.
//!
//! Precedence is fixed. `count` short-circuits everything else. Otherwise
//! `limit` truncates arrays, and `fields` then projects keys out of the
//! (possibly truncated) result.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Options controlling how a response body is reduced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEfficiencyOptions {
    /// Replace the body with `{"count": N}`
    #[serde(default)]
    pub count: bool,
    /// Comma-separated list of keys to keep
    #[serde(default)]
    pub fields: Option<String>,
    /// Keep only the first N elements of an array result; 0 means no limit
    #[serde(default)]
    pub limit: Option<usize>,
}

impl TokenEfficiencyOptions {
    /// Create empty options (pass-through)
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a count instead of the body
    #[must_use]
    pub fn count(mut self) -> Self {
        self.count = true;
        self
    }

    /// Project the listed keys
    #[must_use]
    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Truncate array results
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether applying these options would leave any body unchanged
    pub fn is_passthrough(&self) -> bool {
        !self.count && self.effective_limit().is_none() && self.field_list().is_empty()
    }

    fn effective_limit(&self) -> Option<usize> {
        self.limit.filter(|&n| n > 0)
    }

    /// Parsed field names, trimmed, blanks dropped
    pub fn field_list(&self) -> Vec<&str> {
        self.fields
            .as_deref()
            .map(|f| {
                f.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Apply token efficiency options to a response body
pub fn apply(data: Value, options: &TokenEfficiencyOptions) -> Value {
    if options.count {
        let count = match &data {
            Value::Array(items) => items.len(),
            _ => 1,
        };
        return json!({ "count": count });
    }

    let mut data = data;

    if let (Some(limit), Value::Array(items)) = (options.effective_limit(), &mut data) {
        items.truncate(limit);
    }

    let fields = options.field_list();
    if fields.is_empty() {
        return data;
    }

    match data {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| project(item, &fields))
                .collect(),
        ),
        other => project(other, &fields),
    }
}

/// Keep only the listed keys of an object; anything else passes through
fn project(value: Value, fields: &[&str]) -> Value {
    match value {
        Value::Object(mut object) => {
            let mut projected = Map::new();
            for field in fields {
                if let Some(v) = object.remove(*field) {
                    projected.insert((*field).to_string(), v);
                }
            }
            Value::Object(projected)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests;
