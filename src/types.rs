//! Common types used throughout seekpage
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Sort Order
// ============================================================================

/// Sort direction over the pagination key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending (smallest key first)
    Asc,
    /// Descending (largest key first)
    #[default]
    Desc,
}

impl SortOrder {
    /// The opposite direction
    pub fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// SQL keyword for this direction
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(crate::Error::config(format!(
                "Unknown sort order '{other}' (expected asc or desc)"
            ))),
        }
    }
}

// ============================================================================
// Pagination Key
// ============================================================================

/// Name of the single field used to order and seek a collection
///
/// The same key drives both `ORDER BY` and the cursor seek.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaginationKey(String);

impl PaginationKey {
    /// Create a pagination key from a field name
    pub fn new(field: impl Into<String>) -> Self {
        Self(field.into())
    }

    /// Field name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PaginationKey {
    fn default() -> Self {
        Self::new("id")
    }
}

impl fmt::Display for PaginationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaginationKey {
    fn from(field: &str) -> Self {
        Self::new(field)
    }
}

impl From<String> for PaginationKey {
    fn from(field: String) -> Self {
        Self(field)
    }
}

// ============================================================================
// Filter
// ============================================================================

/// Conjunction of field equality conditions
///
/// A `null` value matches rows where the field is null or absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter {
    conditions: BTreeMap<String, JsonValue>,
}

impl Filter {
    /// Empty filter (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality condition
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.conditions.insert(field.into(), value.into());
        self
    }

    /// Add an `IS NULL` condition
    #[must_use]
    pub fn is_null(mut self, field: impl Into<String>) -> Self {
        self.conditions.insert(field.into(), JsonValue::Null);
        self
    }

    /// Iterate over `(field, value)` conditions in field order
    pub fn conditions(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.conditions.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Check if the filter has no conditions
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Check a JSON object against every condition
    pub fn matches(&self, record: &JsonValue) -> bool {
        self.conditions.iter().all(|(field, expected)| {
            match (record.get(field), expected) {
                (None | Some(JsonValue::Null), JsonValue::Null) => true,
                (Some(actual), expected) => actual == expected,
                (None, _) => false,
            }
        })
    }
}

// ============================================================================
// Projection
// ============================================================================

/// Which fields a fetch returns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Only the named fields
    Select(Vec<String>),
    /// Scalar fields plus the named relation fields
    Include(Vec<String>),
}

impl Projection {
    /// Select projection from field names
    pub fn select<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Select(fields.into_iter().map(Into::into).collect())
    }

    /// Include projection from relation names
    pub fn include<I, S>(relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Include(relations.into_iter().map(Into::into).collect())
    }

    /// Make sure a `Select` projection carries the given field
    #[must_use]
    pub fn with_field(self, field: &str) -> Self {
        match self {
            Self::Select(mut fields) => {
                if !fields.iter().any(|f| f == field) {
                    fields.push(field.to_string());
                }
                Self::Select(fields)
            }
            include @ Self::Include(_) => include,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_order_flip_and_parse() {
        assert_eq!(SortOrder::Asc.flip(), SortOrder::Desc);
        assert_eq!(SortOrder::Desc.flip(), SortOrder::Asc);
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("sideways".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }

    #[test]
    fn test_sort_order_serde() {
        assert_eq!(serde_json::to_value(SortOrder::Asc).unwrap(), json!("asc"));
        let order: SortOrder = serde_json::from_value(json!("desc")).unwrap();
        assert_eq!(order, SortOrder::Desc);
    }

    #[test]
    fn test_filter_matches() {
        let filter = Filter::new().eq("role", "admin").is_null("deleted_at");

        assert!(filter.matches(&json!({"role": "admin"})));
        assert!(filter.matches(&json!({"role": "admin", "deleted_at": null})));
        assert!(!filter.matches(&json!({"role": "admin", "deleted_at": "2024-01-01"})));
        assert!(!filter.matches(&json!({"role": "user"})));
        assert!(!filter.matches(&json!({"deleted_at": null})));
        assert!(Filter::new().matches(&json!({"anything": 1})));
    }

    #[test]
    fn test_projection_with_field() {
        let projection = Projection::select(["email"]).with_field("id");
        assert_eq!(
            projection,
            Projection::Select(vec!["email".to_string(), "id".to_string()])
        );

        let projection = Projection::select(["id", "email"]).with_field("id");
        assert_eq!(
            projection,
            Projection::Select(vec!["id".to_string(), "email".to_string()])
        );

        let include = Projection::include(["posts"]).with_field("id");
        assert_eq!(include, Projection::Include(vec!["posts".to_string()]));
    }
}
