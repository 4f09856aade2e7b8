//! User types

use crate::error::{Error, Result};
use crate::source::PageRecord;
use crate::types::JsonValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account
    #[default]
    #[serde(alias = "User")]
    User,
    /// Administrator
    #[serde(alias = "Admin")]
    Admin,
}

/// User row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Decode a user from a data source row
    pub fn from_record(record: JsonValue) -> Result<Self> {
        serde_json::from_value(record).map_err(|e| Error::decode(format!("invalid user row: {e}")))
    }

    /// Whether the user was soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl PageRecord for User {
    fn field(&self, name: &str) -> Option<JsonValue> {
        match name {
            "id" => Some(JsonValue::String(self.id.clone())),
            "username" => Some(JsonValue::String(self.username.clone())),
            "email" => Some(JsonValue::String(self.email.clone())),
            "created_at" => Some(JsonValue::String(self.created_at.to_rfc3339())),
            "updated_at" => Some(JsonValue::String(self.updated_at.to_rfc3339())),
            _ => serde_json::to_value(self)
                .ok()
                .and_then(|v| v.get(name).cloned())
                .filter(|v| !v.is_null()),
        }
    }
}
