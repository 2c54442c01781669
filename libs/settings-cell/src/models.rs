// libs/settings-cell/src/models.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single key/value configuration entry. Keys are matched
/// case-insensitively; the stored casing is whatever the first write used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub id: i64,
    pub key: String,
    pub value: Option<String>,
    pub description: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Upsert payload: the key travels in the body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingRequest {
    pub key: Option<String>,
    pub value: Option<String>,
    pub description: Option<String>,
}

/// One entry of a bulk upsert.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkEntry {
    pub key: String,
    pub value: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkSettingsRequest {
    pub settings: Vec<BulkEntry>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Setting not found")]
    NotFound,

    #[error("Setting key must not be empty")]
    EmptyKey,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
