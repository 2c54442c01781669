// libs/settings-cell/src/repository.rs
use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};

use shared_database::PostgrestClient;

use crate::models::{Setting, SettingsError};

pub struct SettingsRepository {
    db: Arc<PostgrestClient>,
}

impl SettingsRepository {
    pub fn new(db: Arc<PostgrestClient>) -> Self {
        Self { db }
    }

    pub async fn list_all(&self) -> Result<Vec<Setting>, SettingsError> {
        let result: Vec<Value> = self
            .db
            .request(Method::GET, "/settings?order=key.asc", None)
            .await
            .map_err(db_err)?;

        parse_rows(result)
    }

    /// Case-insensitive key lookup.
    pub async fn find_by_key(&self, key: &str) -> Result<Option<Setting>, SettingsError> {
        let path = format!("/settings?key=ilike.{}", encode(key));
        let result: Vec<Value> = self
            .db
            .request(Method::GET, &path, None)
            .await
            .map_err(db_err)?;

        result.into_iter().next().map(parse_row).transpose()
    }

    pub async fn insert(
        &self,
        key: &str,
        value: Option<&str>,
        description: Option<&str>,
    ) -> Result<Setting, SettingsError> {
        let body = json!({ "key": key, "value": value, "description": description });
        let result: Vec<Value> = self
            .db
            .request_returning(Method::POST, "/settings", Some(body))
            .await
            .map_err(db_err)?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| SettingsError::DatabaseError("Insert returned no rows".to_string()))?;
        parse_row(row)
    }

    pub async fn update(
        &self,
        id: i64,
        value: Option<&str>,
        description: Option<&str>,
    ) -> Result<Setting, SettingsError> {
        let path = format!("/settings?id=eq.{}", id);
        let body = json!({ "value": value, "description": description });
        let result: Vec<Value> = self
            .db
            .request_returning(Method::PATCH, &path, Some(body))
            .await
            .map_err(db_err)?;

        let row = result.into_iter().next().ok_or(SettingsError::NotFound)?;
        parse_row(row)
    }

    pub async fn delete(&self, id: i64) -> Result<(), SettingsError> {
        let path = format!("/settings?id=eq.{}", id);
        let result: Vec<Value> = self
            .db
            .request_returning(Method::DELETE, &path, None)
            .await
            .map_err(db_err)?;

        if result.is_empty() {
            return Err(SettingsError::NotFound);
        }
        Ok(())
    }
}

fn db_err(e: anyhow::Error) -> SettingsError {
    SettingsError::DatabaseError(e.to_string())
}

fn parse_row(row: Value) -> Result<Setting, SettingsError> {
    serde_json::from_value(row)
        .map_err(|e| SettingsError::DatabaseError(format!("Failed to parse setting row: {}", e)))
}

fn parse_rows(rows: Vec<Value>) -> Result<Vec<Setting>, SettingsError> {
    rows.into_iter().map(parse_row).collect()
}

fn encode(value: &str) -> String {
    value
        .chars()
        .flat_map(|c| match c {
            ' ' => "%20".chars().collect::<Vec<_>>(),
            ',' => "%2C".chars().collect(),
            '&' => "%26".chars().collect(),
            '%' => "%25".chars().collect(),
            '#' => "%23".chars().collect(),
            '?' => "%3F".chars().collect(),
            other => vec![other],
        })
        .collect()
}
