// libs/settings-cell/src/services/settings.rs
use std::sync::Arc;

use tracing::{info, warn};

use shared_database::PostgrestClient;

use crate::models::{BulkEntry, Setting, SettingsError};
use crate::repository::SettingsRepository;

/// Key/value settings with upsert semantics. Writes create the key when it
/// does not exist and update it when it does; lookups are case-insensitive.
pub struct SettingsService {
    repo: SettingsRepository,
}

impl SettingsService {
    pub fn new(db: Arc<PostgrestClient>) -> Self {
        Self {
            repo: SettingsRepository::new(db),
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Setting>, SettingsError> {
        self.repo.list_all().await
    }

    pub async fn get(&self, key: &str) -> Result<Setting, SettingsError> {
        let key = normalize_key(key)?;
        self.repo.find_by_key(&key).await?.ok_or(SettingsError::NotFound)
    }

    /// Read a setting's value, falling back to `default` when the key is
    /// absent or unset. Lookup failures also fall back, with a warning, so a
    /// flaky store never takes down callers that only need configuration.
    pub async fn get_value(&self, key: &str, default: &str) -> String {
        match self.repo.find_by_key(key).await {
            Ok(Some(setting)) => setting.value.unwrap_or_else(|| default.to_string()),
            Ok(None) => default.to_string(),
            Err(e) => {
                warn!("Failed to read setting {}: {}", key, e);
                default.to_string()
            }
        }
    }

    pub async fn set_value(
        &self,
        key: &str,
        value: Option<&str>,
        description: Option<&str>,
    ) -> Result<Setting, SettingsError> {
        let key = normalize_key(key)?;

        match self.repo.find_by_key(&key).await? {
            Some(existing) => {
                let description = description.or(existing.description.as_deref());
                let setting = self.repo.update(existing.id, value, description).await?;
                info!("Setting updated: {}", setting.key);
                Ok(setting)
            }
            None => {
                let setting = self.repo.insert(&key, value, description).await?;
                info!("Setting created: {}", setting.key);
                Ok(setting)
            }
        }
    }

    /// Upsert several settings in one call. Entries with blank keys are
    /// skipped; the rest are applied in order, and the first store failure
    /// aborts the remainder.
    pub async fn set_bulk(&self, entries: &[BulkEntry]) -> Result<Vec<Setting>, SettingsError> {
        let mut saved = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.key.trim().is_empty() {
                warn!("Skipping bulk settings entry with blank key");
                continue;
            }
            saved.push(
                self.set_value(&entry.key, entry.value.as_deref(), entry.description.as_deref())
                    .await?,
            );
        }
        Ok(saved)
    }

    pub async fn delete(&self, key: &str) -> Result<(), SettingsError> {
        let setting = self.get(key).await?;
        self.repo.delete(setting.id).await?;
        info!("Setting deleted: {}", setting.key);
        Ok(())
    }
}

fn normalize_key(key: &str) -> Result<String, SettingsError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(SettingsError::EmptyKey);
    }
    Ok(key.to_string())
}
