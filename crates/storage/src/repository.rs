use async_trait::async_trait;
use conjugator_core::codec::{decode_list, encode_list};
use conjugator_core::model::{AppSettings, AppSettingsDraft, DataSourceId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("stored value is invalid: {0}")]
    Invalid(#[from] conjugator_core::Error),
}

/// Keys under which settings are stored. Kept stable so existing stores keep loading.
pub mod keys {
    pub const DATA_SOURCES: &str = "dataSources";
    pub const SELECTED_DATA_SOURCE: &str = "selectedDataSource";
    pub const CONTENT_BASE_URL: &str = "contentBaseUrl";
}

/// Persisted key/value shape of `AppSettings`.
///
/// The data source list is stored as one comma-joined string; every element is
/// re-parsed on load and elements that are no longer valid ids are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsRecord {
    pub data_sources: Option<String>,
    pub selected_data_source: Option<String>,
    pub content_base_url: Option<String>,
}

impl SettingsRecord {
    #[must_use]
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            data_sources: Some(encode_list(settings.data_sources())),
            selected_data_source: settings.selected_data_source().map(ToString::to_string),
            content_base_url: settings.content_base_url().map(str::to_owned),
        }
    }

    /// Build a record from raw key/value pairs.
    #[must_use]
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, String)>) -> Self {
        let mut record = Self::default();
        for (key, value) in pairs {
            match key {
                keys::DATA_SOURCES => record.data_sources = Some(value),
                keys::SELECTED_DATA_SOURCE => record.selected_data_source = Some(value),
                keys::CONTENT_BASE_URL => record.content_base_url = Some(value),
                _ => {}
            }
        }
        record
    }

    /// Key/value pairs to write. `None` values mean "remove the key".
    #[must_use]
    pub fn pairs(&self) -> [(&'static str, Option<&str>); 3] {
        [
            (keys::DATA_SOURCES, self.data_sources.as_deref()),
            (
                keys::SELECTED_DATA_SOURCE,
                self.selected_data_source.as_deref(),
            ),
            (keys::CONTENT_BASE_URL, self.content_base_url.as_deref()),
        ]
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data_sources.is_none()
            && self.selected_data_source.is_none()
            && self.content_base_url.is_none()
    }

    /// Convert the record back into validated settings.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Invalid` if the stored values fail validation.
    pub fn into_settings(self) -> Result<AppSettings, StorageError> {
        let data_sources = self
            .data_sources
            .as_deref()
            .map(decode_list::<DataSourceId>)
            .unwrap_or_default();
        let selected_data_source = self
            .selected_data_source
            .and_then(|raw| raw.parse::<DataSourceId>().ok());

        let settings = AppSettings::from_persisted(AppSettingsDraft {
            data_sources,
            selected_data_source,
            content_base_url: self.content_base_url,
        })
        .map_err(conjugator_core::Error::from)?;
        Ok(settings)
    }
}

/// Repository contract for user settings.
#[async_trait]
pub trait AppSettingsRepository: Send + Sync {
    /// Load settings, or `None` if nothing was ever saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or holds invalid values.
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError>;

    /// Persist settings, replacing what was stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the settings cannot be stored.
    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Stores the same key/value encoding as the `SQLite` backend.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored value for `key`, for inspecting the encoding.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    /// Overwrite a raw value, bypassing validation.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn set_raw_value(&self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value.into());
        Ok(())
    }
}

#[async_trait]
impl AppSettingsRepository for InMemoryRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let record = {
            let guard = self
                .values
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            SettingsRecord::from_pairs(guard.iter().map(|(k, v)| (k.as_str(), v.clone())))
        };
        if record.is_empty() {
            return Ok(None);
        }
        record.into_settings().map(Some)
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        let record = SettingsRecord::from_settings(settings);
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        for (key, value) in record.pairs() {
            match value {
                Some(value) => {
                    guard.insert(key.to_string(), value.to_string());
                }
                None => {
                    guard.remove(key);
                }
            }
        }
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub app_settings: Arc<dyn AppSettingsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let app_settings: Arc<dyn AppSettingsRepository> = Arc::new(InMemoryRepository::new());
        Self { app_settings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> DataSourceId {
        raw.parse().unwrap()
    }

    fn settings(sources: &[&str], selected: &str) -> AppSettings {
        AppSettingsDraft {
            data_sources: sources.iter().map(|s| id(s)).collect(),
            selected_data_source: Some(id(selected)),
            content_base_url: Some("https://content.example.org/courses".into()),
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn empty_store_has_no_settings() {
        let repo = InMemoryRepository::new();
        assert!(repo.get_settings().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn round_trips_settings_through_comma_encoding() {
        let repo = InMemoryRepository::new();
        let saved = settings(&["sheet-a", "sheet-b"], "sheet-b");
        repo.save_settings(&saved).await.unwrap();

        assert_eq!(
            repo.raw_value(keys::DATA_SOURCES).unwrap().as_deref(),
            Some("sheet-a,sheet-b")
        );
        let loaded = repo.get_settings().await.unwrap().unwrap();
        assert_eq!(loaded, saved);
    }

    #[tokio::test]
    async fn invalid_list_elements_are_dropped_on_load() {
        let repo = InMemoryRepository::new();
        repo.set_raw_value(keys::DATA_SOURCES, "sheet-a,, ,sheet-b")
            .unwrap();
        repo.set_raw_value(keys::SELECTED_DATA_SOURCE, "sheet-b")
            .unwrap();

        let loaded = repo.get_settings().await.unwrap().unwrap();
        assert_eq!(loaded.data_sources(), &[id("sheet-a"), id("sheet-b")]);
        assert_eq!(loaded.selected_data_source(), Some(&id("sheet-b")));
    }

    #[tokio::test]
    async fn saving_without_base_url_removes_the_key() {
        let repo = InMemoryRepository::new();
        repo.save_settings(&settings(&["a"], "a")).await.unwrap();

        let cleared = AppSettingsDraft {
            content_base_url: None,
            ..settings(&["a"], "a").to_draft()
        }
        .validate()
        .unwrap();
        repo.save_settings(&cleared).await.unwrap();

        assert!(repo.raw_value(keys::CONTENT_BASE_URL).unwrap().is_none());
    }

    #[tokio::test]
    async fn invalid_stored_base_url_is_reported() {
        let repo = InMemoryRepository::new();
        repo.set_raw_value(keys::DATA_SOURCES, "sheet-a").unwrap();
        repo.set_raw_value(keys::CONTENT_BASE_URL, "not a url").unwrap();

        let err = repo.get_settings().await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::Invalid(conjugator_core::Error::Settings(_))
        ));
    }
}
