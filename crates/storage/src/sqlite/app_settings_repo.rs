use async_trait::async_trait;
use chrono::Utc;
use conjugator_core::model::AppSettings;
use sqlx::Row;

use crate::repository::{AppSettingsRepository, SettingsRecord, StorageError, keys};

use super::SqliteRepository;

#[async_trait]
impl AppSettingsRepository for SqliteRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT key, value
            FROM settings
            WHERE key IN (?1, ?2, ?3)
            ",
        )
        .bind(keys::DATA_SOURCES)
        .bind(keys::SELECTED_DATA_SOURCE)
        .bind(keys::CONTENT_BASE_URL)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let mut pairs = Vec::with_capacity(rows.len());
        for row in &rows {
            let key: String = row
                .try_get("key")
                .map_err(|err| StorageError::Serialization(err.to_string()))?;
            let value: String = row
                .try_get("value")
                .map_err(|err| StorageError::Serialization(err.to_string()))?;
            pairs.push((key, value));
        }

        let record = SettingsRecord::from_pairs(
            pairs.iter().map(|(key, value)| (key.as_str(), value.clone())),
        );
        if record.is_empty() {
            return Ok(None);
        }
        record.into_settings().map(Some)
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        let record = SettingsRecord::from_settings(settings);
        let now = Utc::now().to_rfc3339();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        for (key, value) in record.pairs() {
            match value {
                Some(value) => {
                    sqlx::query(
                        r"
                        INSERT INTO settings (key, value, updated_at)
                        VALUES (?1, ?2, ?3)
                        ON CONFLICT(key) DO UPDATE SET
                            value = excluded.value,
                            updated_at = excluded.updated_at
                        ",
                    )
                    .bind(key)
                    .bind(value)
                    .bind(&now)
                    .execute(&mut *tx)
                    .await
                    .map_err(|err| StorageError::Connection(err.to_string()))?;
                }
                None => {
                    sqlx::query("DELETE FROM settings WHERE key = ?1")
                        .bind(key)
                        .execute(&mut *tx)
                        .await
                        .map_err(|err| StorageError::Connection(err.to_string()))?;
                }
            }
        }

        tx.commit()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
