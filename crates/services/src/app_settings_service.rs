use std::sync::Arc;

use tracing::info;

use conjugator_core::model::{AppSettings, AppSettingsDraft, DataSourceId};
use storage::repository::AppSettingsRepository;

use crate::error::AppSettingsServiceError;

/// Loads, edits and persists the user's data source settings.
#[derive(Clone)]
pub struct AppSettingsService {
    repo: Arc<dyn AppSettingsRepository>,
}

impl AppSettingsService {
    #[must_use]
    pub fn new(repo: Arc<dyn AppSettingsRepository>) -> Self {
        Self { repo }
    }

    /// Load persisted settings (or defaults if missing).
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsServiceError` on storage failures.
    pub async fn load(&self) -> Result<AppSettings, AppSettingsServiceError> {
        let settings = self.repo.get_settings().await?;
        Ok(settings.unwrap_or_default())
    }

    /// Validate and persist new settings.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsServiceError` if validation fails or persistence fails.
    pub async fn save(
        &self,
        draft: AppSettingsDraft,
    ) -> Result<AppSettings, AppSettingsServiceError> {
        let settings = draft.validate()?;
        self.repo.save_settings(&settings).await?;
        info!(
            target: "settings",
            sources = settings.data_sources().len(),
            selected = ?settings.selected_data_source().map(DataSourceId::as_str),
            "settings saved"
        );
        Ok(settings)
    }

    /// Append a data source. Adding one that is already configured is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsServiceError` on storage failures.
    pub async fn add_data_source(
        &self,
        data_source: DataSourceId,
    ) -> Result<AppSettings, AppSettingsServiceError> {
        let mut draft = self.load().await?.to_draft();
        draft.data_sources.push(data_source);
        self.save(draft).await
    }

    /// Remove a data source. If it was selected, the first remaining one is selected.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsServiceError::UnknownDataSource` if it is not configured.
    pub async fn remove_data_source(
        &self,
        data_source: &DataSourceId,
    ) -> Result<AppSettings, AppSettingsServiceError> {
        let mut draft = self.load().await?.to_draft();
        let before = draft.data_sources.len();
        draft.data_sources.retain(|source| source != data_source);
        if draft.data_sources.len() == before {
            return Err(AppSettingsServiceError::UnknownDataSource(
                data_source.to_string(),
            ));
        }
        self.save(draft).await
    }

    /// Make `data_source` the selected course.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsServiceError::UnknownDataSource` if it is not configured.
    pub async fn select_data_source(
        &self,
        data_source: &DataSourceId,
    ) -> Result<AppSettings, AppSettingsServiceError> {
        let mut draft = self.load().await?.to_draft();
        if !draft.data_sources.contains(data_source) {
            return Err(AppSettingsServiceError::UnknownDataSource(
                data_source.to_string(),
            ));
        }
        draft.selected_data_source = Some(data_source.clone());
        self.save(draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conjugator_core::model::DEFAULT_DATA_SOURCE;
    use storage::repository::InMemoryRepository;

    fn id(raw: &str) -> DataSourceId {
        raw.parse().unwrap()
    }

    fn service() -> AppSettingsService {
        AppSettingsService::new(Arc::new(InMemoryRepository::new()))
    }

    #[tokio::test]
    async fn load_returns_defaults_when_nothing_is_stored() {
        let settings = service().load().await.unwrap();
        assert_eq!(settings.data_sources(), &[id(DEFAULT_DATA_SOURCE)]);
        assert_eq!(settings.selected_data_source(), Some(&id(DEFAULT_DATA_SOURCE)));
    }

    #[tokio::test]
    async fn add_select_and_remove_round_trip() {
        let service = service();
        service.add_data_source(id("sheet-b")).await.unwrap();
        let settings = service.add_data_source(id("sheet-b")).await.unwrap();
        assert_eq!(settings.data_sources().len(), 2);

        let settings = service.select_data_source(&id("sheet-b")).await.unwrap();
        assert_eq!(settings.selected_data_source(), Some(&id("sheet-b")));

        let settings = service.remove_data_source(&id("sheet-b")).await.unwrap();
        assert_eq!(settings.data_sources(), &[id(DEFAULT_DATA_SOURCE)]);
        assert_eq!(settings.selected_data_source(), Some(&id(DEFAULT_DATA_SOURCE)));

        let reloaded = service.load().await.unwrap();
        assert_eq!(reloaded, settings);
    }

    #[tokio::test]
    async fn selecting_unknown_source_fails() {
        let err = service()
            .select_data_source(&id("nowhere"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppSettingsServiceError::UnknownDataSource(id) if id == "nowhere"));
    }

    #[tokio::test]
    async fn removing_unknown_source_fails() {
        let err = service()
            .remove_data_source(&id("nowhere"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppSettingsServiceError::UnknownDataSource(_)));
    }

    #[tokio::test]
    async fn invalid_base_url_is_rejected() {
        let draft = AppSettingsDraft {
            content_base_url: Some("not a url".into()),
            ..AppSettings::default().to_draft()
        };
        let err = service().save(draft).await.unwrap_err();
        assert!(matches!(err, AppSettingsServiceError::Validation(_)));
    }
}
