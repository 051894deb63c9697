use std::sync::Arc;

use tracing::info;

use conjugator_core::model::{AppSettings, AppSettingsDraft, DataSourceId};
use storage::repository::Storage;

use crate::Clock;
use crate::app_settings_service::AppSettingsService;
use crate::content::{
    ContentConfig, ContentSource, CourseCatalog, HttpContentSource, LoadOutcome,
    SAMPLE_DATA_SOURCE, StaticContentSource, sample_course,
};
use crate::error::{AppServicesError, AppSettingsServiceError, ContentError};
use crate::quiz::QuizService;

/// Where course documents are loaded from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContentMode {
    /// Fetch from the configured base URL (settings first, then environment).
    #[default]
    Remote,
    /// Play the built-in sample course only.
    Offline,
}

/// Assembles app-facing services.
#[derive(Clone)]
pub struct AppServices {
    mode: ContentMode,
    app_settings: Arc<AppSettingsService>,
    catalog: Arc<CourseCatalog>,
    quiz: QuizService,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or settings loading fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        mode: ContentMode,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, clock, mode).await
    }

    /// Build services over an existing storage handle.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if settings cannot be loaded or the sample course is broken.
    pub async fn from_storage(
        storage: &Storage,
        clock: Clock,
        mode: ContentMode,
    ) -> Result<Self, AppServicesError> {
        let app_settings = Arc::new(AppSettingsService::new(Arc::clone(&storage.app_settings)));
        let settings = app_settings.load().await?;

        let source: Arc<dyn ContentSource> = match mode {
            ContentMode::Offline => Arc::new(StaticContentSource::new().with_course(sample_course()?)),
            ContentMode::Remote => {
                let config = settings
                    .content_base_url()
                    .map(ContentConfig::new)
                    .or_else(ContentConfig::from_env);
                info!(target: "content", base_url = ?config.as_ref().map(|c| c.base_url.as_str()), "content source configured");
                Arc::new(HttpContentSource::new(config))
            }
        };

        Ok(Self::with_source(app_settings, source, clock, mode))
    }

    /// Wire services around an explicit content source.
    #[must_use]
    pub fn with_source(
        app_settings: Arc<AppSettingsService>,
        source: Arc<dyn ContentSource>,
        clock: Clock,
        mode: ContentMode,
    ) -> Self {
        Self {
            mode,
            app_settings,
            catalog: Arc::new(CourseCatalog::new(source)),
            quiz: QuizService::new(clock),
        }
    }

    /// Reload every course named by the persisted settings.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if settings cannot be loaded.
    pub async fn reload_catalog(&self) -> Result<LoadOutcome, AppServicesError> {
        let settings = self.catalog_settings().await?;
        Ok(self.catalog.load(&settings).await)
    }

    /// Persist a new selection, point the catalog at it and reload it.
    ///
    /// A load already in flight is discarded in favour of the reload.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the data source is not configured or storage fails.
    pub async fn select_data_source(
        &self,
        data_source: &DataSourceId,
    ) -> Result<AppSettings, AppServicesError> {
        let settings = self.app_settings.select_data_source(data_source).await?;
        self.catalog.select(settings.selected_data_source().cloned());
        self.reload_catalog().await?;
        Ok(settings)
    }

    async fn catalog_settings(&self) -> Result<AppSettings, AppServicesError> {
        match self.mode {
            ContentMode::Remote => Ok(self.app_settings.load().await?),
            ContentMode::Offline => {
                let sample = DataSourceId::new(SAMPLE_DATA_SOURCE).map_err(ContentError::from)?;
                let draft = AppSettingsDraft {
                    data_sources: vec![sample.clone()],
                    selected_data_source: Some(sample),
                    content_base_url: None,
                };
                Ok(draft.validate().map_err(AppSettingsServiceError::from)?)
            }
        }
    }

    #[must_use]
    pub fn mode(&self) -> ContentMode {
        self.mode
    }

    #[must_use]
    pub fn app_settings(&self) -> Arc<AppSettingsService> {
        Arc::clone(&self.app_settings)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CourseCatalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn quiz(&self) -> QuizService {
        self.quiz
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conjugator_core::model::Course;

    #[tokio::test]
    async fn offline_services_load_the_sample_course() {
        let storage = Storage::in_memory();
        let services = AppServices::from_storage(&storage, Clock::default(), ContentMode::Offline)
            .await
            .unwrap();

        let outcome = services.reload_catalog().await.unwrap();
        assert_eq!(outcome, LoadOutcome::Applied { courses: 1 });
        let course = services.catalog().selected_course().unwrap();
        assert_eq!(course.data_source().as_str(), SAMPLE_DATA_SOURCE);
        assert!(!course.levels().is_empty());
    }

    #[tokio::test]
    async fn selecting_a_source_reloads_the_catalog() {
        let storage = Storage::in_memory();
        let settings = Arc::new(AppSettingsService::new(Arc::clone(&storage.app_settings)));
        let sheet_b: DataSourceId = "sheet-b".parse().unwrap();
        settings.add_data_source(sheet_b.clone()).await.unwrap();

        let source = StaticContentSource::new()
            .with_course(Course::new(sheet_b.clone(), Vec::new()).with_name(Some("B".into())));
        let services = AppServices::with_source(
            settings,
            Arc::new(source),
            Clock::default(),
            ContentMode::Remote,
        );
        let catalog = services.catalog();
        assert!(catalog.is_loading());

        services.select_data_source(&sheet_b).await.unwrap();
        assert!(!catalog.is_loading());
        assert_eq!(catalog.selected_data_source(), Some(sheet_b));
        assert_eq!(catalog.selected_course().unwrap().display_name(), "B");
    }

    #[tokio::test]
    async fn remote_services_without_base_url_load_nothing() {
        let storage = Storage::in_memory();
        let services = AppServices::with_source(
            Arc::new(AppSettingsService::new(Arc::clone(&storage.app_settings))),
            Arc::new(HttpContentSource::new(None)),
            Clock::default(),
            ContentMode::Remote,
        );
        let outcome = services.reload_catalog().await.unwrap();
        assert_eq!(outcome, LoadOutcome::Applied { courses: 0 });
    }
}
