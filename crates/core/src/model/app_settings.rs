use thiserror::Error;
use url::Url;

use crate::model::ids::DataSourceId;

/// Data source configured on first launch.
pub const DEFAULT_DATA_SOURCE: &str = "1t-onBgRP5BSHZ26XjvmVgi6RxZmpKO7RBI3JARYE3Bs";

/// User settings: which data sources to load and which course is selected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppSettings {
    data_sources: Vec<DataSourceId>,
    selected_data_source: Option<DataSourceId>,
    content_base_url: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct AppSettingsDraft {
    pub data_sources: Vec<DataSourceId>,
    pub selected_data_source: Option<DataSourceId>,
    pub content_base_url: Option<String>,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppSettingsError {
    #[error("invalid content base URL")]
    InvalidBaseUrl,
}

impl AppSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft into settings.
    ///
    /// Duplicate data sources are dropped (first occurrence wins). A selection that
    /// is not in the list falls back to the first data source.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsError` if the base URL is present but invalid.
    pub fn validate(self) -> Result<AppSettings, AppSettingsError> {
        let mut data_sources: Vec<DataSourceId> = Vec::with_capacity(self.data_sources.len());
        for source in self.data_sources {
            if !data_sources.contains(&source) {
                data_sources.push(source);
            }
        }

        let selected_data_source = self
            .selected_data_source
            .filter(|selected| data_sources.contains(selected))
            .or_else(|| data_sources.first().cloned());

        let content_base_url = self
            .content_base_url
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty());
        if let Some(url) = content_base_url.as_ref() {
            if Url::parse(url).is_err() {
                return Err(AppSettingsError::InvalidBaseUrl);
            }
        }

        Ok(AppSettings {
            data_sources,
            selected_data_source,
            content_base_url,
        })
    }
}

impl AppSettings {
    /// Rehydrate settings from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsError` if the stored base URL is invalid.
    pub fn from_persisted(draft: AppSettingsDraft) -> Result<Self, AppSettingsError> {
        draft.validate()
    }

    #[must_use]
    pub fn data_sources(&self) -> &[DataSourceId] {
        &self.data_sources
    }

    #[must_use]
    pub fn selected_data_source(&self) -> Option<&DataSourceId> {
        self.selected_data_source.as_ref()
    }

    #[must_use]
    pub fn content_base_url(&self) -> Option<&str> {
        self.content_base_url.as_deref()
    }

    /// Editable copy of these settings.
    #[must_use]
    pub fn to_draft(&self) -> AppSettingsDraft {
        AppSettingsDraft {
            data_sources: self.data_sources.clone(),
            selected_data_source: self.selected_data_source.clone(),
            content_base_url: self.content_base_url.clone(),
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        let default_source = DataSourceId::new(DEFAULT_DATA_SOURCE).ok();
        Self {
            data_sources: default_source.iter().cloned().collect(),
            selected_data_source: default_source,
            content_base_url: None,
        }
    }
}
