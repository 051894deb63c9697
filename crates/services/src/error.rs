//! Shared error types for the services crate.

use thiserror::Error;

use conjugator_core::model::{
    AppSettingsError, ConversationError, DataError, GameSummaryError, LevelError, ParseIdError,
};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by a running quiz session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("the current challenge has not been answered yet")]
    NotAnswered,
    #[error("the level is already finished")]
    Finished,
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Conversation(#[from] ConversationError),
    #[error(transparent)]
    Summary(#[from] GameSummaryError),
}

/// Errors emitted while fetching or parsing course content.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error("no content base URL is configured")]
    Disabled,
    #[error("no course published for data source `{0}`")]
    NotFound(String),
    #[error("invalid data source id: {0}")]
    DataSource(#[from] ParseIdError),
    #[error("content request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("invalid course document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid level `{title}`: {source}")]
    Level {
        title: String,
        #[source]
        source: LevelError,
    },
}

/// Errors emitted by `AppSettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppSettingsServiceError {
    #[error(transparent)]
    Validation(#[from] AppSettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("data source `{0}` is not configured")]
    UnknownDataSource(String),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Settings(#[from] AppSettingsServiceError),
    #[error(transparent)]
    Content(#[from] ContentError),
}
