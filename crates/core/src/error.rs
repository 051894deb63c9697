use thiserror::Error;

use crate::model::{
    AppSettingsError, ConversationError, DataError, GameSummaryError, LevelError, ParseIdError,
};

/// Any error raised by the domain layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Conversation(#[from] ConversationError),
    #[error(transparent)]
    Summary(#[from] GameSummaryError),
    #[error(transparent)]
    Settings(#[from] AppSettingsError),
    #[error(transparent)]
    Id(#[from] ParseIdError),
}
