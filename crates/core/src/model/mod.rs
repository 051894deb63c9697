mod app_settings;
mod challenge;
mod conversation;
mod course;
mod form;
mod ids;
mod level;
mod summary;

pub use ids::{ChoiceId, ConversationId, DataSourceId, MessageId, ParseIdError};

pub use app_settings::{AppSettings, AppSettingsDraft, AppSettingsError, DEFAULT_DATA_SOURCE};
pub use challenge::{Challenge, Choice, DataError};
pub use conversation::{
    Conversation, ConversationError, Message, MessageContent, Status, SubmitOutcome,
};
pub use course::Course;
pub use form::Form;
pub use level::{Level, LevelError, Lives, Mode};
pub use summary::{Answer, GameSummary, GameSummaryError, LevelOutcome};
