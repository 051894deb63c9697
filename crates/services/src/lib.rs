#![forbid(unsafe_code)]

pub mod app_services;
pub mod app_settings_service;
pub mod content;
pub mod error;
pub mod quiz;

pub use conjugator_core::Clock;

pub use app_services::{AppServices, ContentMode};
pub use app_settings_service::AppSettingsService;
pub use content::{ContentSource, CourseCatalog, HttpContentSource, LoadOutcome, StaticContentSource};
pub use error::{AppServicesError, AppSettingsServiceError, ContentError, QuizError};
pub use quiz::{Advance, QuizProgress, QuizService, QuizSession, SubmitResult};
