//! JSON shape of a published course and its conversion into domain types.

use serde::Deserialize;
use tracing::warn;

use conjugator_core::model::{Challenge, Course, DataSourceId, Form, Level, Lives, Mode};

use crate::error::ContentError;

#[derive(Debug, Deserialize)]
struct CourseDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    announcement_title: Option<String>,
    #[serde(default)]
    announcement: Option<String>,
    #[serde(default)]
    levels: Vec<LevelDocument>,
}

#[derive(Debug, Deserialize)]
struct LevelDocument {
    title: String,
    #[serde(default)]
    description: String,
    /// `RRGGBB`, optionally prefixed with `#` or `0x`.
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    mode: ModeDocument,
    #[serde(default)]
    lives: LivesDocument,
    #[serde(default)]
    challenges: Vec<ChallengeDocument>,
}

#[derive(Debug, Deserialize)]
struct ChallengeDocument {
    verb: String,
    forms: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ModeDocument {
    #[default]
    Random,
    Set(Form),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum LivesDocument {
    Unlimited,
    SuddenDeath,
    Fixed(u32),
}

impl Default for LivesDocument {
    fn default() -> Self {
        LivesDocument::Fixed(3)
    }
}

impl From<ModeDocument> for Mode {
    fn from(value: ModeDocument) -> Self {
        match value {
            ModeDocument::Random => Mode::RandomForm,
            ModeDocument::Set(form) => Mode::SetForm(form),
        }
    }
}

impl From<LivesDocument> for Lives {
    fn from(value: LivesDocument) -> Self {
        match value {
            LivesDocument::Unlimited => Lives::Unlimited,
            LivesDocument::SuddenDeath => Lives::SuddenDeath,
            LivesDocument::Fixed(n) => Lives::Fixed(n),
        }
    }
}

impl LevelDocument {
    fn into_level(self) -> Result<Level, ContentError> {
        let color = self.color.as_deref().and_then(|raw| {
            let parsed = parse_color(raw);
            if parsed.is_none() {
                warn!(target: "content", level = %self.title, color = %raw, "ignoring unreadable level colour");
            }
            parsed
        });
        let challenges = self
            .challenges
            .into_iter()
            .map(|c| Challenge::new(c.verb, c.forms))
            .collect();

        let title = self.title;
        let level_error = |source| ContentError::Level {
            title: title.clone(),
            source,
        };
        Level::new(title.clone(), self.description, challenges)
            .and_then(|level| level.with_lives(self.lives.into()))
            .and_then(|level| level.with_color_hex(color))
            .map(|level| level.with_mode(self.mode.into()))
            .map_err(level_error)
    }
}

fn parse_color(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .unwrap_or(trimmed);
    u32::from_str_radix(digits, 16).ok()
}

/// Parse a course document published under `data_source`.
///
/// Levels that fail validation are skipped with a warning; the rest of the
/// course is kept.
///
/// # Errors
///
/// Returns `ContentError::Parse` if the body is not a course document.
pub fn parse_course(data_source: &DataSourceId, body: &str) -> Result<Course, ContentError> {
    let document: CourseDocument = serde_json::from_str(body)?;

    let mut levels = Vec::with_capacity(document.levels.len());
    for level in document.levels {
        match level.into_level() {
            Ok(level) => levels.push(level),
            Err(err) => {
                warn!(target: "content", %data_source, error = %err, "skipping invalid level");
            }
        }
    }

    Ok(Course::new(data_source.clone(), levels)
        .with_name(document.name)
        .with_announcement(document.announcement_title, document.announcement))
}
