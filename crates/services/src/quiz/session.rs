use chrono::{DateTime, Utc};
use std::fmt;

use conjugator_core::model::{
    Answer, ChoiceId, Conversation, DataError, GameSummary, Level, Mode, SubmitOutcome,
};

use super::lives::LivesCounter;
use super::picker::{FormPicker, open_conversation};
use super::progress::QuizProgress;
use crate::error::QuizError;

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

/// What a submission did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitResult {
    pub outcome: SubmitOutcome,
    pub lives_remaining: Option<u32>,
    /// True when this submission used up the last life.
    pub level_failed: bool,
}

/// Where `advance` moved the session.
#[derive(Debug)]
pub enum Advance<'s> {
    Next(&'s Conversation),
    Finished(&'s GameSummary),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One play-through of a level.
///
/// Steps through the level's challenges in order. Each challenge is played as a
/// `Conversation`; wrong answers cost lives according to the level's policy and
/// the session finishes with a `GameSummary` either when the last challenge is
/// answered or when lives run out.
pub struct QuizSession<'a> {
    level: &'a Level,
    picker: Box<dyn FormPicker + 'a>,
    current: usize,
    conversation: Conversation,
    lives: LivesCounter,
    answers: Vec<Answer>,
    started_at: DateTime<Utc>,
    summary: Option<GameSummary>,
}

impl<'a> QuizSession<'a> {
    /// Start a session on the first challenge of `level`.
    ///
    /// Every challenge is checked up front so malformed content is reported before
    /// the first question is asked.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Data` for the first challenge that cannot be played.
    pub fn start(
        level: &'a Level,
        mut picker: Box<dyn FormPicker + 'a>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        validate_level(level)?;
        // `Level::new` guarantees at least two challenges.
        let first = &level.challenges()[0];
        let conversation = open_conversation(first, level.mode(), picker.as_mut())?;

        Ok(Self {
            level,
            picker,
            current: 0,
            conversation,
            lives: LivesCounter::new(level.lives()),
            answers: Vec::new(),
            started_at,
            summary: None,
        })
    }

    #[must_use]
    pub fn level(&self) -> &'a Level {
        self.level
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Index of the challenge being played.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    #[must_use]
    pub fn lives_remaining(&self) -> Option<u32> {
        self.lives.remaining()
    }

    #[must_use]
    pub fn summary(&self) -> Option<&GameSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.summary.is_some()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.level.challenges().len();
        let answered = self.answers.len();
        QuizProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            lives_remaining: self.lives.remaining(),
            is_finished: self.is_finished(),
        }
    }

    /// Submit a choice for the current challenge.
    ///
    /// A new wrong choice costs one life; when that was the last life the session
    /// finishes immediately with a failed summary. Re-submitting a struck choice
    /// costs nothing.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Finished` once the session is over, or
    /// `QuizError::Conversation` for unknown choices and already answered questions.
    pub fn submit(
        &mut self,
        choice_id: ChoiceId,
        at: DateTime<Utc>,
    ) -> Result<SubmitResult, QuizError> {
        if self.is_finished() {
            return Err(QuizError::Finished);
        }
        let at = self.finish_time(at);

        let outcome = self.conversation.submit(choice_id)?;
        let mut level_failed = false;

        match outcome {
            SubmitOutcome::Correct { attempts } => {
                self.record_answer(attempts)?;
            }
            SubmitOutcome::Incorrect { .. } => {
                if self.lives.lose_one() {
                    self.summary = Some(GameSummary::failed(
                        self.level.title(),
                        self.answers.clone(),
                        self.started_at,
                        at,
                    )?);
                    level_failed = true;
                }
            }
            SubmitOutcome::AlreadyStruck => {}
        }

        Ok(SubmitResult {
            outcome,
            lives_remaining: self.lives.remaining(),
            level_failed,
        })
    }

    /// Move past the answered challenge.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotAnswered` while the current question is open,
    /// `QuizError::Finished` once the session is over, and `QuizError::Data` if the
    /// next challenge cannot be played.
    pub fn advance(&mut self, at: DateTime<Utc>) -> Result<Advance<'_>, QuizError> {
        if self.is_finished() {
            return Err(QuizError::Finished);
        }
        if !self.conversation.status().is_complete() {
            return Err(QuizError::NotAnswered);
        }
        let at = self.finish_time(at);

        let level = self.level;
        let next = self.current + 1;
        if let Some(challenge) = level.challenges().get(next) {
            self.conversation = open_conversation(challenge, level.mode(), self.picker.as_mut())?;
            self.current = next;
            return Ok(Advance::Next(&self.conversation));
        }

        let summary = GameSummary::completed(
            level.title(),
            level.challenges().len(),
            self.answers.clone(),
            self.started_at,
            at,
        )?;
        Ok(Advance::Finished(self.summary.insert(summary)))
    }

    /// A wall clock stepping backwards never ends a session before it started.
    fn finish_time(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        at.max(self.started_at)
    }

    fn record_answer(&mut self, attempts: u32) -> Result<(), QuizError> {
        let conversation = &self.conversation;
        let challenge = conversation.challenge();
        let form = conversation.correct_form();
        self.answers.push(Answer {
            verb: challenge.verb().to_string(),
            form,
            text: challenge.text_for(form)?.to_string(),
            attempts,
            wrong_choices: conversation.struck_choices().cloned().collect(),
        });
        Ok(())
    }
}

impl fmt::Debug for QuizSession<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("level", &self.level.title())
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("lives", &self.lives.remaining())
            .field("started_at", &self.started_at)
            .field("finished", &self.is_finished())
            .finish_non_exhaustive()
    }
}

fn validate_level(level: &Level) -> Result<(), DataError> {
    for challenge in level.challenges() {
        let forms = challenge.forms()?;
        if let Mode::SetForm(form) = level.mode() {
            if !forms.contains(&form) {
                return Err(DataError::FormNotInChallenge {
                    verb: challenge.verb().to_string(),
                    form,
                });
            }
        }
    }
    Ok(())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
