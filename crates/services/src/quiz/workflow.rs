use tracing::{debug, info, warn};

use conjugator_core::model::{ChoiceId, Level, SubmitOutcome};

use super::picker::{FormPicker, RandomFormPicker};
use super::session::{Advance, QuizSession, SubmitResult};
use crate::Clock;
use crate::error::QuizError;

/// Starts quiz sessions and drives them with the service clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizService {
    clock: Clock,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Start a session that picks random forms for `RandomForm` levels.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Data` if the level holds unplayable content.
    pub fn start_level<'a>(&self, level: &'a Level) -> Result<QuizSession<'a>, QuizError> {
        self.start_level_with(level, Box::new(RandomFormPicker))
    }

    /// Start a session with a caller-provided form picker.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Data` if the level holds unplayable content.
    pub fn start_level_with<'a>(
        &self,
        level: &'a Level,
        picker: Box<dyn FormPicker + 'a>,
    ) -> Result<QuizSession<'a>, QuizError> {
        match QuizSession::start(level, picker, self.clock.now()) {
            Ok(session) => {
                info!(
                    target: "quiz",
                    level = %level.title(),
                    challenges = level.challenges().len(),
                    lives = ?level.lives(),
                    mode = ?level.mode(),
                    "level started"
                );
                Ok(session)
            }
            Err(err) => {
                warn!(target: "quiz", level = %level.title(), error = %err, "level cannot be played");
                Err(err)
            }
        }
    }

    /// Submit a choice for the session's current challenge.
    ///
    /// # Errors
    ///
    /// Propagates `QuizError` from the session.
    pub fn submit(
        &self,
        session: &mut QuizSession<'_>,
        choice_id: ChoiceId,
    ) -> Result<SubmitResult, QuizError> {
        let result = session.submit(choice_id, self.clock.now())?;
        let verb = session.conversation().challenge().verb();
        match result.outcome {
            SubmitOutcome::Correct { attempts } => {
                debug!(target: "quiz", %verb, attempts, "answered correctly");
            }
            SubmitOutcome::Incorrect { wrong_attempts } => {
                debug!(target: "quiz", %verb, wrong_attempts, lives = ?result.lives_remaining, "wrong answer");
            }
            SubmitOutcome::AlreadyStruck => {
                debug!(target: "quiz", %verb, "choice already struck; ignored");
            }
        }
        if result.level_failed {
            info!(
                target: "quiz",
                level = %session.level().title(),
                answered = session.answers().len(),
                "level failed: out of lives"
            );
        }
        Ok(result)
    }

    /// Move to the next challenge, or finish the level.
    ///
    /// # Errors
    ///
    /// Propagates `QuizError` from the session.
    pub fn advance<'s>(
        &self,
        session: &'s mut QuizSession<'_>,
    ) -> Result<Advance<'s>, QuizError> {
        let advance = session.advance(self.clock.now())?;
        if let Advance::Finished(summary) = &advance {
            info!(
                target: "quiz",
                level = %summary.level_title(),
                accuracy = ?summary.accuracy(),
                answers = summary.answers().len(),
                "level completed"
            );
        }
        Ok(advance)
    }
}
