use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::challenge::Choice;
use crate::model::form::Form;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("{answers} answers recorded for a level of {total} challenges")]
    CountMismatch { answers: usize, total: usize },
}

/// Record of one challenge answered during a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub verb: String,
    pub form: Form,
    pub text: String,
    pub attempts: u32,
    /// Wrong choices struck on the way, in submission order.
    pub wrong_choices: Vec<Choice>,
}

impl Answer {
    #[must_use]
    pub fn first_try(&self) -> bool {
        self.attempts == 1
    }
}

/// How a level ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelOutcome {
    /// Every challenge answered; `accuracy` is first-try answers over challenges.
    Completed { accuracy: f64 },
    /// Lives ran out before the last challenge was answered.
    Failed { challenges_answered: usize },
}

/// Final result of playing a level.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSummary {
    level_title: String,
    outcome: LevelOutcome,
    answers: Vec<Answer>,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl GameSummary {
    /// Summary of a level whose challenges were all answered.
    ///
    /// # Errors
    ///
    /// Returns `GameSummaryError::CountMismatch` if `answers` does not cover all
    /// `total_challenges`, or `InvalidTimeRange` for reversed timestamps.
    pub fn completed(
        level_title: impl Into<String>,
        total_challenges: usize,
        answers: Vec<Answer>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, GameSummaryError> {
        if completed_at < started_at {
            return Err(GameSummaryError::InvalidTimeRange);
        }
        if answers.len() != total_challenges || total_challenges == 0 {
            return Err(GameSummaryError::CountMismatch {
                answers: answers.len(),
                total: total_challenges,
            });
        }

        let first_try = answers.iter().filter(|answer| answer.first_try()).count();
        #[allow(clippy::cast_precision_loss)]
        let accuracy = first_try as f64 / total_challenges as f64;

        Ok(Self {
            level_title: level_title.into(),
            outcome: LevelOutcome::Completed { accuracy },
            answers,
            started_at,
            completed_at,
        })
    }

    /// Summary of a level that ran out of lives.
    ///
    /// # Errors
    ///
    /// Returns `GameSummaryError::InvalidTimeRange` for reversed timestamps.
    pub fn failed(
        level_title: impl Into<String>,
        answers: Vec<Answer>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, GameSummaryError> {
        if completed_at < started_at {
            return Err(GameSummaryError::InvalidTimeRange);
        }
        Ok(Self {
            level_title: level_title.into(),
            outcome: LevelOutcome::Failed {
                challenges_answered: answers.len(),
            },
            answers,
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn level_title(&self) -> &str {
        &self.level_title
    }

    #[must_use]
    pub fn outcome(&self) -> LevelOutcome {
        self.outcome
    }

    /// Accuracy ratio, or `None` when the level was failed.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        match self.outcome {
            LevelOutcome::Completed { accuracy } => Some(accuracy),
            LevelOutcome::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, LevelOutcome::Failed { .. })
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}
