use thiserror::Error;

use crate::model::challenge::Challenge;
use crate::model::form::Form;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelError {
    #[error("a level needs at least 2 challenges, got {len}")]
    TooFewChallenges { len: usize },

    #[error("fixed lives must be > 0")]
    InvalidLives,

    #[error("colour {0:#x} does not fit in 0xRRGGBB")]
    InvalidColor(u32),
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// How the correct person is chosen for each challenge of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// A random person per challenge, among those the challenge has.
    #[default]
    RandomForm,
    /// The same person for every challenge.
    SetForm(Form),
}

/// How many wrong answers a level tolerates before it is failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lives {
    Unlimited,
    Fixed(u32),
    /// Same as `Fixed(1)`.
    SuddenDeath,
}

impl Lives {
    /// Lives available at the start of a level, or `None` when unlimited.
    #[must_use]
    pub fn initial(self) -> Option<u32> {
        match self {
            Lives::Unlimited => None,
            Lives::Fixed(n) => Some(n),
            Lives::SuddenDeath => Some(1),
        }
    }
}

impl Default for Lives {
    fn default() -> Self {
        Lives::Fixed(3)
    }
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// An ordered set of challenges plus the rules used to play them.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    title: String,
    description: String,
    color_hex: Option<u32>,
    mode: Mode,
    lives: Lives,
    challenges: Vec<Challenge>,
}

impl Level {
    /// Create a level with the default mode (`RandomForm`) and lives (`Fixed(3)`).
    ///
    /// # Errors
    ///
    /// Returns `LevelError::TooFewChallenges` if fewer than two challenges are given.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        challenges: Vec<Challenge>,
    ) -> Result<Self, LevelError> {
        if challenges.len() < 2 {
            return Err(LevelError::TooFewChallenges {
                len: challenges.len(),
            });
        }
        Ok(Self {
            title: title.into(),
            description: description.into(),
            color_hex: None,
            mode: Mode::default(),
            lives: Lives::default(),
            challenges,
        })
    }

    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// # Errors
    ///
    /// Returns `LevelError::InvalidLives` for `Lives::Fixed(0)`.
    pub fn with_lives(mut self, lives: Lives) -> Result<Self, LevelError> {
        if lives == Lives::Fixed(0) {
            return Err(LevelError::InvalidLives);
        }
        self.lives = lives;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `LevelError::InvalidColor` if the value exceeds `0xFFFFFF`.
    pub fn with_color_hex(mut self, color: Option<u32>) -> Result<Self, LevelError> {
        if let Some(value) = color {
            if value > 0x00FF_FFFF {
                return Err(LevelError::InvalidColor(value));
            }
        }
        self.color_hex = color;
        Ok(self)
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn color_hex(&self) -> Option<u32> {
        self.color_hex
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn lives(&self) -> Lives {
        self.lives
    }

    #[must_use]
    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge(verb: &str) -> Challenge {
        Challenge::new(verb, vec![verb.to_string(); 6])
    }

    #[test]
    fn level_requires_two_challenges() {
        let err = Level::new("Solo", "", vec![challenge("ser")]).unwrap_err();
        assert_eq!(err, LevelError::TooFewChallenges { len: 1 });
    }

    #[test]
    fn defaults_follow_random_form_and_three_lives() {
        let level = Level::new("Easy", "", vec![challenge("a"), challenge("b")]).unwrap();
        assert_eq!(level.mode(), Mode::RandomForm);
        assert_eq!(level.lives(), Lives::Fixed(3));
        assert_eq!(level.lives().initial(), Some(3));
    }

    #[test]
    fn sudden_death_is_one_life() {
        assert_eq!(Lives::SuddenDeath.initial(), Some(1));
        assert_eq!(Lives::Unlimited.initial(), None);
    }

    #[test]
    fn zero_fixed_lives_rejected() {
        let level = Level::new("Easy", "", vec![challenge("a"), challenge("b")]).unwrap();
        assert_eq!(
            level.with_lives(Lives::Fixed(0)).unwrap_err(),
            LevelError::InvalidLives
        );
    }

    #[test]
    fn color_must_fit_in_24_bits() {
        let level = Level::new("Easy", "", vec![challenge("a"), challenge("b")]).unwrap();
        let ok = level.clone().with_color_hex(Some(0x00AE_EF)).unwrap();
        assert_eq!(ok.color_hex(), Some(0x00AE_EF));
        assert!(level.with_color_hex(Some(0x0100_0000)).is_err());
    }
}
