use thiserror::Error;

use crate::model::challenge::{Challenge, Choice, DataError};
use crate::model::form::Form;
use crate::model::ids::{ChoiceId, ConversationId, MessageId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConversationError {
    #[error("choice {0} is not part of this conversation")]
    UnknownChoice(ChoiceId),

    #[error("question already answered")]
    AlreadyAnswered,
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    QuestionAsked,
    /// `attempts` counts distinct wrong choices plus the final correct one.
    AnsweredCorrectly { attempts: u32 },
}

impl Status {
    #[must_use]
    pub fn is_complete(self) -> bool {
        matches!(self, Status::AnsweredCorrectly { .. })
    }
}

//
// ─── MESSAGES ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Prompt {
        header: Option<String>,
        title: String,
        footer: Option<String>,
    },
    Response {
        choice: Choice,
        correct: bool,
    },
}

/// One entry of a conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: MessageId,
    content: MessageContent,
}

impl Message {
    #[must_use]
    pub fn new(content: MessageContent) -> Self {
        Self {
            id: MessageId::new(),
            content,
        }
    }

    #[must_use]
    pub fn id(&self) -> MessageId {
        self.id
    }

    #[must_use]
    pub fn content(&self) -> &MessageContent {
        &self.content
    }
}

/// What a single `submit` did to the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Correct { attempts: u32 },
    Incorrect { wrong_attempts: u32 },
    /// The choice was already struck through; nothing changed.
    AlreadyStruck,
}

//
// ─── CONVERSATION ──────────────────────────────────────────────────────────────
//

/// Live state of one challenge being answered.
#[derive(Debug, Clone)]
pub struct Conversation {
    id: ConversationId,
    challenge: Challenge,
    correct_form: Form,
    choices: Vec<Choice>,
    selected: Option<ChoiceId>,
    struck: Vec<ChoiceId>,
    status: Status,
    messages: Vec<Message>,
}

impl Conversation {
    /// Open a conversation asking for `correct_form` of `challenge`.
    ///
    /// The transcript starts with a prompt naming the person and the verb.
    ///
    /// # Errors
    ///
    /// Returns `DataError` if the challenge is malformed or lacks `correct_form`.
    pub fn new(challenge: &Challenge, correct_form: Form) -> Result<Self, DataError> {
        let choices = challenge.choices()?;
        if !choices.iter().any(|choice| choice.form() == correct_form) {
            return Err(DataError::FormNotInChallenge {
                verb: challenge.verb().to_string(),
                form: correct_form,
            });
        }

        let prompt = Message::new(MessageContent::Prompt {
            header: Some(correct_form.title().to_string()),
            title: challenge.verb().to_string(),
            footer: None,
        });

        Ok(Self {
            id: ConversationId::new(),
            challenge: challenge.clone(),
            correct_form,
            choices,
            selected: None,
            struck: Vec::new(),
            status: Status::QuestionAsked,
            messages: vec![prompt],
        })
    }

    #[must_use]
    pub fn id(&self) -> ConversationId {
        self.id
    }

    #[must_use]
    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    #[must_use]
    pub fn correct_form(&self) -> Form {
        self.correct_form
    }

    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    #[must_use]
    pub fn choice(&self, id: ChoiceId) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.id() == id)
    }

    #[must_use]
    pub fn correct_choice(&self) -> Option<&Choice> {
        self.choices
            .iter()
            .find(|choice| choice.form() == self.correct_form)
    }

    #[must_use]
    pub fn selected_choice(&self) -> Option<&Choice> {
        self.selected.and_then(|id| self.choice(id))
    }

    /// Choices ruled out by wrong guesses, in the order they were struck.
    pub fn struck_choices(&self) -> impl Iterator<Item = &Choice> {
        self.struck.iter().filter_map(|id| self.choice(*id))
    }

    #[must_use]
    pub fn is_struck(&self, id: ChoiceId) -> bool {
        self.struck.contains(&id)
    }

    /// Number of distinct wrong choices submitted so far.
    #[must_use]
    pub fn wrong_attempts(&self) -> u32 {
        u32::try_from(self.struck.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Submit an answer.
    ///
    /// A correct choice completes the conversation. A wrong choice is struck through
    /// once; submitting it again returns `SubmitOutcome::AlreadyStruck` and leaves
    /// the counters and transcript untouched.
    ///
    /// # Errors
    ///
    /// Returns `ConversationError::AlreadyAnswered` once the question is complete,
    /// or `ConversationError::UnknownChoice` for ids outside this conversation.
    pub fn submit(&mut self, choice_id: ChoiceId) -> Result<SubmitOutcome, ConversationError> {
        if self.status.is_complete() {
            return Err(ConversationError::AlreadyAnswered);
        }
        let choice = self
            .choice(choice_id)
            .cloned()
            .ok_or(ConversationError::UnknownChoice(choice_id))?;

        if self.is_struck(choice_id) {
            return Ok(SubmitOutcome::AlreadyStruck);
        }

        self.selected = Some(choice_id);
        let correct = choice.form() == self.correct_form;
        self.messages
            .push(Message::new(MessageContent::Response { choice, correct }));

        if correct {
            let attempts = self.wrong_attempts().saturating_add(1);
            self.status = Status::AnsweredCorrectly { attempts };
            Ok(SubmitOutcome::Correct { attempts })
        } else {
            self.struck.push(choice_id);
            Ok(SubmitOutcome::Incorrect {
                wrong_attempts: self.wrong_attempts(),
            })
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
