use thiserror::Error;

use crate::model::form::Form;
use crate::model::ids::ChoiceId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Content that cannot be quizzed on as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DataError {
    #[error("challenge `{verb}` has {len} forms; expected 5 or 6")]
    MalformedChallenge { verb: String, len: usize },

    #[error("challenge `{verb}` has no `{form:?}` form")]
    FormNotInChallenge { verb: String, form: Form },
}

//
// ─── CHOICE ────────────────────────────────────────────────────────────────────
//

/// One selectable answer: a person plus its conjugated text.
///
/// Equality is identity: two choices are equal only if they share a `ChoiceId`.
#[derive(Debug, Clone)]
pub struct Choice {
    id: ChoiceId,
    form: Form,
    text: String,
}

impl Choice {
    #[must_use]
    pub fn new(form: Form, text: impl Into<String>) -> Self {
        Self {
            id: ChoiceId::new(),
            form,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ChoiceId {
        self.id
    }

    #[must_use]
    pub fn form(&self) -> Form {
        self.form
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl PartialEq for Choice {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Choice {}

//
// ─── CHALLENGE ─────────────────────────────────────────────────────────────────
//

/// A verb and its conjugations, indexed by person.
///
/// Holds 6 forms (yo, tú, él, nosotros, vosotros, ellos) or 5 forms with
/// `vosotros` left out. The length is checked when choices are generated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Challenge {
    verb: String,
    verb_forms: Vec<String>,
}

impl Challenge {
    #[must_use]
    pub fn new(verb: impl Into<String>, verb_forms: Vec<String>) -> Self {
        Self {
            verb: verb.into(),
            verb_forms,
        }
    }

    #[must_use]
    pub fn verb(&self) -> &str {
        &self.verb
    }

    #[must_use]
    pub fn verb_forms(&self) -> &[String] {
        &self.verb_forms
    }

    /// Persons present in this challenge, in canonical order.
    ///
    /// # Errors
    ///
    /// Returns `DataError::MalformedChallenge` unless there are 5 or 6 forms.
    pub fn forms(&self) -> Result<&'static [Form], DataError> {
        match self.verb_forms.len() {
            5 => Ok(&Form::WITHOUT_VOSOTROS),
            6 => Ok(&Form::ALL),
            len => Err(DataError::MalformedChallenge {
                verb: self.verb.clone(),
                len,
            }),
        }
    }

    /// Returns true if the challenge carries a conjugation for `form`.
    #[must_use]
    pub fn has_form(&self, form: Form) -> bool {
        self.forms().is_ok_and(|forms| forms.contains(&form))
    }

    /// Conjugated text for `form`.
    ///
    /// # Errors
    ///
    /// Returns `DataError` if the challenge is malformed or lacks the form.
    pub fn text_for(&self, form: Form) -> Result<&str, DataError> {
        let forms = self.forms()?;
        forms
            .iter()
            .position(|candidate| *candidate == form)
            .map(|idx| self.verb_forms[idx].as_str())
            .ok_or_else(|| DataError::FormNotInChallenge {
                verb: self.verb.clone(),
                form,
            })
    }

    /// Build a fresh set of choices, one per person present, in canonical order.
    ///
    /// # Errors
    ///
    /// Returns `DataError::MalformedChallenge` unless there are 5 or 6 forms.
    pub fn choices(&self) -> Result<Vec<Choice>, DataError> {
        let forms = self.forms()?;
        Ok(forms
            .iter()
            .zip(&self.verb_forms)
            .map(|(form, text)| Choice::new(*form, text.clone()))
            .collect())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
