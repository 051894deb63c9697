use rand::rng;
use rand::seq::IndexedRandom;
use std::collections::VecDeque;

use conjugator_core::model::{Challenge, Conversation, DataError, Form, Mode};

/// Chooses the person asked for when a level runs in `Mode::RandomForm`.
pub trait FormPicker: Send {
    /// Pick one of `forms`. `forms` is never empty.
    fn pick(&mut self, challenge: &Challenge, forms: &[Form]) -> Form;
}

/// Uniform pick using the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomFormPicker;

impl FormPicker for RandomFormPicker {
    fn pick(&mut self, _challenge: &Challenge, forms: &[Form]) -> Form {
        forms.choose(&mut rng()).copied().unwrap_or(Form::Yo)
    }
}

/// Replays a fixed sequence of forms, one per challenge.
///
/// A scripted form the challenge does not have, or an exhausted script, falls
/// back to the first available form.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFormPicker {
    script: VecDeque<Form>,
}

impl ScriptedFormPicker {
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = Form>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl FormPicker for ScriptedFormPicker {
    fn pick(&mut self, _challenge: &Challenge, forms: &[Form]) -> Form {
        match self.script.pop_front() {
            Some(form) if forms.contains(&form) => form,
            _ => forms.first().copied().unwrap_or(Form::Yo),
        }
    }
}

/// Open the conversation for `challenge`, choosing the correct form per `mode`.
///
/// # Errors
///
/// Returns `DataError::MalformedChallenge` for a challenge without 5 or 6 forms and
/// `DataError::FormNotInChallenge` when a `SetForm` level names a missing person.
pub fn open_conversation(
    challenge: &Challenge,
    mode: Mode,
    picker: &mut dyn FormPicker,
) -> Result<Conversation, DataError> {
    let forms = challenge.forms()?;
    let correct_form = match mode {
        Mode::RandomForm => picker.pick(challenge, forms),
        Mode::SetForm(form) => form,
    };
    Conversation::new(challenge, correct_form)
}
