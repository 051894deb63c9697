mod lives;
mod picker;
mod progress;
mod session;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use lives::LivesCounter;
pub use picker::{FormPicker, RandomFormPicker, ScriptedFormPicker, open_conversation};
pub use progress::QuizProgress;
pub use session::{Advance, QuizSession, SubmitResult};
pub use workflow::QuizService;
