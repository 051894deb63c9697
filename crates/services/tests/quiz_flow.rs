use conjugator_core::model::{ChoiceId, Form, LevelOutcome, MessageContent, SubmitOutcome};
use conjugator_core::time::{fixed_clock, fixed_now};
use services::content::sample_course;
use services::quiz::ScriptedFormPicker;
use services::{Advance, QuizError, QuizService, QuizSession};

fn wrong_choice(session: &QuizSession<'_>, skip: usize) -> ChoiceId {
    let conversation = session.conversation();
    let correct = conversation.correct_choice().unwrap().id();
    conversation
        .choices()
        .iter()
        .filter(|choice| choice.id() != correct)
        .nth(skip)
        .unwrap()
        .id()
}

#[test]
fn sample_level_played_perfectly() {
    let course = sample_course().unwrap();
    let level = &course.levels()[0];
    let service = QuizService::new(fixed_clock());
    let picker = ScriptedFormPicker::new([Form::Yo, Form::Tu, Form::Ellos]);
    let mut session = service.start_level_with(level, Box::new(picker)).unwrap();

    let expected = ["como", "bebes", "andan"];
    for (index, text) in expected.iter().enumerate() {
        let conversation = session.conversation();
        let correct = conversation.correct_choice().unwrap();
        assert_eq!(correct.text(), *text);
        match conversation.messages()[0].content() {
            MessageContent::Prompt { title, .. } => assert_eq!(title, level.challenges()[index].verb()),
            other => panic!("unexpected first message {other:?}"),
        }

        let id = correct.id();
        let result = service.submit(&mut session, id).unwrap();
        assert_eq!(result.outcome, SubmitOutcome::Correct { attempts: 1 });

        match service.advance(&mut session).unwrap() {
            Advance::Next(next) => assert_eq!(next.challenge().verb(), level.challenges()[index + 1].verb()),
            Advance::Finished(summary) => {
                assert_eq!(index, expected.len() - 1);
                assert_eq!(summary.accuracy(), Some(1.0));
                assert_eq!(summary.completed_at(), fixed_now());
            }
        }
    }
    assert!(session.is_finished());
}

#[test]
fn sudden_death_level_ends_on_first_mistake() {
    let course = sample_course().unwrap();
    let level = &course.levels()[2];
    let service = QuizService::new(fixed_clock());
    let mut session = service
        .start_level_with(level, Box::new(ScriptedFormPicker::new([Form::El])))
        .unwrap();

    let wrong = wrong_choice(&session, 0);
    let result = service.submit(&mut session, wrong).unwrap();
    assert!(result.level_failed);
    assert_eq!(result.lives_remaining, Some(0));

    let summary = session.summary().unwrap();
    assert_eq!(summary.outcome(), LevelOutcome::Failed { challenges_answered: 0 });
    assert!(summary.accuracy().is_none());

    assert!(matches!(service.advance(&mut session), Err(QuizError::Finished)));
}

#[test]
fn retries_lower_accuracy_but_still_complete() {
    let course = sample_course().unwrap();
    let level = &course.levels()[1];
    let service = QuizService::new(fixed_clock());
    let mut session = service
        .start_level_with(level, Box::new(ScriptedFormPicker::new([Form::Yo, Form::Yo])))
        .unwrap();

    let wrong = wrong_choice(&session, 0);
    let result = service.submit(&mut session, wrong).unwrap();
    assert_eq!(result.outcome, SubmitOutcome::Incorrect { wrong_attempts: 1 });
    assert_eq!(result.lives_remaining, Some(2));

    let again = service.submit(&mut session, wrong).unwrap();
    assert_eq!(again.outcome, SubmitOutcome::AlreadyStruck);
    assert_eq!(again.lives_remaining, Some(2));

    let tengo = session.conversation().correct_choice().unwrap().id();
    assert_eq!(
        service.submit(&mut session, tengo).unwrap().outcome,
        SubmitOutcome::Correct { attempts: 2 }
    );
    service.advance(&mut session).unwrap();

    let pongo = session.conversation().correct_choice().unwrap().id();
    service.submit(&mut session, pongo).unwrap();
    let Advance::Finished(summary) = service.advance(&mut session).unwrap() else {
        panic!("level should be finished");
    };
    assert_eq!(summary.accuracy(), Some(0.5));
    assert_eq!(summary.answers()[0].wrong_choices.len(), 1);
    assert!(!summary.answers()[0].first_try());
}
