use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use conjugator_core::model::{Course, GameSummary, LevelOutcome, MessageContent, SubmitOutcome};
use services::{Advance, QuizService, QuizSession};

type Input = Lines<BufReader<Stdin>>;

/// Print the course header and its levels, numbered from 1.
pub fn print_course(course: &Course) {
    println!("{} [{}]", course.display_name(), course.data_source());
    if let Some(title) = course.announcement_title() {
        println!("  ** {title} **");
    }
    if let Some(text) = course.announcement() {
        println!("  {text}");
    }
    for (index, level) in course.levels().iter().enumerate() {
        println!(
            "  {}. {} ({} verbs) {}",
            index + 1,
            level.title(),
            level.challenges().len(),
            level.description()
        );
    }
}

fn print_prompt(session: &QuizSession<'_>) {
    let progress = session.progress();
    let conversation = session.conversation();
    println!();
    let lives = progress
        .lives_remaining
        .map_or_else(|| "unlimited".to_string(), |n| n.to_string());
    println!(
        "[{}/{}] lives: {lives}",
        progress.answered + 1,
        progress.total
    );
    for message in conversation.messages() {
        if let MessageContent::Prompt {
            header,
            title,
            footer,
        } = message.content()
        {
            if let Some(header) = header {
                println!("  {header}");
            }
            println!("  {title}");
            if let Some(footer) = footer {
                println!("  {footer}");
            }
        }
    }
    for (index, choice) in conversation.choices().iter().enumerate() {
        let mark = if conversation.is_struck(choice.id()) { " x" } else { "" };
        println!("   {}) {}{mark}", index + 1, choice.text());
    }
}

fn print_summary(summary: &GameSummary) {
    println!();
    match summary.outcome() {
        LevelOutcome::Completed { accuracy } => {
            println!("Level complete: {}", summary.level_title());
            println!("Accuracy: {:.0}%", accuracy * 100.0);
        }
        LevelOutcome::Failed {
            challenges_answered,
        } => {
            println!("Out of lives: {}", summary.level_title());
            println!("Answered {challenges_answered} before failing");
        }
    }
    for answer in summary.answers() {
        let wrong: Vec<&str> = answer.wrong_choices.iter().map(|c| c.text()).collect();
        if wrong.is_empty() {
            println!("  {} ({}): {}", answer.verb, answer.form, answer.text);
        } else {
            println!(
                "  {} ({}): {}  missed: {}",
                answer.verb,
                answer.form,
                answer.text,
                wrong.join(", ")
            );
        }
    }
}

async fn read_choice(input: &mut Input, count: usize) -> std::io::Result<Option<usize>> {
    loop {
        let Some(line) = input.next_line().await? else {
            return Ok(None);
        };
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => return Ok(Some(n - 1)),
            _ => println!("Pick a number between 1 and {count}."),
        }
    }
}

/// Play `session` on stdin/stdout until the level ends or input runs out.
///
/// # Errors
///
/// Returns an error if stdin fails or the session rejects a submission.
pub async fn run_session(
    quiz: QuizService,
    mut session: QuizSession<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    print_prompt(&session);

    loop {
        let count = session.conversation().choices().len();
        let Some(index) = read_choice(&mut input, count).await? else {
            println!();
            println!("Bye.");
            return Ok(());
        };
        let choice_id = session.conversation().choices()[index].id();
        let result = quiz.submit(&mut session, choice_id)?;

        match result.outcome {
            SubmitOutcome::AlreadyStruck => {
                println!("Already tried that one.");
                continue;
            }
            SubmitOutcome::Incorrect { .. } => {
                println!("No.");
                if result.level_failed {
                    if let Some(summary) = session.summary() {
                        print_summary(summary);
                    }
                    return Ok(());
                }
                print_prompt(&session);
                continue;
            }
            SubmitOutcome::Correct { attempts } => {
                let plural = if attempts == 1 { "try" } else { "tries" };
                println!("Yes! ({attempts} {plural})");
            }
        }

        match quiz.advance(&mut session)? {
            Advance::Next(_) => {}
            Advance::Finished(summary) => {
                print_summary(summary);
                return Ok(());
            }
        }
        print_prompt(&session);
    }
}
