mod play;
mod telemetry;

use std::fmt;

use conjugator_core::model::DataSourceId;
use services::{AppServices, Clock, ContentMode, LoadOutcome};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingAction,
    UnknownArg(String),
    InvalidLevel { raw: String },
    InvalidDbUrl { raw: String },
    InvalidDataSource { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingAction => write!(f, "sources requires list, add, remove or select"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLevel { raw } => write!(f, "invalid --level value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidDataSource { raw } => write!(f, "invalid data source id: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  conjugator play    [--db <sqlite_url>] [--level <n>] [--offline]");
    eprintln!("  conjugator courses [--db <sqlite_url>] [--offline]");
    eprintln!("  conjugator sources [--db <sqlite_url>] list");
    eprintln!("  conjugator sources [--db <sqlite_url>] add|remove|select <id>");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://conjugator.sqlite3");
    eprintln!("  --level 1");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  CONJUGATOR_DB_URL, CONJUGATOR_CONTENT_URL, CONJUGATOR_LOG, CONJUGATOR_LOG_FORMAT");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Courses,
    Sources,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "courses" => Some(Self::Courses),
            "sources" => Some(Self::Sources),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SourcesAction {
    List,
    Add(DataSourceId),
    Remove(DataSourceId),
    Select(DataSourceId),
}

#[derive(Debug)]
struct Args {
    db_url: String,
    level: usize,
    mode: ContentMode,
    action: Option<SourcesAction>,
}

impl Args {
    fn defaults() -> Self {
        let db_url = std::env::var("CONJUGATOR_DB_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| "sqlite://conjugator.sqlite3".into(), normalize_sqlite_url);
        Self {
            db_url,
            level: 1,
            mode: ContentMode::Remote,
            action: None,
        }
    }

    fn parse(cmd: Command, args: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::defaults();
        let mut args = args.into_iter();
        let mut positional = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = normalize_sqlite_url(value);
                }
                "--level" if cmd == Command::Play => {
                    let value = require_value(&mut args, "--level")?;
                    parsed.level = value
                        .parse::<usize>()
                        .ok()
                        .filter(|level| *level >= 1)
                        .ok_or(ArgsError::InvalidLevel { raw: value })?;
                }
                "--offline" if cmd != Command::Sources => parsed.mode = ContentMode::Offline,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if cmd == Command::Sources && !arg.starts_with("--") => positional.push(arg),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if cmd == Command::Sources {
            parsed.action = Some(parse_sources_action(positional)?);
        }
        Ok(parsed)
    }
}

fn parse_sources_action(positional: Vec<String>) -> Result<SourcesAction, ArgsError> {
    let mut positional = positional.into_iter();
    let action = positional.next().ok_or(ArgsError::MissingAction)?;
    let mut id = || -> Result<DataSourceId, ArgsError> {
        let raw = positional.next().ok_or(ArgsError::MissingValue {
            flag: "data source id",
        })?;
        raw.parse()
            .map_err(|_| ArgsError::InvalidDataSource { raw: raw.clone() })
    };
    let parsed = match action.as_str() {
        "list" => SourcesAction::List,
        "add" => SourcesAction::Add(id()?),
        "remove" => SourcesAction::Remove(id()?),
        "select" => SourcesAction::Select(id()?),
        _ => return Err(ArgsError::UnknownArg(action)),
    };
    if let Some(extra) = positional.next() {
        return Err(ArgsError::UnknownArg(extra));
    }
    Ok(parsed)
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn load_catalog(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    if services.reload_catalog().await? == LoadOutcome::Discarded {
        tracing::warn!(target: "content", "course load was superseded");
    }
    Ok(())
}

async fn run_play(services: &AppServices, level: usize) -> Result<(), Box<dyn std::error::Error>> {
    load_catalog(services).await?;
    let Some(course) = services.catalog().selected_course() else {
        eprintln!("No courses available. Add a data source or use --offline.");
        return Ok(());
    };
    let Some(chosen) = course.level(level - 1) else {
        eprintln!(
            "{} has {} levels; --level {level} is out of range.",
            course.display_name(),
            course.levels().len()
        );
        return Ok(());
    };

    println!("{}: {}", course.display_name(), chosen.title());
    let quiz = services.quiz();
    let session = quiz.start_level(chosen)?;
    play::run_session(quiz, session).await
}

async fn run_courses(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    load_catalog(services).await?;
    let courses = services.catalog().courses();
    if courses.is_empty() {
        println!("No courses loaded.");
    }
    let selected = services.catalog().selected_course();
    for course in &courses {
        let marker = if selected.as_ref().map(|c| c.data_source()) == Some(course.data_source()) {
            "*"
        } else {
            " "
        };
        print!("{marker} ");
        play::print_course(course);
    }
    Ok(())
}

async fn run_sources(
    services: &AppServices,
    action: SourcesAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings_service = services.app_settings();
    let settings = match action {
        SourcesAction::List => settings_service.load().await?,
        SourcesAction::Add(id) => settings_service.add_data_source(id).await?,
        SourcesAction::Remove(id) => settings_service.remove_data_source(&id).await?,
        SourcesAction::Select(id) => services.select_data_source(&id).await?,
    };

    for source in settings.data_sources() {
        let marker = if settings.selected_data_source() == Some(source) {
            "*"
        } else {
            " "
        };
        println!("{marker} {source}");
    }
    if let Some(url) = settings.content_base_url() {
        println!("content: {url}");
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);

    let cmd = match argv.next().as_deref() {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    let parsed = Args::parse(cmd, argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    tracing::debug!(?cmd, ?parsed, "starting");

    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, Clock::default(), parsed.mode).await?;

    match cmd {
        Command::Play => run_play(&services, parsed.level).await,
        Command::Courses => run_courses(&services).await,
        Command::Sources => match parsed.action {
            Some(action) => run_sources(&services, action).await,
            None => Err(ArgsError::MissingAction.into()),
        },
    }
}

#[tokio::main]
async fn main() {
    telemetry::init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
