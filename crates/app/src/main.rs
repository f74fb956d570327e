use std::fmt;

use dotenvy::dotenv;
use services::{AppServices, Clock};
use theory_core::model::{Category, UserId};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidUserId { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidUserId { raw } => write!(f, "invalid --user value: {raw}"),
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
    eprintln!("  cargo run -p app -- stats           [--store <url>] [--user <id>] [--guest]");
    eprintln!("  cargo run -p app -- frequently-wrong [--store <url>] [--user <id>]");
    eprintln!("  cargo run -p app -- reset --yes      [--store <url>] [--user <id>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --store http://localhost:9999");
    eprintln!("  --user 1");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  THEORY_STORE_URL, THEORY_USER_ID, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Stats,
    FrequentlyWrong,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "stats" => Some(Self::Stats),
            "frequently-wrong" => Some(Self::FrequentlyWrong),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

struct Args {
    store_url: String,
    user: UserId,
    guest: bool,
    confirmed: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut store_url = std::env::var("THEORY_STORE_URL")
            .unwrap_or_else(|_| "http://localhost:9999".to_string());
        let mut user = std::env::var("THEORY_USER_ID")
            .ok()
            .and_then(|value| value.parse::<i64>().ok())
            .map_or_else(|| UserId::new(1), UserId::new);
        let mut guest = false;
        let mut confirmed = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--store" => {
                    store_url = require_value(args, "--store")?;
                }
                "--user" => {
                    let value = require_value(args, "--user")?;
                    let parsed: i64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidUserId { raw: value.clone() })?;
                    user = UserId::new(parsed);
                }
                "--guest" => guest = true,
                "--yes" => confirmed = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            store_url,
            user,
            guest,
            confirmed,
        })
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Stats,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Stats,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let args = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Guest sessions run the same services over volatile storage.
    let services = if args.guest {
        AppServices::in_memory(Clock::default_clock())
    } else {
        tracing::info!(store = %args.store_url, "connecting to record store");
        AppServices::http(Clock::default_clock(), &args.store_url)?
    };

    match cmd {
        Command::Stats => print_stats(&services, args.user).await,
        Command::FrequentlyWrong => print_frequently_wrong(&services, args.user).await,
        Command::Reset => reset_progress(&services, args.user, args.confirmed).await,
    }
}

async fn print_stats(
    services: &AppServices,
    user: UserId,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = services.statistics().statistics(user).await?;

    println!("Statistics for user {user}");
    println!(
        "  progress: {}/{} answered ({:.0}% complete), accuracy {:.0}%",
        stats.overall.answered,
        stats.overall.total_questions,
        stats.overall.completion * 100.0,
        stats.overall.accuracy * 100.0,
    );

    println!("  categories:");
    for stat in &stats.categories {
        println!(
            "    {:<13} {:>3}/{:<3} answered, {:>3} correct ({:.0}% complete, {:.0}% accurate)",
            stat.category.as_str(),
            stat.answered,
            stat.total,
            stat.correct,
            stat.completion_percent(),
            stat.accuracy_percent(),
        );
    }

    let trend = match stats.exams.recent_trend {
        theory_core::stats::Trend::Up => "up",
        theory_core::stats::Trend::Down => "down",
        theory_core::stats::Trend::Stable => "stable",
    };
    println!(
        "  exams: {} taken, average {:.1}%, best {:.1}%, pass rate {:.0}%, trend {trend}",
        stats.exams.total_exams,
        stats.exams.average_score,
        stats.exams.best_score,
        stats.exams.pass_rate_percent(),
    );

    println!(
        "  streak: {} day(s) (longest {}), {} study day(s) total",
        stats.streaks.current_streak, stats.streaks.longest_streak, stats.streaks.total_study_days,
    );

    let strongest = stats
        .improvement
        .strongest_category
        .map_or("-", Category::as_str);
    let weakest = stats
        .improvement
        .weakest_category
        .map_or("-", Category::as_str);
    println!(
        "  pace: {} improved, {} this week (velocity {}/day), strongest {strongest}, weakest {weakest}",
        stats.improvement.questions_improved,
        stats.improvement.weekly_progress,
        stats.improvement.learning_velocity,
    );

    Ok(())
}

async fn print_frequently_wrong(
    services: &AppServices,
    user: UserId,
) -> Result<(), Box<dyn std::error::Error>> {
    let questions = services
        .statistics()
        .frequently_wrong_questions(user)
        .await?;

    if questions.is_empty() {
        println!("No frequently wrong questions for user {user}.");
        return Ok(());
    }

    println!("Frequently wrong questions for user {user}:");
    for question in questions {
        println!("  [{}] {}", question.id, question.text);
    }
    Ok(())
}

async fn reset_progress(
    services: &AppServices,
    user: UserId,
    confirmed: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !confirmed {
        eprintln!("reset deletes ALL practice progress for user {user} and cannot be undone.");
        eprintln!("re-run with --yes to confirm.");
        return Ok(());
    }

    let deleted = services.practice().reset_progress(user).await?;
    println!("Deleted {deleted} progress record(s) for user {user}.");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
