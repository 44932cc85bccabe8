use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "journey", version, about = "Learning journey tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the browsed week, goal and freeze usage
    Show {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log a day (defaults to the selected day)
    Log {
        status: commands::log::StatusArg,
        /// Day to log, YYYY-MM-DD or "today"
        #[arg(long)]
        date: Option<String>,
    },
    /// Goal management
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Browse by week
    Week {
        #[command(subcommand)]
        action: commands::browse::WeekAction,
    },
    /// Jump to a month
    Month {
        year: i32,
        /// 1-12
        month: u32,
    },
    /// Select a day, YYYY-MM-DD or "today"
    Select { date: String },
    /// Month-by-month history
    History {
        /// Print sections as JSON
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("JOURNEY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Show { json } => commands::show::run(json),
        Commands::Log { status, date } => commands::log::run(status, date.as_deref()),
        Commands::Goal { action } => commands::goal::run(action),
        Commands::Week { action } => commands::browse::run_week(action),
        Commands::Month { year, month } => commands::browse::run_month(year, month),
        Commands::Select { date } => commands::browse::run_select(&date),
        Commands::History { json } => commands::history::run(json),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
