use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "barakah", version, about = "Barakah Focus CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, sign out and profile updates
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Session history
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Streaks, points and achievements
    Progress {
        #[command(subcommand)]
        action: commands::progress::ProgressAction,
    },
    /// Duas, categories and backgrounds
    Content {
        #[command(subcommand)]
        action: commands::content::ContentAction,
    },
    /// Personal dua collection
    Duas {
        #[command(subcommand)]
        action: commands::duas::DuasAction,
    },
    /// Immersive mode flag
    Immersive {
        #[command(subcommand)]
        action: commands::immersive::ImmersiveAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::History { action } => commands::history::run(action),
        Commands::Progress { action } => commands::progress::run(action),
        Commands::Content { action } => commands::content::run(action),
        Commands::Duas { action } => commands::duas::run(action),
        Commands::Immersive { action } => commands::immersive::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
