use barakah_core::history::{self, day_label, format_clock, format_duration, time_of_day};
use barakah_core::{SessionStore, SqliteStore};
use chrono::Local;
use clap::Subcommand;

use super::date_or_today;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Sessions grouped by day, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Statistics for one day (YYYY-MM-DD, default today)
    Day { date: Option<String> },
    /// Totals across all recorded days
    Stats,
    /// Delete every recorded session
    Clear,
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;
    let mut sessions = SessionStore::new(&store);

    match action {
        HistoryAction::List { json } => {
            let groups = history::group_by_day(sessions.sessions());
            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
                return Ok(());
            }
            if groups.is_empty() {
                println!("No sessions yet");
                return Ok(());
            }
            let today = Local::now().date_naive();
            for group in groups {
                println!("{}", day_label(group.date, today));
                for s in group.sessions {
                    let status = if s.is_completed { "done" } else { "open" };
                    println!(
                        "  {:>8}  {}  {} [{}] {}",
                        time_of_day(&s.start_time),
                        format_clock(s.duration),
                        s.name,
                        s.category,
                        status,
                    );
                }
            }
        }
        HistoryAction::Day { date } => {
            let date = date_or_today(date.as_deref())?;
            let stats = sessions.daily_stats(date);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        HistoryAction::Stats => {
            let stats = history::overall_stats(sessions.sessions());
            let mut value = serde_json::to_value(&stats)?;
            value["total_focus"] = format_duration(stats.total_time / 60).into();
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        HistoryAction::Clear => {
            sessions.clear();
            println!("history cleared");
        }
    }
    Ok(())
}
