use barakah_core::progress;
use barakah_core::{SessionStore, SqliteStore};
use clap::Subcommand;
use serde_json::json;

use super::date_or_today;

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Streak and points
    Summary,
    /// The seven days ending on a date (YYYY-MM-DD, default today)
    Week { date: Option<String> },
    /// Achievement progress
    Achievements,
    /// Life-view dashboard across categories
    Life,
}

pub fn run(action: ProgressAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;
    let sessions = SessionStore::new(&store);
    let list = sessions.sessions();
    let today = date_or_today(None)?;

    let value = match action {
        ProgressAction::Summary => json!({
            "streak": progress::current_streak(list, today),
            "points": progress::points(list),
        }),
        ProgressAction::Week { date } => {
            let end = date_or_today(date.as_deref())?;
            serde_json::to_value(progress::weekly_breakdown(list, end))?
        }
        ProgressAction::Achievements => serde_json::to_value(progress::achievements(list, today))?,
        ProgressAction::Life => serde_json::to_value(progress::life_view(list, today))?,
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
