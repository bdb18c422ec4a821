pub mod auth;
pub mod config;
pub mod content;
pub mod duas;
pub mod history;
pub mod immersive;
pub mod progress;
pub mod timer;

use chrono::NaiveDate;

/// Parse an optional `YYYY-MM-DD` argument, defaulting to today.
pub fn date_or_today(date: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match date {
        Some(s) => Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| format!("invalid date '{s}': {e}"))?),
        None => Ok(chrono::Local::now().date_naive()),
    }
}
