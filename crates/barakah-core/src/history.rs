//! History aggregation over the session list.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::session::TimerSession;

/// Focus score lost per logged distraction.
pub const DISTRACTION_PENALTY: u32 = 5;

/// Sessions sharing one local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayGroup {
    pub date: NaiveDate,
    /// Newest first.
    pub sessions: Vec<TimerSession>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OverallStats {
    /// Completed sessions only.
    pub total_sessions: usize,
    /// Seconds across completed sessions.
    pub total_time: u64,
    /// Days with at least one session, completed or not.
    pub total_days: usize,
    /// Rounded to one decimal.
    pub average_sessions_per_day: f64,
    /// Seconds, rounded.
    pub average_time_per_day: u64,
}

/// Group sessions by local start day: newest day first, and newest session
/// first within a day.
pub fn group_by_day(sessions: &[TimerSession]) -> Vec<DayGroup> {
    let mut days: BTreeMap<NaiveDate, Vec<TimerSession>> = BTreeMap::new();
    for session in sessions {
        days.entry(session.local_date())
            .or_default()
            .push(session.clone());
    }

    days.into_iter()
        .rev()
        .map(|(date, mut sessions)| {
            sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
            DayGroup { date, sessions }
        })
        .collect()
}

pub fn overall_stats(sessions: &[TimerSession]) -> OverallStats {
    let completed: Vec<&TimerSession> = sessions.iter().filter(|s| s.is_completed).collect();
    let total_time: u64 = completed.iter().map(|s| s.duration).sum();
    let total_days = sessions
        .iter()
        .map(TimerSession::local_date)
        .collect::<std::collections::BTreeSet<_>>()
        .len();

    let (average_sessions_per_day, average_time_per_day) = if total_days == 0 {
        (0.0, 0)
    } else {
        let per_day = completed.len() as f64 / total_days as f64;
        (
            (per_day * 10.0).round() / 10.0,
            (total_time as f64 / total_days as f64).round() as u64,
        )
    };

    OverallStats {
        total_sessions: completed.len(),
        total_time,
        total_days,
        average_sessions_per_day,
        average_time_per_day,
    }
}

/// 100 minus a fixed penalty per logged distraction, floored at 0.
pub fn distraction_focus_score(session: &TimerSession) -> u32 {
    let count = u32::try_from(session.distractions.len()).unwrap_or(u32::MAX);
    100u32.saturating_sub(count.saturating_mul(DISTRACTION_PENALTY))
}

/// `MM:SS` countdown text.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// `2h 5m` or `45m`.
pub fn format_duration(minutes: u64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

/// `Today`, `Yesterday`, or a short date such as `Mon, Mar 10`.
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if today.pred_opt() == Some(date) {
        "Yesterday".to_string()
    } else {
        date.format("%a, %b %-d").to_string()
    }
}

/// Twelve-hour wall-clock time in the local zone, e.g. `9:05 AM`.
pub fn time_of_day<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    at.with_timezone(&Local).format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(2025, 3, day, hour, min, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn session(name: &str, start: DateTime<Utc>, done: bool) -> TimerSession {
        let mut s = TimerSession::new(name, "work", 1500, start);
        s.is_completed = done;
        s
    }

    #[test]
    fn groups_are_sorted_newest_first() {
        let sessions = vec![
            session("a", at(9, 8, 0), true),
            session("b", at(10, 8, 0), true),
            session("c", at(9, 17, 0), false),
            session("d", at(10, 12, 30), true),
        ];
        let groups = group_by_day(&sessions);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        let first: Vec<&str> = groups[0].sessions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(first, vec!["d", "b"]);
        let second: Vec<&str> = groups[1].sessions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(second, vec!["c", "a"]);
    }

    #[test]
    fn grouping_ignores_input_order() {
        let mut sessions = vec![
            session("a", at(9, 8, 0), true),
            session("b", at(9, 22, 0), true),
            session("c", at(12, 1, 0), true),
        ];
        let forward = group_by_day(&sessions);
        sessions.reverse();
        assert_eq!(forward, group_by_day(&sessions));
    }

    #[test]
    fn overall_stats_counts_days_with_any_session() {
        let sessions = vec![
            session("a", at(9, 8, 0), true),
            session("b", at(9, 9, 0), true),
            session("c", at(10, 8, 0), false),
            session("d", at(11, 8, 0), true),
        ];
        let stats = overall_stats(&sessions);
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.total_time, 4500);
        assert_eq!(stats.total_days, 3);
        assert_eq!(stats.average_sessions_per_day, 1.0);
        assert_eq!(stats.average_time_per_day, 1500);
    }

    #[test]
    fn overall_stats_empty() {
        assert_eq!(overall_stats(&[]), OverallStats::default());
    }

    #[test]
    fn average_per_day_has_one_decimal() {
        let sessions = vec![
            session("a", at(9, 8, 0), true),
            session("b", at(9, 9, 0), true),
            session("c", at(10, 8, 0), true),
            session("d", at(10, 9, 0), true),
            session("e", at(11, 9, 0), true),
            session("f", at(11, 10, 0), false),
        ];
        // 5 completed over 3 days
        assert_eq!(overall_stats(&sessions).average_sessions_per_day, 1.7);
    }

    #[test]
    fn focus_score_penalises_distractions() {
        let mut s = session("a", at(9, 8, 0), true);
        assert_eq!(distraction_focus_score(&s), 100);
        s.distractions = vec!["phone".into(), "door".into(), "email".into()];
        assert_eq!(distraction_focus_score(&s), 85);
        s.distractions = vec!["x".into(); 30];
        assert_eq!(distraction_focus_score(&s), 0);
    }

    #[test]
    fn formats() {
        assert_eq!(format_clock(25 * 60), "25:00");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_duration(45), "45m");
        assert_eq!(format_duration(125), "2h 5m");
    }

    #[test]
    fn day_labels() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        assert_eq!(day_label(today, today), "Today");
        assert_eq!(day_label(today.pred_opt().unwrap(), today), "Yesterday");
        assert_eq!(
            day_label(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(), today),
            "Mon, Mar 10"
        );
    }

    #[test]
    fn time_of_day_is_twelve_hour() {
        let t = Local.with_ymd_and_hms(2025, 3, 10, 14, 5, 0).single().unwrap();
        assert_eq!(time_of_day(&t), "2:05 PM");
    }
}
