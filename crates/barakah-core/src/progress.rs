//! Progress, streaks and achievements derived from session history.
//!
//! Only completed focus sessions count here; break phases
//! ([`BREAK_CATEGORY`]) earn nothing.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::content;
use crate::history::distraction_focus_score;
use crate::session::TimerSession;
use crate::timer::BREAK_CATEGORY;

/// Points per completed session on top of one point per focused minute.
pub const SESSION_BONUS: u64 = 5;

fn is_counted(session: &TimerSession) -> bool {
    session.is_completed && session.category != BREAK_CATEGORY
}

fn counted(sessions: &[TimerSession]) -> impl Iterator<Item = &TimerSession> {
    sessions.iter().filter(|s| is_counted(s))
}

fn focus_minutes<'a>(sessions: impl Iterator<Item = &'a TimerSession>) -> u64 {
    sessions.map(|s| s.duration).sum::<u64>() / 60
}

/// Score recorded on the session, else the distraction-derived one.
fn score_of(session: &TimerSession) -> u32 {
    session
        .focus_score
        .unwrap_or_else(|| distraction_focus_score(session))
}

pub fn points(sessions: &[TimerSession]) -> u64 {
    counted(sessions)
        .map(|s| s.duration / 60 + SESSION_BONUS)
        .sum()
}

/// Consecutive days with a completed focus session, ending today. A
/// streak whose last day is yesterday is still alive.
pub fn current_streak(sessions: &[TimerSession], today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = counted(sessions).map(TimerSession::local_date).collect();

    let mut cursor = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayStats {
    pub date: NaiveDate,
    /// Short weekday name, e.g. `Mon`.
    pub day: String,
    pub sessions: usize,
    pub focus_minutes: u64,
    pub points: u64,
}

/// The seven days ending on `week_end`, oldest first.
pub fn weekly_breakdown(sessions: &[TimerSession], week_end: NaiveDate) -> Vec<WeekdayStats> {
    (0..7)
        .rev()
        .map(|offset| {
            let date = week_end - Duration::days(offset);
            let day: Vec<TimerSession> = counted(sessions)
                .filter(|s| s.local_date() == date)
                .cloned()
                .collect();
            WeekdayStats {
                date,
                day: date.format("%a").to_string(),
                sessions: day.len(),
                focus_minutes: focus_minutes(day.iter()),
                points: points(&day),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub id: String,
    pub name: String,
    pub sessions: usize,
    pub focus_minutes: u64,
    /// Rounded mean focus score.
    pub focus_score: u32,
}

/// Per-category totals, busiest category first. Unknown category ids are
/// reported under `custom`.
pub fn category_breakdown(sessions: &[TimerSession]) -> Vec<CategoryStats> {
    let mut buckets: BTreeMap<&'static str, Vec<&TimerSession>> = BTreeMap::new();
    for session in counted(sessions) {
        buckets
            .entry(content::category(&session.category).id)
            .or_default()
            .push(session);
    }

    let mut stats: Vec<CategoryStats> = buckets
        .into_iter()
        .map(|(id, list)| {
            let score_sum: u64 = list.iter().map(|s| u64::from(score_of(s))).sum();
            CategoryStats {
                id: id.to_string(),
                name: content::category(id).name.to_string(),
                sessions: list.len(),
                focus_minutes: focus_minutes(list.iter().copied()),
                focus_score: (score_sum as f64 / list.len() as f64).round() as u32,
            }
        })
        .collect();
    stats.sort_by(|a, b| b.focus_minutes.cmp(&a.focus_minutes).then(a.id.cmp(&b.id)));
    stats
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub progress: u64,
    pub max_progress: u64,
    pub unlocked: bool,
}

impl Achievement {
    fn new(id: &str, title: &str, description: &str, progress: u64, max_progress: u64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            progress: progress.min(max_progress),
            max_progress,
            unlocked: progress >= max_progress,
        }
    }
}

pub fn achievements(sessions: &[TimerSession], today: NaiveDate) -> Vec<Achievement> {
    let completed = counted(sessions).count() as u64;
    let hours = focus_minutes(counted(sessions)) / 60;
    let streak = u64::from(current_streak(sessions, today));

    vec![
        Achievement::new(
            "first-steps",
            "First Steps",
            "Complete your first focus session",
            completed,
            1,
        ),
        Achievement::new(
            "week-warrior",
            "Week Warrior",
            "Maintain a 7-day streak",
            streak,
            7,
        ),
        Achievement::new(
            "focus-master",
            "Focus Master",
            "Complete 100 focus sessions",
            completed,
            100,
        ),
        Achievement::new(
            "deep-diver",
            "Deep Diver",
            "Spend 50 hours in focus",
            hours,
            50,
        ),
    ]
}

/// Dashboard summary across life categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeView {
    /// Mean of the per-category focus scores.
    pub overall_score: u32,
    pub streak_days: u32,
    /// One decimal.
    pub focus_hours: f64,
    pub total_sessions: usize,
    pub completed_sessions: usize,
    pub points: u64,
    pub categories: Vec<CategoryStats>,
}

pub fn life_view(sessions: &[TimerSession], today: NaiveDate) -> LifeView {
    let categories = category_breakdown(sessions);
    let overall_score = if categories.is_empty() {
        0
    } else {
        let sum: u64 = categories.iter().map(|c| u64::from(c.focus_score)).sum();
        (sum as f64 / categories.len() as f64).round() as u32
    };
    let seconds: u64 = counted(sessions).map(|s| s.duration).sum();

    LifeView {
        overall_score,
        streak_days: current_streak(sessions, today),
        focus_hours: (seconds as f64 / 360.0).round() / 10.0,
        total_sessions: sessions.iter().filter(|s| s.category != BREAK_CATEGORY).count(),
        completed_sessions: counted(sessions).count(),
        points: points(sessions),
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone, Utc};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn done(d: u32, category: &str, minutes: u64, distractions: usize) -> TimerSession {
        let start = Local
            .with_ymd_and_hms(2025, 3, d, 10, 0, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc);
        let mut s = TimerSession::new("s", category, minutes * 60, start);
        s.is_completed = true;
        s.distractions = vec!["x".to_string(); distractions];
        s
    }

    #[test]
    fn points_skip_breaks_and_incomplete() {
        let mut pending = done(10, "work", 25, 0);
        pending.is_completed = false;
        let sessions = vec![done(10, "work", 25, 0), done(10, BREAK_CATEGORY, 5, 0), pending];
        assert_eq!(points(&sessions), 25 + SESSION_BONUS);
    }

    #[test]
    fn streak_counts_back_from_today() {
        let sessions = vec![
            done(8, "work", 25, 0),
            done(9, "work", 25, 0),
            done(10, "study", 25, 0),
        ];
        assert_eq!(current_streak(&sessions, day(10)), 3);
        // Yesterday still counts as alive.
        assert_eq!(current_streak(&sessions, day(11)), 3);
        assert_eq!(current_streak(&sessions, day(12)), 0);
    }

    #[test]
    fn streak_breaks_on_gap() {
        let sessions = vec![
            done(6, "work", 25, 0),
            done(8, "work", 25, 0),
            done(9, "work", 25, 0),
        ];
        assert_eq!(current_streak(&sessions, day(9)), 2);
    }

    #[test]
    fn break_only_days_do_not_extend_streak() {
        let sessions = vec![done(9, BREAK_CATEGORY, 5, 0), done(10, "work", 25, 0)];
        assert_eq!(current_streak(&sessions, day(10)), 1);
    }

    #[test]
    fn weekly_breakdown_covers_seven_days() {
        let sessions = vec![
            done(10, "work", 25, 0),
            done(10, "work", 50, 0),
            done(4, "work", 25, 0),
        ];
        let week = weekly_breakdown(&sessions, day(10));
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, day(4));
        assert_eq!(week[0].sessions, 1);
        assert_eq!(week[6].day, "Mon");
        assert_eq!(week[6].sessions, 2);
        assert_eq!(week[6].focus_minutes, 75);
        assert_eq!(week[6].points, 75 + 2 * SESSION_BONUS);
        assert_eq!(week[3].sessions, 0);
    }

    #[test]
    fn category_breakdown_sorts_by_minutes() {
        let sessions = vec![
            done(10, "study", 25, 0),
            done(10, "work", 50, 2),
            done(10, "work", 25, 0),
            done(10, "knitting", 10, 0),
        ];
        let stats = category_breakdown(&sessions);
        assert_eq!(stats[0].id, "work");
        assert_eq!(stats[0].sessions, 2);
        assert_eq!(stats[0].focus_minutes, 75);
        assert_eq!(stats[0].focus_score, 95);
        assert_eq!(stats[1].id, "study");
        assert_eq!(stats[2].id, "custom");
        assert_eq!(stats[2].name, "Custom");
    }

    #[test]
    fn recorded_focus_score_wins_over_distractions() {
        let mut s = done(10, "work", 25, 4);
        s.focus_score = Some(42);
        assert_eq!(category_breakdown(&[s])[0].focus_score, 42);
    }

    #[test]
    fn achievements_track_progress() {
        let sessions: Vec<TimerSession> = (4..=10).map(|d| done(d, "work", 60, 0)).collect();
        let list = achievements(&sessions, day(10));
        let by_id = |id: &str| list.iter().find(|a| a.id == id).unwrap().clone();

        assert!(by_id("first-steps").unlocked);
        assert_eq!(by_id("first-steps").progress, 1);
        assert!(by_id("week-warrior").unlocked);
        let master = by_id("focus-master");
        assert!(!master.unlocked);
        assert_eq!(master.progress, 7);
        assert_eq!(by_id("deep-diver").progress, 7);
    }

    #[test]
    fn life_view_summary() {
        let sessions = vec![
            done(10, "work", 90, 0),
            done(10, "study", 30, 2),
            done(10, BREAK_CATEGORY, 5, 0),
        ];
        let view = life_view(&sessions, day(10));
        assert_eq!(view.overall_score, 95);
        assert_eq!(view.streak_days, 1);
        assert_eq!(view.focus_hours, 2.0);
        assert_eq!(view.total_sessions, 2);
        assert_eq!(view.completed_sessions, 2);
        assert_eq!(view.categories.len(), 2);
    }

    #[test]
    fn life_view_empty() {
        let view = life_view(&[], day(10));
        assert_eq!(view.overall_score, 0);
        assert_eq!(view.focus_hours, 0.0);
        assert!(view.categories.is_empty());
    }
}
