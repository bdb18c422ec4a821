//! Focus session records and the history store.
//!
//! The store keeps the full list in memory and mirrors it to
//! [`SESSIONS_KEY`](crate::storage::SESSIONS_KEY) after every mutation.
//! Calendar-day queries use the local time zone.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::storage::{KvStore, SESSIONS_KEY};

/// One timed work or break interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSession {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Planned length in seconds.
    pub duration: u64,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub is_completed: bool,
    #[serde(default)]
    pub distractions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_score: Option<u32>,
}

impl TimerSession {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        duration_secs: u64,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            category: category.into(),
            duration: duration_secs,
            start_time,
            end_time: None,
            is_completed: false,
            distractions: Vec::new(),
            focus_score: None,
        }
    }

    /// Calendar day of `start_time` in the local time zone.
    pub fn local_date(&self) -> NaiveDate {
        self.start_time.with_timezone(&Local).date_naive()
    }
}

/// Partial update for [`TimerSession`]; `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub duration: Option<u64>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_completed: Option<bool>,
    pub distractions: Option<Vec<String>>,
    pub focus_score: Option<u32>,
}

impl TimerSession {
    pub fn merge(&mut self, update: SessionUpdate) {
        if let Some(v) = update.name {
            self.name = v;
        }
        if let Some(v) = update.category {
            self.category = v;
        }
        if let Some(v) = update.duration {
            self.duration = v;
        }
        if let Some(v) = update.end_time {
            self.end_time = Some(v);
        }
        if let Some(v) = update.is_completed {
            self.is_completed = v;
        }
        if let Some(v) = update.distractions {
            self.distractions = v;
        }
        if let Some(v) = update.focus_score {
            self.focus_score = Some(v);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyStats {
    pub total_sessions: usize,
    pub completed_sessions: usize,
    /// Seconds across completed sessions.
    pub total_time: u64,
    /// Rounded mean over completed sessions; missing scores count as 0.
    pub average_focus_score: u32,
}

/// Sessions whose start falls on `date` (local time).
pub fn sessions_on(sessions: &[TimerSession], date: NaiveDate) -> Vec<&TimerSession> {
    sessions.iter().filter(|s| s.local_date() == date).collect()
}

/// Count, completion and focus figures for one calendar day.
pub fn daily_stats(sessions: &[TimerSession], date: NaiveDate) -> DailyStats {
    let day = sessions_on(sessions, date);
    let completed: Vec<&TimerSession> = day.iter().copied().filter(|s| s.is_completed).collect();

    let total_time: u64 = completed.iter().map(|s| s.duration).sum();
    let average_focus_score = if completed.is_empty() {
        0
    } else {
        let sum: u64 = completed
            .iter()
            .map(|s| u64::from(s.focus_score.unwrap_or(0)))
            .sum();
        (sum as f64 / completed.len() as f64).round() as u32
    };

    DailyStats {
        total_sessions: day.len(),
        completed_sessions: completed.len(),
        total_time,
        average_focus_score,
    }
}

/// In-memory session list mirrored to storage.
pub struct SessionStore<S: KvStore> {
    store: S,
    sessions: Vec<TimerSession>,
}

impl<S: KvStore> SessionStore<S> {
    /// Create a store and load any persisted sessions.
    pub fn new(store: S) -> Self {
        let mut this = Self {
            store,
            sessions: Vec::new(),
        };
        this.load();
        this
    }

    /// Replace the in-memory list with what storage holds. Unreadable data
    /// leaves the list empty.
    pub fn load(&mut self) {
        self.sessions = match self.store.get(SESSIONS_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(list) => list,
                Err(e) => {
                    error!("Error loading sessions: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                error!("Error loading sessions: {e}");
                Vec::new()
            }
        };
        debug!(count = self.sessions.len(), "sessions loaded");
    }

    pub fn sessions(&self) -> &[TimerSession] {
        &self.sessions
    }

    pub fn get(&self, id: &str) -> Option<&TimerSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn add_session(&mut self, session: TimerSession) {
        debug!(id = %session.id, "session added");
        self.sessions.push(session);
        self.save();
    }

    /// Merge `update` into the session with `id`. Returns whether one matched.
    pub fn update_session(&mut self, id: &str, update: SessionUpdate) -> bool {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) else {
            warn!(id, "update for unknown session");
            return false;
        };
        session.merge(update);
        self.save();
        true
    }

    /// Mark a session finished at `end_time`.
    pub fn complete_session(
        &mut self,
        id: &str,
        end_time: DateTime<Utc>,
        focus_score: Option<u32>,
    ) -> bool {
        self.update_session(
            id,
            SessionUpdate {
                end_time: Some(end_time),
                is_completed: Some(true),
                focus_score,
                ..Default::default()
            },
        )
    }

    /// Insert `session`, or replace the stored copy carrying the same id.
    pub fn upsert(&mut self, session: TimerSession) {
        match self.sessions.iter().position(|s| s.id == session.id) {
            Some(i) => self.sessions[i] = session,
            None => self.sessions.push(session),
        }
        self.save();
    }

    /// Drop every session, in memory and in storage.
    pub fn clear(&mut self) {
        self.sessions.clear();
        if let Err(e) = self.store.remove(SESSIONS_KEY) {
            error!("Error clearing sessions: {e}");
        }
    }

    pub fn sessions_by_date(&self, date: NaiveDate) -> Vec<&TimerSession> {
        sessions_on(&self.sessions, date)
    }

    pub fn daily_stats(&self, date: NaiveDate) -> DailyStats {
        daily_stats(&self.sessions, date)
    }

    fn save(&self) {
        let result = serde_json::to_string(&self.sessions)
            .map_err(crate::error::CoreError::from)
            .and_then(|json| self.store.set(SESSIONS_KEY, &json));
        if let Err(e) = result {
            error!("Error saving sessions: {e}");
        }
    }
}
