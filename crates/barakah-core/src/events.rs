use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::TimerSession;
use crate::timer::{Phase, TimerState};

/// Every timer state change produces an Event.
/// Front ends render them; the CLI prints them as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        session: TimerSession,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: Phase,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerAdjusted {
        phase: Phase,
        duration_min: u32,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    DistractionLogged {
        session_id: String,
        note: String,
        total: usize,
        at: DateTime<Utc>,
    },
    /// A phase ran out; the finished session is complete.
    SessionCompleted {
        session: TimerSession,
        next_phase: Phase,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        phase: Phase,
        remaining_ms: u64,
        total_ms: u64,
        clock: String,
        completed_work: u32,
        session: Option<TimerSession>,
        at: DateTime<Utc>,
    },
}
