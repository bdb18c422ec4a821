//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> (phase runs out) -> Idle
//! ```
//!
//! Every command has an `_at` variant taking the current time in epoch
//! milliseconds so tests and replays can drive the clock.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(Cadence::default());
//! engine.start(Some("Surah Al-Kahf"), "reading");
//! // In a loop:
//! engine.tick(); // Returns Some(Event::SessionCompleted) when the phase ends
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::schedule::{Cadence, Phase, MAX_PHASE_MIN, MIN_PHASE_MIN};
use crate::events::Event;
use crate::history::{distraction_focus_score, format_clock};
use crate::session::TimerSession;

/// Category recorded for break phases.
pub const BREAK_CATEGORY: &str = "break";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Core timer engine.
///
/// Operates on wall-clock deltas -- no internal thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    cadence: Cadence,
    state: TimerState,
    phase: Phase,
    /// Remaining time in milliseconds for the current phase.
    remaining_ms: u64,
    /// Work phases finished since the engine was created.
    #[serde(default)]
    completed_work: u32,
    /// Timestamp (ms since epoch) of the last start/resume/tick.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
    /// Session being timed; kept across pause/resume.
    #[serde(default)]
    current: Option<TimerSession>,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(Cadence::default())
    }
}

impl TimerEngine {
    /// Create an idle engine at the start of a work phase.
    pub fn new(cadence: Cadence) -> Self {
        let remaining_ms = cadence.duration_ms(Phase::Work);
        Self {
            cadence,
            state: TimerState::Idle,
            phase: Phase::Work,
            remaining_ms,
            completed_work: 0,
            last_tick_epoch_ms: None,
            current: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn cadence(&self) -> &Cadence {
        &self.cadence
    }

    pub fn completed_work(&self) -> u32 {
        self.completed_work
    }

    pub fn current_session(&self) -> Option<&TimerSession> {
        self.current.as_ref()
    }

    pub fn total_ms(&self) -> u64 {
        self.cadence.duration_ms(self.phase)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.total_ms();
        if total == 0 {
            return 0.0;
        }
        (1.0 - (self.remaining_ms as f64 / total as f64)).clamp(0.0, 1.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            phase: self.phase,
            remaining_ms: self.remaining_ms,
            total_ms: self.total_ms(),
            clock: format_clock(self.remaining_ms.div_ceil(1000)),
            completed_work: self.completed_work,
            session: self.current.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume the countdown.
    ///
    /// From `Idle` a new session record is created; `name` defaults to
    /// the phase label and breaks are filed under [`BREAK_CATEGORY`].
    pub fn start(&mut self, name: Option<&str>, category: &str) -> Option<Event> {
        self.start_at(name, category, now_ms())
    }

    pub fn start_at(&mut self, name: Option<&str>, category: &str, now: u64) -> Option<Event> {
        match self.state {
            TimerState::Running => None,
            TimerState::Paused => {
                self.state = TimerState::Running;
                self.last_tick_epoch_ms = Some(now);
                debug!(remaining_ms = self.remaining_ms, "timer resumed");
                Some(Event::TimerResumed {
                    remaining_ms: self.remaining_ms,
                    at: datetime(now),
                })
            }
            TimerState::Idle => {
                let name = name
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .unwrap_or(self.phase.label());
                let category = if self.phase.is_break() {
                    BREAK_CATEGORY
                } else {
                    category
                };
                let duration_secs = self.remaining_ms.div_ceil(1000);
                let session = TimerSession::new(name, category, duration_secs, datetime(now));

                self.state = TimerState::Running;
                self.last_tick_epoch_ms = Some(now);
                self.current = Some(session.clone());
                info!(session_id = %session.id, phase = ?self.phase, "timer started");
                Some(Event::TimerStarted {
                    phase: self.phase,
                    session,
                    duration_secs,
                    at: datetime(now),
                })
            }
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.pause_at(now_ms())
    }

    pub fn pause_at(&mut self, now: u64) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.flush_elapsed(now);
        self.state = TimerState::Paused;
        self.last_tick_epoch_ms = None;
        debug!(remaining_ms = self.remaining_ms, "timer paused");
        Some(Event::TimerPaused {
            remaining_ms: self.remaining_ms,
            at: datetime(now),
        })
    }

    /// Stop and rewind the current phase. The in-flight session is
    /// abandoned and stays incomplete in history.
    pub fn reset(&mut self) -> Option<Event> {
        self.state = TimerState::Idle;
        self.last_tick_epoch_ms = None;
        self.current = None;
        self.remaining_ms = self.total_ms();
        Some(Event::TimerReset {
            phase: self.phase,
            remaining_ms: self.remaining_ms,
            at: Utc::now(),
        })
    }

    /// Add (or, when negative, remove) minutes from the countdown. The
    /// result is clamped to 1..=60 minutes and becomes the phase length.
    pub fn adjust(&mut self, minutes: i64) -> Option<Event> {
        self.adjust_at(minutes, now_ms())
    }

    pub fn adjust_at(&mut self, minutes: i64, now: u64) -> Option<Event> {
        self.flush_elapsed(now);
        let current_min = self.remaining_ms as f64 / 60_000.0;
        let new_min = (current_min + minutes as f64)
            .clamp(f64::from(MIN_PHASE_MIN), f64::from(MAX_PHASE_MIN));
        self.remaining_ms = (new_min * 60_000.0).round() as u64;
        let duration_min = new_min.floor() as u32;
        self.cadence.set_duration_min(self.phase, duration_min);
        Some(Event::TimerAdjusted {
            phase: self.phase,
            duration_min: self.cadence.duration_min(self.phase),
            remaining_ms: self.remaining_ms,
            at: datetime(now),
        })
    }

    /// Attach a distraction note to the running session. Blank notes and
    /// notes without a session are ignored.
    pub fn log_distraction(&mut self, note: &str) -> Option<Event> {
        let note = note.trim();
        if note.is_empty() {
            return None;
        }
        let session = self.current.as_mut()?;
        session.distractions.push(note.to_string());
        Some(Event::DistractionLogged {
            session_id: session.id.clone(),
            note: note.to_string(),
            total: session.distractions.len(),
            at: Utc::now(),
        })
    }

    /// Call periodically. Returns `Some(Event::SessionCompleted)` when the
    /// phase finishes.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(now_ms())
    }

    pub fn tick_at(&mut self, now: u64) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        // When the countdown hit zero, which may be well before this tick.
        let deadline = self
            .last_tick_epoch_ms
            .map_or(now, |last| last.saturating_add(self.remaining_ms).min(now));
        self.flush_elapsed(now);
        if self.remaining_ms > 0 {
            return None;
        }
        Some(self.complete_phase(deadline))
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Finish the current phase at `ended` (epoch ms).
    fn complete_phase(&mut self, ended: u64) -> Event {
        let finished = self.phase;
        if finished == Phase::Work {
            self.completed_work = self.completed_work.saturating_add(1);
        }
        let next = self.cadence.next_phase(finished, self.completed_work);

        let mut session = self.current.take().unwrap_or_else(|| {
            let category = if finished.is_break() {
                BREAK_CATEGORY
            } else {
                "custom"
            };
            TimerSession::new(finished.label(), category, 0, datetime(ended))
        });
        session.end_time = Some(datetime(ended));
        session.is_completed = true;
        session.focus_score = Some(distraction_focus_score(&session));

        self.phase = next;
        self.state = TimerState::Idle;
        self.last_tick_epoch_ms = None;
        self.remaining_ms = self.total_ms();

        info!(session_id = %session.id, next_phase = ?next, "session completed");
        Event::SessionCompleted {
            session,
            next_phase: next,
            at: datetime(ended),
        }
    }

    fn flush_elapsed(&mut self, now: u64) {
        if let Some(last) = self.last_tick_epoch_ms {
            let elapsed = now.saturating_sub(last);
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
            self.last_tick_epoch_ms = Some(now);
        }
    }
}

fn datetime(epoch_ms: u64) -> DateTime<Utc> {
    i64::try_from(epoch_ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_else(Utc::now)
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
