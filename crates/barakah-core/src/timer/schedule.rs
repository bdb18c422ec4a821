use serde::{Deserialize, Serialize};

use crate::storage::TimerConfig;

/// Shortest and longest phase the timer can be adjusted to, in minutes.
pub const MIN_PHASE_MIN: u32 = 1;
pub const MAX_PHASE_MIN: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_break(self) -> bool {
        !matches!(self, Phase::Work)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Focus Session",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

/// Work and break lengths plus how often the long break comes round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cadence {
    pub work_min: u32,
    pub short_break_min: u32,
    pub long_break_min: u32,
    /// A long break follows every n-th completed work phase.
    pub long_break_interval: u32,
}

impl Default for Cadence {
    fn default() -> Self {
        Self::from_config(&TimerConfig::default())
    }
}

impl Cadence {
    pub fn from_config(cfg: &TimerConfig) -> Self {
        Self {
            work_min: cfg.work_duration.clamp(MIN_PHASE_MIN, MAX_PHASE_MIN),
            short_break_min: cfg.short_break.clamp(MIN_PHASE_MIN, MAX_PHASE_MIN),
            long_break_min: cfg.long_break.clamp(MIN_PHASE_MIN, MAX_PHASE_MIN),
            long_break_interval: cfg.long_break_interval.max(1),
        }
    }

    pub fn duration_min(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_min,
            Phase::ShortBreak => self.short_break_min,
            Phase::LongBreak => self.long_break_min,
        }
    }

    pub fn duration_ms(&self, phase: Phase) -> u64 {
        u64::from(self.duration_min(phase)).saturating_mul(60_000)
    }

    pub fn set_duration_min(&mut self, phase: Phase, minutes: u32) {
        let minutes = minutes.clamp(MIN_PHASE_MIN, MAX_PHASE_MIN);
        match phase {
            Phase::Work => self.work_min = minutes,
            Phase::ShortBreak => self.short_break_min = minutes,
            Phase::LongBreak => self.long_break_min = minutes,
        }
    }

    /// Phase following `finished`, given the number of work phases
    /// completed so far (including `finished` when it was work).
    pub fn next_phase(&self, finished: Phase, completed_work: u32) -> Phase {
        // Stored cadences skip `from_config`, so the interval may be 0.
        let interval = self.long_break_interval.max(1);
        match finished {
            Phase::Work if completed_work > 0 && completed_work % interval == 0 => Phase::LongBreak,
            Phase::Work => Phase::ShortBreak,
            Phase::ShortBreak | Phase::LongBreak => Phase::Work,
        }
    }
}
