mod engine;
mod schedule;

pub use engine::{TimerEngine, TimerState, BREAK_CATEGORY};
pub use schedule::{Cadence, Phase, MAX_PHASE_MIN, MIN_PHASE_MIN};
