//! # Barakah Core Library
//!
//! This library provides the core business logic for Barakah Focus, a
//! Pomodoro-style focus timer with Islamic motivational content. All
//! operations are available through the standalone CLI; a graphical front
//! end would be a thin layer over the same types.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based state machine that requires the caller
//!   to periodically invoke `tick()` for progress updates
//! - **Storage**: A key-value seam ([`KvStore`]) backed by SQLite, plus
//!   TOML-based configuration
//! - **Providers**: [`AuthProvider`], [`SessionStore`], [`ImmersiveMode`]
//!   and [`DuaBook`] each own one storage key
//! - **Aggregation**: day grouping, daily/overall stats, streaks and
//!   achievements over the session list
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`SessionStore`]: Session history and daily statistics
//! - [`AuthProvider`]: Local sign-in and user preferences
//! - [`Config`]: Application configuration management

pub mod auth;
pub mod content;
pub mod error;
pub mod events;
pub mod history;
pub mod immersive;
pub mod progress;
pub mod session;
pub mod storage;
pub mod theme;
pub mod timer;

pub use auth::{AuthProvider, Preferences, PreferencesUpdate, User, UserUpdate};
pub use content::{CustomDua, DuaBook};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use history::{DayGroup, OverallStats};
pub use immersive::ImmersiveMode;
pub use session::{DailyStats, SessionStore, SessionUpdate, TimerSession};
pub use storage::{Config, KvStore, MemoryStore, SqliteStore};
pub use theme::Theme;
pub use timer::{Cadence, Phase, TimerEngine, TimerState};
