use barakah_core::storage::TIMER_ENGINE_KEY;
use barakah_core::{
    Cadence, Config, Event, ImmersiveMode, KvStore, SessionStore, SqliteStore, TimerEngine,
};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a focus session, or resume a paused one
    Start {
        /// Session name (defaults to the phase label)
        #[arg(long)]
        name: Option<String>,
        /// Session category
        #[arg(long, default_value = "work")]
        category: String,
    },
    /// Pause the countdown
    Pause,
    /// Stop and rewind the current phase
    Reset,
    /// Add or remove minutes (clamped to 1..=60)
    Adjust {
        #[arg(allow_hyphen_values = true)]
        minutes: i64,
    },
    /// Note a distraction on the running session
    Distraction { note: String },
    /// Print current timer state as JSON
    Status,
}

fn load_engine(store: &SqliteStore, config: &Config) -> TimerEngine {
    if let Ok(Some(json)) = store.get(TIMER_ENGINE_KEY) {
        match serde_json::from_str::<TimerEngine>(&json) {
            Ok(engine) => return engine,
            Err(e) => tracing::warn!("discarding stored timer state: {e}"),
        }
    }
    TimerEngine::new(Cadence::from_config(&config.timer))
}

fn save_engine(
    store: &SqliteStore,
    engine: &TimerEngine,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(engine)?;
    store.set(TIMER_ENGINE_KEY, &json)?;
    Ok(())
}

fn emit(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;
    let config = Config::load_or_default();
    let mut engine = load_engine(&store, &config);
    let mut sessions = SessionStore::new(&store);
    let immersive = ImmersiveMode::new(&store);

    // Settle a phase that ran out since the last invocation.
    if let Some(event) = engine.tick() {
        if let Event::SessionCompleted { session, .. } = &event {
            sessions.upsert(session.clone());
        }
        immersive.set(false);
        emit(&event)?;
    }

    match action {
        TimerAction::Start { name, category } => {
            match engine.start(name.as_deref(), &category) {
                Some(event) => {
                    if let Event::TimerStarted { session, .. } = &event {
                        sessions.add_session(session.clone());
                    }
                    immersive.set(!engine.phase().is_break());
                    emit(&event)?;
                }
                None => emit(&engine.snapshot())?,
            }
        }
        TimerAction::Pause => {
            match engine.pause() {
                Some(event) => emit(&event)?,
                None => emit(&engine.snapshot())?,
            }
            immersive.set(false);
        }
        TimerAction::Reset => {
            if let Some(event) = engine.reset() {
                emit(&event)?;
            }
            immersive.set(false);
        }
        TimerAction::Adjust { minutes } => {
            if let Some(event) = engine.adjust(minutes) {
                emit(&event)?;
            }
        }
        TimerAction::Distraction { note } => match engine.log_distraction(&note) {
            Some(event) => {
                if let Some(session) = engine.current_session() {
                    sessions.upsert(session.clone());
                }
                emit(&event)?;
            }
            None => return Err("no running session, or empty note".into()),
        },
        TimerAction::Status => emit(&engine.snapshot())?,
    }

    save_engine(&store, &engine)?;
    Ok(())
}
