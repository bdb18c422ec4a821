use barakah_core::content::{self, AUDIO_OPTIONS, BACKGROUNDS, CATEGORIES, RECITERS};
use barakah_core::SqliteStore;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ContentAction {
    /// Print a random dua
    Dua,
    /// List session categories
    Categories,
    /// List ambient audio options
    Audio,
    /// List Quran reciters
    Reciters,
    /// List timer backgrounds
    Backgrounds,
    /// Show the selected background, or select one
    Background { key: Option<String> },
}

pub fn run(action: ContentAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ContentAction::Dua => {
            println!("{}", content::random_dua(&mut rand::thread_rng()));
        }
        ContentAction::Categories => {
            println!("{}", serde_json::to_string_pretty(CATEGORIES)?);
        }
        ContentAction::Audio => {
            println!("{}", serde_json::to_string_pretty(AUDIO_OPTIONS)?);
        }
        ContentAction::Reciters => {
            println!("{}", serde_json::to_string_pretty(RECITERS)?);
        }
        ContentAction::Backgrounds => {
            println!("{}", serde_json::to_string_pretty(BACKGROUNDS)?);
        }
        ContentAction::Background { key } => {
            let store = SqliteStore::open()?;
            if let Some(key) = key {
                content::select_background(&store, &key)?;
            }
            println!("{}", content::selected_background(&store));
        }
    }
    Ok(())
}
