use barakah_core::{DuaBook, SqliteStore};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum DuasAction {
    /// List saved duas as JSON
    List,
    /// Save a new dua
    Add {
        text: String,
        #[arg(long, default_value = "General")]
        category: String,
    },
    /// Replace the text and category of a dua
    Update {
        id: String,
        text: String,
        #[arg(long)]
        category: String,
    },
    /// Delete a dua
    Delete { id: String },
}

pub fn run(action: DuasAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;
    let mut book = DuaBook::new(&store);

    match action {
        DuasAction::List => {
            println!("{}", serde_json::to_string_pretty(book.duas())?);
        }
        DuasAction::Add { text, category } => {
            let dua = book.add(&text, &category)?;
            println!("{}", serde_json::to_string_pretty(dua)?);
        }
        DuasAction::Update { id, text, category } => {
            book.update(&id, &text, &category)?;
            println!("updated {id}");
        }
        DuasAction::Delete { id } => {
            book.delete(&id)?;
            println!("deleted {id}");
        }
    }
    Ok(())
}
