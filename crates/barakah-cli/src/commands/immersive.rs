use barakah_core::{ImmersiveMode, SqliteStore};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ImmersiveAction {
    On,
    Off,
    Toggle,
    /// Print `true` or `false`
    Status,
}

pub fn run(action: ImmersiveAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;
    let mode = ImmersiveMode::new(&store);

    match action {
        ImmersiveAction::On => mode.set(true),
        ImmersiveAction::Off => mode.set(false),
        ImmersiveAction::Toggle => {
            mode.toggle();
        }
        ImmersiveAction::Status => {}
    }
    println!("{}", mode.get());
    Ok(())
}
