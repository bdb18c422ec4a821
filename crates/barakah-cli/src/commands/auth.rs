use barakah_core::content::ensure_reciter;
use barakah_core::{AuthProvider, Config, PreferencesUpdate, SqliteStore, Theme, UserUpdate};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in with email and password
    Login {
        email: String,
        password: String,
    },
    /// Create an account
    Register {
        email: String,
        password: String,
        /// Display name
        name: String,
    },
    /// Sign out and clear session history
    Logout,
    /// Show the signed-in user as JSON
    Status,
    /// Update profile fields and preferences
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, conflicts_with = "clear_avatar")]
        avatar: Option<String>,
        #[arg(long)]
        clear_avatar: bool,
        /// Default focus length in minutes
        #[arg(long)]
        work: Option<u32>,
        /// Default break length in minutes
        #[arg(long = "break")]
        break_min: Option<u32>,
        #[arg(long)]
        reciter: Option<String>,
        #[arg(long)]
        theme: Option<Theme>,
    },
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;
    let config = Config::load_or_default();
    let mut auth = AuthProvider::with_config(&store, &config.auth);

    match action {
        AuthAction::Login { email, password } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            if !runtime.block_on(auth.login(&email, &password)) {
                return Err("invalid email or password".into());
            }
            print_user(&auth)?;
        }
        AuthAction::Register {
            email,
            password,
            name,
        } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            if !runtime.block_on(auth.register(&email, &password, &name)) {
                return Err(
                    "registration failed: email, name and a 6+ character password are required"
                        .into(),
                );
            }
            print_user(&auth)?;
        }
        AuthAction::Logout => {
            auth.logout();
            println!("signed out");
        }
        AuthAction::Status => match auth.user() {
            Some(_) => print_user(&auth)?,
            None => println!("not signed in"),
        },
        AuthAction::Update {
            name,
            email,
            avatar,
            clear_avatar,
            work,
            break_min,
            reciter,
            theme,
        } => {
            if !auth.is_authenticated() {
                return Err("not signed in".into());
            }
            if let Some(reciter) = &reciter {
                ensure_reciter(reciter)?;
            }
            let avatar = if clear_avatar { Some(None) } else { avatar.map(Some) };
            let preferences = if work.is_some()
                || break_min.is_some()
                || reciter.is_some()
                || theme.is_some()
            {
                Some(PreferencesUpdate {
                    default_work_duration: work,
                    default_break_duration: break_min,
                    preferred_reciter: reciter,
                    theme,
                })
            } else {
                None
            };
            auth.update_user(UserUpdate {
                email,
                name,
                avatar,
                preferences,
            });
            print_user(&auth)?;
        }
    }
    Ok(())
}

fn print_user(auth: &AuthProvider<&SqliteStore>) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&auth.user())?);
    Ok(())
}
