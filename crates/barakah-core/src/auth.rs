//! Local sign-in provider.
//!
//! There is no credential backend: `login` and `register` accept any
//! non-empty email with a password of at least [`MIN_PASSWORD_LEN`]
//! UTF-16 code units, synthesize a [`User`] and persist it under
//! [`USER_KEY`](crate::storage::USER_KEY). Invalid input yields `false`.
//! Storage failures are logged and swallowed; the in-memory state still
//! changes so the caller can keep going.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::storage::{AuthConfig, KvStore, SESSIONS_KEY, TIMER_ENGINE_KEY, USER_KEY};
use crate::theme::Theme;

/// Shortest password the sign-in flow accepts, in UTF-16 code units.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Minutes.
    pub default_work_duration: u32,
    /// Minutes.
    pub default_break_duration: u32,
    pub preferred_reciter: String,
    pub theme: Theme,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_work_duration: 25,
            default_break_duration: 5,
            preferred_reciter: "mishary".into(),
            theme: Theme::Light,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub preferences: Preferences,
}

/// Field-wise patch for [`Preferences`]; `None` leaves a field as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub default_work_duration: Option<u32>,
    pub default_break_duration: Option<u32>,
    pub preferred_reciter: Option<String>,
    pub theme: Option<Theme>,
}

/// Partial update for [`User`].
///
/// Top-level fields replace their counterparts; `preferences` is merged
/// field by field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    /// `Some(None)` clears the avatar.
    pub avatar: Option<Option<String>>,
    pub preferences: Option<PreferencesUpdate>,
}

impl Preferences {
    pub fn merge(&mut self, update: PreferencesUpdate) {
        if let Some(v) = update.default_work_duration {
            self.default_work_duration = v;
        }
        if let Some(v) = update.default_break_duration {
            self.default_break_duration = v;
        }
        if let Some(v) = update.preferred_reciter {
            self.preferred_reciter = v;
        }
        if let Some(v) = update.theme {
            self.theme = v;
        }
    }
}

impl User {
    fn new(email: &str, name: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            avatar: None,
            preferences: Preferences::default(),
        }
    }

    pub fn merge(&mut self, update: UserUpdate) {
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(avatar) = update.avatar {
            self.avatar = avatar;
        }
        if let Some(prefs) = update.preferences {
            self.preferences.merge(prefs);
        }
    }
}

/// Whether a credential pair passes the local sign-in gate. Password length
/// is measured in UTF-16 code units, so a character outside the Basic
/// Multilingual Plane counts twice.
pub fn credentials_valid(email: &str, password: &str) -> bool {
    !email.is_empty() && password.encode_utf16().count() >= MIN_PASSWORD_LEN
}

/// Display name derived from an email: everything before the first `@`.
pub fn name_from_email(email: &str) -> &str {
    email.split_once('@').map_or(email, |(local, _)| local)
}

/// Holds the signed-in user and mirrors it to storage.
pub struct AuthProvider<S: KvStore> {
    store: S,
    user: Option<User>,
    login_delay: Duration,
    register_delay: Duration,
}

impl<S: KvStore> AuthProvider<S> {
    /// Create a provider and restore any persisted user.
    pub fn new(store: S) -> Self {
        Self::with_config(store, &AuthConfig::default())
    }

    /// Create a provider with the delays from `config` and restore any
    /// persisted user.
    pub fn with_config(store: S, config: &AuthConfig) -> Self {
        let mut provider = Self {
            store,
            user: None,
            login_delay: config.login_delay(),
            register_delay: config.register_delay(),
        };
        provider.restore();
        provider
    }

    /// Override the artificial delays.
    pub fn with_delays(mut self, login: Duration, register: Duration) -> Self {
        self.login_delay = login;
        self.register_delay = register;
        self
    }

    /// Reload the user from storage. Unreadable data leaves the provider
    /// signed out.
    pub fn restore(&mut self) {
        self.user = match self.store.get(USER_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<User>(&json) {
                Ok(user) => Some(user),
                Err(e) => {
                    error!("Error checking auth state: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                error!("Error checking auth state: {e}");
                None
            }
        };
        debug!(authenticated = self.user.is_some(), "auth state restored");
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Sign in. The user's name is the email's local part.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        simulate_latency(self.login_delay).await;

        if !credentials_valid(email, password) {
            debug!("login rejected");
            return false;
        }

        let user = User::new(email, name_from_email(email));
        info!(user_id = %user.id, "logged in");
        self.persist(&user, "Login error");
        self.user = Some(user);
        true
    }

    /// Create an account. Also requires a non-empty `name`.
    pub async fn register(&mut self, email: &str, password: &str, name: &str) -> bool {
        simulate_latency(self.register_delay).await;

        if !credentials_valid(email, password) || name.is_empty() {
            debug!("registration rejected");
            return false;
        }

        let user = User::new(email, name);
        info!(user_id = %user.id, "registered");
        self.persist(&user, "Registration error");
        self.user = Some(user);
        true
    }

    /// Sign out, removing the user, the session history and any in-flight
    /// timer (which still holds a session) from storage.
    pub fn logout(&mut self) {
        for key in [USER_KEY, SESSIONS_KEY, TIMER_ENGINE_KEY] {
            if let Err(e) = self.store.remove(key) {
                error!("Logout error: {e}");
            }
        }
        self.user = None;
        info!("logged out");
    }

    /// Merge `update` into the signed-in user and persist. No-op when
    /// signed out.
    pub fn update_user(&mut self, update: UserUpdate) {
        let Some(mut user) = self.user.clone() else {
            debug!("update_user ignored: not signed in");
            return;
        };
        user.merge(update);
        self.persist(&user, "Update user error");
        self.user = Some(user);
    }

    fn persist(&self, user: &User, context: &str) {
        let result = serde_json::to_string(user)
            .map_err(crate::error::CoreError::from)
            .and_then(|json| self.store.set(USER_KEY, &json));
        if let Err(e) = result {
            error!("{context}: {e}");
        }
    }
}

async fn simulate_latency(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, Result, StorageError};
    use crate::storage::MemoryStore;

    fn provider(store: &MemoryStore) -> AuthProvider<&MemoryStore> {
        AuthProvider::new(store).with_delays(Duration::ZERO, Duration::ZERO)
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl KvStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(CoreError::Storage(StorageError::Locked))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(CoreError::Storage(StorageError::Locked))
        }
    }

    #[test]
    fn name_is_local_part() {
        assert_eq!(name_from_email("amina@example.com"), "amina");
        assert_eq!(name_from_email("no-at-sign"), "no-at-sign");
        assert_eq!(name_from_email("a@b@c"), "a");
    }

    #[test]
    fn credentials_gate() {
        assert!(credentials_valid("a@b.c", "123456"));
        assert!(!credentials_valid("a@b.c", "12345"));
        assert!(!credentials_valid("", "123456"));
    }

    #[test]
    fn password_length_counts_utf16_units() {
        // Three astral-plane characters are six UTF-16 units.
        assert!(credentials_valid("a@b.c", "\u{1F319}\u{1F54C}\u{1F4FF}"));
        assert!(!credentials_valid("a@b.c", "\u{1F319}\u{1F54C}"));
        // BMP characters count once each.
        assert!(!credentials_valid("a@b.c", "سلامٌ"));
    }

    #[tokio::test]
    async fn login_persists_user() {
        let store = MemoryStore::new();
        let mut auth = provider(&store);
        assert!(auth.login("yusuf@example.com", "secret1").await);
        let user = auth.user().unwrap();
        assert_eq!(user.name, "yusuf");
        assert_eq!(user.preferences, Preferences::default());

        let json = store.get(USER_KEY).unwrap().unwrap();
        let stored: User = serde_json::from_str(&json).unwrap();
        assert_eq!(&stored, user);
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let store = MemoryStore::new();
        let mut auth = provider(&store);
        assert!(!auth.login("yusuf@example.com", "12345").await);
        assert!(!auth.is_authenticated());
        assert!(store.get(USER_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn register_requires_name() {
        let store = MemoryStore::new();
        let mut auth = provider(&store);
        assert!(!auth.register("maryam@example.com", "secret1", "").await);
        assert!(auth.register("maryam@example.com", "secret1", "Maryam A.").await);
        assert_eq!(auth.user().unwrap().name, "Maryam A.");
    }

    #[tokio::test]
    async fn logout_clears_user_and_sessions() {
        let store = MemoryStore::new();
        store.set(SESSIONS_KEY, "[]").unwrap();
        store.set(TIMER_ENGINE_KEY, "{}").unwrap();
        let mut auth = provider(&store);
        assert!(auth.login("a@b.c", "secret1").await);
        auth.logout();
        assert!(!auth.is_authenticated());
        assert!(store.get(USER_KEY).unwrap().is_none());
        assert!(store.get(SESSIONS_KEY).unwrap().is_none());
        assert!(store.get(TIMER_ENGINE_KEY).unwrap().is_none());

        let reloaded = provider(&store);
        assert!(reloaded.user().is_none());
    }

    #[tokio::test]
    async fn update_merges_single_preference() {
        let store = MemoryStore::new();
        let mut auth = provider(&store);
        assert!(auth.login("a@b.c", "secret1").await);

        auth.update_user(UserUpdate {
            preferences: Some(PreferencesUpdate {
                theme: Some(Theme::Dark),
                ..Default::default()
            }),
            ..Default::default()
        });

        let prefs = &auth.user().unwrap().preferences;
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.default_work_duration, 25);
        assert_eq!(prefs.default_break_duration, 5);
        assert_eq!(prefs.preferred_reciter, "mishary");
        assert_eq!(auth.user().unwrap().name, "a");

        let reloaded = provider(&store);
        assert_eq!(reloaded.user().unwrap().preferences.theme, Theme::Dark);
    }

    #[test]
    fn update_without_user_is_noop() {
        let store = MemoryStore::new();
        let mut auth = provider(&store);
        auth.update_user(UserUpdate {
            name: Some("ghost".into()),
            ..Default::default()
        });
        assert!(auth.user().is_none());
        assert!(store.get(USER_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn storage_failures_are_swallowed() {
        let mut auth =
            AuthProvider::new(ReadOnlyStore).with_delays(Duration::ZERO, Duration::ZERO);
        assert!(auth.login("a@b.c", "secret1").await);
        assert!(auth.is_authenticated());
        auth.logout();
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn corrupt_user_entry_restores_signed_out() {
        let store = MemoryStore::new();
        store.set(USER_KEY, "{not json").unwrap();
        let auth = provider(&store);
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn user_json_uses_camel_case() {
        let user = User::new("a@b.c", "a");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["preferences"]["defaultWorkDuration"], 25);
        assert_eq!(json["preferences"]["preferredReciter"], "mishary");
        assert!(json.get("avatar").is_none());
    }
}
