//! Immersive mode: chrome hidden while a focus session runs.
//!
//! Observers hold a [`watch::Receiver`] and are woken on change. The flag
//! is also mirrored to [`IMMERSIVE_KEY`] as `"true"`/`"false"` so another
//! process sharing the store can read the last value.

use tokio::sync::watch;
use tracing::{debug, error};

use crate::storage::{KvStore, IMMERSIVE_KEY};

pub struct ImmersiveMode<S: KvStore> {
    store: S,
    tx: watch::Sender<bool>,
}

impl<S: KvStore> ImmersiveMode<S> {
    /// Create the flag, seeded from storage (off when absent or unreadable).
    pub fn new(store: S) -> Self {
        let initial = match store.get(IMMERSIVE_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                error!("Error reading immersive mode: {e}");
                false
            }
        };
        let (tx, _rx) = watch::channel(initial);
        Self { store, tx }
    }

    pub fn get(&self) -> bool {
        *self.tx.borrow()
    }

    /// Set the flag. Subscribers are only woken when the value changes.
    pub fn set(&self, on: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == on {
                false
            } else {
                *current = on;
                true
            }
        });
        if changed {
            debug!(on, "immersive mode changed");
        }
        let value = if on { "true" } else { "false" };
        if let Err(e) = self.store.set(IMMERSIVE_KEY, value) {
            error!("Error saving immersive mode: {e}");
        }
    }

    pub fn toggle(&self) -> bool {
        let next = !self.get();
        self.set(next);
        next
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn seeded_from_storage() {
        let store = MemoryStore::new();
        assert!(!ImmersiveMode::new(&store).get());
        store.set(IMMERSIVE_KEY, "true").unwrap();
        assert!(ImmersiveMode::new(&store).get());
    }

    #[test]
    fn set_mirrors_to_storage() {
        let store = MemoryStore::new();
        let mode = ImmersiveMode::new(&store);
        mode.set(true);
        assert_eq!(store.get(IMMERSIVE_KEY).unwrap().as_deref(), Some("true"));
        assert!(!mode.toggle());
        assert_eq!(store.get(IMMERSIVE_KEY).unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn unchanged_value_does_not_notify() {
        let store = MemoryStore::new();
        let mode = ImmersiveMode::new(&store);
        let rx = mode.subscribe();
        mode.set(false);
        assert!(!rx.has_changed().unwrap());
        mode.set(true);
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn subscriber_is_woken_on_change() {
        let store = MemoryStore::new();
        let mode = ImmersiveMode::new(&store);
        let mut rx = mode.subscribe();

        let waiter = tokio::spawn(async move {
            rx.changed().await.unwrap();
            *rx.borrow_and_update()
        });
        tokio::task::yield_now().await;
        mode.set(true);
        assert!(waiter.await.unwrap());
    }
}
