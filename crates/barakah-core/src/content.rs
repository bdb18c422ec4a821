//! Spiritual content and selectable catalogs.
//!
//! Built-in duas, session categories, ambient audio, timer backgrounds and
//! Quran reciters are static. The chosen background and the user's own
//! duas are persisted in the key-value store.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{Result, ValidationError};
use crate::storage::{KvStore, BACKGROUND_KEY, CUSTOM_DUAS_KEY};

/// Short supplications shown while the timer runs.
pub const DUAS: &[&str] = &[
    "بِسْمِ اللَّهِ وَعَلَى اللَّهِ تَوَكَّلْتُ",
    "رَبِّ أَعِنِّي وَلَا تُعِنْ عَلَيَّ",
    "اللَّهُمَّ إِنِّي أَسْأَلُكَ الْهُدَى وَالتُّقَى",
    "اللَّهُمَّ إِنِّي أَسْأَلُكَ الْجَنَّةَ وَأَعُوذُ بِكَ مِنَ النَّارِ",
    "اللَّهُمَّ إِنِّي أَسْأَلُكَ الْعَفْوَ وَالْعَافِيَةَ",
];

/// Pick one of the built-in duas.
pub fn random_dua<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    DUAS.choose(rng).copied().unwrap_or(DUAS[0])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
}

pub const CATEGORIES: &[Category] = &[
    Category {
        id: "work",
        name: "Work",
        color: "#FF6B6B",
    },
    Category {
        id: "study",
        name: "Study",
        color: "#4ECDC4",
    },
    Category {
        id: "reading",
        name: "Reading",
        color: "#45B7D1",
    },
    Category {
        id: "exercise",
        name: "Exercise",
        color: "#96CEB4",
    },
    Category {
        id: "meditation",
        name: "Meditation",
        color: "#FFEAA7",
    },
    Category {
        id: "coding",
        name: "Coding",
        color: "#DDA0DD",
    },
    Category {
        id: "writing",
        name: "Writing",
        color: "#98D8C8",
    },
    Category {
        id: "custom",
        name: "Custom",
        color: "#F7DC6F",
    },
];

/// Look up a category, falling back to `custom` for unknown ids.
pub fn category(id: &str) -> &'static Category {
    CATEGORIES
        .iter()
        .find(|c| c.id == id)
        .unwrap_or(&CATEGORIES[CATEGORIES.len() - 1])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub key: &'static str,
    pub label: &'static str,
}

pub const AUDIO_OPTIONS: &[Choice] = &[
    Choice {
        key: "quran",
        label: "Quran Recitation",
    },
    Choice {
        key: "lofi",
        label: "Lo-Fi Beats",
    },
    Choice {
        key: "nature",
        label: "Nature Sounds",
    },
    Choice {
        key: "white-noise",
        label: "White Noise",
    },
    Choice {
        key: "silence",
        label: "Silence",
    },
];

pub const BACKGROUNDS: &[Choice] = &[
    Choice {
        key: "none",
        label: "No Background",
    },
    Choice {
        key: "waves",
        label: "Ocean Waves",
    },
    Choice {
        key: "rain",
        label: "Gentle Rain",
    },
    Choice {
        key: "rain2",
        label: "Heavy Rain",
    },
    Choice {
        key: "clouds",
        label: "Moving Clouds",
    },
    Choice {
        key: "clouds2",
        label: "Clouds 2",
    },
    Choice {
        key: "clouds3",
        label: "Clouds 3",
    },
    Choice {
        key: "wind",
        label: "Abstract Wind",
    },
];

pub const RECITERS: &[Choice] = &[
    Choice {
        key: "mishary",
        label: "Mishary Rashid Alafasy",
    },
    Choice {
        key: "sudais",
        label: "Abdul Rahman Al-Sudais",
    },
    Choice {
        key: "ghamdi",
        label: "Saad Al-Ghamdi",
    },
];

pub const DEFAULT_BACKGROUND: &str = "waves";

fn ensure_choice(kind: &str, choices: &[Choice], key: &str) -> Result<(), ValidationError> {
    if choices.iter().any(|c| c.key == key) {
        Ok(())
    } else {
        Err(ValidationError::NotFound {
            kind: kind.to_string(),
            id: key.to_string(),
        })
    }
}

/// Validate an ambient audio key.
pub fn ensure_audio(key: &str) -> Result<(), ValidationError> {
    ensure_choice("audio option", AUDIO_OPTIONS, key)
}

/// Validate a reciter key.
pub fn ensure_reciter(key: &str) -> Result<(), ValidationError> {
    ensure_choice("reciter", RECITERS, key)
}

/// Background currently stored, or [`DEFAULT_BACKGROUND`].
pub fn selected_background<S: KvStore>(store: &S) -> String {
    match store.get(BACKGROUND_KEY) {
        Ok(Some(key)) if BACKGROUNDS.iter().any(|b| b.key == key) => key,
        Ok(_) => DEFAULT_BACKGROUND.to_string(),
        Err(e) => {
            error!("Error reading background: {e}");
            DEFAULT_BACKGROUND.to_string()
        }
    }
}

/// Persist a background choice.
///
/// # Errors
/// Returns a validation error for unknown keys, or the storage error.
pub fn select_background<S: KvStore>(store: &S, key: &str) -> Result<()> {
    ensure_choice("background", BACKGROUNDS, key)?;
    store.set(BACKGROUND_KEY, key)?;
    debug!(key, "background selected");
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDua {
    pub id: String,
    pub text: String,
    pub category: String,
}

fn seed_duas() -> Vec<CustomDua> {
    [
        (
            "Allahumma barik lana fi ma razaqtana (O Allah, bless us in what You have provided)",
            "Work",
        ),
        (
            "Rabbana atina fi'd-dunya hasanatan (Our Lord, give us good in this world)",
            "Study",
        ),
        (
            "SubhanAllahi wa bihamdihi (Glory be to Allah and praise Him)",
            "Worship",
        ),
    ]
    .iter()
    .enumerate()
    .map(|(i, (text, category))| CustomDua {
        id: (i + 1).to_string(),
        text: (*text).to_string(),
        category: (*category).to_string(),
    })
    .collect()
}

fn required(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Empty(field.to_string()))
    } else {
        Ok(trimmed.to_string())
    }
}

/// User-editable dua collection.
pub struct DuaBook<S: KvStore> {
    store: S,
    duas: Vec<CustomDua>,
}

impl<S: KvStore> DuaBook<S> {
    /// Load the collection, seeding three defaults when nothing is stored.
    pub fn new(store: S) -> Self {
        let duas = match store.get(CUSTOM_DUAS_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                error!("Error loading duas: {e}");
                seed_duas()
            }),
            Ok(None) => seed_duas(),
            Err(e) => {
                error!("Error loading duas: {e}");
                seed_duas()
            }
        };
        Self { store, duas }
    }

    pub fn duas(&self) -> &[CustomDua] {
        &self.duas
    }

    /// # Errors
    /// Fails when text or category is blank, or the write fails.
    pub fn add(&mut self, text: &str, category: &str) -> Result<&CustomDua> {
        let dua = CustomDua {
            id: uuid::Uuid::new_v4().to_string(),
            text: required("text", text)?,
            category: required("category", category)?,
        };
        let mut next = self.duas.clone();
        next.push(dua);
        self.commit(next)?;
        Ok(&self.duas[self.duas.len() - 1])
    }

    /// # Errors
    /// Fails when the id is unknown, a field is blank, or the write fails.
    pub fn update(&mut self, id: &str, text: &str, category: &str) -> Result<()> {
        let text = required("text", text)?;
        let category = required("category", category)?;
        let mut next = self.duas.clone();
        let dua = next
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| not_found(id))?;
        dua.text = text;
        dua.category = category;
        self.commit(next)
    }

    /// # Errors
    /// Fails when the id is unknown or the write fails.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        let next: Vec<CustomDua> = self.duas.iter().filter(|d| d.id != id).cloned().collect();
        if next.len() == self.duas.len() {
            return Err(not_found(id).into());
        }
        self.commit(next)
    }

    /// Persist `next`, then adopt it. The in-memory list is untouched when
    /// the write fails.
    fn commit(&mut self, next: Vec<CustomDua>) -> Result<()> {
        let json = serde_json::to_string(&next)?;
        self.store.set(CUSTOM_DUAS_KEY, &json)?;
        self.duas = next;
        Ok(())
    }
}

fn not_found(id: &str) -> ValidationError {
    ValidationError::NotFound {
        kind: "dua".into(),
        id: id.to_string(),
    }
}
