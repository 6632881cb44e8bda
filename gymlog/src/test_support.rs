//! Test-only helpers for building canonical sessions and stores.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};

use crate::core::timestamp::format_iso;
use crate::core::types::{CategoryTemplates, Exercise, SetEntry, WorkoutSession};
use crate::io::config::TrackerConfig;
use crate::io::kv::{DirStore, KeyValueStore};

/// 2025-06-01T12:00:00Z.
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_748_779_200, 0).unwrap_or_default()
}

/// Built-in categories from the default config.
pub fn default_categories() -> CategoryTemplates {
    TrackerConfig::default().default_categories()
}

/// Exercise with deterministic id and the given sets.
pub fn exercise(id: &str, name: &str, sets: Vec<SetEntry>) -> Exercise {
    Exercise {
        id: id.to_string(),
        name: name.to_string(),
        note: String::new(),
        sets,
    }
}

/// Canonical session with one exercise and no sets.
pub fn session(id: &str, body_part: &str) -> WorkoutSession {
    WorkoutSession {
        id: id.to_string(),
        date: format_iso(fixed_now()),
        body_part: body_part.to_string(),
        note: String::new(),
        exercises: vec![exercise(&format!("{id}-1"), "Warm-up", Vec::new())],
    }
}

/// Canonical session with two exercises that both carry sets.
pub fn session_with_sets(id: &str, body_part: &str) -> WorkoutSession {
    WorkoutSession {
        note: "felt strong".to_string(),
        exercises: vec![
            exercise(
                &format!("{id}-1"),
                "Squat",
                vec![SetEntry::new("100", "5"), SetEntry::new("102.5", "5")],
            ),
            exercise(&format!("{id}-2"), "Leg Press", vec![SetEntry::new("180", "10")]),
        ],
        ..session(id, body_part)
    }
}

/// Directory store rooted in a fresh temp dir. Keep the guard alive.
pub fn temp_dir_store() -> Result<(tempfile::TempDir, DirStore)> {
    let temp = tempfile::tempdir()?;
    let store = DirStore::new(temp.path().join("store"));
    Ok((temp, store))
}

/// Store whose every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Err(anyhow!("store unavailable (get {key})"))
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("store unavailable (set {key})"))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        Err(anyhow!("store unavailable (remove {key})"))
    }
}
