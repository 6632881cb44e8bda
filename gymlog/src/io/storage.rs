//! Load and save canonical state, one independent slot at a time.
//!
//! Each slot is parsed on its own: unreadable or corrupt content is logged,
//! removed, and treated as absent without affecting the other slots. Nothing
//! here returns an error; a failed write only loses durability for the
//! current session, the in-memory state stays correct.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::invariants::validate_invariants;
use crate::core::normalize::Normalizer;
use crate::core::types::{AppState, CategoryTemplates, WorkoutSession};
use crate::io::draft;
use crate::io::kv::KeyValueStore;

/// Named unit of durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Workouts,
    CustomWorkouts,
    CurrentWorkoutDraft,
    LastWorkoutSession,
}

impl Slot {
    pub const ALL: [Slot; 4] = [
        Slot::Workouts,
        Slot::CustomWorkouts,
        Slot::CurrentWorkoutDraft,
        Slot::LastWorkoutSession,
    ];

    /// Store key. These names are shared with data written by earlier
    /// releases and must not change.
    pub fn key(self) -> &'static str {
        match self {
            Slot::Workouts => "gymWorkouts",
            Slot::CustomWorkouts => "customWorkouts",
            Slot::CurrentWorkoutDraft => "currentWorkoutDraft",
            Slot::LastWorkoutSession => "lastWorkoutSession",
        }
    }
}

/// Storage front for canonical [`AppState`].
#[derive(Debug)]
pub struct StorageGateway<S> {
    store: S,
    defaults: CategoryTemplates,
}

impl<S: KeyValueStore> StorageGateway<S> {
    /// `defaults` stands in for a missing or empty category slot.
    pub fn new(store: S, defaults: CategoryTemplates) -> Self {
        Self { store, defaults }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Read every slot and normalize it. Never fails.
    pub fn load(&mut self, now: DateTime<Utc>) -> AppState {
        let normalizer = Normalizer::new(now);

        let workouts = read_slot(&mut self.store, Slot::Workouts)
            .map(|raw| normalizer.workouts(&raw))
            .unwrap_or_default();
        let custom_workouts = read_slot(&mut self.store, Slot::CustomWorkouts)
            .map(|raw| normalizer.custom_workouts(&raw))
            .filter(|templates| !templates.is_empty())
            .unwrap_or_else(|| self.defaults.clone());
        let last_workout_session = read_slot(&mut self.store, Slot::LastWorkoutSession)
            .and_then(|raw| normalizer.session(&raw));
        let current_draft = draft::restore_draft(&mut self.store, &normalizer);

        let state = AppState {
            workouts,
            custom_workouts,
            current_draft,
            last_workout_session,
        };
        let violations = validate_invariants(&state);
        if !violations.is_empty() {
            warn!(violations = ?violations, "loaded state violates invariants");
        }
        debug!(
            workouts = state.workouts.len(),
            categories = state.custom_workouts.len(),
            draft = state.current_draft.is_some(),
            "state loaded"
        );
        state
    }

    /// Persist workouts, categories and the last session. The draft slot is
    /// owned by [`StorageGateway::sync_draft`].
    pub fn save(&mut self, state: &AppState) {
        write_slot(&mut self.store, Slot::Workouts, &state.workouts);
        write_slot(&mut self.store, Slot::CustomWorkouts, &state.custom_workouts);
        match &state.last_workout_session {
            Some(session) => write_slot(&mut self.store, Slot::LastWorkoutSession, session),
            None => clear_slot(&mut self.store, Slot::LastWorkoutSession),
        }
    }

    /// Mirror the draft into its slot, or delete the slot when there is none.
    pub fn sync_draft(&mut self, current: Option<&WorkoutSession>) {
        draft::persist_draft(&mut self.store, current);
    }
}

/// Parse one slot. Unreadable stores and empty values count as absent;
/// corrupt JSON is removed from the store.
pub(crate) fn read_slot<S: KeyValueStore>(store: &mut S, slot: Slot) -> Option<Value> {
    let text = match store.get(slot.key()) {
        Ok(Some(text)) if !text.trim().is_empty() => text,
        Ok(_) => return None,
        Err(err) => {
            warn!(slot = slot.key(), error = %format!("{err:#}"), "slot unreadable");
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(slot = slot.key(), error = %err, "corrupt slot removed");
            clear_slot(store, slot);
            None
        }
    }
}

pub(crate) fn write_slot<S: KeyValueStore, T: Serialize + ?Sized>(
    store: &mut S,
    slot: Slot,
    value: &T,
) {
    let text = match serde_json::to_string(value) {
        Ok(text) => text,
        Err(err) => {
            warn!(slot = slot.key(), error = %err, "slot not serializable");
            return;
        }
    };
    if let Err(err) = store.set(slot.key(), &text) {
        warn!(slot = slot.key(), error = %format!("{err:#}"), "slot write failed");
    }
}

pub(crate) fn clear_slot<S: KeyValueStore>(store: &mut S, slot: Slot) {
    if let Err(err) = store.remove(slot.key()) {
        warn!(slot = slot.key(), error = %format!("{err:#}"), "slot remove failed");
    }
}
