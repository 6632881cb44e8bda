//! Mirror of the in-progress session for crash recovery.
//!
//! The draft slot always holds the full latest draft (no merging) and is
//! deleted as soon as the draft is finished or discarded. A draft found at
//! startup is restored and the host resumes the active workout.

use tracing::{debug, info};

use crate::core::normalize::Normalizer;
use crate::core::types::WorkoutSession;
use crate::io::kv::KeyValueStore;
use crate::io::storage::{Slot, clear_slot, read_slot, write_slot};

/// Write `draft` to its slot, or delete the slot when `None`.
pub fn persist_draft<S: KeyValueStore>(store: &mut S, draft: Option<&WorkoutSession>) {
    match draft {
        Some(draft) => {
            debug!(id = %draft.id, exercises = draft.exercises.len(), "mirroring draft");
            write_slot(store, Slot::CurrentWorkoutDraft, draft);
        }
        None => {
            debug!("clearing draft slot");
            clear_slot(store, Slot::CurrentWorkoutDraft);
        }
    }
}

/// Restore a previously mirrored draft. Values that do not describe a session
/// are removed.
pub fn restore_draft<S: KeyValueStore>(
    store: &mut S,
    normalizer: &Normalizer,
) -> Option<WorkoutSession> {
    let raw = read_slot(store, Slot::CurrentWorkoutDraft)?;
    match normalizer.session(&raw) {
        Some(draft) => {
            info!(id = %draft.id, "recovered unfinished workout");
            Some(draft)
        }
        None => {
            clear_slot(store, Slot::CurrentWorkoutDraft);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::kv::MemoryStore;
    use crate::test_support::{fixed_now, session_with_sets};

    #[test]
    fn persisted_draft_is_restored_verbatim() {
        let draft = session_with_sets("1748779200000", "legs");
        let mut store = MemoryStore::new();
        persist_draft(&mut store, Some(&draft));

        let restored = restore_draft(&mut store, &Normalizer::new(fixed_now()));
        assert_eq!(restored, Some(draft));
    }

    #[test]
    fn clearing_removes_the_slot() {
        let mut store = MemoryStore::new();
        persist_draft(&mut store, Some(&session_with_sets("d", "push")));
        persist_draft(&mut store, None);
        assert!(store.entries().is_empty());
        assert_eq!(restore_draft(&mut store, &Normalizer::new(fixed_now())), None);
    }

    #[test]
    fn later_writes_replace_earlier_drafts() {
        let mut store = MemoryStore::new();
        persist_draft(&mut store, Some(&session_with_sets("first", "push")));
        persist_draft(&mut store, Some(&session_with_sets("second", "pull")));
        let restored = restore_draft(&mut store, &Normalizer::new(fixed_now())).expect("draft");
        assert_eq!(restored.id, "second");
    }

    #[test]
    fn non_session_values_are_discarded() {
        for text in ["[1,2]", "42", "null", "{oops"] {
            let mut store = MemoryStore::new().with_entry(Slot::CurrentWorkoutDraft.key(), text);
            assert_eq!(
                restore_draft(&mut store, &Normalizer::new(fixed_now())),
                None,
                "input {text}"
            );
            assert!(store.entries().is_empty(), "input {text}");
        }
    }
}
