//! Workout session lifecycle: start, edit the draft, finish or discard.
//!
//! Every operation takes the current state by reference and returns a freshly
//! built one; the input is never modified.

use std::iter;

use chrono::{DateTime, Utc};

use crate::core::error::{EditError, check_index};
use crate::core::ids::unique_against;
use crate::core::normalize::category_key;
use crate::core::timestamp::format_iso;
use crate::core::types::{AppState, Exercise, SetEntry, WorkoutSession};

/// Result of finishing the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishOutcome {
    /// Appended to history under `id`.
    Saved { id: String },
    /// Nothing was logged; the draft was dropped.
    Discarded,
}

/// Start a draft from a snapshot of `category`'s templates.
pub fn start_workout(
    state: &AppState,
    category: &str,
    now: DateTime<Utc>,
) -> Result<AppState, EditError> {
    if state.current_draft.is_some() {
        return Err(EditError::DraftInProgress);
    }
    let key = category_key(category);
    let templates = state
        .custom_workouts
        .get(&key)
        .ok_or_else(|| EditError::UnknownCategory(key.clone()))?;

    let stamp = now.timestamp_millis();
    let draft = WorkoutSession {
        id: stamp.to_string(),
        date: format_iso(now),
        body_part: key.clone(),
        note: String::new(),
        exercises: templates
            .iter()
            .enumerate()
            .map(|(index, template)| Exercise {
                id: format!("{stamp}-{}", index + 1),
                name: template.name.clone(),
                note: template.note.clone(),
                sets: Vec::new(),
            })
            .collect(),
    };
    Ok(AppState {
        current_draft: Some(draft),
        ..state.clone()
    })
}

/// Append a set to the named exercise, adding the exercise to the draft if
/// it is not there yet.
pub fn log_set(
    state: &AppState,
    exercise_name: &str,
    set: SetEntry,
) -> Result<AppState, EditError> {
    let name = exercise_name.trim();
    if name.is_empty() {
        return Err(EditError::EmptyName);
    }
    with_draft(state, |draft| {
        let exercises = match draft.exercise_by_name(name) {
            Some(target) => draft
                .exercises
                .iter()
                .map(|exercise| {
                    if exercise.id == target.id {
                        Exercise {
                            sets: appended(&exercise.sets, set.clone()),
                            ..exercise.clone()
                        }
                    } else {
                        exercise.clone()
                    }
                })
                .collect(),
            None => {
                let id = unique_against(
                    &format!("{}-{}", draft.id, draft.exercises.len() + 1),
                    draft.exercises.iter().map(|exercise| exercise.id.as_str()),
                );
                let added = Exercise {
                    id,
                    name: name.to_string(),
                    note: String::new(),
                    sets: vec![set],
                };
                draft
                    .exercises
                    .iter()
                    .cloned()
                    .chain(iter::once(added))
                    .collect()
            }
        };
        Ok(WorkoutSession {
            exercises,
            ..draft.clone()
        })
    })
}

/// Replace set `index` of exercise `exercise_id`.
pub fn update_set(
    state: &AppState,
    exercise_id: &str,
    index: usize,
    set: SetEntry,
) -> Result<AppState, EditError> {
    edit_sets(state, exercise_id, |sets| {
        check_index(index, sets.len())?;
        Ok(sets
            .iter()
            .enumerate()
            .map(|(position, existing)| {
                if position == index {
                    set.clone()
                } else {
                    existing.clone()
                }
            })
            .collect())
    })
}

/// Remove set `index` of exercise `exercise_id`.
pub fn remove_set(
    state: &AppState,
    exercise_id: &str,
    index: usize,
) -> Result<AppState, EditError> {
    edit_sets(state, exercise_id, |sets| {
        check_index(index, sets.len())?;
        Ok(sets
            .iter()
            .enumerate()
            .filter(|(position, _)| *position != index)
            .map(|(_, set)| set.clone())
            .collect())
    })
}

/// Close the draft. Sessions with at least one logged set are appended to
/// history and remembered as the last session.
pub fn finish_workout(state: &AppState) -> Result<(AppState, FinishOutcome), EditError> {
    let draft = state.current_draft.as_ref().ok_or(EditError::NoDraft)?;
    if !draft.has_logged_sets() {
        let next = AppState {
            current_draft: None,
            ..state.clone()
        };
        return Ok((next, FinishOutcome::Discarded));
    }

    let id = unique_against(
        &draft.id,
        state.workouts.iter().map(|workout| workout.id.as_str()),
    );
    let finished = WorkoutSession {
        id: id.clone(),
        ..draft.clone()
    };
    let next = AppState {
        workouts: state
            .workouts
            .iter()
            .cloned()
            .chain(iter::once(finished.clone()))
            .collect(),
        custom_workouts: state.custom_workouts.clone(),
        current_draft: None,
        last_workout_session: Some(finished),
    };
    Ok((next, FinishOutcome::Saved { id }))
}

pub fn discard_workout(state: &AppState) -> Result<AppState, EditError> {
    if state.current_draft.is_none() {
        return Err(EditError::NoDraft);
    }
    Ok(AppState {
        current_draft: None,
        ..state.clone()
    })
}

/// Remove a finished session from history.
pub fn delete_workout(state: &AppState, id: &str) -> Result<AppState, EditError> {
    if state.workout(id).is_none() {
        return Err(EditError::UnknownWorkout(id.to_string()));
    }
    Ok(AppState {
        workouts: state
            .workouts
            .iter()
            .filter(|workout| workout.id != id)
            .cloned()
            .collect(),
        ..state.clone()
    })
}

fn with_draft<F>(state: &AppState, edit: F) -> Result<AppState, EditError>
where
    F: FnOnce(&WorkoutSession) -> Result<WorkoutSession, EditError>,
{
    let draft = state.current_draft.as_ref().ok_or(EditError::NoDraft)?;
    let next = edit(draft)?;
    Ok(AppState {
        current_draft: Some(next),
        ..state.clone()
    })
}

fn edit_sets<F>(state: &AppState, exercise_id: &str, edit: F) -> Result<AppState, EditError>
where
    F: FnOnce(&[SetEntry]) -> Result<Vec<SetEntry>, EditError>,
{
    with_draft(state, |draft| {
        let target = draft
            .exercises
            .iter()
            .find(|exercise| exercise.id == exercise_id)
            .ok_or_else(|| EditError::UnknownExercise(exercise_id.to_string()))?;
        let sets = edit(&target.sets)?;
        let exercises = draft
            .exercises
            .iter()
            .map(|exercise| {
                if exercise.id == exercise_id {
                    Exercise {
                        sets: sets.clone(),
                        ..exercise.clone()
                    }
                } else {
                    exercise.clone()
                }
            })
            .collect();
        Ok(WorkoutSession {
            exercises,
            ..draft.clone()
        })
    })
}

fn appended(sets: &[SetEntry], set: SetEntry) -> Vec<SetEntry> {
    sets.iter().cloned().chain(iter::once(set)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{default_categories, fixed_now, session_with_sets};

    fn home_state() -> AppState {
        AppState {
            custom_workouts: default_categories(),
            ..AppState::default()
        }
    }

    fn started() -> AppState {
        start_workout(&home_state(), "Push", fixed_now()).expect("start")
    }

    #[test]
    fn start_snapshots_category_templates() {
        let state = started();
        let draft = state.current_draft.as_ref().expect("draft");
        assert_eq!(draft.id, "1748779200000");
        assert_eq!(draft.date, "2025-06-01T12:00:00.000Z");
        assert_eq!(draft.body_part, "push");
        assert_eq!(draft.exercises.len(), 5);
        assert_eq!(draft.exercises[0].name, "Bench Press");
        assert_eq!(draft.exercises[0].id, "1748779200000-1");
        assert!(draft.exercises.iter().all(|exercise| exercise.sets.is_empty()));
    }

    #[test]
    fn start_rejects_unknown_category_and_existing_draft() {
        assert_eq!(
            start_workout(&home_state(), "cardio", fixed_now()),
            Err(EditError::UnknownCategory("cardio".to_string()))
        );
        assert_eq!(
            start_workout(&started(), "pull", fixed_now()),
            Err(EditError::DraftInProgress)
        );
    }

    #[test]
    fn log_set_appends_to_existing_exercise_without_touching_input() {
        let before = started();
        let after = log_set(&before, "bench press", SetEntry::new("60", "8")).expect("log");
        let draft = after.current_draft.as_ref().expect("draft");
        assert_eq!(draft.exercises[0].sets, vec![SetEntry::new("60", "8")]);
        assert_eq!(draft.exercises.len(), 5);
        assert!(
            before.current_draft.as_ref().expect("draft").exercises[0]
                .sets
                .is_empty()
        );
    }

    #[test]
    fn log_set_adds_unplanned_exercise() {
        let after = log_set(&started(), "Dips", SetEntry::new("0", "12")).expect("log");
        let draft = after.current_draft.as_ref().expect("draft");
        let dips = draft.exercises.last().expect("exercise");
        assert_eq!(dips.name, "Dips");
        assert_eq!(dips.id, "1748779200000-6");
        assert_eq!(dips.sets.len(), 1);
    }

    #[test]
    fn log_set_requires_draft_and_name() {
        assert_eq!(
            log_set(&home_state(), "Squat", SetEntry::default()),
            Err(EditError::NoDraft)
        );
        assert_eq!(
            log_set(&started(), "  ", SetEntry::default()),
            Err(EditError::EmptyName)
        );
    }

    #[test]
    fn update_and_remove_sets_by_index() {
        let state = log_set(&started(), "Bench Press", SetEntry::new("60", "8")).expect("log");
        let state = log_set(&state, "Bench Press", SetEntry::new("65", "6")).expect("log");
        let id = "1748779200000-1";

        let updated = update_set(&state, id, 1, SetEntry::new("70", "5")).expect("update");
        let sets = &updated.current_draft.as_ref().expect("draft").exercises[0].sets;
        assert_eq!(sets, &vec![SetEntry::new("60", "8"), SetEntry::new("70", "5")]);

        let removed = remove_set(&updated, id, 0).expect("remove");
        let sets = &removed.current_draft.as_ref().expect("draft").exercises[0].sets;
        assert_eq!(sets, &vec![SetEntry::new("70", "5")]);

        assert_eq!(
            remove_set(&removed, id, 3),
            Err(EditError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(
            update_set(&removed, "nope", 0, SetEntry::default()),
            Err(EditError::UnknownExercise("nope".to_string()))
        );
    }

    #[test]
    fn finish_appends_logged_session_and_clears_draft() {
        let state = log_set(&started(), "Bench Press", SetEntry::new("60", "8")).expect("log");
        let (next, outcome) = finish_workout(&state).expect("finish");
        assert_eq!(
            outcome,
            FinishOutcome::Saved {
                id: "1748779200000".to_string()
            }
        );
        assert!(next.current_draft.is_none());
        assert_eq!(next.workouts.len(), 1);
        assert_eq!(next.last_workout_session.as_ref(), next.workouts.last());
    }

    #[test]
    fn finish_reidentifies_on_collision() {
        let mut state = log_set(&started(), "Bench Press", SetEntry::new("60", "8")).expect("log");
        state.workouts = vec![session_with_sets("1748779200000", "push")];
        let (next, outcome) = finish_workout(&state).expect("finish");
        assert_eq!(
            outcome,
            FinishOutcome::Saved {
                id: "1748779200000-2".to_string()
            }
        );
        assert_eq!(next.workouts.len(), 2);
    }

    #[test]
    fn finish_without_sets_discards() {
        let (next, outcome) = finish_workout(&started()).expect("finish");
        assert_eq!(outcome, FinishOutcome::Discarded);
        assert!(next.workouts.is_empty());
        assert!(next.current_draft.is_none());
        assert!(next.last_workout_session.is_none());
    }

    #[test]
    fn discard_and_delete() {
        assert!(discard_workout(&started()).expect("discard").current_draft.is_none());
        assert_eq!(discard_workout(&home_state()), Err(EditError::NoDraft));

        let state = AppState {
            workouts: vec![session_with_sets("a", "push"), session_with_sets("b", "pull")],
            ..home_state()
        };
        let next = delete_workout(&state, "a").expect("delete");
        assert_eq!(next.workouts.len(), 1);
        assert_eq!(next.workouts[0].id, "b");
        assert_eq!(
            delete_workout(&next, "a"),
            Err(EditError::UnknownWorkout("a".to_string()))
        );
    }
}
