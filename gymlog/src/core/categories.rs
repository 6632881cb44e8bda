//! Category template editing.

use crate::core::error::{EditError, check_index};
use crate::core::normalize::category_key;
use crate::core::types::{AppState, CategoryTemplates, ExerciseTemplate, WorkoutSession};

pub fn add_category(state: &AppState, name: &str) -> Result<AppState, EditError> {
    let key = non_empty_key(name)?;
    if state.custom_workouts.contains_key(&key) {
        return Err(EditError::CategoryExists(key));
    }
    let custom_workouts = state
        .custom_workouts
        .iter()
        .map(|(existing, templates)| (existing.clone(), templates.clone()))
        .chain([(key, Vec::new())])
        .collect();
    Ok(AppState {
        custom_workouts,
        ..state.clone()
    })
}

/// Rename a category and re-tag every session recorded under the old key.
///
/// Renaming to the current key is a no-op.
pub fn rename_category(state: &AppState, from: &str, to: &str) -> Result<AppState, EditError> {
    let old = existing_key(state, from)?;
    let new = non_empty_key(to)?;
    if new == old {
        return Ok(state.clone());
    }
    if state.custom_workouts.contains_key(&new) {
        return Err(EditError::CategoryExists(new));
    }

    let custom_workouts: CategoryTemplates = state
        .custom_workouts
        .iter()
        .map(|(key, templates)| {
            let key = if *key == old { new.clone() } else { key.clone() };
            (key, templates.clone())
        })
        .collect();
    let retag = |session: &WorkoutSession| {
        if session.body_part == old {
            WorkoutSession {
                body_part: new.clone(),
                ..session.clone()
            }
        } else {
            session.clone()
        }
    };
    Ok(AppState {
        workouts: state.workouts.iter().map(retag).collect(),
        custom_workouts,
        current_draft: state.current_draft.as_ref().map(retag),
        last_workout_session: state.last_workout_session.as_ref().map(retag),
    })
}

/// Delete a category. The last remaining category cannot be deleted.
pub fn delete_category(state: &AppState, name: &str) -> Result<AppState, EditError> {
    let key = existing_key(state, name)?;
    if state.custom_workouts.len() <= 1 {
        return Err(EditError::LastCategory(key));
    }
    Ok(AppState {
        custom_workouts: state
            .custom_workouts
            .iter()
            .filter(|(existing, _)| **existing != key)
            .map(|(existing, templates)| (existing.clone(), templates.clone()))
            .collect(),
        ..state.clone()
    })
}

pub fn add_template(
    state: &AppState,
    category: &str,
    template: ExerciseTemplate,
) -> Result<AppState, EditError> {
    let template = checked_template(template)?;
    edit_templates(state, category, |templates| {
        Ok(templates.iter().cloned().chain([template]).collect())
    })
}

pub fn update_template(
    state: &AppState,
    category: &str,
    index: usize,
    template: ExerciseTemplate,
) -> Result<AppState, EditError> {
    let template = checked_template(template)?;
    edit_templates(state, category, |templates| {
        check_index(index, templates.len())?;
        Ok(templates
            .iter()
            .enumerate()
            .map(|(position, existing)| {
                if position == index {
                    template.clone()
                } else {
                    existing.clone()
                }
            })
            .collect())
    })
}

pub fn remove_template(
    state: &AppState,
    category: &str,
    index: usize,
) -> Result<AppState, EditError> {
    edit_templates(state, category, |templates| {
        check_index(index, templates.len())?;
        Ok(templates
            .iter()
            .enumerate()
            .filter(|(position, _)| *position != index)
            .map(|(_, template)| template.clone())
            .collect())
    })
}

fn edit_templates<F>(state: &AppState, category: &str, edit: F) -> Result<AppState, EditError>
where
    F: FnOnce(&[ExerciseTemplate]) -> Result<Vec<ExerciseTemplate>, EditError>,
{
    let key = existing_key(state, category)?;
    let current = state
        .custom_workouts
        .get(&key)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let edited = edit(current)?;
    let custom_workouts = state
        .custom_workouts
        .iter()
        .map(|(existing, templates)| {
            if *existing == key {
                (existing.clone(), edited.clone())
            } else {
                (existing.clone(), templates.clone())
            }
        })
        .collect();
    Ok(AppState {
        custom_workouts,
        ..state.clone()
    })
}

fn non_empty_key(name: &str) -> Result<String, EditError> {
    let key = category_key(name);
    if key.is_empty() {
        return Err(EditError::EmptyName);
    }
    Ok(key)
}

fn existing_key(state: &AppState, name: &str) -> Result<String, EditError> {
    let key = category_key(name);
    if !state.custom_workouts.contains_key(&key) {
        return Err(EditError::UnknownCategory(key));
    }
    Ok(key)
}

fn checked_template(template: ExerciseTemplate) -> Result<ExerciseTemplate, EditError> {
    if template.name.trim().is_empty() {
        return Err(EditError::EmptyName);
    }
    Ok(template)
}
