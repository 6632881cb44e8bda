//! Structural invariants of canonical state.

use std::collections::HashSet;

use crate::core::normalize::category_key;
use crate::core::timestamp::parse_date_text;
use crate::core::types::{AppState, WorkoutSession};

/// Check every canonical-state invariant:
/// - Workout ids unique and non-empty; exercise ids likewise within a session
/// - Session dates parse as ISO-8601
/// - Category keys lower-cased and trimmed
/// - Template names non-blank
pub fn validate_invariants(state: &AppState) -> Vec<String> {
    let mut errors = Vec::new();

    let mut workout_ids = HashSet::new();
    for workout in &state.workouts {
        if !workout.id.is_empty() && !workout_ids.insert(workout.id.as_str()) {
            errors.push(format!("duplicate workout id '{}'", workout.id));
        }
        validate_session(workout, "workouts", &mut errors);
    }
    if let Some(draft) = &state.current_draft {
        validate_session(draft, "currentDraft", &mut errors);
    }
    if let Some(last) = &state.last_workout_session {
        validate_session(last, "lastWorkoutSession", &mut errors);
    }

    for (key, templates) in &state.custom_workouts {
        if key.is_empty() || *key != category_key(key) {
            errors.push(format!("category key '{key}' is not normalized"));
        }
        for (index, template) in templates.iter().enumerate() {
            if template.name.trim().is_empty() {
                errors.push(format!("{key}[{index}]: template name is blank"));
            }
        }
    }
    errors
}

fn validate_session(session: &WorkoutSession, scope: &str, errors: &mut Vec<String>) {
    let path = format!("{scope}/{}", session.id);
    if session.id.is_empty() {
        errors.push(format!("{scope}: empty workout id"));
    }
    if parse_date_text(&session.date).is_none() {
        errors.push(format!("{path}: date '{}' is not ISO-8601", session.date));
    }
    let mut seen = HashSet::new();
    for exercise in &session.exercises {
        if exercise.id.is_empty() {
            errors.push(format!("{path}: empty exercise id"));
        } else if !seen.insert(exercise.id.as_str()) {
            errors.push(format!("{path}: duplicate exercise id '{}'", exercise.id));
        }
    }
}
