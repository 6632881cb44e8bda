//! Total conversion from untrusted JSON into canonical state.
//!
//! Every function here accepts any input shape and never fails. Missing or
//! foreign-shaped fields collapse to defaults; identifier collisions are
//! repaired with synthetic ids (see [`ensure_unique_ids`]). The typed
//! `canonical_*` variants re-apply the same rules to values that are already
//! structurally typed but may still break invariants (duplicate ids, bad
//! dates, unnormalized category keys).

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::core::ids::{
    EXERCISE_ID_PREFIX, WORKOUT_ID_PREFIX, ensure_unique_ids, number_to_text, raw_id,
};
use crate::core::timestamp::{format_iso, parse_date_text, to_iso_string};
use crate::core::types::{
    AppState, CategoryTemplates, Exercise, ExerciseTemplate, SetEntry, WorkoutSession,
};

/// Body part assigned to sessions that arrive without one.
pub const UNKNOWN_BODY_PART: &str = "unknown";

/// Normalizer bound to a fixed normalization timestamp.
#[derive(Debug, Clone)]
pub struct Normalizer {
    fallback_date: String,
}

impl Normalizer {
    /// `now` replaces any date that cannot be parsed.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            fallback_date: format_iso(now),
        }
    }

    pub fn fallback_date(&self) -> &str {
        &self.fallback_date
    }

    /// Normalize a raw workouts collection. Non-arrays yield an empty list.
    pub fn workouts(&self, raw: &Value) -> Vec<WorkoutSession> {
        let items = raw.as_array().map(Vec::as_slice).unwrap_or_default();
        let ids = ensure_unique_ids(items.iter().map(raw_id), WORKOUT_ID_PREFIX);
        items
            .iter()
            .zip(ids)
            .map(|(item, id)| self.workout(item, id))
            .collect()
    }

    /// Normalize a single stored session (draft or last session).
    ///
    /// Only objects describe a session; `null` and other shapes are absent.
    pub fn session(&self, raw: &Value) -> Option<WorkoutSession> {
        if !raw.is_object() {
            return None;
        }
        self.workouts(&Value::Array(vec![raw.clone()])).pop()
    }

    /// Normalize raw category templates. See [`custom_workouts`].
    pub fn custom_workouts(&self, raw: &Value) -> CategoryTemplates {
        custom_workouts(raw)
    }

    fn workout(&self, raw: &Value, id: String) -> WorkoutSession {
        let exercises = raw
            .get("exercises")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let exercise_ids = ensure_unique_ids(exercises.iter().map(raw_id), EXERCISE_ID_PREFIX);
        WorkoutSession {
            id,
            date: to_iso_string(raw.get("date").unwrap_or(&Value::Null), &self.fallback_date),
            body_part: text_field(raw, "bodyPart")
                .unwrap_or(UNKNOWN_BODY_PART)
                .to_string(),
            note: text_field(raw, "note").unwrap_or_default().to_string(),
            exercises: exercises
                .iter()
                .zip(exercise_ids)
                .map(|(exercise, id)| Exercise {
                    id,
                    name: text_field(exercise, "name").unwrap_or_default().to_string(),
                    note: text_field(exercise, "note").unwrap_or_default().to_string(),
                    sets: sets(exercise.get("sets")),
                })
                .collect(),
        }
    }

    /// Re-canonicalize typed workouts.
    pub fn canonical_workouts(&self, workouts: &[WorkoutSession]) -> Vec<WorkoutSession> {
        let ids = ensure_unique_ids(
            workouts.iter().map(|workout| Some(workout.id.clone())),
            WORKOUT_ID_PREFIX,
        );
        workouts
            .iter()
            .zip(ids)
            .map(|(workout, id)| self.canonical_workout(workout, id))
            .collect()
    }

    pub fn canonical_session(&self, session: &WorkoutSession) -> WorkoutSession {
        let id = if session.id.is_empty() {
            format!("{WORKOUT_ID_PREFIX}-1")
        } else {
            session.id.clone()
        };
        self.canonical_workout(session, id)
    }

    pub fn canonical_custom_workouts(&self, templates: &CategoryTemplates) -> CategoryTemplates {
        collect_categories(templates.iter().map(|(key, items)| {
            let kept: Vec<ExerciseTemplate> = items
                .iter()
                .filter(|item| !item.name.trim().is_empty())
                .cloned()
                .collect();
            (key.as_str(), kept)
        }))
    }

    /// Re-canonicalize every slice of a typed state.
    pub fn canonical_state(&self, state: &AppState) -> AppState {
        AppState {
            workouts: self.canonical_workouts(&state.workouts),
            custom_workouts: self.canonical_custom_workouts(&state.custom_workouts),
            current_draft: state
                .current_draft
                .as_ref()
                .map(|draft| self.canonical_session(draft)),
            last_workout_session: state
                .last_workout_session
                .as_ref()
                .map(|session| self.canonical_session(session)),
        }
    }

    fn canonical_workout(&self, workout: &WorkoutSession, id: String) -> WorkoutSession {
        let exercise_ids = ensure_unique_ids(
            workout
                .exercises
                .iter()
                .map(|exercise| Some(exercise.id.clone())),
            EXERCISE_ID_PREFIX,
        );
        WorkoutSession {
            id,
            date: parse_date_text(&workout.date)
                .map_or_else(|| self.fallback_date.clone(), format_iso),
            body_part: workout.body_part.clone(),
            note: workout.note.clone(),
            exercises: workout
                .exercises
                .iter()
                .zip(exercise_ids)
                .map(|(exercise, id)| Exercise {
                    id,
                    ..exercise.clone()
                })
                .collect(),
        }
    }
}

/// Normalize raw category templates. Non-objects yield an empty map.
///
/// Templates carry no dates, so this needs no normalization timestamp.
pub fn custom_workouts(raw: &Value) -> CategoryTemplates {
    let Some(categories) = raw.as_object() else {
        return CategoryTemplates::new();
    };
    collect_categories(categories.iter().map(|(key, items)| {
        let templates: Vec<ExerciseTemplate> = items
            .as_array()
            .map(|items| items.iter().filter_map(template).collect())
            .unwrap_or_default();
        (key.as_str(), templates)
    }))
}

/// Lower-case and trim a category name.
pub fn category_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Build a category map from `(raw key, templates)` pairs. Keys are
/// normalized; blank keys are dropped and colliding keys concatenate.
fn collect_categories<'a, I>(entries: I) -> CategoryTemplates
where
    I: IntoIterator<Item = (&'a str, Vec<ExerciseTemplate>)>,
{
    let mut out = CategoryTemplates::new();
    for (raw_key, templates) in entries {
        let key = category_key(raw_key);
        if key.is_empty() {
            continue;
        }
        out.entry(key).or_default().extend(templates);
    }
    out
}

/// Upgrade one template list item. Bare strings are the legacy format.
fn template(raw: &Value) -> Option<ExerciseTemplate> {
    let template = match raw {
        Value::String(name) => ExerciseTemplate::named(name.clone()),
        Value::Object(fields) => ExerciseTemplate {
            name: object_text(fields, "name").unwrap_or_default().to_string(),
            note: object_text(fields, "note").unwrap_or_default().to_string(),
        },
        _ => return None,
    };
    if template.name.trim().is_empty() {
        return None;
    }
    Some(template)
}

fn sets(raw: Option<&Value>) -> Vec<SetEntry> {
    let Some(items) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|item| item.is_object())
        .map(|item| SetEntry {
            weight: numeric_text(item.get("weight")),
            reps: numeric_text(item.get("reps")),
        })
        .collect()
}

fn numeric_text(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number_to_text(number),
        _ => String::new(),
    }
}

fn text_field<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(Value::as_str)
}

fn object_text<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}
