//! Canonical in-memory state shared by every layer.
//!
//! Field names serialize in camelCase so stored slots and export files stay
//! compatible with data written by earlier releases.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One performed set. Values are kept as typed text so partially entered
/// numbers (`"7"` on the way to `"70"`) survive a save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetEntry {
    pub weight: String,
    pub reps: String,
}

impl SetEntry {
    pub fn new(weight: impl Into<String>, reps: impl Into<String>) -> Self {
        Self {
            weight: weight.into(),
            reps: reps.into(),
        }
    }
}

/// An exercise performed inside one session. `id` is unique within the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub note: String,
    pub sets: Vec<SetEntry>,
}

impl Exercise {
    pub fn has_sets(&self) -> bool {
        !self.sets.is_empty()
    }
}

/// A workout session; immutable once appended to `AppState::workouts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub id: String,
    /// ISO-8601 timestamp (`YYYY-MM-DDTHH:MM:SS.mmmZ`).
    pub date: String,
    pub body_part: String,
    pub note: String,
    pub exercises: Vec<Exercise>,
}

impl WorkoutSession {
    /// Case-insensitive lookup by exercise name.
    pub fn exercise_by_name(&self, name: &str) -> Option<&Exercise> {
        let wanted = name.trim();
        self.exercises
            .iter()
            .find(|exercise| exercise.name.trim().eq_ignore_ascii_case(wanted))
    }

    pub fn has_logged_sets(&self) -> bool {
        self.exercises.iter().any(Exercise::has_sets)
    }
}

/// A planned exercise within a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseTemplate {
    pub name: String,
    pub note: String,
}

impl ExerciseTemplate {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            note: String::new(),
        }
    }
}

/// Category key (lower-cased, trimmed) to its planned exercises.
pub type CategoryTemplates = BTreeMap<String, Vec<ExerciseTemplate>>;

/// Which screen the host should open on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    /// A draft was recovered; resume the active workout.
    ActiveWorkout,
}

/// Full application state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Finished sessions, oldest first.
    pub workouts: Vec<WorkoutSession>,
    pub custom_workouts: CategoryTemplates,
    pub current_draft: Option<WorkoutSession>,
    pub last_workout_session: Option<WorkoutSession>,
}

impl AppState {
    pub fn resume_view(&self) -> View {
        if self.current_draft.is_some() {
            View::ActiveWorkout
        } else {
            View::Home
        }
    }

    pub fn workout(&self, id: &str) -> Option<&WorkoutSession> {
        self.workouts.iter().find(|workout| workout.id == id)
    }

    /// Total number of planned exercises across all categories.
    pub fn template_count(&self) -> usize {
        self.custom_workouts.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_serializes_with_camel_case_keys() {
        let session = WorkoutSession {
            id: "w1".to_string(),
            date: "2024-01-02T03:04:05.000Z".to_string(),
            body_part: "legs".to_string(),
            note: String::new(),
            exercises: Vec::new(),
        };
        let value = serde_json::to_value(&session).expect("serialize");
        assert_eq!(value["bodyPart"], "legs");
        assert!(value.get("body_part").is_none());
    }

    #[test]
    fn resume_view_follows_draft_presence() {
        let mut state = AppState::default();
        assert_eq!(state.resume_view(), View::Home);
        state.current_draft = Some(WorkoutSession::default());
        assert_eq!(state.resume_view(), View::ActiveWorkout);
    }

    #[test]
    fn exercise_lookup_ignores_case_and_padding() {
        let session = WorkoutSession {
            exercises: vec![Exercise {
                id: "e1".to_string(),
                name: "Bench Press".to_string(),
                ..Exercise::default()
            }],
            ..WorkoutSession::default()
        };
        assert_eq!(
            session.exercise_by_name(" bench press ").map(|e| e.id.as_str()),
            Some("e1")
        );
        assert!(session.exercise_by_name("squat").is_none());
    }
}
