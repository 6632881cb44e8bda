//! Read-only progress queries over finished sessions.
//!
//! Set values are stored as typed text; this is the only place they are read
//! as numbers.

use std::collections::HashSet;

use crate::core::types::{SetEntry, WorkoutSession};

/// Sets recorded for one exercise in one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub workout_id: String,
    pub date: String,
    pub sets: Vec<SetEntry>,
}

/// Heaviest parseable weight ever logged for `exercise`.
pub fn personal_best(workouts: &[WorkoutSession], exercise: &str) -> Option<f64> {
    workouts
        .iter()
        .flat_map(|workout| &workout.exercises)
        .filter(|performed| same_name(&performed.name, exercise))
        .flat_map(|performed| &performed.sets)
        .filter_map(|set| parse_weight(&set.weight))
        .fold(None, |best: Option<f64>, weight| {
            Some(best.map_or(weight, |current| current.max(weight)))
        })
}

/// Sessions containing `exercise`, newest first.
pub fn exercise_history(workouts: &[WorkoutSession], exercise: &str) -> Vec<HistoryEntry> {
    workouts
        .iter()
        .rev()
        .filter_map(|workout| {
            let performed = workout
                .exercises
                .iter()
                .find(|performed| same_name(&performed.name, exercise))?;
            Some(HistoryEntry {
                workout_id: workout.id.clone(),
                date: workout.date.clone(),
                sets: performed.sets.clone(),
            })
        })
        .collect()
}

/// Distinct exercise names with at least one logged set, first-seen order.
pub fn performed_exercises(workouts: &[WorkoutSession]) -> Vec<String> {
    let mut seen = HashSet::new();
    workouts
        .iter()
        .flat_map(|workout| &workout.exercises)
        .filter(|performed| performed.has_sets())
        .filter(|performed| seen.insert(performed.name.as_str()))
        .map(|performed| performed.name.clone())
        .collect()
}

fn same_name(recorded: &str, wanted: &str) -> bool {
    recorded.trim().eq_ignore_ascii_case(wanted.trim())
}

fn parse_weight(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|weight| weight.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Exercise;
    use crate::test_support::session;

    fn performed(name: &str, weights: &[&str]) -> Exercise {
        Exercise {
            id: name.to_lowercase(),
            name: name.to_string(),
            note: String::new(),
            sets: weights.iter().map(|w| SetEntry::new(*w, "5")).collect(),
        }
    }

    fn history() -> Vec<WorkoutSession> {
        let mut first = session("w1", "legs");
        first.exercises = vec![performed("Squat", &["100", "7", "abc"])];
        let mut second = session("w2", "legs");
        second.exercises = vec![performed("Squat", &["102.5", ""]), performed("Lunge", &[])];
        let mut third = session("w3", "push");
        third.exercises = vec![performed("Bench", &["60"])];
        vec![first, second, third]
    }

    #[test]
    fn personal_best_ignores_unparseable_weights() {
        assert_eq!(personal_best(&history(), "Squat"), Some(102.5));
        assert_eq!(personal_best(&history(), " squat"), Some(102.5));
        assert_eq!(personal_best(&history(), "Deadlift"), None);
    }

    #[test]
    fn history_is_newest_first() {
        let entries = exercise_history(&history(), "Squat");
        let ids: Vec<&str> = entries.iter().map(|e| e.workout_id.as_str()).collect();
        assert_eq!(ids, vec!["w2", "w1"]);
        assert_eq!(entries[1].sets.len(), 3);
    }

    #[test]
    fn performed_exercises_skip_empty_and_repeat_entries() {
        assert_eq!(performed_exercises(&history()), vec!["Squat", "Bench"]);
    }
}
