use thiserror::Error;

/// A user-driven edit that cannot be applied to the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no workout in progress")]
    NoDraft,
    #[error("a workout is already in progress (finish or discard it first)")]
    DraftInProgress,
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("category '{0}' already exists")]
    CategoryExists(String),
    #[error("cannot delete '{0}': at least one category is required")]
    LastCategory(String),
    #[error("name must not be empty")]
    EmptyName,
    #[error("unknown workout '{0}'")]
    UnknownWorkout(String),
    #[error("unknown exercise '{0}'")]
    UnknownExercise(String),
    #[error("no entry at position {index} (have {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

pub(crate) fn check_index(index: usize, len: usize) -> Result<(), EditError> {
    if index >= len {
        return Err(EditError::IndexOutOfRange { index, len });
    }
    Ok(())
}
