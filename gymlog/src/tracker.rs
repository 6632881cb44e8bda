//! Orchestration: owns the canonical state and persists every change.
//!
//! Each mutation builds the next state with a pure `core` operation and then
//! commits it: the state is replaced, saved, and the draft slot mirrored.
//! A failed operation leaves both memory and storage untouched.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::core::categories;
use crate::core::envelope::{ExportEnvelope, ImportError, ImportExport};
use crate::core::error::EditError;
use crate::core::session::{self, FinishOutcome};
use crate::core::types::{AppState, CategoryTemplates, ExerciseTemplate, SetEntry, View};
use crate::io::config::{TrackerConfig, load_config};
use crate::io::init::TrackerPaths;
use crate::io::kv::{DirStore, KeyValueStore};
use crate::io::storage::StorageGateway;

/// Counts shown before an import is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub categories: usize,
    pub templates: usize,
    pub workouts: usize,
}

impl ImportSummary {
    pub fn of(state: &AppState) -> Self {
        Self {
            categories: state.custom_workouts.len(),
            templates: state.template_count(),
            workouts: state.workouts.len(),
        }
    }
}

/// A validated import waiting for confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImport {
    pub state: AppState,
    pub summary: ImportSummary,
}

pub struct Tracker<S: KeyValueStore> {
    gateway: StorageGateway<S>,
    transfer: ImportExport,
    state: AppState,
}

impl Tracker<DirStore> {
    /// Open the tracker stored under `root/.gymlog/`.
    pub fn open_dir(root: &Path, now: DateTime<Utc>) -> Result<(Self, TrackerConfig)> {
        let paths = TrackerPaths::new(root);
        let config = load_config(&paths.config_path).context("load config.toml")?;
        let tracker = Self::open(
            DirStore::new(&paths.store_dir),
            config.default_categories(),
            now,
        );
        Ok((tracker, config))
    }
}

impl<S: KeyValueStore> Tracker<S> {
    /// Load state from `store`. Never fails; see [`StorageGateway::load`].
    pub fn open(store: S, defaults: CategoryTemplates, now: DateTime<Utc>) -> Self {
        let mut gateway = StorageGateway::new(store, defaults.clone());
        let state = gateway.load(now);
        Self {
            gateway,
            transfer: ImportExport::new(defaults),
            state,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn resume_view(&self) -> View {
        self.state.resume_view()
    }

    pub fn into_store(self) -> S {
        self.gateway.into_store()
    }

    pub fn start_workout(&mut self, category: &str, now: DateTime<Utc>) -> Result<(), EditError> {
        let next = session::start_workout(&self.state, category, now)?;
        self.commit(next);
        Ok(())
    }

    /// Log a set for `exercise`; `index` replaces an existing set instead.
    pub fn log_set(
        &mut self,
        exercise: &str,
        set: SetEntry,
        index: Option<usize>,
    ) -> Result<(), EditError> {
        let next = match index {
            None => session::log_set(&self.state, exercise, set)?,
            Some(index) => {
                let id = self.draft_exercise_id(exercise)?;
                session::update_set(&self.state, &id, index, set)?
            }
        };
        self.commit(next);
        Ok(())
    }

    pub fn remove_set(&mut self, exercise: &str, index: usize) -> Result<(), EditError> {
        let id = self.draft_exercise_id(exercise)?;
        let next = session::remove_set(&self.state, &id, index)?;
        self.commit(next);
        Ok(())
    }

    pub fn finish_workout(&mut self) -> Result<FinishOutcome, EditError> {
        let (next, outcome) = session::finish_workout(&self.state)?;
        info!(outcome = ?outcome, "workout finished");
        self.commit(next);
        Ok(outcome)
    }

    pub fn discard_workout(&mut self) -> Result<(), EditError> {
        let next = session::discard_workout(&self.state)?;
        self.commit(next);
        Ok(())
    }

    pub fn delete_workout(&mut self, id: &str) -> Result<(), EditError> {
        let next = session::delete_workout(&self.state, id)?;
        self.commit(next);
        Ok(())
    }

    pub fn add_category(&mut self, name: &str) -> Result<(), EditError> {
        let next = categories::add_category(&self.state, name)?;
        self.commit(next);
        Ok(())
    }

    pub fn rename_category(&mut self, from: &str, to: &str) -> Result<(), EditError> {
        let next = categories::rename_category(&self.state, from, to)?;
        self.commit(next);
        Ok(())
    }

    pub fn delete_category(&mut self, name: &str) -> Result<(), EditError> {
        let next = categories::delete_category(&self.state, name)?;
        self.commit(next);
        Ok(())
    }

    pub fn add_template(
        &mut self,
        category: &str,
        template: ExerciseTemplate,
    ) -> Result<(), EditError> {
        let next = categories::add_template(&self.state, category, template)?;
        self.commit(next);
        Ok(())
    }

    pub fn update_template(
        &mut self,
        category: &str,
        index: usize,
        template: ExerciseTemplate,
    ) -> Result<(), EditError> {
        let next = categories::update_template(&self.state, category, index, template)?;
        self.commit(next);
        Ok(())
    }

    pub fn remove_template(&mut self, category: &str, index: usize) -> Result<(), EditError> {
        let next = categories::remove_template(&self.state, category, index)?;
        self.commit(next);
        Ok(())
    }

    pub fn export(&self, now: DateTime<Utc>) -> ExportEnvelope {
        self.transfer.build_export_payload(&self.state, now)
    }

    /// Validate import text without touching live state.
    pub fn preview_import(
        &self,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<PendingImport, ImportError> {
        match self.transfer.parse_import(text, now) {
            Ok(state) => {
                let summary = ImportSummary::of(&state);
                info!(
                    workouts = summary.workouts,
                    categories = summary.categories,
                    "import validated"
                );
                Ok(PendingImport { state, summary })
            }
            Err(err) => {
                warn!(kind = ?err.kind(), error = %err, "import rejected");
                Err(err)
            }
        }
    }

    /// Replace history, categories and last session with a validated import.
    /// The in-progress draft is kept.
    pub fn apply_import(&mut self, pending: PendingImport) {
        let next = AppState {
            current_draft: self.state.current_draft.clone(),
            ..pending.state
        };
        self.commit(next);
    }

    fn draft_exercise_id(&self, name: &str) -> Result<String, EditError> {
        let draft = self.state.current_draft.as_ref().ok_or(EditError::NoDraft)?;
        draft
            .exercise_by_name(name)
            .map(|exercise| exercise.id.clone())
            .ok_or_else(|| EditError::UnknownExercise(name.to_string()))
    }

    fn commit(&mut self, next: AppState) {
        self.state = next;
        self.gateway.save(&self.state);
        self.gateway.sync_draft(self.state.current_draft.as_ref());
        debug!(
            workouts = self.state.workouts.len(),
            draft = self.state.current_draft.is_some(),
            "state committed"
        );
    }
}
