//! Versioned export envelope and import validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::normalize::Normalizer;
use crate::core::timestamp::format_iso;
use crate::core::types::{AppState, CategoryTemplates, WorkoutSession};

/// The only envelope version this build reads or writes.
pub const SCHEMA_VERSION: u32 = 1;

/// Export file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub schema_version: u32,
    pub export_date: String,
    pub data: ExportData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub workouts: Vec<WorkoutSession>,
    pub custom_workouts: CategoryTemplates,
    pub last_workout_session: Option<WorkoutSession>,
}

/// Broad class of an import rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportErrorKind {
    /// Input is not an envelope-shaped document.
    Shape,
    /// Envelope carries a schema version this build does not read.
    Version,
}

/// Why an import was rejected. Messages are shown to the user verbatim.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid JSON file. Please choose a valid export.")]
    Json(#[source] serde_json::Error),
    #[error("Import failed: JSON must be an object.")]
    NotAnObject,
    #[error("Unsupported schema version: {found}.")]
    UnsupportedVersion { found: String },
    #[error("Import failed: missing \"data\" section.")]
    MissingData,
}

impl ImportError {
    pub fn kind(&self) -> ImportErrorKind {
        match self {
            ImportError::UnsupportedVersion { .. } => ImportErrorKind::Version,
            ImportError::Json(_) | ImportError::NotAnObject | ImportError::MissingData => {
                ImportErrorKind::Shape
            }
        }
    }
}

/// Builds export envelopes and validates imports.
///
/// `defaults` replaces the category set of an import that carries none.
#[derive(Debug, Clone)]
pub struct ImportExport {
    defaults: CategoryTemplates,
}

impl ImportExport {
    pub fn new(defaults: CategoryTemplates) -> Self {
        Self { defaults }
    }

    /// Wrap the canonical form of `state` in a versioned envelope. The draft
    /// is not exported.
    pub fn build_export_payload(&self, state: &AppState, now: DateTime<Utc>) -> ExportEnvelope {
        let normalizer = Normalizer::new(now);
        ExportEnvelope {
            schema_version: SCHEMA_VERSION,
            export_date: format_iso(now),
            data: ExportData {
                workouts: normalizer.canonical_workouts(&state.workouts),
                custom_workouts: normalizer.canonical_custom_workouts(&state.custom_workouts),
                last_workout_session: state
                    .last_workout_session
                    .as_ref()
                    .map(|session| normalizer.canonical_session(session)),
            },
        }
    }

    /// Parse import file text, then validate it.
    pub fn parse_import(&self, text: &str, now: DateTime<Utc>) -> Result<AppState, ImportError> {
        let payload: Value = serde_json::from_str(text).map_err(ImportError::Json)?;
        self.validate_and_normalize_import(&payload, now)
    }

    /// Validate an untrusted envelope and normalize its data.
    ///
    /// All structural checks run before any normalization; the returned state
    /// never carries a draft.
    pub fn validate_and_normalize_import(
        &self,
        payload: &Value,
        now: DateTime<Utc>,
    ) -> Result<AppState, ImportError> {
        let envelope = payload.as_object().ok_or(ImportError::NotAnObject)?;
        check_schema_version(envelope.get("schemaVersion"))?;
        let data = envelope
            .get("data")
            .filter(|data| data.is_object())
            .ok_or(ImportError::MissingData)?;

        let normalizer = Normalizer::new(now);
        let workouts = normalizer.workouts(data.get("workouts").unwrap_or(&Value::Null));
        let custom_workouts =
            normalizer.custom_workouts(data.get("customWorkouts").unwrap_or(&Value::Null));
        let custom_workouts = if custom_workouts.is_empty() {
            self.defaults.clone()
        } else {
            custom_workouts
        };
        let last_workout_session = data
            .get("lastWorkoutSession")
            .and_then(|session| normalizer.session(session));

        Ok(AppState {
            workouts,
            custom_workouts,
            current_draft: None,
            last_workout_session,
        })
    }
}

fn check_schema_version(raw: Option<&Value>) -> Result<(), ImportError> {
    let supported = raw
        .and_then(Value::as_f64)
        .is_some_and(|version| version == f64::from(SCHEMA_VERSION));
    if supported {
        return Ok(());
    }
    let found = match raw {
        None | Some(Value::Null) => "missing".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    };
    Err(ImportError::UnsupportedVersion { found })
}
