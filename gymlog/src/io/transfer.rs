//! Export files out, import file text in.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::envelope::ExportEnvelope;
use crate::io::kv::write_atomic;

/// Render an envelope as JSON text with a trailing newline.
pub fn render_export(envelope: &ExportEnvelope, pretty: bool) -> Result<String> {
    let mut text = if pretty {
        serde_json::to_string_pretty(envelope)
    } else {
        serde_json::to_string(envelope)
    }
    .context("serialize export")?;
    text.push('\n');
    Ok(text)
}

pub fn write_export(path: &Path, envelope: &ExportEnvelope, pretty: bool) -> Result<()> {
    let text = render_export(envelope, pretty)?;
    write_atomic(path, &text)
}

/// Default export file name for a given `YYYY-MM-DD` day.
pub fn export_file_name(day: &str) -> String {
    format!("gym-tracker-export-{day}.json")
}

/// Read an import file. Bytes that are not UTF-8 are decoded lossily and
/// then fail as invalid JSON during validation.
pub fn read_import_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("read import file {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::envelope::{ImportError, ImportExport};
    use crate::core::types::AppState;
    use crate::test_support::{default_categories, fixed_now, session_with_sets};

    #[test]
    fn written_export_reads_back_as_import() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(export_file_name("2025-06-01"));
        let service = ImportExport::new(default_categories());
        let state = AppState {
            workouts: vec![session_with_sets("w1", "pull")],
            custom_workouts: default_categories(),
            ..AppState::default()
        };

        write_export(&path, &service.build_export_payload(&state, fixed_now()), true)
            .expect("write");
        let text = read_import_text(&path).expect("read");
        assert!(text.starts_with("{\n  \"schemaVersion\": 1,"));
        let imported = service.parse_import(&text, fixed_now()).expect("import");
        assert_eq!(imported, state);
    }

    #[test]
    fn compact_export_is_single_line() {
        let service = ImportExport::new(default_categories());
        let text = render_export(
            &service.build_export_payload(&AppState::default(), fixed_now()),
            false,
        )
        .expect("render");
        assert_eq!(text.lines().count(), 1);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn non_utf8_import_is_rejected_as_invalid_json() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("backup.json");
        fs::write(&path, [0xff, 0xfe, b'{']).expect("write");

        let text = read_import_text(&path).expect("read");
        let err = ImportExport::new(default_categories())
            .parse_import(&text, fixed_now())
            .expect_err("should reject");
        assert!(matches!(err, ImportError::Json(_)));
    }

    #[test]
    fn missing_import_file_has_context() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = read_import_text(&temp.path().join("nope.json")).expect_err("should fail");
        assert!(err.to_string().contains("read import file"));
    }
}
