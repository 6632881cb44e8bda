//! Lifecycle tests against a directory-backed store.
//!
//! Each step reopens the tracker from disk, the way separate CLI invocations
//! do, and checks what survived.

use std::fs;
use std::process::Command;

use gymlog::core::envelope::ImportError;
use gymlog::core::session::FinishOutcome;
use gymlog::core::types::{SetEntry, View};
use gymlog::exit_codes;
use gymlog::io::init::{InitOptions, TrackerPaths, init_tracker};
use gymlog::io::kv::{DirStore, KeyValueStore};
use gymlog::io::storage::Slot;
use gymlog::io::transfer::{read_import_text, render_export};
use gymlog::test_support::{default_categories, fixed_now, temp_dir_store};
use gymlog::tracker::Tracker;

fn reopen(store: DirStore) -> Tracker<DirStore> {
    Tracker::open(store, default_categories(), fixed_now())
}

#[test]
fn interrupted_workout_is_recovered_and_finished() {
    let (_temp, store) = temp_dir_store().expect("store");
    let mut tracker = reopen(store);
    assert_eq!(tracker.resume_view(), View::Home);

    tracker.start_workout("Push", fixed_now()).expect("start");
    tracker
        .log_set("Bench Press", SetEntry::new("60", "8"), None)
        .expect("log");
    tracker
        .log_set("Dips", SetEntry::new("0", "12"), None)
        .expect("log new exercise");

    // Simulated restart.
    let mut tracker = reopen(tracker.into_store());
    assert_eq!(tracker.resume_view(), View::ActiveWorkout);
    let draft = tracker.state().current_draft.clone().expect("draft");
    assert_eq!(draft.body_part, "push");
    assert_eq!(draft.exercises.len(), 6);
    assert_eq!(draft.exercises[5].name, "Dips");

    let outcome = tracker.finish_workout().expect("finish");
    assert_eq!(
        outcome,
        FinishOutcome::Saved {
            id: draft.id.clone()
        }
    );

    let store = tracker.into_store();
    assert!(!store.path_for(Slot::CurrentWorkoutDraft.key()).exists());
    for slot in Slot::ALL {
        if slot != Slot::CurrentWorkoutDraft {
            assert!(store.path_for(slot.key()).exists(), "{}", slot.key());
        }
    }

    let tracker = reopen(store);
    assert_eq!(tracker.resume_view(), View::Home);
    assert_eq!(tracker.state().workouts.len(), 1);
    assert_eq!(
        tracker.state().last_workout_session.as_ref(),
        tracker.state().workouts.last()
    );
}

#[test]
fn corrupt_slot_file_does_not_block_startup() {
    let (_temp, mut store) = temp_dir_store().expect("store");
    store
        .set(Slot::Workouts.key(), "[{\"id\": \"keep\"}]")
        .expect("seed workouts");
    store
        .set(Slot::CustomWorkouts.key(), "{\"push\": [")
        .expect("seed categories");

    let tracker = reopen(store);
    assert_eq!(tracker.state().workouts[0].id, "keep");
    assert_eq!(tracker.state().custom_workouts, default_categories());
    assert!(
        !tracker
            .into_store()
            .path_for(Slot::CustomWorkouts.key())
            .exists()
    );
}

#[test]
fn export_import_moves_history_between_stores() {
    let (_source_dir, source) = temp_dir_store().expect("source");
    let mut tracker = reopen(source);
    tracker.add_category("Cardio").expect("category");
    tracker.start_workout("legs", fixed_now()).expect("start");
    tracker
        .log_set("Squat", SetEntry::new("100", "5"), None)
        .expect("log");
    tracker.finish_workout().expect("finish");
    let exported = render_export(&tracker.export(fixed_now()), true).expect("render");

    let (_target_dir, target) = temp_dir_store().expect("target");
    let mut target = reopen(target);
    target.start_workout("pull", fixed_now()).expect("start");

    let rejected = target
        .preview_import(
            &exported.replace("\"schemaVersion\": 1", "\"schemaVersion\": 2"),
            fixed_now(),
        )
        .expect_err("version 2 is rejected");
    assert!(matches!(rejected, ImportError::UnsupportedVersion { .. }));
    assert!(target.state().workouts.is_empty());

    let pending = target.preview_import(&exported, fixed_now()).expect("preview");
    assert_eq!(pending.summary.workouts, 1);
    assert_eq!(pending.summary.categories, 4);
    target.apply_import(pending);

    let target = reopen(target.into_store());
    assert_eq!(target.state().workouts, tracker.state().workouts);
    assert_eq!(target.state().custom_workouts, tracker.state().custom_workouts);
    assert_eq!(target.resume_view(), View::ActiveWorkout);
}

#[test]
fn cli_import_rejection_uses_its_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    init_tracker(temp.path(), &InitOptions { force: false }).expect("init");
    let file = temp.path().join("backup.json");
    fs::write(&file, "{\"schemaVersion\": 3, \"data\": {}}").expect("write");
    assert!(read_import_text(&file).is_ok());

    let status = Command::new(env!("CARGO_BIN_EXE_gymlog"))
        .arg("--root")
        .arg(temp.path())
        .arg("import")
        .arg(&file)
        .status()
        .expect("gymlog import");
    assert_eq!(status.code(), Some(exit_codes::IMPORT_REJECTED));

    let paths = TrackerPaths::new(temp.path());
    assert!(!paths.store_dir.join("gymWorkouts.json").exists());
}

#[test]
fn cli_rejects_non_utf8_import_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    init_tracker(temp.path(), &InitOptions { force: false }).expect("init");
    let file = temp.path().join("backup.json");
    fs::write(&file, [0xff, 0xfe, b'{']).expect("write");

    let status = Command::new(env!("CARGO_BIN_EXE_gymlog"))
        .arg("--root")
        .arg(temp.path())
        .arg("import")
        .arg(&file)
        .status()
        .expect("gymlog import");
    assert_eq!(status.code(), Some(exit_codes::IMPORT_REJECTED));
}

#[test]
fn cli_records_a_workout_across_invocations() {
    let temp = tempfile::tempdir().expect("tempdir");
    let gymlog = |args: &[&str]| {
        Command::new(env!("CARGO_BIN_EXE_gymlog"))
            .arg("--root")
            .arg(temp.path())
            .args(args)
            .status()
            .expect("gymlog")
            .code()
    };

    assert_eq!(gymlog(&["init"]), Some(exit_codes::OK));
    assert_eq!(gymlog(&["start", "legs"]), Some(exit_codes::OK));
    assert_eq!(gymlog(&["start", "push"]), Some(exit_codes::INVALID));
    assert_eq!(gymlog(&["set", "Squat", "100", "5"]), Some(exit_codes::OK));
    assert_eq!(gymlog(&["finish"]), Some(exit_codes::OK));

    let tracker = reopen(DirStore::new(TrackerPaths::new(temp.path()).store_dir));
    assert_eq!(tracker.state().workouts.len(), 1);
    assert_eq!(tracker.resume_view(), View::Home);
}
