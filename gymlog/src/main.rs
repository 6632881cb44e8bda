//! Offline workout tracker CLI.
//!
//! State lives under `<root>/.gymlog/`: `config.toml` plus one JSON file per
//! storage slot. An unfinished workout survives restarts and is resumed by the
//! next command.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};

use gymlog::core::progress::{exercise_history, performed_exercises, personal_best};
use gymlog::core::session::FinishOutcome;
use gymlog::core::types::{AppState, ExerciseTemplate, SetEntry, View};
use gymlog::exit_codes;
use gymlog::io::init::{InitOptions, init_tracker};
use gymlog::io::kv::DirStore;
use gymlog::io::transfer::{export_file_name, read_import_text, render_export, write_export};
use gymlog::logging;
use gymlog::tracker::Tracker;

#[derive(Parser)]
#[command(name = "gymlog", version, about = "Offline workout tracker")]
struct Cli {
    /// Data root containing `.gymlog/`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `.gymlog/` with a default config.
    Init {
        /// Overwrite an existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Show the resume view, the draft and stored totals.
    Status,
    /// Write a versioned export document.
    Export {
        /// Output file, or `-` for stdout. Defaults to a dated file in the root.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace history and categories from an export document.
    Import {
        file: PathBuf,
        /// Validate and summarize without applying.
        #[arg(long)]
        dry_run: bool,
    },
    /// Start a workout from a category's templates.
    Start { category: String },
    /// Log a set for an exercise in the current workout.
    Set {
        exercise: String,
        weight: String,
        reps: String,
        /// Replace the set at this position instead of appending.
        #[arg(long)]
        index: Option<usize>,
    },
    /// Remove a logged set from the current workout.
    RemoveSet { exercise: String, index: usize },
    /// Save the current workout to history.
    Finish,
    /// Drop the current workout.
    Discard,
    /// List saved workouts, or one exercise's history.
    History { exercise: Option<String> },
    /// Delete a saved workout.
    Delete { id: String },
    /// Heaviest logged weight for an exercise.
    Best { exercise: String },
    /// Edit categories and their exercise templates.
    #[command(subcommand)]
    Category(CategoryCommand),
}

#[derive(Subcommand)]
enum CategoryCommand {
    Add {
        name: String,
    },
    Rename {
        from: String,
        to: String,
    },
    Remove {
        name: String,
    },
    AddExercise {
        category: String,
        name: String,
        #[arg(long, default_value = "")]
        note: String,
    },
    EditExercise {
        category: String,
        index: usize,
        name: String,
        #[arg(long, default_value = "")]
        note: String,
    },
    RemoveExercise {
        category: String,
        index: usize,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let root = cli.root.as_path();
    match cli.command {
        Command::Init { force } => cmd_init(root, force),
        Command::Status => cmd_status(root),
        Command::Export { out } => cmd_export(root, out.as_deref()),
        Command::Import { file, dry_run } => cmd_import(root, &file, dry_run),
        Command::History { exercise } => cmd_history(root, exercise.as_deref()),
        Command::Best { exercise } => cmd_best(root, &exercise),
        Command::Start { category } => edit(root, |tracker| {
            tracker.start_workout(&category, Utc::now())?;
            println!("started {} workout", category.trim().to_lowercase());
            Ok(())
        }),
        Command::Set {
            exercise,
            weight,
            reps,
            index,
        } => edit(root, |tracker| {
            Ok(tracker.log_set(&exercise, SetEntry::new(weight, reps), index)?)
        }),
        Command::RemoveSet { exercise, index } => {
            edit(root, |tracker| Ok(tracker.remove_set(&exercise, index)?))
        }
        Command::Finish => edit(root, |tracker| {
            match tracker.finish_workout()? {
                FinishOutcome::Saved { id } => println!("saved workout {id}"),
                FinishOutcome::Discarded => println!("no sets logged; workout discarded"),
            }
            Ok(())
        }),
        Command::Discard => edit(root, |tracker| Ok(tracker.discard_workout()?)),
        Command::Delete { id } => edit(root, |tracker| Ok(tracker.delete_workout(&id)?)),
        Command::Category(command) => edit(root, |tracker| edit_category(tracker, command)),
    }
}

fn open(root: &Path) -> Result<Tracker<DirStore>> {
    let (tracker, _) = Tracker::open_dir(root, Utc::now())?;
    Ok(tracker)
}

fn cmd_init(root: &Path, force: bool) -> Result<i32> {
    let paths = init_tracker(root, &InitOptions { force })?;
    println!("initialized {}", paths.tracker_dir.display());
    Ok(exit_codes::OK)
}

fn cmd_status(root: &Path) -> Result<i32> {
    let tracker = open(root)?;
    let state = tracker.state();
    match (tracker.resume_view(), &state.current_draft) {
        (View::ActiveWorkout, Some(draft)) => {
            println!("workout in progress: {} ({})", draft.body_part, draft.date);
            for exercise in &draft.exercises {
                let sets: Vec<String> = exercise
                    .sets
                    .iter()
                    .map(|set| format!("{}x{}", set.weight, set.reps))
                    .collect();
                println!("  {:<24} {}", exercise.name, sets.join(" "));
            }
        }
        _ => println!("no workout in progress"),
    }
    print_totals(state);
    Ok(exit_codes::OK)
}

fn print_totals(state: &AppState) {
    println!("workouts: {}", state.workouts.len());
    for (category, templates) in &state.custom_workouts {
        println!("  {category}: {} exercises", templates.len());
    }
    if let Some(last) = &state.last_workout_session {
        println!("last workout: {} {} ({})", last.id, last.body_part, last.date);
    }
}

fn cmd_export(root: &Path, out: Option<&Path>) -> Result<i32> {
    let (tracker, config) = Tracker::open_dir(root, Utc::now())?;
    let now = Utc::now();
    let envelope = tracker.export(now);
    match out {
        Some(path) if path == Path::new("-") => {
            print!("{}", render_export(&envelope, config.export.pretty)?);
        }
        _ => {
            let path = out.map_or_else(
                || root.join(export_file_name(&now.format("%Y-%m-%d").to_string())),
                Path::to_path_buf,
            );
            write_export(&path, &envelope, config.export.pretty)
                .with_context(|| format!("export to {}", path.display()))?;
            println!("exported {} workouts to {}", envelope.data.workouts.len(), path.display());
        }
    }
    Ok(exit_codes::OK)
}

fn cmd_import(root: &Path, file: &Path, dry_run: bool) -> Result<i32> {
    let mut tracker = open(root)?;
    let text = read_import_text(file)?;
    let pending = match tracker.preview_import(&text, Utc::now()) {
        Ok(pending) => pending,
        Err(err) => {
            eprintln!("import rejected: {err}");
            return Ok(exit_codes::IMPORT_REJECTED);
        }
    };
    let summary = pending.summary;
    println!(
        "{} categories, {} exercises, {} workouts",
        summary.categories, summary.templates, summary.workouts
    );
    if dry_run {
        println!("dry run: nothing changed");
        return Ok(exit_codes::OK);
    }
    tracker.apply_import(pending);
    println!("import applied");
    Ok(exit_codes::OK)
}

fn cmd_history(root: &Path, exercise: Option<&str>) -> Result<i32> {
    let tracker = open(root)?;
    let workouts = &tracker.state().workouts;
    match exercise {
        Some(name) => {
            for entry in exercise_history(workouts, name) {
                let sets: Vec<String> = entry
                    .sets
                    .iter()
                    .map(|set| format!("{}x{}", set.weight, set.reps))
                    .collect();
                println!("{} {} {}", entry.date, entry.workout_id, sets.join(" "));
            }
        }
        None => {
            for workout in workouts.iter().rev() {
                println!(
                    "{} {} {} ({} exercises)",
                    workout.id,
                    workout.date,
                    workout.body_part,
                    workout.exercises.len()
                );
            }
            let performed = performed_exercises(workouts);
            if !performed.is_empty() {
                println!("exercises: {}", performed.join(", "));
            }
        }
    }
    Ok(exit_codes::OK)
}

fn cmd_best(root: &Path, exercise: &str) -> Result<i32> {
    let tracker = open(root)?;
    match personal_best(&tracker.state().workouts, exercise) {
        Some(best) => println!("{exercise}: {best}"),
        None => println!("{exercise}: no logged weight"),
    }
    Ok(exit_codes::OK)
}

/// Open the tracker, apply one edit, and report success.
fn edit<F>(root: &Path, apply: F) -> Result<i32>
where
    F: FnOnce(&mut Tracker<DirStore>) -> Result<()>,
{
    let mut tracker = open(root)?;
    apply(&mut tracker)?;
    Ok(exit_codes::OK)
}

fn edit_category(tracker: &mut Tracker<DirStore>, command: CategoryCommand) -> Result<()> {
    match command {
        CategoryCommand::Add { name } => tracker.add_category(&name)?,
        CategoryCommand::Rename { from, to } => tracker.rename_category(&from, &to)?,
        CategoryCommand::Remove { name } => tracker.delete_category(&name)?,
        CategoryCommand::AddExercise {
            category,
            name,
            note,
        } => tracker.add_template(&category, ExerciseTemplate { name, note })?,
        CategoryCommand::EditExercise {
            category,
            index,
            name,
            note,
        } => tracker.update_template(&category, index, ExerciseTemplate { name, note })?,
        CategoryCommand::RemoveExercise { category, index } => {
            tracker.remove_template(&category, index)?;
        }
    }
    Ok(())
}
