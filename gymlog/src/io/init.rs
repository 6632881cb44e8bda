//! Initialization helpers for `.gymlog/` scaffolding.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::info;

use crate::io::config::{TrackerConfig, write_config};

/// All canonical paths within `.gymlog/` for a data root.
#[derive(Debug, Clone)]
pub struct TrackerPaths {
    pub root: PathBuf,
    pub tracker_dir: PathBuf,
    pub config_path: PathBuf,
    /// Directory backing the slot store.
    pub store_dir: PathBuf,
}

impl TrackerPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let tracker_dir = root.join(".gymlog");
        Self {
            root: root.clone(),
            tracker_dir: tracker_dir.clone(),
            config_path: tracker_dir.join("config.toml"),
            store_dir: tracker_dir.join("store"),
        }
    }
}

/// Options for `init_tracker`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite an existing config.
    pub force: bool,
}

/// Create `.gymlog/` scaffolding in `root`.
///
/// Fails if `.gymlog/` already exists unless `options.force` is set. Stored
/// slots are never touched.
pub fn init_tracker(root: &Path, options: &InitOptions) -> Result<TrackerPaths> {
    let paths = TrackerPaths::new(root);
    if paths.tracker_dir.exists() && !paths.tracker_dir.is_dir() {
        return Err(anyhow!("gymlog init: .gymlog exists but is not a directory"));
    }
    if paths.tracker_dir.exists() && !options.force {
        return Err(anyhow!(
            "gymlog init: .gymlog already exists (use --force to overwrite)"
        ));
    }

    fs::create_dir_all(&paths.store_dir)
        .with_context(|| format!("create directory {}", paths.store_dir.display()))?;
    write_config(&paths.config_path, &TrackerConfig::default())?;
    info!(root = %root.display(), "initialized tracker");
    Ok(paths)
}
