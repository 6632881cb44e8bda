//! Tracker configuration stored under `.gymlog/config.toml`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::normalize::custom_workouts;
use crate::core::types::CategoryTemplates;
use crate::io::kv::write_atomic;

/// Tracker configuration (TOML).
///
/// Meant to be edited by hand. Missing fields fall back to the built-in
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TrackerConfig {
    pub export: ExportConfig,

    /// Built-in category set: used when storage holds no categories and when
    /// an import carries none.
    pub categories: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportConfig {
    /// Pretty-print export files.
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let categories = [
            (
                "push",
                [
                    "Bench Press",
                    "Overhead Press",
                    "Incline Dumbbell Press",
                    "Tricep Pushdown",
                    "Lateral Raise",
                ],
            ),
            (
                "pull",
                [
                    "Pull-ups",
                    "Barbell Row",
                    "Lat Pulldown",
                    "Barbell Curl",
                    "Face Pull",
                ],
            ),
            (
                "legs",
                [
                    "Squat",
                    "Leg Press",
                    "Romanian Deadlift",
                    "Leg Curl",
                    "Calf Raise",
                ],
            ),
        ]
        .into_iter()
        .map(|(category, names)| {
            (
                category.to_string(),
                names.iter().map(|name| name.to_string()).collect(),
            )
        })
        .collect();
        Self {
            export: ExportConfig::default(),
            categories,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.default_categories().is_empty() {
            return Err(anyhow!("categories must define at least one category"));
        }
        Ok(())
    }

    /// Normalized built-in categories. Configured names go through the same
    /// path as legacy bare-string template lists.
    pub fn default_categories(&self) -> CategoryTemplates {
        let raw = Value::Object(
            self.categories
                .iter()
                .map(|(category, names)| {
                    let names = names.iter().cloned().map(Value::String).collect();
                    (category.clone(), Value::Array(names))
                })
                .collect(),
        );
        custom_workouts(&raw)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `TrackerConfig::default()`.
pub fn load_config(path: &Path) -> Result<TrackerConfig> {
    if !path.exists() {
        let cfg = TrackerConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: TrackerConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &TrackerConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}
