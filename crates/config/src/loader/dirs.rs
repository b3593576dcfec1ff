//! Candidate directory resolution for layered config files.
//!
//! Responsibilities:
//! - Hold the three candidate directories in fixed precedence order.
//! - Deduplicate candidates while preserving first occurrence.
//! - Discover the directories from process state when the caller does not supply them.
//!
//! Does NOT handle:
//! - Checking whether directories or files exist (see fragment.rs).
//!
//! Invariants:
//! - Order is always: configuration directory, entry-point directory, working directory.
//! - Duplicate or nonexistent directories are never an error.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::error::ConfigError;
use crate::constants::SEARCH_DIR_COUNT;

/// Ordered candidate directories searched for a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDirs {
    candidates: [PathBuf; SEARCH_DIR_COUNT],
}

impl SearchDirs {
    /// Build from explicit directories.
    pub fn new(
        module_dir: impl Into<PathBuf>,
        entry_dir: impl Into<PathBuf>,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            candidates: [module_dir.into(), entry_dir.into(), work_dir.into()],
        }
    }

    /// Discover the candidate directories for `app_name` from process state.
    ///
    /// - Configuration directory: the platform config dir for `app_name`
    ///   (e.g. `~/.config/<app_name>` on Linux).
    /// - Entry-point directory: the directory containing `argv[0]`, made
    ///   absolute against the working directory.
    /// - Working directory: `std::env::current_dir()`.
    pub fn discover(app_name: &str) -> Result<Self, ConfigError> {
        Self::try_discover(app_name).map_err(|e| ConfigError::ConfigDirUnavailable(e.to_string()))
    }

    fn try_discover(app_name: &str) -> Result<Self, anyhow::Error> {
        let module_dir = directories::ProjectDirs::from("", "", app_name)
            .context("Failed to determine project directories")?
            .config_dir()
            .to_path_buf();
        let work_dir = std::env::current_dir().context("Failed to read working directory")?;
        let entry_dir = entry_point_dir(&work_dir)?;
        Ok(Self::new(module_dir, entry_dir, work_dir))
    }

    /// All candidates in precedence order, duplicates included.
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Candidates with duplicates removed, first occurrence kept.
    pub fn unique(&self) -> Vec<&Path> {
        let mut unique: Vec<&Path> = Vec::with_capacity(SEARCH_DIR_COUNT);
        for dir in &self.candidates {
            if !unique.contains(&dir.as_path()) {
                unique.push(dir.as_path());
            }
        }
        unique
    }
}

/// Directory containing the running program's entry point.
fn entry_point_dir(work_dir: &Path) -> Result<PathBuf, anyhow::Error> {
    let entry = match std::env::args_os().next() {
        Some(arg0) if !arg0.is_empty() => work_dir.join(arg0),
        _ => std::env::current_exe().context("Failed to locate the running executable")?,
    };
    let dir = entry
        .parent()
        .with_context(|| format!("Entry point {} has no parent directory", entry.display()))?;
    Ok(dir.to_path_buf())
}
