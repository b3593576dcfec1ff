//! Tests for the configuration loader builder.
//!
//! Responsibilities:
//! - Test layer loading and merge precedence through `ConfigLoader`.
//! - Test environment overrides and interpolation on merged config.
//! - Test dotenv loading and its `DOTENV_DISABLED` gate.
//!
//! Does NOT handle:
//! - Literal grammar (tested in literal.rs).
//! - Single-file loading and the object hook walk (tested in fragment.rs).
//!
//! Invariants:
//! - Tests use `serial_test` to prevent environment variable pollution.
//! - Tests use `global_test_lock()` when they change the working directory.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::sync::Mutex;

use tempfile::TempDir;

use crate::loader::SearchDirs;

pub mod dotenv_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// Three empty temporary directories used as module, entry, and working layers.
pub struct Layers {
    pub module: TempDir,
    pub entry: TempDir,
    pub work: TempDir,
}

impl Layers {
    pub fn new() -> Self {
        Self {
            module: TempDir::new().unwrap(),
            entry: TempDir::new().unwrap(),
            work: TempDir::new().unwrap(),
        }
    }

    pub fn dirs(&self) -> SearchDirs {
        SearchDirs::new(self.module.path(), self.entry.path(), self.work.path())
    }

    pub fn write(dir: &TempDir, name: &str, content: &str) {
        std::fs::write(dir.path().join(name), content).unwrap();
    }
}
