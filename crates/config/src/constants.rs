//! Centralized constants for the layered configuration crate.
//!
//! This module contains default values and fixed tables used across
//! modules to avoid magic string duplication.

// =============================================================================
// File Layers
// =============================================================================

/// Default configuration file name searched for in every candidate directory.
pub const DEFAULT_CONFIG_NAME: &str = "config.json";

/// Number of candidate directories searched by the loader.
pub const SEARCH_DIR_COUNT: usize = 3;

// =============================================================================
// Environment
// =============================================================================

/// Environment variable that disables `.env` loading when set to `1` or `true`.
pub const DOTENV_DISABLED_VAR: &str = "DOTENV_DISABLED";

// =============================================================================
// URL Schemes
// =============================================================================

/// Ordered table of bare database schemes and their async driver schemes.
///
/// The first matching prefix wins, so longer prefixes that share a stem
/// (`postgresql` vs `postgres`) must come first.
pub const DRIVER_SCHEMES: &[(&str, &str)] = &[
    ("sqlite", "sqlite+aiosqlite"),
    ("postgresql", "postgresql+asyncpg"),
    ("postgres", "postgresql+asyncpg"),
    ("mysql", "mysql+aiomysql"),
];
