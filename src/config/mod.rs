//! Tool configuration.
//!
//! Consolidates configuration from tiers with field-by-field YAML merging:
//! 1. **Defaults** - embedded
//! 2. **Project** - `$CWD/geo2sql.yaml`
//! 3. **User** - `~/.geo2sql/config.yaml`
//! 4. **Environment** - variables below
//!
//! ## Environment Variables
//! - `GEO2SQL_CONFIG_PATH` - Explicit config file (replaces project and user tiers)
//! - `GEO2SQL_PROJECT_DIR` - Project config dir (default: `.`)
//! - `GEO2SQL_USER_DIR` - User config dir (default: `~/.geo2sql`)
//! - `GEO2SQL_JOBS` - Worker threads for item resolution
//! - `GEO2SQL_EXTENSIONS` - Comma-separated item extensions

mod loader;
mod merge;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, ConfigTier, PROJECT_CONFIG_FILE, USER_CONFIG_FILE};
pub use merge::{deep_merge, deep_merge_all};
pub use types::*;
