//! # Library Manager Module
//!
//! ## Purpose
//! Central place for the locations the crate reads rate data from: the
//! directories scanned for REACLIB and tabulated rate files, the optional
//! nuclide property table and the file extensions that are never rates.
//!
//! ## Architecture
//! - **LibraryConfig**: serializable configuration, persisted as `rates_config.json`
//! - **LibraryManager**: loads, validates, updates and saves the configuration
//! - **Global Access**: `OnceLock<Mutex<_>>` singleton behind
//!   [`with_library_manager`] / [`with_library_manager_mut`]
//!
//! The environment variable `NUCRATES_LIBRARY_PATH` (a path list in the
//! platform's `PATH` syntax) is searched before the configured directories.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "search_paths": ["library"],
//!   "nuclide_table": "library/nuclides.txt",
//!   "skip_extensions": ["md", "dat", "py", "ipynb", "json"]
//! }
//! ```
//!
//! ## Usage Patterns
//!
//! ### Read-only Access
//! ```rust
//! use NucRates::library_manager::with_library_manager;
//!
//! let paths = with_library_manager(|manager| manager.search_paths());
//! ```
//!
//! ### Mutable Access
//! ```rust,no_run
//! use NucRates::library_manager::with_library_manager_mut;
//!
//! with_library_manager_mut(|manager| manager.add_search_path("my_rates")).unwrap();
//! ```

use crate::Nuclei::nuclide_table::NuclideTable;
use crate::rate_error::{RateError, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Environment variable holding extra rate directories.
pub const LIBRARY_PATH_ENV: &str = "NUCRATES_LIBRARY_PATH";
/// Default name of the persisted configuration.
pub const CONFIG_FILE: &str = "rates_config.json";

/// Locations of rate data.
///
/// # Fields
/// * `search_paths` - directories scanned (recursively) for rate files, in priority order
/// * `nuclide_table` - optional "Z A spin mass_excess" table used for annotation and reverse rates
/// * `skip_extensions` - file extensions that are never rate files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryConfig {
    pub search_paths: Vec<String>,
    #[serde(default)]
    pub nuclide_table: Option<String>,
    #[serde(default = "default_skip_extensions")]
    pub skip_extensions: Vec<String>,
}

fn default_skip_extensions() -> Vec<String> {
    ["md", "dat", "py", "ipynb", "json"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            search_paths: vec!["library".to_string()],
            nuclide_table: None,
            skip_extensions: default_skip_extensions(),
        }
    }
}

fn missing(path: &str) -> RateError {
    RateError::Io(io::Error::new(
        io::ErrorKind::NotFound,
        format!("path does not exist: {}", path),
    ))
}

/// Owns the current configuration and the file it is persisted to.
#[derive(Debug, Clone)]
pub struct LibraryManager {
    config: LibraryConfig,
    config_file: String,
}

impl Default for LibraryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryManager {
    /// Loads `rates_config.json` from the current directory, falling back to
    /// the defaults when it is absent or unreadable.
    pub fn new() -> Self {
        Self::with_config_file(CONFIG_FILE)
    }

    pub fn with_config_file(config_file: &str) -> Self {
        let config = Self::load_config(config_file).unwrap_or_else(|e| {
            warn!("ignoring configuration '{}': {}", config_file, e);
            LibraryConfig::default()
        });
        Self {
            config,
            config_file: config_file.to_string(),
        }
    }

    /// Reads a configuration file; a missing file gives the defaults.
    pub fn load_config(config_file: &str) -> Result<LibraryConfig> {
        if Path::new(config_file).exists() {
            let content = fs::read_to_string(config_file)?;
            let config: LibraryConfig = serde_json::from_str(&content)?;
            info!("rate library configuration loaded from '{}'", config_file);
            Ok(config)
        } else {
            Ok(LibraryConfig::default())
        }
    }

    /// Persists the configuration. Does nothing in tests so that the real
    /// configuration file is never touched.
    pub fn save_config(&self) -> Result<()> {
        #[cfg(test)]
        {
            Ok(())
        }

        #[cfg(not(test))]
        {
            self.save_config_to(Path::new(&self.config_file))
        }
    }

    pub fn save_config_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.config)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Directories to scan: entries of `NUCRATES_LIBRARY_PATH` first, then
    /// the configured search paths.
    pub fn search_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = env::var_os(LIBRARY_PATH_ENV)
            .map(|v| env::split_paths(&v).filter(|p| !p.as_os_str().is_empty()).collect())
            .unwrap_or_default();
        paths.extend(self.config.search_paths.iter().map(PathBuf::from));
        paths
    }

    pub fn skip_extensions(&self) -> &[String] {
        &self.config.skip_extensions
    }

    pub fn nuclide_table_path(&self) -> Option<&str> {
        self.config.nuclide_table.as_deref()
    }

    /// Appends a directory to the search paths. The directory must exist;
    /// adding a path twice is a no-op.
    pub fn add_search_path(&mut self, path: &str) -> Result<()> {
        if !Path::new(path).is_dir() {
            return Err(missing(path));
        }
        if !self.config.search_paths.iter().any(|p| p == path) {
            self.config.search_paths.push(path.to_string());
            self.save_config()?;
        }
        Ok(())
    }

    pub fn set_nuclide_table(&mut self, path: &str) -> Result<()> {
        if !Path::new(path).is_file() {
            return Err(missing(path));
        }
        self.config.nuclide_table = Some(path.to_string());
        self.save_config()
    }

    /// Reads the configured nuclide table, if any.
    pub fn load_nuclide_table(&self) -> Result<Option<NuclideTable>> {
        match &self.config.nuclide_table {
            Some(path) => Ok(Some(NuclideTable::from_file(Path::new(path))?)),
            None => Ok(None),
        }
    }

    pub fn get_config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn reset_to_defaults(&mut self) -> Result<()> {
        self.config = LibraryConfig::default();
        self.save_config()
    }
}

static GLOBAL_LIBRARY_MANAGER: OnceLock<Mutex<LibraryManager>> = OnceLock::new();

/// Lock on the process-wide manager, created from `rates_config.json` on
/// first use.
pub fn get_library_manager() -> MutexGuard<'static, LibraryManager> {
    GLOBAL_LIBRARY_MANAGER
        .get_or_init(|| Mutex::new(LibraryManager::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn with_library_manager<F, R>(f: F) -> R
where
    F: FnOnce(&LibraryManager) -> R,
{
    let manager = get_library_manager();
    f(&manager)
}

pub fn with_library_manager_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut LibraryManager) -> R,
{
    let mut manager = get_library_manager();
    f(&mut manager)
}
