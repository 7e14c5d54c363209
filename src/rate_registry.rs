//! # Rate Registry
//!
//! Discovers rate files under a list of directories, parses them and indexes
//! the resulting rates by [`ReactionSignature`]. Several files may provide a
//! rate for the same reaction; all of them are kept and returned together.
//!
//! Scanning is best effort: a file that fails to parse is skipped and
//! recorded (see [`RateRegistry::skipped`]), and a single warning summarizes
//! the failures. Parsing each individual rate stays strict.
//!
//! A registry is an ordinary value built with [`RateRegistry::scan`] and
//! passed by reference. [`global_registry`] / [`list_known_rates`] build one
//! process-wide instance from the [`crate::library_manager`] configuration on
//! first use; concurrent first calls block until that single scan publishes.
use crate::Nuclei::nucleus::Nucleus;
use crate::Nuclei::nuclide_table::NuclideTable;
use crate::Rates::rate_api::{Rate, RateEvaluator, ReactionSignature};
use crate::library_manager::with_library_manager;
use crate::rate_error::{RateError, Result};
use log::{debug, info, warn};
use prettytable::{Cell, Row, Table};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[derive(Debug, Default)]
pub struct RateRegistry {
    rates: Vec<Rate>,
    index: HashMap<ReactionSignature, Vec<usize>>,
    skipped: Vec<(PathBuf, RateError)>,
    paths: Vec<PathBuf>,
    skip_extensions: Vec<String>,
    table: Option<NuclideTable>,
}

fn is_candidate(path: &Path, skip_extensions: &[String]) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_none_or(|n| n.starts_with('.'));
    let skipped_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| skip_extensions.iter().any(|s| s.eq_ignore_ascii_case(e)));
    !hidden && !skipped_ext
}

/// Files under `dir`, recursively, in name order.
fn collect_files(dir: &Path, skip_extensions: &[String], out: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    entries.sort();
    for path in entries {
        if !is_candidate(&path, skip_extensions) {
            continue;
        }
        if path.is_dir() {
            collect_files(&path, skip_extensions, out)?;
        } else if path.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

impl RateRegistry {
    /// Parses every rate file found under `paths`. Missing directories are
    /// ignored; unreadable or malformed files are recorded in `skipped`.
    pub fn scan(paths: &[PathBuf], skip_extensions: &[String], table: Option<&NuclideTable>) -> Self {
        let mut registry = Self {
            paths: paths.to_vec(),
            skip_extensions: skip_extensions.to_vec(),
            table: table.cloned(),
            ..Self::default()
        };
        registry.populate();
        registry
    }

    fn populate(&mut self) {
        let mut files = Vec::new();
        for dir in &self.paths {
            if !dir.is_dir() {
                debug!("rate search path '{}' is not a directory", dir.display());
                continue;
            }
            if let Err(e) = collect_files(dir, &self.skip_extensions, &mut files) {
                self.skipped.push((dir.clone(), e));
            }
        }
        for file in files {
            match Rate::from_file(&file, self.table.as_ref()) {
                Ok(rates) => {
                    for rate in rates {
                        self.insert(rate);
                    }
                }
                Err(e) => {
                    debug!("skipping '{}': {}", file.display(), e);
                    self.skipped.push((file, e));
                }
            }
        }
        if !self.skipped.is_empty() {
            warn!(
                "{} rate source(s) could not be read and were skipped; first: {}: {}",
                self.skipped.len(),
                self.skipped[0].0.display(),
                self.skipped[0].1
            );
        }
        info!(
            "rate registry: {} rate(s) for {} reaction(s) from {} search path(s)",
            self.rates.len(),
            self.index.len(),
            self.paths.len()
        );
    }

    /// Adds a rate that did not come from a scanned file, e.g. a derived rate.
    pub fn insert(&mut self, rate: Rate) {
        self.index.entry(rate.signature()).or_default().push(self.rates.len());
        self.rates.push(rate);
    }

    /// Drops everything and scans the same paths again.
    pub fn rescan(&mut self) {
        self.rates.clear();
        self.index.clear();
        self.skipped.clear();
        self.populate();
    }

    /// All rates for the reaction, in scan order. Reactant and product order
    /// within a side does not matter; direction does.
    pub fn find(&self, reactants: &[Nucleus], products: &[Nucleus]) -> Vec<&Rate> {
        self.index
            .get(&ReactionSignature::new(reactants, products))
            .map(|ids| ids.iter().map(|&i| &self.rates[i]).collect())
            .unwrap_or_default()
    }

    /// Like [`RateRegistry::find`] with nuclide names (`"he4"`, `"p"`, ...).
    pub fn find_by_names(&self, reactants: &[&str], products: &[&str]) -> Result<Vec<&Rate>> {
        let resolve = |names: &[&str]| -> Result<Vec<Nucleus>> {
            names.iter().map(|n| Nucleus::from_name(n)).collect()
        };
        Ok(self.find(&resolve(reactants)?, &resolve(products)?))
    }

    pub fn rates(&self) -> &[Rate] {
        &self.rates
    }

    pub fn signatures(&self) -> BTreeSet<ReactionSignature> {
        self.index.keys().cloned().collect()
    }

    pub fn skipped(&self) -> &[(PathBuf, RateError)] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn print_summary(&self) {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("reaction"),
            Cell::new("type"),
            Cell::new("label"),
            Cell::new("source"),
        ]));
        for rate in &self.rates {
            table.add_row(Row::new(vec![
                Cell::new(&rate.to_string()),
                Cell::new(&format!("{:?}", rate.rate_type())),
                Cell::new(rate.label()),
                Cell::new(rate.origin()),
            ]));
        }
        table.printstd();
        if !self.skipped.is_empty() {
            let mut skipped = Table::new();
            skipped.add_row(Row::new(vec![Cell::new("skipped file"), Cell::new("reason")]));
            for (path, err) in &self.skipped {
                skipped.add_row(Row::new(vec![
                    Cell::new(&path.display().to_string()),
                    Cell::new(&err.to_string()),
                ]));
            }
            skipped.printstd();
        }
    }
}

/// Locates a rate file by name: as given (relative to the working
/// directory), then in each search path, then in its `tabular` subdirectory.
pub fn find_rate_file(name: &str, paths: &[PathBuf]) -> Option<PathBuf> {
    let direct = PathBuf::from(name);
    if direct.is_file() {
        return Some(direct);
    }
    paths.iter().find_map(|dir| {
        [dir.join(name), dir.join("tabular").join(name)]
            .into_iter()
            .find(|p| p.is_file())
    })
}

static GLOBAL_REGISTRY: OnceLock<RateRegistry> = OnceLock::new();

/// The process-wide registry, scanned once from the library configuration.
pub fn global_registry() -> &'static RateRegistry {
    GLOBAL_REGISTRY.get_or_init(|| {
        let (paths, skip_extensions, table) = with_library_manager(|manager| {
            let table = manager.load_nuclide_table().unwrap_or_else(|e| {
                warn!("nuclide table not loaded: {}", e);
                None
            });
            (manager.search_paths(), manager.skip_extensions().to_vec(), table)
        });
        RateRegistry::scan(&paths, &skip_extensions, table.as_ref())
    })
}

/// Every rate found in the configured search paths.
pub fn list_known_rates() -> &'static [Rate] {
    global_registry().rates()
}
