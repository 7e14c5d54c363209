//! Common evaluation contract for every kind of rate.
//!
//! The rate kinds form a closed set ([`Rate`]): analytic REACLIB rates,
//! tabulated rates, approximate rates built from several REACLIB rates, and
//! reverse rates derived by detailed balance. All of them are evaluated
//! through [`RateEvaluator`], dispatched statically with `enum_dispatch`.
use super::approximate::ApproximateRate;
use super::derived::DerivedRate;
use super::reaclib::{Chapter, ReaclibRate, TermSet};
use super::reaclib_parser::parse_reaclib;
use super::source_lines::{NucleusResolver, significant_lines};
use super::tabular::TabularRate;
use super::tfactors::Tfactors;
use crate::Nuclei::nucleus::Nucleus;
use crate::Nuclei::nuclide_table::NuclideTable;
use crate::rate_error::{RateError, Result};
use enum_dispatch::enum_dispatch;
use log::debug;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateType {
    ReaclibAnalytic,
    Tabulated,
    Approximate,
    Derived,
}

/// Reaction identity and provenance shared by all rate kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct RateInfo {
    pub reactants: Vec<Nucleus>,
    pub products: Vec<Nucleus>,
    /// None when no REACLIB chapter has these reactant/product counts
    pub chapter: Option<Chapter>,
    /// file name or other identifier of the source
    pub origin: String,
    pub label: String,
    /// MeV
    pub q_value: Option<f64>,
    pub resonant: bool,
    pub weak: bool,
    pub reverse: bool,
}

impl RateInfo {
    pub fn new(reactants: Vec<Nucleus>, products: Vec<Nucleus>, origin: &str, label: &str) -> Self {
        let chapter = Chapter::from_counts(reactants.len(), products.len());
        Self {
            reactants,
            products,
            chapter,
            origin: origin.to_string(),
            label: label.to_string(),
            q_value: None,
            resonant: false,
            weak: false,
            reverse: false,
        }
    }
}

/// Reactant and product multisets of a reaction, used as registry key.
///
/// Both sides are sorted, so `he4 + c12 -> o16` and `c12 + he4 -> o16` are the
/// same signature. Direction matters: `o16 -> he4 + c12` is a different one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReactionSignature {
    pub reactants: Vec<Nucleus>,
    pub products: Vec<Nucleus>,
}

impl ReactionSignature {
    pub fn new(reactants: &[Nucleus], products: &[Nucleus]) -> Self {
        let mut reactants = reactants.to_vec();
        let mut products = products.to_vec();
        reactants.sort();
        products.sort();
        Self {
            reactants,
            products,
        }
    }
}

impl fmt::Display for ReactionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} --> {}",
            join_nuclei(&self.reactants, " + "),
            join_nuclei(&self.products, " + ")
        )
    }
}

fn join_nuclei(nuclei: &[Nucleus], sep: &str) -> String {
    nuclei
        .iter()
        .map(|n| n.name().to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

#[enum_dispatch]
pub trait RateEvaluator {
    fn info(&self) -> &RateInfo;
    fn rate_type(&self) -> RateType;
    /// Rate at the temperature described by `tf`.
    fn eval(&self, tf: &Tfactors) -> Result<f64>;
    /// d(rate)/dT, T in Kelvin.
    fn eval_derivative(&self, tf: &Tfactors) -> Result<f64>;
    /// Text form in the source format. `Rate::parse_all` reads it back;
    /// composite rates write one entry per component, so only single
    /// entries go through `Rate::parse`.
    fn to_source_string(&self) -> Result<String>;
}

#[derive(Debug, Clone)]
#[enum_dispatch(RateEvaluator)]
pub enum Rate {
    Reaclib(ReaclibRate),
    Tabular(TabularRate),
    Approximate(ApproximateRate),
    Derived(DerivedRate),
}

impl Rate {
    /// Parses a single rate. `origin` identifies the source in errors.
    pub fn parse(text: &str, origin: &str) -> Result<Rate> {
        Self::parse_single(text, origin, None)
    }

    /// Like [`Rate::parse`], attaching spins and mass excesses from `table`.
    pub fn parse_with_table(text: &str, origin: &str, table: &NuclideTable) -> Result<Rate> {
        Self::parse_single(text, origin, Some(table))
    }

    fn parse_single(text: &str, origin: &str, table: Option<&NuclideTable>) -> Result<Rate> {
        let mut rates = Self::parse_all(text, origin, table)?;
        if rates.len() != 1 {
            let line = significant_lines(text).last().map(|l| l.number).unwrap_or(0);
            return Err(RateError::parse(
                origin,
                line,
                "source",
                format!("expected one reaction, found {}", rates.len()),
            ));
        }
        Ok(rates.remove(0))
    }

    /// Parses every rate in a source: one for a tabulated rate or a single
    /// REACLIB rate file, many for a REACLIB library snapshot.
    pub fn parse_all(text: &str, origin: &str, table: Option<&NuclideTable>) -> Result<Vec<Rate>> {
        let lines = significant_lines(text);
        let first = lines.first().ok_or_else(|| RateError::EmptyRate {
            origin: origin.to_string(),
        })?;
        let mut resolver = NucleusResolver::new(table);
        let rates: Vec<Rate> = if first.text.trim() == "t" {
            vec![TabularRate::parse_lines(&lines, origin, &mut resolver)?.into()]
        } else {
            parse_reaclib(&lines, origin, &mut resolver)?
                .into_iter()
                .map(Rate::from)
                .collect()
        };
        debug!("parsed {} rate(s) from '{}'", rates.len(), origin);
        Ok(rates)
    }

    pub fn from_file(path: &Path, table: Option<&NuclideTable>) -> Result<Vec<Rate>> {
        let text = fs::read_to_string(path)?;
        let origin = path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self::parse_all(&text, &origin, table)
    }

    pub fn reactants(&self) -> &[Nucleus] {
        &self.info().reactants
    }
    pub fn products(&self) -> &[Nucleus] {
        &self.info().products
    }
    pub fn chapter(&self) -> Option<Chapter> {
        self.info().chapter
    }
    pub fn origin(&self) -> &str {
        &self.info().origin
    }
    pub fn label(&self) -> &str {
        &self.info().label
    }
    pub fn q_value(&self) -> Option<f64> {
        self.info().q_value
    }
    pub fn is_weak(&self) -> bool {
        self.info().weak
    }
    pub fn is_resonant(&self) -> bool {
        self.info().resonant
    }
    pub fn is_reverse(&self) -> bool {
        self.info().reverse
    }

    /// Term sets of analytic and derived rates.
    pub fn sets(&self) -> Option<&[TermSet]> {
        match self {
            Rate::Reaclib(r) => Some(r.sets()),
            Rate::Derived(r) => Some(r.sets()),
            _ => None,
        }
    }

    pub fn signature(&self) -> ReactionSignature {
        ReactionSignature::new(self.reactants(), self.products())
    }

    /// Rate at temperature `t` in Kelvin.
    pub fn eval_at(&self, t: f64) -> Result<f64> {
        self.eval(&Tfactors::new(t)?)
    }

    /// d(rate)/dT at temperature `t` in Kelvin.
    pub fn eval_derivative_at(&self, t: f64) -> Result<f64> {
        self.eval_derivative(&Tfactors::new(t)?)
    }

    /// Temperature sensitivity d ln(rate) / d ln T at `t0`.
    pub fn temperature_exponent(&self, t0: f64) -> Result<f64> {
        let tf = Tfactors::new(t0)?;
        let r = self.eval(&tf)?;
        if r == 0.0 {
            return Ok(0.0);
        }
        Ok(self.eval_derivative(&tf)? * t0 / r)
    }

    /// 1 / prod(n_i!) over repeated reactants, applied by network builders
    /// to avoid double counting identical particles.
    pub fn prefactor(&self) -> f64 {
        let mut prefactor = 1.0;
        let mut seen: Vec<&Nucleus> = Vec::new();
        for r in self.reactants() {
            if seen.contains(&r) {
                continue;
            }
            seen.push(r);
            let count = self.reactants().iter().filter(|x| *x == r).count();
            prefactor /= (1..=count).product::<usize>() as f64;
        }
        prefactor
    }

    /// power of density multiplying the rate in a network
    pub fn dens_exp(&self) -> usize {
        self.reactants().len().saturating_sub(1)
    }

    /// identifier usable as a file or function name, e.g. `he4_c12__o16`
    pub fn fname(&self) -> String {
        format!(
            "{}__{}",
            join_nuclei(self.reactants(), "_"),
            join_nuclei(self.products(), "_")
        )
    }

    /// Prints the reaction and, for analytic rates, the table of term sets.
    pub fn pretty_print(&self) {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("reaction"),
            Cell::new(&self.to_string()),
        ]));
        table.add_row(Row::new(vec![Cell::new("type"), Cell::new(&format!("{:?}", self.rate_type()))]));
        table.add_row(Row::new(vec![Cell::new("source"), Cell::new(self.origin())]));
        table.add_row(Row::new(vec![Cell::new("label"), Cell::new(self.label())]));
        table.printstd();
        if let Some(sets) = self.sets() {
            let mut sets_table = Table::new();
            let mut header = vec![Cell::new("set")];
            header.extend((0..7).map(|k| Cell::new(&format!("a{}", k))));
            sets_table.add_row(Row::new(header));
            for set in sets {
                let mut row = vec![Cell::new(&set.labelprops())];
                row.extend(set.a.iter().map(|c| Cell::new(&format!("{:.6e}", c))));
                sets_table.add_row(Row::new(row));
            }
            sets_table.printstd();
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} --> {}",
            join_nuclei(self.reactants(), " + "),
            join_nuclei(self.products(), " + ")
        )
    }
}
