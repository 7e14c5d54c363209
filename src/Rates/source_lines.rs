//! Low level helpers shared by the REACLIB and tabulated grammars:
//! comment/blank stripping with original line numbers, float scanning of
//! fixed-width coefficient fields, nuclide resolution and Fortran-style
//! number formatting for writing rates back out.
use crate::Nuclei::nucleus::Nucleus;
use crate::Nuclei::nuclide_table::NuclideTable;
use crate::rate_error::{RateError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

// fixed-width coefficient fields run into each other ("2.5e+02-1.8e+00"),
// so numbers are found by pattern rather than by splitting on whitespace
static FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("float pattern is valid")
});

/// A significant (non-blank, non-comment) line and its 1-based number.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SourceLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

pub(crate) fn significant_lines(text: &str) -> Vec<SourceLine<'_>> {
    text.lines()
        .enumerate()
        .filter(|(_, l)| {
            let t = l.trim();
            !t.is_empty() && !t.starts_with('#')
        })
        .map(|(i, l)| SourceLine {
            number: i + 1,
            text: l.trim_end(),
        })
        .collect()
}

/// Scans every number in `line`. Anything between numbers that is not
/// whitespace is an error naming the field it would have belonged to
/// (`field_names[k]` for the k-th number on the line).
pub(crate) fn scan_floats(
    line: &SourceLine,
    origin: &str,
    field_names: &[&str],
) -> Result<Vec<f64>> {
    let field_name = |k: usize| field_names.get(k).copied().unwrap_or("extra");
    let mut values = Vec::new();
    let mut cursor = 0;
    for m in FLOAT_RE.find_iter(line.text) {
        let gap = &line.text[cursor..m.start()];
        if !gap.trim().is_empty() {
            return Err(RateError::parse(
                origin,
                line.number,
                field_name(values.len()),
                format!("'{}' is not a number", gap.trim()),
            ));
        }
        let value: f64 = m.as_str().parse().map_err(|_| {
            RateError::parse(
                origin,
                line.number,
                field_name(values.len()),
                format!("'{}' is not a number", m.as_str()),
            )
        })?;
        values.push(value);
        cursor = m.end();
    }
    let tail = &line.text[cursor..];
    if !tail.trim().is_empty() {
        return Err(RateError::parse(
            origin,
            line.number,
            field_name(values.len()),
            format!("'{}' is not a number", tail.trim()),
        ));
    }
    Ok(values)
}

/// Parses a single whitespace-delimited numeric token.
pub(crate) fn parse_field(token: &str, line: &SourceLine, origin: &str, field: &str) -> Result<f64> {
    match token.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RateError::parse(
            origin,
            line.number,
            field,
            format!("'{}' is not a finite number", token.trim()),
        )),
    }
}

/// Resolves nuclide tokens during one parse. Each distinct token is resolved
/// once; the optional table attaches spins and mass excesses.
pub(crate) struct NucleusResolver<'t> {
    table: Option<&'t NuclideTable>,
    cache: HashMap<String, Nucleus>,
}

impl<'t> NucleusResolver<'t> {
    pub fn new(table: Option<&'t NuclideTable>) -> Self {
        Self {
            table,
            cache: HashMap::new(),
        }
    }

    pub fn resolve(&mut self, token: &str, line: &SourceLine, origin: &str) -> Result<Nucleus> {
        if let Some(nuc) = self.cache.get(token) {
            return Ok(nuc.clone());
        }
        let nuc = Nucleus::from_name(token).map_err(|_| RateError::UnknownNuclide {
            name: token.to_string(),
            location: format!(" ({}, line {})", origin, line.number),
        })?;
        let nuc = match self.table {
            Some(table) => table.annotate(&nuc),
            None => nuc,
        };
        self.cache.insert(token.to_string(), nuc.clone());
        Ok(nuc)
    }
}

/// Formats `x` the way REACLIB files do: `1.234560e+02`, mantissa with
/// `decimals` digits, signed two-digit exponent.
pub(crate) fn fortran_exp(x: f64, decimals: usize) -> String {
    let s = format!("{:.*e}", decimals, x);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => s,
    }
}
