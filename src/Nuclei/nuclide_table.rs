//! Read-only table of nuclide properties (ground-state spin, mass excess).
//!
//! The table is external reference data: it is loaded once at startup from a
//! whitespace-separated text file and handed to whatever needs it (the rate
//! parser, detailed-balance derivation). Nothing in the crate hard-codes
//! masses or spins.
//!
//! File format, one nuclide per line, `#` starts a comment:
//! ```text
//! # Z   A   spin   mass_excess [MeV]
//!   2   4   0.0    2.42491
//!   6  12   0.0    0.0
//! ```
use super::nucleus::Nucleus;
use crate::rate_error::{RateError, Result};
use log::info;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NuclideProperties {
    pub spin: f64,
    /// MeV
    pub mass_excess: f64,
}

#[derive(Debug, Clone, Default)]
pub struct NuclideTable {
    entries: HashMap<(u32, u32), NuclideProperties>,
}

impl NuclideTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, z: u32, a: u32, props: NuclideProperties) {
        self.entries.insert((z, a), props);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, nucleus: &Nucleus) -> Option<&NuclideProperties> {
        self.entries.get(&(nucleus.z(), nucleus.a()))
    }

    /// Returns a copy of `nucleus` with spin and mass excess filled in from the
    /// table. Nuclides missing from the table come back unchanged.
    pub fn annotate(&self, nucleus: &Nucleus) -> Nucleus {
        match self.get(nucleus) {
            Some(p) => nucleus
                .clone()
                .with_properties(Some(p.spin), Some(p.mass_excess)),
            None => nucleus.clone(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let table = Self::parse(&text, &path.display().to_string())?;
        info!(
            "loaded {} nuclides from nuclide table '{}'",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        let mut table = Self::new();
        for (i, raw) in text.lines().enumerate() {
            let line_no = i + 1;
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 4 {
                return Err(RateError::parse(
                    origin,
                    line_no,
                    "row",
                    format!("expected 4 fields (Z A spin mass_excess), found {}", fields.len()),
                ));
            }
            let z: u32 = fields[0]
                .parse()
                .map_err(|_| RateError::parse(origin, line_no, "Z", format!("'{}' is not an integer", fields[0])))?;
            let a: u32 = fields[1]
                .parse()
                .map_err(|_| RateError::parse(origin, line_no, "A", format!("'{}' is not an integer", fields[1])))?;
            let spin = parse_float(fields[2], origin, line_no, "spin")?;
            let mass_excess = parse_float(fields[3], origin, line_no, "mass_excess")?;
            // validates Z and A against the periodic table
            Nucleus::from_za(z, a)?;
            table.insert(z, a, NuclideProperties { spin, mass_excess });
        }
        Ok(table)
    }
}

fn parse_float(field: &str, origin: &str, line: usize, name: &str) -> Result<f64> {
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RateError::parse(
            origin,
            line,
            name,
            format!("'{}' is not a finite number", field),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TABLE: &str = "# Z A spin mass_excess
  1   1  0.5  7.28897
  2   4  0.0  2.42491  # alpha
  6  12  0.0  0.0
";

    #[test]
    fn test_parse_and_annotate() {
        let table = NuclideTable::parse(TABLE, "test").unwrap();
        assert_eq!(table.len(), 3);
        let p = table.annotate(&Nucleus::from_name("p").unwrap());
        assert_eq!(p.spin(), Some(0.5));
        assert_eq!(p.spin_states(), Some(2.0));
        assert_eq!(p.mass_excess(), Some(7.28897));
        let o16 = table.annotate(&Nucleus::from_name("o16").unwrap());
        assert_eq!(o16.spin(), None);
    }

    #[test]
    fn test_bad_rows() {
        let err = NuclideTable::parse("2 4 0.0", "tbl").unwrap_err();
        assert!(matches!(err, RateError::RateParse { line: 1, .. }));
        let err = NuclideTable::parse("\n2 4 zero 2.4", "tbl").unwrap_err();
        assert!(matches!(err, RateError::RateParse { line: 2, ref field, .. } if field == "spin"));
        let err = NuclideTable::parse("200 400 0 0", "tbl").unwrap_err();
        assert!(matches!(err, RateError::UnknownNuclide { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(TABLE.as_bytes()).unwrap();
        let table = NuclideTable::from_file(file.path()).unwrap();
        assert!(table.get(&Nucleus::from_za(6, 12).unwrap()).is_some());
    }
}
