use super::elements::{Element, lookup_symbol, lookup_z};
use crate::rate_error::{RateError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

static NUCLIDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]+)(\d+)$").expect("nuclide pattern is valid"));

/// Identity of a nuclide plus optional physical properties.
///
/// Equality, hashing and ordering use (Z, A) only: `Nucleus::from_name("a")`,
/// `Nucleus::from_name("he4")` and `Nucleus::from_za(2, 4)` are the same key
/// whether or not spin and mass excess have been attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nucleus {
    name: String,
    z: u32,
    a: u32,
    n: u32,
    /// ground state spin J
    spin: Option<f64>,
    /// mass excess in MeV
    mass_excess: Option<f64>,
}

impl Nucleus {
    /// Canonical constructor. Z = 0 is only valid for the free neutron.
    pub fn from_za(z: u32, a: u32) -> Result<Self> {
        let invalid = || RateError::UnknownNuclide {
            name: format!("Z={}, A={}", z, a),
            location: String::new(),
        };
        let element = lookup_z(z).ok_or_else(invalid)?;
        if a == 0 || a < z || (z == 0 && a != 1) {
            return Err(invalid());
        }
        Ok(Self {
            name: canonical_name(element, a),
            z,
            a,
            n: a - z,
            spin: None,
            mass_excess: None,
        })
    }

    /// Parses standard nuclide notation: element symbol followed by the mass
    /// number ("he4", "C12", "ni56"), or one of the short names
    /// "n", "p", "d", "t" and "a".
    pub fn from_name(name: &str) -> Result<Self> {
        let lowered = name.trim().to_lowercase();
        let unknown = || RateError::UnknownNuclide {
            name: name.to_string(),
            location: String::new(),
        };
        let (z, a) = match lowered.as_str() {
            "n" => (0, 1),
            "p" => (1, 1),
            "d" => (1, 2),
            "t" => (1, 3),
            "a" => (2, 4),
            other => {
                let caps = NUCLIDE_RE.captures(other).ok_or_else(unknown)?;
                let element = lookup_symbol(&caps[1]).ok_or_else(unknown)?;
                let a: u32 = caps[2].parse().map_err(|_| unknown())?;
                (element.z, a)
            }
        };
        Self::from_za(z, a).map_err(|_| unknown())
    }

    /// Returns a copy carrying the given spin and mass excess (MeV).
    pub fn with_properties(mut self, spin: Option<f64>, mass_excess: Option<f64>) -> Self {
        self.spin = spin;
        self.mass_excess = mass_excess;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn z(&self) -> u32 {
        self.z
    }
    pub fn a(&self) -> u32 {
        self.a
    }
    pub fn n(&self) -> u32 {
        self.n
    }
    pub fn spin(&self) -> Option<f64> {
        self.spin
    }
    pub fn mass_excess(&self) -> Option<f64> {
        self.mass_excess
    }
    /// number of spin states 2J + 1
    pub fn spin_states(&self) -> Option<f64> {
        self.spin.map(|j| 2.0 * j + 1.0)
    }

    /// long name such as "carbon-12", or "neutron"
    pub fn spec_name(&self) -> String {
        match lookup_z(self.z) {
            Some(el) if self.z == 0 => el.name.to_string(),
            Some(el) => format!("{}-{}", el.name, self.a),
            None => self.name.clone(),
        }
    }

    /// LaTeX form, e.g. `{}^{12}\mathrm{C}`
    pub fn pretty(&self) -> String {
        match lookup_z(self.z) {
            Some(_) if self.z == 0 => r"\mathrm{n}".to_string(),
            Some(el) => format!(r"{{}}^{{{}}}\mathrm{{{}}}", self.a, el.symbol),
            None => self.name.clone(),
        }
    }
}

fn canonical_name(element: &Element, a: u32) -> String {
    match (element.z, a) {
        (0, _) => "n".to_string(),
        (1, 1) => "p".to_string(),
        (1, 2) => "d".to_string(),
        (1, 3) => "t".to_string(),
        _ => format!("{}{}", element.symbol.to_lowercase(), a),
    }
}

impl PartialEq for Nucleus {
    fn eq(&self, other: &Self) -> bool {
        self.z == other.z && self.a == other.a
    }
}

impl Eq for Nucleus {}

impl Hash for Nucleus {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.z.hash(state);
        self.a.hash(state);
    }
}

impl PartialOrd for Nucleus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// lighter elements first, then by mass number
impl Ord for Nucleus {
    fn cmp(&self, other: &Self) -> Ordering {
        self.z.cmp(&other.z).then(self.a.cmp(&other.a))
    }
}

impl fmt::Display for Nucleus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
