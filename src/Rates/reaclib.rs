//! REACLIB analytic rates.
//!
//! A rate is a sum of term sets; each set contributes
//! `exp(a0 + a1/T9 + a2*T9^-1/3 + a3*T9^1/3 + a4*T9 + a5*T9^5/3 + a6*ln T9)`.
//! The exponent of a set is accumulated first and exponentiated once; the
//! sets themselves are physically separate channels (resonant,
//! non-resonant, ...) and are summed in the linear domain.
use super::rate_api::{RateEvaluator, RateInfo, RateType};
use super::source_lines::fortran_exp;
use super::tfactors::Tfactors;
use crate::rate_error::{RateError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// (reactants, products) for chapters 1..=11
const CHAPTER_COUNTS: [(usize, usize); 11] = [
    (1, 1),
    (1, 2),
    (1, 3),
    (2, 1),
    (2, 2),
    (2, 3),
    (2, 4),
    (3, 1),
    (3, 2),
    (4, 2),
    (1, 4),
];

/// REACLIB chapter: fixes how many of the listed nuclei are reactants and
/// how many are products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chapter(u8);

impl Chapter {
    pub fn from_code(code: &str) -> Option<Self> {
        let n: u8 = code.trim().parse().ok()?;
        Self::from_number(n)
    }

    pub fn from_number(n: u8) -> Option<Self> {
        if (1..=11).contains(&n) { Some(Chapter(n)) } else { None }
    }

    /// Chapter whose reactant/product counts match, if any exists.
    pub fn from_counts(reactants: usize, products: usize) -> Option<Self> {
        CHAPTER_COUNTS
            .iter()
            .position(|&c| c == (reactants, products))
            .map(|i| Chapter(i as u8 + 1))
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    pub fn n_reactants(&self) -> usize {
        CHAPTER_COUNTS[self.0 as usize - 1].0
    }

    pub fn n_products(&self) -> usize {
        CHAPTER_COUNTS[self.0 as usize - 1].1
    }
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resonance flag of a set (fifth character of the label field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetFlag {
    NonResonant,
    Resonant,
    Weak,
    Spontaneous,
}

impl SetFlag {
    /// `r`, `n`, `w`, `s`; blank reads as non-resonant.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'r' => Some(SetFlag::Resonant),
            'n' | ' ' => Some(SetFlag::NonResonant),
            'w' => Some(SetFlag::Weak),
            's' => Some(SetFlag::Spontaneous),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            SetFlag::NonResonant => 'n',
            SetFlag::Resonant => 'r',
            SetFlag::Weak => 'w',
            SetFlag::Spontaneous => 's',
        }
    }
}

/// One exponential contribution to a rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSet {
    pub a: [f64; 7],
    /// four character literature label, e.g. "nac2"
    pub label: String,
    pub flag: SetFlag,
    /// set was obtained from the forward rate by detailed balance
    pub reverse: bool,
}

impl TermSet {
    pub fn new(a: [f64; 7], label: &str, flag: SetFlag, reverse: bool) -> Self {
        Self {
            a,
            label: label.to_string(),
            flag,
            reverse,
        }
    }

    /// Decodes the six character label field: label(4) flag(1) reverse(1).
    /// None when the flag is not one of `r n w s`/blank or the reverse
    /// column holds anything but `v`/blank.
    pub fn from_labelprops(a: [f64; 7], labelprops: &str) -> Option<Self> {
        let chars: Vec<char> = labelprops.chars().collect();
        if chars.len() > 6 {
            return None;
        }
        let label: String = chars.iter().take(4).collect();
        let flag = match chars.get(4) {
            Some(&c) => SetFlag::from_char(c)?,
            None => SetFlag::NonResonant,
        };
        let reverse = match chars.get(5) {
            Some('v') => true,
            Some(' ') | None => false,
            Some(_) => return None,
        };
        Some(Self::new(a, label.trim(), flag, reverse))
    }

    pub fn labelprops(&self) -> String {
        format!(
            "{:<4}{}{}",
            self.label,
            self.flag.as_char(),
            if self.reverse { 'v' } else { ' ' }
        )
    }

    pub fn exponent(&self, tf: &Tfactors) -> f64 {
        let a = &self.a;
        a[0] + a[1] * tf.t9i + a[2] * tf.t913i + a[3] * tf.t913 + a[4] * tf.t9 + a[5] * tf.t953
            + a[6] * tf.ln_t9
    }

    pub fn value(&self, tf: &Tfactors) -> f64 {
        self.exponent(tf).exp()
    }

    /// d(exponent)/dT9
    pub fn dexponent_dt9(&self, tf: &Tfactors) -> f64 {
        let a = &self.a;
        -a[1] * tf.t9i2 - a[2] / 3.0 * tf.t943i + a[3] / 3.0 * tf.t923i + a[4]
            + 5.0 / 3.0 * a[5] * tf.t923
            + a[6] * tf.t9i
    }
}

/// Analytic rate: a reaction plus its REACLIB term sets.
#[derive(Debug, Clone)]
pub struct ReaclibRate {
    info: RateInfo,
    sets: Vec<TermSet>,
}

impl ReaclibRate {
    pub fn from_sets(info: RateInfo, sets: Vec<TermSet>) -> Result<Self> {
        if sets.is_empty() {
            return Err(RateError::EmptyRate {
                origin: info.origin.clone(),
            });
        }
        if info.reactants.is_empty() || info.products.is_empty() {
            return Err(RateError::InvalidComposition(format!(
                "{}: a rate needs at least one reactant and one product",
                info.origin
            )));
        }
        for (i, set) in sets.iter().enumerate() {
            if let Some(k) = set.a.iter().position(|c| !c.is_finite()) {
                return Err(RateError::parse(
                    &info.origin,
                    0,
                    &format!("set{}.a{}", i, k),
                    format!("coefficient a{} of set {} is not finite", k, i),
                ));
            }
        }
        Ok(Self { info, sets })
    }

    pub fn sets(&self) -> &[TermSet] {
        &self.sets
    }

    fn check_sets(&self) -> Result<()> {
        if self.sets.is_empty() {
            return Err(RateError::EmptyRate {
                origin: self.info.origin.clone(),
            });
        }
        Ok(())
    }
}

/// REACLIB header line for one set: nuclei in 5-character fields,
/// label field, Q value.
pub(crate) fn format_set_header(info: &RateInfo, set: &TermSet) -> String {
    let mut nuclei = String::new();
    let names = info.reactants.iter().chain(info.products.iter());
    let mut count = 0;
    for nuc in names {
        nuclei.push_str(&format!("{:>5}", nuc.name()));
        count += 1;
    }
    for _ in count..6 {
        nuclei.push_str("     ");
    }
    format!(
        "     {}        {}   {:>12}          ",
        nuclei,
        set.labelprops(),
        fortran_exp(info.q_value.unwrap_or(0.0), 5)
    )
}

pub(crate) fn format_set_coefficients(set: &TermSet) -> String {
    let first: String = set.a[..4].iter().map(|c| format!("{:>13}", fortran_exp(*c, 6))).collect();
    let second: String = set.a[4..].iter().map(|c| format!("{:>13}", fortran_exp(*c, 6))).collect();
    format!("{}\n{}", first, second)
}

impl RateEvaluator for ReaclibRate {
    fn info(&self) -> &RateInfo {
        &self.info
    }

    fn rate_type(&self) -> RateType {
        RateType::ReaclibAnalytic
    }

    fn eval(&self, tf: &Tfactors) -> Result<f64> {
        self.check_sets()?;
        Ok(self.sets.iter().map(|s| s.value(tf)).sum())
    }

    fn eval_derivative(&self, tf: &Tfactors) -> Result<f64> {
        self.check_sets()?;
        let dr_dt9: f64 = self
            .sets
            .iter()
            .map(|s| s.value(tf) * s.dexponent_dt9(tf))
            .sum();
        // dT9/dT
        Ok(dr_dt9 * 1.0e-9)
    }

    fn to_source_string(&self) -> Result<String> {
        let chapter = self.info.chapter.ok_or_else(|| RateError::UnsupportedChapter {
            origin: self.info.origin.clone(),
            code: format!(
                "{} reactants -> {} products",
                self.info.reactants.len(),
                self.info.products.len()
            ),
        })?;
        let mut out = format!("{}\n", chapter);
        for set in &self.sets {
            out.push_str(&format_set_header(&self.info, set));
            out.push('\n');
            out.push_str(&format_set_coefficients(set));
            out.push('\n');
        }
        Ok(out)
    }
}
