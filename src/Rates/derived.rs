//! Reverse rates obtained from a forward REACLIB rate by detailed balance.
//!
//! For a forward rate R -> P with Q = sum(mass excess R) - sum(mass excess P),
//! every set of the reverse rate P -> R is the forward set shifted by
//! ```text
//! a0' = a0 + ln[ N_A^-dn * prod_R(A^1.5 g) / prod_P(A^1.5 g) * prod_P(n!) / prod_R(n!)
//!               * (m_u k_B 1e9 / 2 pi hbar^2)^(1.5 dn) ]
//! a1' = a1 - Q / (k_B 1e9)
//! a6' = a6 + 1.5 dn
//! ```
//! with dn = |R| - |P|, g = 2J + 1 and n! the multiplicity of identical
//! nuclei. Partition functions are taken as 1.
use super::rate_api::{Rate, RateEvaluator, RateInfo, RateType};
use super::reaclib::{ReaclibRate, TermSet};
use super::tfactors::Tfactors;
use crate::Nuclei::nucleus::Nucleus;
use crate::Nuclei::nuclide_table::NuclideTable;
use crate::rate_error::{RateError, Result};
use log::debug;
use std::f64::consts::PI;

/// Avogadro constant, 1/mol
pub const N_A: f64 = 6.02214076e23;
/// Boltzmann constant, erg/K
pub const K_B_ERG: f64 = 1.380649e-16;
/// Boltzmann constant, MeV/K
pub const K_B_MEV: f64 = 8.617333262e-11;
/// atomic mass unit, g
pub const M_U: f64 = 1.66053906660e-24;
/// reduced Planck constant, erg s
pub const HBAR: f64 = 1.054571817e-27;

#[derive(Debug, Clone)]
pub struct DerivedRate {
    inner: ReaclibRate,
    forward: Box<Rate>,
}

fn ln_factorial_multiplicities(nuclei: &[Nucleus]) -> f64 {
    let mut total = 0.0;
    let mut seen: Vec<&Nucleus> = Vec::new();
    for nuc in nuclei {
        if seen.contains(&nuc) {
            continue;
        }
        seen.push(nuc);
        let count = nuclei.iter().filter(|x| *x == nuc).count();
        total += (1..=count).map(|k| (k as f64).ln()).sum::<f64>();
    }
    total
}

fn annotated(nuclei: &[Nucleus], table: &NuclideTable) -> Result<Vec<Nucleus>> {
    nuclei
        .iter()
        .map(|n| {
            let nuc = table.annotate(n);
            if nuc.spin().is_none() || nuc.mass_excess().is_none() {
                return Err(RateError::MissingNuclearData(nuc.name().to_string()));
            }
            Ok(nuc)
        })
        .collect()
}

/// (ln g A^1.5 summed, mass excess summed)
fn side_terms(nuclei: &[Nucleus]) -> (f64, f64) {
    nuclei.iter().fold((0.0, 0.0), |(ln_w, mass), n| {
        let g = n.spin_states().unwrap_or(1.0);
        (
            ln_w + 1.5 * (n.a() as f64).ln() + g.ln(),
            mass + n.mass_excess().unwrap_or(0.0),
        )
    })
}

impl DerivedRate {
    /// Builds the reverse of an analytic `forward` rate. Every nucleus must
    /// have a spin and a mass excess in `table`.
    pub fn from_forward(forward: &Rate, table: &NuclideTable) -> Result<Self> {
        let sets = forward.sets().ok_or_else(|| {
            RateError::InvalidComposition(format!(
                "{}: only analytic rates can be reversed by detailed balance",
                forward
            ))
        })?;
        if forward.is_weak() {
            return Err(RateError::InvalidComposition(format!(
                "{}: weak rates have no detailed-balance reverse",
                forward
            )));
        }
        let reactants = annotated(forward.reactants(), table)?;
        let products = annotated(forward.products(), table)?;

        let dn = reactants.len() as f64 - products.len() as f64;
        let (ln_w_r, mass_r) = side_terms(&reactants);
        let (ln_w_p, mass_p) = side_terms(&products);
        let q = mass_r - mass_p;

        let mut ln_prefactor = -N_A.ln() * dn + ln_w_r - ln_w_p
            + ln_factorial_multiplicities(&products)
            - ln_factorial_multiplicities(&reactants);
        if dn != 0.0 {
            let f = M_U * K_B_ERG * 1.0e9 / (2.0 * PI * HBAR * HBAR);
            ln_prefactor += 1.5 * dn * f.ln();
        }

        let reverse_sets: Vec<TermSet> = sets
            .iter()
            .map(|s| {
                let mut a = s.a;
                a[0] += ln_prefactor;
                a[1] -= q / (K_B_MEV * 1.0e9);
                a[6] += 1.5 * dn;
                TermSet::new(a, &s.label, s.flag, !s.reverse)
            })
            .collect();

        let mut info = RateInfo::new(products, reactants, &format!("derived from {}", forward.origin()), forward.label());
        info.q_value = Some(-q);
        info.resonant = forward.is_resonant();
        info.reverse = !forward.is_reverse();
        debug!("derived reverse of {} with Q = {} MeV", forward, q);
        Ok(Self {
            inner: ReaclibRate::from_sets(info, reverse_sets)?,
            forward: Box::new(forward.clone()),
        })
    }

    pub fn forward(&self) -> &Rate {
        &self.forward
    }

    pub fn sets(&self) -> &[TermSet] {
        self.inner.sets()
    }
}

impl RateEvaluator for DerivedRate {
    fn info(&self) -> &RateInfo {
        self.inner.info()
    }

    fn rate_type(&self) -> RateType {
        RateType::Derived
    }

    fn eval(&self, tf: &Tfactors) -> Result<f64> {
        self.inner.eval(tf)
    }

    fn eval_derivative(&self, tf: &Tfactors) -> Result<f64> {
        self.inner.eval_derivative(tf)
    }

    fn to_source_string(&self) -> Result<String> {
        self.inner.to_source_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Nuclei::nuclide_table::NuclideProperties;
    use approx::assert_relative_eq;

    const C12_AG: &str = "4
         he4  c12  o16                       nac2      7.16192e+00
 2.546340e+02-1.840970e+00 1.034110e+02-4.205670e+02
 6.408740e+01-1.246240e+01 1.373030e+02
";

    const TRIPLE_ALPHA: &str = "8
         he4  he4  he4  c12                  fy05r     7.27500e+00
-9.710520e-01 0.000000e+00-3.706000e+01 2.934930e+01
-1.155070e+02-1.000000e+01-1.333330e+00
         he4  he4  he4  c12                  fy05r     7.27500e+00
-2.435050e+01-4.126560e+00-1.349000e+01 2.142590e+01
-1.347690e+00 8.798160e-02-1.316530e+01
         he4  he4  he4  c12                  fy05n     7.27500e+00
-1.178840e+01-1.024460e+00-2.357000e+01 2.048860e+01
-1.298820e+01-2.000000e+01-2.166670e+00
";

    fn table() -> NuclideTable {
        let mut t = NuclideTable::new();
        t.insert(2, 4, NuclideProperties { spin: 0.0, mass_excess: 2.42491 });
        t.insert(6, 12, NuclideProperties { spin: 0.0, mass_excess: 0.0 });
        t.insert(8, 16, NuclideProperties { spin: 0.0, mass_excess: -4.73700 });
        t
    }

    #[test]
    fn test_reverse_of_capture() {
        let forward = Rate::parse(C12_AG, "c12-ag-o16").unwrap();
        let reverse: Rate = DerivedRate::from_forward(&forward, &table()).unwrap().into();
        assert_eq!(reverse.to_string(), "o16 --> he4 + c12");
        assert_eq!(reverse.rate_type(), RateType::Derived);
        assert!(reverse.is_reverse());
        let q = 2.42491 + 4.73700;
        assert_relative_eq!(reverse.q_value().unwrap(), -q, max_relative = 1e-12);

        // 2 -> 1 capture: ratio = 9.8686e9 * (A_he4 A_c12 / A_o16)^1.5 * T9^1.5 * exp(-Q/kT)
        let t9: f64 = 2.0;
        let ratio = reverse.eval_at(t9 * 1.0e9).unwrap() / forward.eval_at(t9 * 1.0e9).unwrap();
        let expected = 9.8686e9 * 3.0_f64.powf(1.5) * t9.powf(1.5) * (-q / (K_B_MEV * 1.0e9 * t9)).exp();
        assert_relative_eq!(ratio, expected, max_relative = 1e-4);
    }

    #[test]
    fn test_reverse_of_triple_alpha() {
        let forward = Rate::parse(TRIPLE_ALPHA, "he4-he4he4-c12-fy05").unwrap();
        let reverse: Rate = DerivedRate::from_forward(&forward, &table()).unwrap().into();
        assert_eq!(reverse.to_string(), "c12 --> he4 + he4 + he4");
        assert_eq!(reverse.sets().unwrap().len(), 3);

        // Caughlan & Fowler (1988): lambda(c12 -> 3 he4) / N_A^2 <sigma v>_3a
        for t9 in [1.0_f64, 3.0] {
            let ratio = reverse.eval_at(t9 * 1.0e9).unwrap() / forward.eval_at(t9 * 1.0e9).unwrap();
            let cf88 = 2.00e20 * t9.powi(3) * (-84.424 / t9).exp();
            assert_relative_eq!(ratio / cf88, 1.0, max_relative = 1e-2);
        }
    }

    #[test]
    fn test_reversing_twice_restores_coefficients() {
        let forward = Rate::parse(C12_AG, "c12-ag-o16").unwrap();
        let reverse: Rate = DerivedRate::from_forward(&forward, &table()).unwrap().into();
        let again = DerivedRate::from_forward(&reverse, &table()).unwrap();
        for (a, b) in forward.sets().unwrap().iter().zip(again.sets()) {
            for k in 0..7 {
                assert_relative_eq!(a.a[k], b.a[k], epsilon = 1e-9, max_relative = 1e-12);
            }
            assert_eq!(a.reverse, b.reverse);
        }
    }

    #[test]
    fn test_missing_nuclear_data() {
        let forward = Rate::parse(C12_AG, "c12-ag-o16").unwrap();
        let mut partial = NuclideTable::new();
        partial.insert(2, 4, NuclideProperties { spin: 0.0, mass_excess: 2.42491 });
        assert!(matches!(
            DerivedRate::from_forward(&forward, &partial),
            Err(RateError::MissingNuclearData(name)) if name == "c12"
        ));
    }
}
