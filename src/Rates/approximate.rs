//! Approximate rate combining A(a,g)B with the A(a,p)X(p,g)B channel,
//! assuming X is in equilibrium with respect to proton capture and release:
//!
//! `r = r_ag + r_ap * r_pg / (r_pg + r_pa)`
//!
//! where r_pa is the X(p,a)A rate. It lets a network skip the intermediate
//! nucleus X and the proton.
use super::rate_api::{Rate, RateEvaluator, RateInfo, RateType, ReactionSignature};
use super::tfactors::Tfactors;
use crate::Nuclei::nucleus::Nucleus;
use crate::rate_error::{RateError, Result};

#[derive(Debug, Clone)]
pub struct ApproximateRate {
    info: RateInfo,
    r_ag: Box<Rate>,
    r_ap: Box<Rate>,
    r_pg: Box<Rate>,
    r_pa: Box<Rate>,
}

fn expect_signature(rate: &Rate, expected: &ReactionSignature, role: &str) -> Result<()> {
    if rate.signature() != *expected {
        return Err(RateError::InvalidComposition(format!(
            "{} rate should be {}, found {}",
            role, expected, rate
        )));
    }
    Ok(())
}

impl ApproximateRate {
    /// `r_ag` = A(a,g)B, `r_ap` = A(a,p)X, `r_pg` = X(p,g)B, `r_pa` = X(p,a)A.
    pub fn new(r_ag: Rate, r_ap: Rate, r_pg: Rate, r_pa: Rate) -> Result<Self> {
        let alpha = Nucleus::from_za(2, 4)?;
        let proton = Nucleus::from_za(1, 1)?;
        if r_ag.reactants().len() != 2 || r_ag.products().len() != 1 || !r_ag.reactants().contains(&alpha) {
            return Err(RateError::InvalidComposition(format!(
                "primary rate should be an alpha capture A(a,g)B, found {}",
                r_ag
            )));
        }
        let target = r_ag
            .reactants()
            .iter()
            .find(|n| **n != alpha)
            .unwrap_or(&alpha)
            .clone();
        let product = r_ag.products()[0].clone();
        let mut intermediate = r_ap.products().to_vec();
        match intermediate.iter().position(|n| *n == proton) {
            Some(i) if intermediate.len() == 2 => {
                intermediate.remove(i);
            }
            _ => {
                return Err(RateError::InvalidComposition(format!(
                    "secondary rate should be A(a,p)X, found {}",
                    r_ap
                )));
            }
        }
        let x = intermediate.remove(0);
        let a_alpha = [target.clone(), alpha.clone()];
        let x_p = [x, proton];
        expect_signature(&r_ap, &ReactionSignature::new(&a_alpha, &x_p), "A(a,p)X")?;
        expect_signature(&r_pg, &ReactionSignature::new(&x_p, &[product.clone()]), "X(p,g)B")?;
        expect_signature(&r_pa, &ReactionSignature::new(&x_p, &a_alpha), "X(p,a)A")?;

        let mut info = RateInfo::new(r_ag.reactants().to_vec(), vec![product], "approximate", "approx");
        info.q_value = r_ag.q_value();
        Ok(Self {
            info,
            r_ag: Box::new(r_ag),
            r_ap: Box::new(r_ap),
            r_pg: Box::new(r_pg),
            r_pa: Box::new(r_pa),
        })
    }

    /// (A(a,g)B, A(a,p)X, X(p,g)B, X(p,a)A)
    pub fn components(&self) -> [&Rate; 4] {
        [&self.r_ag, &self.r_ap, &self.r_pg, &self.r_pa]
    }
}

impl RateEvaluator for ApproximateRate {
    fn info(&self) -> &RateInfo {
        &self.info
    }

    fn rate_type(&self) -> RateType {
        RateType::Approximate
    }

    fn eval(&self, tf: &Tfactors) -> Result<f64> {
        let ag = self.r_ag.eval(tf)?;
        let ap = self.r_ap.eval(tf)?;
        let pg = self.r_pg.eval(tf)?;
        let pa = self.r_pa.eval(tf)?;
        let den = pg + pa;
        if den == 0.0 {
            return Ok(ag);
        }
        Ok(ag + ap * pg / den)
    }

    fn eval_derivative(&self, tf: &Tfactors) -> Result<f64> {
        let (ap, pg, pa) = (self.r_ap.eval(tf)?, self.r_pg.eval(tf)?, self.r_pa.eval(tf)?);
        let d_ag = self.r_ag.eval_derivative(tf)?;
        let den = pg + pa;
        if den == 0.0 {
            return Ok(d_ag);
        }
        let d_ap = self.r_ap.eval_derivative(tf)?;
        let d_pg = self.r_pg.eval_derivative(tf)?;
        let d_pa = self.r_pa.eval_derivative(tf)?;
        let num = ap * pg;
        let d_num = d_ap * pg + ap * d_pg;
        Ok(d_ag + (d_num * den - num * (d_pg + d_pa)) / (den * den))
    }

    /// The four component rates, one after the other. Reading the text
    /// back with `Rate::parse_all` gives the components, not the
    /// approximation.
    fn to_source_string(&self) -> Result<String> {
        let mut out = String::new();
        for rate in self.components() {
            out.push_str(&rate.to_source_string()?);
        }
        Ok(out)
    }
}
