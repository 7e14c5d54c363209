use crate::rate_error::{RateError, Result};

/// Temperature factors used by REACLIB-style rate evaluation.
///
/// Every power and logarithm of T9 = T / 1e9 that appears in the seven-term
/// exponent, and in its temperature derivative, is computed once here. A rate
/// with many sets (or a network with many rates) reuses one `Tfactors` per
/// temperature without further `powf`/`ln` calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tfactors {
    /// temperature in K
    pub t: f64,
    pub ln_t: f64,
    pub t9: f64,
    /// T9^-1
    pub t9i: f64,
    /// T9^-2
    pub t9i2: f64,
    /// T9^1/3
    pub t913: f64,
    /// T9^-1/3
    pub t913i: f64,
    /// T9^2/3
    pub t923: f64,
    /// T9^-2/3
    pub t923i: f64,
    /// T9^-4/3
    pub t943i: f64,
    /// T9^5/3
    pub t953: f64,
    pub ln_t9: f64,
}

impl Tfactors {
    /// `t` is the temperature in Kelvin.
    pub fn new(t: f64) -> Result<Self> {
        if !t.is_finite() || t <= 0.0 {
            return Err(RateError::InvalidTemperature(t));
        }
        let t9 = t * 1.0e-9;
        let t9i = 1.0 / t9;
        let t913 = t9.cbrt();
        let t913i = 1.0 / t913;
        let t923 = t913 * t913;
        let t923i = t913i * t913i;
        Ok(Self {
            t,
            ln_t: t.ln(),
            t9,
            t9i,
            t9i2: t9i * t9i,
            t913,
            t913i,
            t923,
            t923i,
            t943i: t9i * t913i,
            t953: t9 * t923,
            ln_t9: t9.ln(),
        })
    }
}
