//! Tabulated rates.
//!
//! Source format:
//! ```text
//! t
//! c12 + he4 -> o16 | tab1
//! # T [K]     rate       optional derivative or uncertainty
//! 1.0e8       1.0e-5
//! 1.0e9       1.0e-3
//! ```
//! The `|` label is optional. Rows must have the same number of columns
//! (2 or 3), strictly increasing temperatures and positive rates.
//!
//! Evaluation interpolates linearly in (ln T, ln rate), which is monotonic
//! between rows. Outside the table the rate is held at the nearest end
//! value and its derivative is zero.
use super::rate_api::{RateEvaluator, RateInfo, RateType};
use super::source_lines::{NucleusResolver, SourceLine, fortran_exp, parse_field};
use super::tfactors::Tfactors;
use crate::rate_error::{RateError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// K
    pub temperature: f64,
    pub rate: f64,
    /// third column, carried but not used in evaluation
    pub aux: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct TabularRate {
    info: RateInfo,
    rows: Vec<TableRow>,
    ln_t: Vec<f64>,
    ln_r: Vec<f64>,
}

impl TabularRate {
    pub fn from_rows(info: RateInfo, rows: Vec<TableRow>) -> Result<Self> {
        if rows.len() < 2 {
            return Err(RateError::InsufficientTableData {
                origin: info.origin.clone(),
                rows: rows.len(),
            });
        }
        for (k, row) in rows.iter().enumerate() {
            if !(row.temperature.is_finite() && row.temperature > 0.0) {
                return Err(RateError::parse(&info.origin, k + 1, "temperature", "temperature must be positive"));
            }
            if !(row.rate.is_finite() && row.rate > 0.0) {
                return Err(RateError::parse(&info.origin, k + 1, "rate", "rate must be positive"));
            }
        }
        if let Some(k) = rows.windows(2).position(|w| w[1].temperature <= w[0].temperature) {
            return Err(RateError::parse(
                &info.origin,
                k + 2,
                "temperature",
                "temperatures must be strictly increasing",
            ));
        }
        let ln_t = rows.iter().map(|r| r.temperature.ln()).collect();
        let ln_r = rows.iter().map(|r| r.rate.ln()).collect();
        Ok(Self {
            info,
            rows,
            ln_t,
            ln_r,
        })
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub(crate) fn parse_lines(
        lines: &[SourceLine],
        origin: &str,
        resolver: &mut NucleusResolver,
    ) -> Result<Self> {
        let header = lines.get(1).ok_or_else(|| {
            RateError::parse(origin, lines.first().map(|l| l.number).unwrap_or(0), "header", "missing reaction header")
        })?;
        let info = parse_header(header, origin, resolver)?;

        let mut rows = Vec::with_capacity(lines.len().saturating_sub(2));
        let mut width: Option<usize> = None;
        for line in &lines[2..] {
            let tokens: Vec<&str> = line.text.split_whitespace().collect();
            if !(2..=3).contains(&tokens.len()) || width.is_some_and(|w| w != tokens.len()) {
                return Err(RateError::parse(
                    origin,
                    line.number,
                    "row",
                    format!(
                        "expected {} columns (T rate [aux]), found {}",
                        width.map(|w| w.to_string()).unwrap_or_else(|| "2 or 3".to_string()),
                        tokens.len()
                    ),
                ));
            }
            width = Some(tokens.len());
            let temperature = parse_field(tokens[0], line, origin, "temperature")?;
            let rate = parse_field(tokens[1], line, origin, "rate")?;
            let aux = match tokens.get(2) {
                Some(tok) => Some(parse_field(tok, line, origin, "aux")?),
                None => None,
            };
            if let Some(prev) = rows.last().map(|r: &TableRow| r.temperature) {
                if temperature <= prev {
                    return Err(RateError::parse(
                        origin,
                        line.number,
                        "temperature",
                        "temperatures must be strictly increasing",
                    ));
                }
            }
            if rate <= 0.0 {
                return Err(RateError::parse(origin, line.number, "rate", "rate must be positive"));
            }
            if temperature <= 0.0 {
                return Err(RateError::parse(origin, line.number, "temperature", "temperature must be positive"));
            }
            rows.push(TableRow {
                temperature,
                rate,
                aux,
            });
        }
        Self::from_rows(info, rows)
    }

    /// Index of the segment [i, i+1] holding ln T; None outside the table.
    fn segment(&self, ln_t: f64) -> Option<usize> {
        let last = self.ln_t.len() - 1;
        if ln_t < self.ln_t[0] || ln_t > self.ln_t[last] {
            return None;
        }
        let upper = self.ln_t.partition_point(|&x| x <= ln_t);
        Some(upper.clamp(1, last) - 1)
    }

    fn slope(&self, i: usize) -> f64 {
        (self.ln_r[i + 1] - self.ln_r[i]) / (self.ln_t[i + 1] - self.ln_t[i])
    }
}

fn parse_header(line: &SourceLine, origin: &str, resolver: &mut NucleusResolver) -> Result<RateInfo> {
    let (reaction, label) = match line.text.split_once('|') {
        Some((reaction, label)) => (reaction, label.trim()),
        None => (line.text, ""),
    };
    let sides: Vec<&str> = reaction.split("->").collect();
    if sides.len() != 2 {
        return Err(RateError::parse(
            origin,
            line.number,
            "header",
            "expected 'reactants -> products'",
        ));
    }
    let mut side_nuclei = Vec::with_capacity(2);
    for (side, field) in sides.iter().zip(["reactants", "products"]) {
        let tokens: Vec<&str> = side
            .split(|c: char| c.is_whitespace() || c == '+')
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() || tokens.len() > 4 {
            return Err(RateError::parse(
                origin,
                line.number,
                field,
                format!("expected 1 to 4 nuclei, found {}", tokens.len()),
            ));
        }
        let mut nuclei = Vec::with_capacity(tokens.len());
        for tok in tokens {
            nuclei.push(resolver.resolve(tok, line, origin)?);
        }
        side_nuclei.push(nuclei);
    }
    let products = side_nuclei.pop().unwrap_or_default();
    let reactants = side_nuclei.pop().unwrap_or_default();
    Ok(RateInfo::new(reactants, products, origin, label))
}

impl RateEvaluator for TabularRate {
    fn info(&self) -> &RateInfo {
        &self.info
    }

    fn rate_type(&self) -> RateType {
        RateType::Tabulated
    }

    fn eval(&self, tf: &Tfactors) -> Result<f64> {
        match self.segment(tf.ln_t) {
            Some(i) => Ok((self.ln_r[i] + self.slope(i) * (tf.ln_t - self.ln_t[i])).exp()),
            None if tf.ln_t < self.ln_t[0] => Ok(self.rows[0].rate),
            None => Ok(self.rows[self.rows.len() - 1].rate),
        }
    }

    fn eval_derivative(&self, tf: &Tfactors) -> Result<f64> {
        match self.segment(tf.ln_t) {
            // dr/dT = r * (d ln r / d ln T) / T
            Some(i) => Ok(self.eval(tf)? * self.slope(i) / tf.t),
            None => Ok(0.0),
        }
    }

    fn to_source_string(&self) -> Result<String> {
        let names = |nuclei: &[crate::Nuclei::nucleus::Nucleus]| {
            nuclei.iter().map(|n| n.name().to_string()).collect::<Vec<_>>().join(" + ")
        };
        let mut out = format!(
            "t\n{} -> {}",
            names(&self.info.reactants),
            names(&self.info.products)
        );
        if !self.info.label.is_empty() {
            out.push_str(&format!(" | {}", self.info.label));
        }
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format!("{} {}", fortran_exp(row.temperature, 8), fortran_exp(row.rate, 8)));
            if let Some(aux) = row.aux {
                out.push_str(&format!(" {}", fortran_exp(aux, 8)));
            }
            out.push('\n');
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rates::rate_api::Rate;
    use approx::assert_relative_eq;

    const TWO_ROWS: &str = "t
c12 + he4 -> o16 | tab1
# T      rate
1.0e8    1.0e-5
1.0e9    1.0e-3
";

    #[test]
    fn test_interpolates_between_rows() {
        let rate = Rate::parse(TWO_ROWS, "tab").unwrap();
        assert_eq!(rate.label(), "tab1");
        let r = rate.eval_at(5.0e8).unwrap();
        assert!(r > 1.0e-5 && r < 1.0e-3);
        // power law through both points: r = 1e-5 * (T/1e8)^2
        assert_relative_eq!(r, 1.0e-5 * 25.0, max_relative = 1e-10);
        assert_relative_eq!(rate.eval_at(1.0e8).unwrap(), 1.0e-5, max_relative = 1e-12);
        assert_relative_eq!(rate.eval_at(1.0e9).unwrap(), 1.0e-3, max_relative = 1e-12);
    }

    #[test]
    fn test_flat_extrapolation() {
        let rate = Rate::parse(TWO_ROWS, "tab").unwrap();
        assert_eq!(rate.eval_at(1.0e12).unwrap(), 1.0e-3);
        assert_eq!(rate.eval_at(1.0e3).unwrap(), 1.0e-5);
        assert_eq!(rate.eval_derivative_at(1.0e12).unwrap(), 0.0);
        assert_eq!(rate.eval_derivative_at(1.0e3).unwrap(), 0.0);
    }

    #[test]
    fn test_derivative_inside_table() {
        let rate = Rate::parse(TWO_ROWS, "tab").unwrap();
        // r = 1e-5 * (T/1e8)^2  =>  dr/dT = 2 r / T
        let t = 3.0e8;
        let expected = 2.0 * rate.eval_at(t).unwrap() / t;
        assert_relative_eq!(rate.eval_derivative_at(t).unwrap(), expected, max_relative = 1e-10);
        assert_relative_eq!(rate.temperature_exponent(t).unwrap(), 2.0, max_relative = 1e-10);
    }

    #[test]
    fn test_table_errors() {
        let one_row = "t\nc12 he4 -> o16\n1.0e8 1.0e-5\n";
        assert!(matches!(
            Rate::parse(one_row, "tab"),
            Err(RateError::InsufficientTableData { rows: 1, .. })
        ));
        let decreasing = "t\nc12 he4 -> o16\n1.0e9 1.0e-5\n1.0e8 1.0e-3\n";
        assert!(matches!(
            Rate::parse(decreasing, "tab"),
            Err(RateError::RateParse { line: 4, ref field, .. }) if field == "temperature"
        ));
        let ragged = "t\nc12 he4 -> o16\n1.0e8 1.0e-5 0.1\n1.0e9 1.0e-3\n";
        assert!(matches!(
            Rate::parse(ragged, "tab"),
            Err(RateError::RateParse { line: 4, ref field, .. }) if field == "row"
        ));
        let bad_number = "t\nc12 he4 -> o16\n1.0e8 fast\n1.0e9 1.0e-3\n";
        assert!(matches!(
            Rate::parse(bad_number, "tab"),
            Err(RateError::RateParse { line: 3, ref field, .. }) if field == "rate"
        ));
        let no_arrow = "t\nc12 he4 o16\n1.0e8 1.0e-5\n1.0e9 1.0e-3\n";
        assert!(matches!(Rate::parse(no_arrow, "tab"), Err(RateError::RateParse { line: 2, .. })));
    }

    #[test]
    fn test_source_round_trip() {
        let text = "t\nfe56 -> mn56\n1.0e8 2.0e-7 0.01\n2.0e8 4.0e-7 0.02\n4.0e8 9.0e-7 0.02\n";
        let rate = Rate::parse(text, "tab").unwrap();
        let again = Rate::parse(&rate.to_source_string().unwrap(), "tab").unwrap();
        match (&rate, &again) {
            (Rate::Tabular(a), Rate::Tabular(b)) => {
                for (x, y) in a.rows().iter().zip(b.rows()) {
                    assert_relative_eq!(x.temperature, y.temperature, max_relative = 1e-8);
                    assert_relative_eq!(x.rate, y.rate, max_relative = 1e-8);
                    assert_relative_eq!(x.aux.unwrap(), y.aux.unwrap(), max_relative = 1e-8);
                }
            }
            _ => panic!("expected tabulated rates"),
        }
        assert_eq!(rate.signature(), again.signature());
    }
}
