/// Temperature factors: powers and logarithms of T9 computed once per temperature.
pub mod tfactors;
/// Common contract of all rate kinds. `Rate` is a closed enum (analytic,
/// tabulated, approximate, derived) evaluated through the `RateEvaluator` trait.
///
///  # Examples
/// ```
/// use NucRates::Rates::rate_api::{Rate, RateEvaluator};
/// use NucRates::Rates::tfactors::Tfactors;
/// let source = "4
///          he4  c12  o16                       nac2      7.16192e+00
///  2.546340e+02-1.840970e+00 1.034110e+02-4.205670e+02
///  6.408740e+01-1.246240e+01 1.373030e+02
/// ";
/// let rate = Rate::parse(source, "c12-ag-o16").unwrap();
/// let tf = Tfactors::new(2.0e8).unwrap();
/// let r = rate.eval(&tf).unwrap();
/// let drdt = rate.eval_derivative(&tf).unwrap();
/// println!("{}: {} (d/dT = {})", rate, r, drdt);
/// ```
pub mod rate_api;
/// REACLIB chapters, term sets and analytic rates.
pub mod reaclib;
/// Reader for REACLIB single-rate files and library snapshots.
pub mod reaclib_parser;
/// Tabulated rates: log-log interpolation, flat outside the table.
pub mod tabular;
/// Reverse rates by detailed balance.
pub mod derived;
/// A(a,g)B combined with A(a,p)X(p,g)B.
pub mod approximate;
pub(crate) mod source_lines;

mod rate_tests;
