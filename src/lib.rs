//! Thermonuclear reaction rates: nuclide identities, REACLIB and tabulated
//! rate parsing, rate evaluation with temperature derivatives, reverse rates
//! by detailed balance, and a registry of the rates found on disk.
#[allow(non_snake_case)]
pub mod Nuclei;
#[allow(non_snake_case)]
pub mod Rates;
#[allow(non_snake_case)]
pub mod Utils;
pub mod library_manager;
pub mod rate_error;
pub mod rate_registry;

pub use Nuclei::nucleus::Nucleus;
pub use Nuclei::nuclide_table::NuclideTable;
pub use Rates::rate_api::{Rate, RateEvaluator, RateType, ReactionSignature};
pub use Rates::tfactors::Tfactors;
pub use rate_error::{RateError, Result};
pub use rate_registry::{RateRegistry, list_known_rates};
