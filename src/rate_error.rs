//! Error type shared by nuclide resolution, rate parsing and rate evaluation.
//!
//! Parse errors always carry the source identifier and the 1-based line they
//! were raised on, so a bad entry in a rate library can be found and fixed.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RateError {
    /// symbol not in the periodic table, non-positive A, or A < Z
    #[error("unknown nuclide '{name}'{location}")]
    UnknownNuclide { name: String, location: String },

    #[error("invalid temperature {0} K: temperature must be finite and positive")]
    InvalidTemperature(f64),

    #[error("{origin}, line {line}, field '{field}': {message}")]
    RateParse {
        origin: String,
        line: usize,
        field: String,
        message: String,
    },

    #[error("{origin}: unsupported chapter code '{code}'")]
    UnsupportedChapter { origin: String, code: String },

    #[error("{origin}: tabulated rate needs at least 2 rows, found {rows}")]
    InsufficientTableData { origin: String, rows: usize },

    #[error("{origin}: rate has no term sets")]
    EmptyRate { origin: String },

    /// spin or mass excess missing for a nucleus needed by detailed balance
    #[error("missing nuclear data for {0}: spin and mass excess are required")]
    MissingNuclearData(String),

    /// a derived or approximate rate cannot be assembled from the given rates
    #[error("invalid rate composition: {0}")]
    InvalidComposition(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RateError>;

impl RateError {
    pub(crate) fn parse(origin: &str, line: usize, field: &str, message: impl Into<String>) -> Self {
        RateError::RateParse {
            origin: origin.to_string(),
            line,
            field: field.to_string(),
            message: message.into(),
        }
    }
}
