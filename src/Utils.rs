/// Logger setup for binaries and tests built on the crate.
pub mod logger;
