//! Logging setup. The crate itself only emits records through `log`;
//! callers that want to see them install a logger once with [`init_logger`].
use crate::rate_error::Result;
use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;
use std::path::Path;

/// Installs a terminal logger at `level` and, when `log_file` is given, a
/// file logger writing the same records. Returns `Ok(false)` when a logger
/// was already installed (by this function or by the host program).
pub fn init_logger(level: LevelFilter, log_file: Option<&Path>) -> Result<bool> {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Debug)
        .build();
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        loggers.push(WriteLogger::new(level, config, File::create(path)?));
    }
    Ok(CombinedLogger::init(loggers).is_ok())
}
