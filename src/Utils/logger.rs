use simplelog::*;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum LoggerError {
    UnknownLevel(String),
    /// a global logger is already installed
    AlreadyInitialized,
}

impl fmt::Display for LoggerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoggerError::UnknownLevel(level) => write!(
                f,
                "loglevel must be debug, info, warn, error or off, got '{}'",
                level
            ),
            LoggerError::AlreadyInitialized => write!(f, "logger is already initialized"),
        }
    }
}

impl std::error::Error for LoggerError {}

/// `None` means the default level, info
pub fn parse_loglevel(loglevel: Option<&str>) -> Result<LevelFilter, LoggerError> {
    let Some(level) = loglevel else {
        return Ok(LevelFilter::Info);
    };
    match level.trim().to_lowercase().as_str() {
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" | "none" => Ok(LevelFilter::Off),
        _ => Err(LoggerError::UnknownLevel(level.to_string())),
    }
}

/// Installs a terminal logger for the whole process.
pub fn init_logger(loglevel: Option<&str>) -> Result<(), LoggerError> {
    let level = parse_loglevel(loglevel)?;
    CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])
    .map_err(|_| LoggerError::AlreadyInitialized)
}
