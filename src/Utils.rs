//! different utility modules used throughout the project
/// terminal logger setup by log-level name
pub mod logger;
