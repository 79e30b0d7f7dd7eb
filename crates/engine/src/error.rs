//! The module contains the error the engine can throw.
//!
//! The engine is pure, so the only failure is a value outside its domain:
//!
//! - [`InvalidPeriod`] thrown when a year/month selection is out of range.
//!
//!  [`InvalidPeriod`]: EngineError::InvalidPeriod
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
}
