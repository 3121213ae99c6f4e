//! Crate-level error type
//!
//! Each layer keeps its own error enum; `Error` wraps them so `?` composes
//! across loader, setter and configuration.

use std::fmt;

use crate::config::ConfigError;
use crate::library::{LoadError, SymbolError};
use crate::probes::ProbeMismatch;
use crate::setter::SetterError;

#[derive(Debug)]
pub enum Error {
    Load(LoadError),
    Symbol(SymbolError),
    Setter(SetterError),
    Config(ConfigError),
    Probe(ProbeMismatch),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(e) => fmt::Display::fmt(e, f),
            Self::Symbol(e) => fmt::Display::fmt(e, f),
            Self::Setter(e) => fmt::Display::fmt(e, f),
            Self::Config(e) => fmt::Display::fmt(e, f),
            Self::Probe(e) => write!(f, "Variadic ABI self-check failed: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::Symbol(e) => Some(e),
            Self::Setter(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Probe(e) => Some(e),
        }
    }
}

impl From<LoadError> for Error {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

impl From<SymbolError> for Error {
    fn from(e: SymbolError) -> Self {
        Self::Symbol(e)
    }
}

impl From<SetterError> for Error {
    fn from(e: SetterError) -> Self {
        Self::Setter(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ProbeMismatch> for Error {
    fn from(e: ProbeMismatch) -> Self {
        Self::Probe(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
