#![forbid(unsafe_code)]

//! Top-level error model.
//!
//! Runtime paths never fail; the only fallible surfaces are spawning the
//! driver thread and loading or parsing options. Each wraps the error of the
//! crate it comes from so callers can match on the source.

use std::fmt;

use anchortip_core::{OptionsError, ParseOptionError};

/// Top-level error type for AnchorTip.
#[derive(Debug)]
pub enum Error {
    /// I/O failure, e.g. spawning the driver thread.
    Io(std::io::Error),
    /// Option loading or validation failed.
    Options(OptionsError),
    /// An option string named no known value.
    Parse(ParseOptionError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Options(err) => write!(f, "{err}"),
            Self::Parse(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Options(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<OptionsError> for Error {
    fn from(err: OptionsError) -> Self {
        Self::Options(err)
    }
}

impl From<ParseOptionError> for Error {
    fn from(err: ParseOptionError) -> Self {
        Self::Parse(err)
    }
}

/// Standard result type for AnchorTip APIs.
pub type Result<T> = std::result::Result<T, Error>;
