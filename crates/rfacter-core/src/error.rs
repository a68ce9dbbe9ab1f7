//! Error types.
//!
//! `FacterError` covers failures that abort a whole resolution run or signal
//! an internal invariant violation. `ProbeError` covers a single probe and is
//! always recovered by the orchestrator.

use crate::resolvers::parser::ParseError;

/// Run-level error.
#[derive(Debug, Clone, PartialEq)]
pub enum FacterError {
    /// Two registry entries share a canonical name.
    DuplicateFact(String),
    /// An alias pattern is malformed (more than one wildcard, empty, ...).
    InvalidPattern { pattern: String, reason: String },
    /// A fact would overwrite a collection node of a different type.
    CollectionConflict {
        path: String,
        existing: &'static str,
        incoming: &'static str,
    },
}

impl std::fmt::Display for FacterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacterError::DuplicateFact(name) => {
                write!(f, "fact `{}` is registered more than once", name)
            }
            FacterError::InvalidPattern { pattern, reason } => {
                write!(f, "invalid alias pattern `{}`: {}", pattern, reason)
            }
            FacterError::CollectionConflict {
                path,
                existing,
                incoming,
            } => write!(
                f,
                "cannot place {} at `{}`: a {} is already there",
                incoming, path, existing
            ),
        }
    }
}

impl std::error::Error for FacterError {}

/// Error raised by a single probe.
#[derive(Debug)]
pub enum ProbeError {
    /// I/O error talking to the host.
    Io(std::io::Error),
    /// Host data could not be parsed.
    Parse(ParseError),
    /// Host data parsed but made no sense.
    InvalidData(String),
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeError::Io(e) => write!(f, "I/O error: {}", e),
            ProbeError::Parse(e) => write!(f, "{}", e),
            ProbeError::InvalidData(msg) => write!(f, "invalid data: {}", msg),
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProbeError::Io(e) => Some(e),
            ProbeError::Parse(e) => Some(e),
            ProbeError::InvalidData(_) => None,
        }
    }
}

impl From<std::io::Error> for ProbeError {
    fn from(e: std::io::Error) -> Self {
        ProbeError::Io(e)
    }
}

impl From<ParseError> for ProbeError {
    fn from(e: ParseError) -> Self {
        ProbeError::Parse(e)
    }
}
