#![warn(missing_docs)]
//! Beamline specific error structures
use std::{error::Error, fmt::Display};

/// Beamline application specific Result type
pub type BeamResult<T> = std::result::Result<T, BeamlineError>;

/// Errors that can be returned by various BEAMLINE functions.
#[derive(Debug, PartialEq, Eq)]
pub enum BeamlineError {
    /// invalid element parameter while setting up or mutating an optical element
    Element(String),
    /// label based operator lookup failed (no match or ambiguous match)
    Lookup(String),
    /// invalid source configuration
    Source(String),
    /// a ray trace was used outside its valid state
    Retrace(String),
    /// errors not falling in one of the categories above
    Other(String),
}

impl Display for BeamlineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Element(m) => {
                write!(f, "Element:{m}")
            }
            Self::Lookup(m) => {
                write!(f, "Lookup:{m}")
            }
            Self::Source(m) => {
                write!(f, "Source:{m}")
            }
            Self::Retrace(m) => {
                write!(f, "Retrace:{m}")
            }
            Self::Other(m) => write!(f, "Beamline Error:Other:{m}"),
        }
    }
}
impl Error for BeamlineError {}

impl std::convert::From<String> for BeamlineError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
