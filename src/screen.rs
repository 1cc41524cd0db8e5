#![warn(missing_docs)]
//! Module for the observation screen
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::{BeamResult, BeamlineError};

/// A passive observation screen terminating an optical system.
///
/// The screen only marks the end of the column at a fixed axial position; it does not
/// transform rays itself. The free-space gap reaching it is synthesized by the enclosing
/// system's fill algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    z: f64,
    label: String,
}
impl Screen {
    /// Create a new [`Screen`] at the given axial position.
    ///
    /// # Errors
    ///
    /// This function returns an error if the given axial position is not finite.
    pub fn new(z: f64) -> BeamResult<Self> {
        if !z.is_finite() {
            return Err(BeamlineError::Element(
                "screen position must be finite".into(),
            ));
        }
        Ok(Self {
            z,
            label: "Screen".to_owned(),
        })
    }
    /// Returns the axial position of this [`Screen`].
    #[must_use]
    pub const fn z(&self) -> f64 {
        self.z
    }
    /// Sets the axial position of this [`Screen`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the given axial position is not finite.
    pub fn set_z(&mut self, z: f64) -> BeamResult<()> {
        if !z.is_finite() {
            return Err(BeamlineError::Element(
                "screen position must be finite".into(),
            ));
        }
        self.z = z;
        Ok(())
    }
    /// Returns the label of this [`Screen`].
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
    /// Sets the label of this [`Screen`].
    pub fn set_label(&mut self, label: &str) {
        self.label = label.to_owned();
    }
}
impl Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Screen \"{}\" at {}", self.label, self.z)
    }
}
