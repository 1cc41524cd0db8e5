#![warn(missing_docs)]
//! Module for handling ray sources
use std::fmt::Display;

use itertools::Itertools;
use num::Zero;
use serde::{Deserialize, Serialize};
use uom::si::f64::Angle;

use crate::{
    error::{BeamResult, BeamlineError},
    ray::Ray,
    utils::math_utils::evenly_spaced,
};

/// A ray source at a fixed launch plane.
///
/// A source emits one batch of rays per [`Source::emit`] call: the cartesian product of
/// `points` evenly spaced launch positions across its lateral extent and its launch angles.
/// Emission is a pure function of the source state, so repeated calls with unchanged state
/// return value-identical batches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    z: f64,
    angles: Vec<Angle>,
    size: f64,
    offset: f64,
    points: usize,
    label: String,
}
impl Source {
    /// Create a new [`Source`] at the given launch plane with the given launch angles.
    ///
    /// The lateral extent defaults to 0.0 (infinitesimal source), the lateral center to 0.0
    /// and the number of launch positions to 1.
    ///
    /// # Errors
    ///
    /// This function returns an error if
    ///  - the given launch plane position is not finite
    ///  - the angle sequence is empty or contains non-finite angles
    pub fn new(z: f64, angles: Vec<Angle>) -> BeamResult<Self> {
        if !z.is_finite() {
            return Err(BeamlineError::Source("launch plane must be finite".into()));
        }
        Self::check_angles(&angles)?;
        Ok(Self {
            z,
            angles,
            size: 0.0,
            offset: 0.0,
            points: 1,
            label: "Source".to_owned(),
        })
    }
    fn check_angles(angles: &[Angle]) -> BeamResult<()> {
        if angles.is_empty() {
            return Err(BeamlineError::Source(
                "angle sequence must not be empty".into(),
            ));
        }
        if angles.iter().any(|angle| !angle.is_finite()) {
            return Err(BeamlineError::Source("launch angles must be finite".into()));
        }
        Ok(())
    }
    /// Returns the launch plane position of this [`Source`].
    #[must_use]
    pub const fn z(&self) -> f64 {
        self.z
    }
    /// Sets the launch plane position of this [`Source`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the given position is not finite.
    pub fn set_z(&mut self, z: f64) -> BeamResult<()> {
        if !z.is_finite() {
            return Err(BeamlineError::Source("launch plane must be finite".into()));
        }
        self.z = z;
        Ok(())
    }
    /// Returns the launch angles of this [`Source`].
    #[must_use]
    pub fn angles(&self) -> &[Angle] {
        &self.angles
    }
    /// Sets the launch angles of this [`Source`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the given sequence is empty or contains
    /// non-finite angles.
    pub fn set_angles(&mut self, angles: Vec<Angle>) -> BeamResult<()> {
        Self::check_angles(&angles)?;
        self.angles = angles;
        Ok(())
    }
    /// Returns the lateral extent of this [`Source`].
    #[must_use]
    pub const fn size(&self) -> f64 {
        self.size
    }
    /// Sets the lateral extent of this [`Source`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the given size is negative or not finite.
    pub fn set_size(&mut self, size: f64) -> BeamResult<()> {
        if !size.is_finite() || size < 0.0 {
            return Err(BeamlineError::Source(
                "size must be >= 0.0 and finite".into(),
            ));
        }
        self.size = size;
        Ok(())
    }
    /// Returns the lateral center of this [`Source`].
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }
    /// Sets the lateral center of this [`Source`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the given offset is not finite.
    pub fn set_offset(&mut self, offset: f64) -> BeamResult<()> {
        if !offset.is_finite() {
            return Err(BeamlineError::Source("offset must be finite".into()));
        }
        self.offset = offset;
        Ok(())
    }
    /// Returns the number of launch positions of this [`Source`].
    #[must_use]
    pub const fn points(&self) -> usize {
        self.points
    }
    /// Sets the number of launch positions of this [`Source`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the given count is zero.
    pub fn set_points(&mut self, points: usize) -> BeamResult<()> {
        if points == 0 {
            return Err(BeamlineError::Source("points must be positive".into()));
        }
        self.points = points;
        Ok(())
    }
    /// Returns the label of this [`Source`].
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
    /// Sets the label of this [`Source`].
    pub fn set_label(&mut self, label: &str) {
        self.label = label.to_owned();
    }
    /// Emit one batch of rays.
    ///
    /// Launch positions are `points` values evenly spaced across
    /// `[offset − size/2, offset + size/2]`; an infinitesimal source (`size == 0`) or a
    /// single launch position collapses the grid to `offset` itself. One ray is emitted per
    /// (position, angle) pair, position-major, labeled `R0, R1, …` in emission order.
    #[must_use]
    pub fn emit(&self) -> Vec<Ray> {
        let positions = if self.size.is_zero() || self.points == 1 {
            vec![self.offset]
        } else {
            evenly_spaced(
                self.offset - self.size / 2.0,
                self.offset + self.size / 2.0,
                self.points,
            )
        };
        positions
            .iter()
            .cartesian_product(self.angles.iter())
            .enumerate()
            .map(|(i, (x, angle))| Ray::new(*x, *angle, self.z, &format!("R{i}")))
            .collect()
    }
}
impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Source \"{}\" at {}: {} point(s), {} angle(s), size = {}, offset = {}",
            self.label,
            self.z,
            self.points,
            self.angles.len(),
            self.size,
            self.offset
        )
    }
}
