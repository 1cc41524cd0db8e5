//! Common optical element attributes.
//!
//! This module handles the attributes shared by all optical elements: the lateral position of
//! the element's optical axis, the (display oriented) lateral extent, the axial position and
//! the label used for name based lookup within a system.
use serde::{Deserialize, Serialize};

use crate::error::{BeamResult, BeamlineError};

/// Struct for storing common attributes of optical elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementAttr {
    label: String,
    /// lateral position of the element's optical axis
    offset: f64,
    /// lateral extent, display-only
    size: f64,
    /// axial position of the element
    z: f64,
}
impl ElementAttr {
    /// Creates new element attributes ([`ElementAttr`]) with the given label and axial
    /// position. `offset` defaults to 0.0 and `size` to 1.0.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given axial position is not finite.
    pub fn new(label: &str, z: f64) -> BeamResult<Self> {
        if !z.is_finite() {
            return Err(BeamlineError::Element(
                "axial position must be finite".into(),
            ));
        }
        Ok(Self {
            label: label.to_owned(),
            offset: 0.0,
            size: 1.0,
            z,
        })
    }
    /// Returns the label of this element.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
    /// Sets the label of this element.
    pub fn set_label(&mut self, label: &str) {
        self.label = label.to_owned();
    }
    /// Returns the lateral offset of this element's optical axis.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }
    /// Sets the lateral offset of this element's optical axis.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given offset is not finite.
    pub fn set_offset(&mut self, offset: f64) -> BeamResult<()> {
        if !offset.is_finite() {
            return Err(BeamlineError::Element("offset must be finite".into()));
        }
        self.offset = offset;
        Ok(())
    }
    /// Returns the lateral extent of this element.
    #[must_use]
    pub const fn size(&self) -> f64 {
        self.size
    }
    /// Sets the lateral extent of this element.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given size is negative or not finite.
    pub fn set_size(&mut self, size: f64) -> BeamResult<()> {
        if !size.is_finite() || size < 0.0 {
            return Err(BeamlineError::Element(
                "size must be >= 0.0 and finite".into(),
            ));
        }
        self.size = size;
        Ok(())
    }
    /// Returns the axial position of this element.
    #[must_use]
    pub const fn z(&self) -> f64 {
        self.z
    }
    /// Sets the axial position of this element.
    ///
    /// The axial position is reassigned by the fill algorithm of an optical system and (on
    /// explicit request) by a ray trace.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given axial position is not finite.
    pub fn set_z(&mut self, z: f64) -> BeamResult<()> {
        if !z.is_finite() {
            return Err(BeamlineError::Element(
                "axial position must be finite".into(),
            ));
        }
        self.z = z;
        Ok(())
    }
}
