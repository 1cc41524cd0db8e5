//! This is the documentation for the **BEAMLINE** software package: first-order (ABCD)
//! optical-column modeling and sequential ray tracing.
//!
//! A [`system::OpticalSystem`] holds an ordered chain of optical operators (lenses, beam
//! deflectors and the free-space gaps between them) between a [`source::Source`] and a
//! [`screen::Screen`]. The gaps are never written by hand: the system's fill algorithm
//! synthesizes exactly one propagator between any two axially adjacent elements, however
//! the column was assembled or rearranged. Tracing emits a batch of rays from the source
//! and folds each of them through the chain, producing one [`trace::RayTrace`] per ray.
//!
//! Operators share a 2×2 transfer structure whose entries may be constants or nonlinear
//! response functions of the incoming ray (see [`transfer`]), which keeps exact finite-angle
//! element models inside the familiar ABCD formalism.
#![allow(clippy::module_name_repetitions)]

pub mod elements;
pub mod error;
pub mod microscope;
pub mod ray;
pub mod screen;
pub mod source;
pub mod system;
pub mod trace;
pub mod transfer;
pub mod utils;

pub use microscope::Microscope;
pub use system::OpticalSystem;
