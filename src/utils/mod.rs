#![warn(missing_docs)]
//! Various helper functions and macros
pub mod math_utils;
pub mod uom_macros;
