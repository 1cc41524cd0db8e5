#![warn(missing_docs)]
//! Module for additional uom macros that facilitate the creation of angle values
///macro to create an Angle in degree
#[macro_export]
macro_rules! degree {
    ($val:expr) => {{
        use uom::si::{angle::degree, f64::Angle};
        Angle::new::<degree>($val)
    }};
}
///macro to create an Angle in radian
#[macro_export]
macro_rules! radian {
    ($val:expr) => {{
        use uom::si::{angle::radian, f64::Angle};
        Angle::new::<radian>($val)
    }};
}
///macro to create an Angle in milliradian
#[macro_export]
macro_rules! milliradian {
    ($val:expr) => {{
        use uom::si::{angle::milliradian, f64::Angle};
        Angle::new::<milliradian>($val)
    }};
}
