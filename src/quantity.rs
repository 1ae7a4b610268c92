pub mod cost;
pub mod energy;
pub mod rate;

/// Dimensioned `f64`: `ENERGY` is the kilowatt-hour exponent, `COST` is the pence exponent.
#[derive(
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    derive_more::Add,
    derive_more::From,
    derive_more::Sub,
    derive_more::Sum,
    serde::Deserialize,
)]
pub struct Quantity<const ENERGY: isize, const COST: isize>(pub f64);
