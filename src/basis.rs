//! Shape function family implementations

pub mod hierarchic;
pub mod infinite;
pub mod lagrange;
pub mod monomial;
