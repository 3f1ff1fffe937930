//! Compute module - Diffing, variation operators and population dynamics.

mod diff;
mod generator;
mod population;
mod tournament;

pub use diff::*;
pub use generator::*;
pub use population::*;
pub use tournament::*;
