//! Schema module - Genome, configuration and statistics types.

mod config;
mod genome;
mod stats;

pub use config::*;
pub use genome::*;
pub use stats::*;
