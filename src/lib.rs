//! Genops - Diff-guided evolutionary search over symbol sequences.
//!
//! This crate evolves a population of genomes (ordered sequences of genes
//! drawn from a fixed pool) one tick at a time. Recombination is structural:
//! two parents are aligned by their longest common subsequence and the child
//! takes a random subset of the edit segments between them.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Genome, configuration and statistics types
//! - `compute`: Alignment diffing, variation operators, population lifecycle
//!
//! Selection is not implemented here. Callers supply a [`Tournament`] that
//! picks a leader among the genomes the population submits.
//!
//! # Example
//!
//! ```rust,no_run
//! use genops::{
//!     compute::{FitnessTournament, Population, similarity},
//!     schema::{GenePool, Genome, PopulationConfig},
//! };
//!
//! let target: Genome = vec![0, 1, 2, 3, 2, 1, 0];
//! let tournament = FitnessTournament::new(move |g: &Genome| similarity(g, &target));
//!
//! let config = PopulationConfig {
//!     min_population_size: 100,
//!     tournament_size: 5,
//!     operations_per_tick: 10,
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//! let gene_pool: GenePool = (0..4).collect();
//! let mut population = Population::new(config, &gene_pool, tournament).unwrap();
//!
//! for _ in 0..50 {
//!     let stats = population.tick().unwrap();
//!     println!("size={} similarity={:.3}", stats.population_size, stats.similarity);
//! }
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{FitnessTournament, Population, Tournament};
pub use schema::{Gene, GenePool, Genome, PopulationConfig, SimulationConfig, TickStats};
