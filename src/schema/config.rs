//! Configuration types for population simulations.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{GenePool, Genome};

/// Population lifecycle parameters. Immutable for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Population is replenished with random genomes up to this size.
    #[serde(default = "default_min_population_size")]
    pub min_population_size: usize,
    /// Number of distinct genomes entered into each tournament.
    #[serde(default = "default_tournament_size")]
    pub tournament_size: usize,
    /// Tournaments run per tick; also caps crossovers per tick.
    #[serde(default = "default_operations_per_tick")]
    pub operations_per_tick: usize,
    /// Ticks a genome survives without being created or selected.
    #[serde(default = "default_genome_ttl")]
    pub genome_ttl: usize,
    /// Maximum fraction (0.0-1.0) a mutant may drift from its leader.
    #[serde(default = "default_max_mutation_percent")]
    pub max_mutation_percent: f64,
    /// Minimum leader similarity (0.0-1.0) for a pair to be crossed over.
    #[serde(default = "default_crossover_similarity")]
    pub crossover_similarity: f64,
    /// Number of samples in the adaptive random-genome size window.
    #[serde(default = "default_size_window_length")]
    pub size_window_length: usize,
    /// Value every slot of the size window starts with.
    #[serde(default = "default_size_window_initial")]
    pub size_window_initial: usize,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            min_population_size: default_min_population_size(),
            tournament_size: default_tournament_size(),
            operations_per_tick: default_operations_per_tick(),
            genome_ttl: default_genome_ttl(),
            max_mutation_percent: default_max_mutation_percent(),
            crossover_similarity: default_crossover_similarity(),
            size_window_length: default_size_window_length(),
            size_window_initial: default_size_window_initial(),
            random_seed: None,
        }
    }
}

fn default_min_population_size() -> usize {
    2000
}
fn default_tournament_size() -> usize {
    20
}
fn default_operations_per_tick() -> usize {
    100
}
fn default_genome_ttl() -> usize {
    5
}
fn default_max_mutation_percent() -> f64 {
    0.4
}
fn default_crossover_similarity() -> f64 {
    0.7
}
fn default_size_window_length() -> usize {
    1000
}
fn default_size_window_initial() -> usize {
    200
}

impl PopulationConfig {
    /// Validate population parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_population_size == 0 {
            return Err(ConfigError::ZeroPopulationSize);
        }
        if self.tournament_size == 0 || self.tournament_size >= self.min_population_size {
            return Err(ConfigError::InvalidTournamentSize {
                tournament_size: self.tournament_size,
                min_population_size: self.min_population_size,
            });
        }
        if self.operations_per_tick == 0 {
            return Err(ConfigError::ZeroOperations);
        }
        check_fraction("max_mutation_percent", self.max_mutation_percent)?;
        check_fraction("crossover_similarity", self.crossover_similarity)?;
        if self.size_window_length == 0 || self.size_window_initial == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(())
    }
}

fn check_fraction(name: &'static str, value: f64) -> Result<(), ConfigError> {
    // NaN fails the range check
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidFraction { name, value })
    }
}

/// Top-level configuration for a simulation run driven from a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Population lifecycle parameters.
    #[serde(default)]
    pub population: PopulationConfig,
    /// Genes available to random creation and mutation.
    pub gene_pool: GenePool,
    /// Genome the built-in fitness tournament scores candidates against.
    #[serde(default)]
    pub target: Genome,
    /// Number of ticks to run.
    #[serde(default = "default_ticks")]
    pub ticks: usize,
}

fn default_ticks() -> usize {
    100
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population: PopulationConfig {
                min_population_size: 200,
                tournament_size: 8,
                operations_per_tick: 20,
                size_window_length: 100,
                size_window_initial: 32,
                ..Default::default()
            },
            gene_pool: (0..4).collect(),
            target: (0..32).map(|i| i % 4).collect(),
            ticks: default_ticks(),
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Validate the gene pool and population parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gene_pool.is_empty() {
            return Err(ConfigError::EmptyGenePool);
        }
        self.population.validate()
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Gene pool must contain at least one gene")]
    EmptyGenePool,
    #[error("Minimum population size must be non-zero")]
    ZeroPopulationSize,
    #[error(
        "Tournament size {tournament_size} must be non-zero and below the minimum population size {min_population_size}"
    )]
    InvalidTournamentSize {
        tournament_size: usize,
        min_population_size: usize,
    },
    #[error("Operations per tick must be non-zero")]
    ZeroOperations,
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidFraction { name: &'static str, value: f64 },
    #[error("Size window length and initial value must be non-zero")]
    ZeroWindow,
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
