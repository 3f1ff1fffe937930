//! Per-tick statistics and run history.

use serde::{Deserialize, Serialize};

/// Counters and measurements for the most recently completed tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickStats {
    /// Random genomes created during replenishment.
    pub created: usize,
    /// Genomes evicted because their TTL ran out.
    pub deleted: usize,
    /// Novel mutants inserted.
    pub mutated: usize,
    /// Novel crossover children inserted.
    pub crossed: usize,
    /// Mean pairwise similarity among this tick's leaders.
    pub similarity: f64,
    /// Population size after the tick.
    pub population_size: usize,
}

/// Tick history for plotting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickHistory {
    /// Created count per tick.
    pub created: Vec<usize>,
    /// Deleted count per tick.
    pub deleted: Vec<usize>,
    /// Mutated count per tick.
    pub mutated: Vec<usize>,
    /// Crossed count per tick.
    pub crossed: Vec<usize>,
    /// Leader similarity per tick.
    pub similarity: Vec<f64>,
    /// Population size per tick.
    pub population_size: Vec<usize>,
}

impl TickHistory {
    /// Append one tick's statistics.
    pub fn record(&mut self, stats: &TickStats) {
        self.created.push(stats.created);
        self.deleted.push(stats.deleted);
        self.mutated.push(stats.mutated);
        self.crossed.push(stats.crossed);
        self.similarity.push(stats.similarity);
        self.population_size.push(stats.population_size);
    }

    /// Number of ticks recorded.
    pub fn len(&self) -> usize {
        self.population_size.len()
    }

    pub fn is_empty(&self) -> bool {
        self.population_size.is_empty()
    }
}
