//! Population lifecycle: aging, replenishment, selection and reproduction.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::schema::{
    ConfigError, Gene, GenePool, Genome, PopulationConfig, TickHistory, TickStats,
};

use super::diff::{DiffError, similarity};
use super::generator::Generator;
use super::tournament::{Tournament, TournamentId};

/// Per-genome bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenomeEntry {
    /// Remaining ticks before eviction.
    pub ttl: usize,
}

/// Errors raised while running a tick.
#[derive(Debug, thiserror::Error)]
pub enum PopulationError {
    #[error("Crossover failed: {0}")]
    Diff(#[from] DiffError),
    #[error("Tournament {id} returned a genome that was not one of its candidates")]
    UnknownLeader { id: TournamentId },
}

/// Circular buffer of recent leader sizes (doubled).
#[derive(Debug, Clone)]
struct SizeWindow {
    samples: Vec<usize>,
    cursor: usize,
}

impl SizeWindow {
    fn new(length: usize, initial: usize) -> Self {
        Self {
            samples: vec![initial; length],
            cursor: 0,
        }
    }

    fn push(&mut self, sample: usize) {
        self.samples[self.cursor] = sample;
        self.cursor = (self.cursor + 1) % self.samples.len();
    }

    fn mean(&self) -> usize {
        self.samples.iter().sum::<usize>() / self.samples.len()
    }
}

/// Smallest genome length bound whose distinct genomes can fill the
/// population on their own.
fn min_random_size(pool_len: usize, min_population_size: usize) -> usize {
    let mut capacity = 0usize;
    let mut layer = 1usize;
    let mut size = 0;
    while capacity < min_population_size {
        size += 1;
        layer = layer.saturating_mul(pool_len);
        capacity = capacity.saturating_add(layer);
    }
    size
}

/// Mutate `leader` for up to `|leader|` steps without letting it drift
/// further than `max_mutation_percent` from the original.
///
/// A step whose result would fall to or below the similarity floor is
/// discarded and ends the walk.
pub fn bounded_mutation<R: Rng + ?Sized>(
    generator: &Generator,
    leader: &[Gene],
    max_mutation_percent: f64,
    rng: &mut R,
) -> Genome {
    let steps = if leader.is_empty() {
        1
    } else {
        rng.gen_range(1..=leader.len())
    };
    let floor = 1.0 - max_mutation_percent;

    let mut mutant = leader.to_vec();
    for _ in 0..steps {
        let candidate = generator.mutate(&mutant, rng);
        if similarity(leader, &candidate) <= floor {
            break;
        }
        mutant = candidate;
    }
    mutant
}

/// A set of genomes evolved one tick at a time.
///
/// Fitness is never computed here: leaders are chosen by the injected
/// [`Tournament`]. Genomes are kept in an ordered map so a seeded run is
/// fully reproducible.
pub struct Population<T> {
    config: PopulationConfig,
    generator: Generator,
    tournament: T,
    rng: StdRng,
    genomes: BTreeMap<Genome, GenomeEntry>,
    size_window: SizeWindow,
    min_random_size: usize,
    stats: TickStats,
}

impl<T: Tournament> Population<T> {
    /// Create an empty population.
    pub fn new(
        config: PopulationConfig,
        gene_pool: &GenePool,
        tournament: T,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = Generator::new(gene_pool)?;

        let seed = config.random_seed.unwrap_or_else(rand::random);
        let size_window = SizeWindow::new(config.size_window_length, config.size_window_initial);
        let min_random_size = min_random_size(gene_pool.len(), config.min_population_size);

        Ok(Self {
            config,
            generator,
            tournament,
            rng: StdRng::seed_from_u64(seed),
            genomes: BTreeMap::new(),
            size_window,
            min_random_size,
            stats: TickStats::default(),
        })
    }

    /// Replace the random source.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Validated configuration.
    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }

    /// Operator generator over the gene pool.
    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// Injected tournament.
    pub fn tournament(&self) -> &T {
        &self.tournament
    }

    /// Injected tournament, mutably.
    pub fn tournament_mut(&mut self) -> &mut T {
        &mut self.tournament
    }

    /// Statistics of the last completed tick.
    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    /// Number of member genomes.
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    /// True if the population has no genomes.
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// Whether `genome` is a member.
    pub fn contains(&self, genome: &[Gene]) -> bool {
        self.genomes.contains_key(genome)
    }

    /// Remaining ticks of a member genome.
    pub fn ttl(&self, genome: &[Gene]) -> Option<usize> {
        self.genomes.get(genome).map(|entry| entry.ttl)
    }

    /// Iterate over member genomes in order.
    pub fn iter(&self) -> impl Iterator<Item = &Genome> {
        self.genomes.keys()
    }

    /// Snapshot of all member genomes in order.
    pub fn genomes(&self) -> Vec<Genome> {
        self.genomes.keys().cloned().collect()
    }

    /// Upper bound on the length of freshly created random genomes.
    pub fn max_random_size(&self) -> usize {
        self.size_window.mean().max(self.min_random_size)
    }

    /// Run one simulation step.
    pub fn tick(&mut self) -> Result<&TickStats, PopulationError> {
        self.stats = TickStats::default();

        self.evict();
        self.replenish();

        let tournaments = self.submit_tournaments();
        let mut leaders = Vec::with_capacity(tournaments.len());
        for (id, candidates) in tournaments {
            let leader = self.tournament.get_result(id);
            if !candidates.contains(&leader) {
                return Err(PopulationError::UnknownLeader { id });
            }
            match self.genomes.get_mut(&leader) {
                Some(entry) => entry.ttl = self.config.genome_ttl,
                None => return Err(PopulationError::UnknownLeader { id }),
            }
            self.size_window.push(leader.len() * 2);
            self.mutate_leader(&leader);
            leaders.push(leader);
        }
        trace!("{} mutants from {} leaders", self.stats.mutated, leaders.len());

        self.crossover(&leaders)?;

        self.stats.population_size = self.genomes.len();
        debug!(
            "tick: size={} created={} deleted={} mutated={} crossed={} similarity={:.3}",
            self.stats.population_size,
            self.stats.created,
            self.stats.deleted,
            self.stats.mutated,
            self.stats.crossed,
            self.stats.similarity
        );

        Ok(&self.stats)
    }

    /// Run `ticks` ticks, reporting each one.
    pub fn run_with_callback<F>(
        &mut self,
        ticks: usize,
        mut callback: F,
    ) -> Result<TickHistory, PopulationError>
    where
        F: FnMut(usize, &TickStats),
    {
        let mut history = TickHistory::default();
        for tick in 0..ticks {
            let stats = self.tick()?;
            history.record(stats);
            callback(tick, stats);
        }
        Ok(history)
    }

    /// Run `ticks` ticks.
    pub fn run(&mut self, ticks: usize) -> Result<TickHistory, PopulationError> {
        self.run_with_callback(ticks, |_, _| {})
    }

    /// Insert a genome with a fresh TTL. Returns false if already present.
    fn insert(&mut self, genome: Genome) -> bool {
        match self.genomes.entry(genome) {
            Entry::Vacant(entry) => {
                entry.insert(GenomeEntry {
                    ttl: self.config.genome_ttl,
                });
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    fn evict(&mut self) {
        let before = self.genomes.len();
        self.genomes.retain(|_, entry| {
            if entry.ttl == 0 {
                false
            } else {
                entry.ttl -= 1;
                true
            }
        });
        self.stats.deleted = before - self.genomes.len();
        trace!("evicted {} genomes", self.stats.deleted);
    }

    fn replenish(&mut self) {
        let max_size = self.max_random_size();
        while self.genomes.len() < self.config.min_population_size {
            let size = self.rng.gen_range(1..=max_size);
            let genome = self.generator.create(size, &mut self.rng);
            if self.insert(genome) {
                self.stats.created += 1;
            }
        }
        trace!(
            "created {} random genomes of up to {} genes",
            self.stats.created, max_size
        );
    }

    /// Open every tournament for this tick and fill it with distinct genomes.
    ///
    /// Returns each tournament with the candidates it was given.
    fn submit_tournaments(&mut self) -> Vec<(TournamentId, Vec<Genome>)> {
        let members: Vec<&Genome> = self.genomes.keys().collect();
        let mut tournaments = Vec::with_capacity(self.config.operations_per_tick);

        for _ in 0..self.config.operations_per_tick {
            let id = self.tournament.create_tournament();
            let candidates: Vec<Genome> = rand::seq::index::sample(
                &mut self.rng,
                members.len(),
                self.config.tournament_size,
            )
            .into_iter()
            .map(|index| members[index].clone())
            .collect();
            for genome in &candidates {
                self.tournament.add_genome(id, genome);
            }
            tournaments.push((id, candidates));
        }

        tournaments
    }

    fn mutate_leader(&mut self, leader: &Genome) {
        let mutant = bounded_mutation(
            &self.generator,
            leader,
            self.config.max_mutation_percent,
            &mut self.rng,
        );
        if self.insert(mutant) {
            self.stats.mutated += 1;
        }
    }

    /// Cross over the most similar leader pairs.
    fn crossover(&mut self, leaders: &[Genome]) -> Result<(), DiffError> {
        let mut candidates = Vec::new();
        let mut total = 0.0;
        let mut pairs = 0usize;

        for (i, father) in leaders.iter().enumerate() {
            for mother in &leaders[i + 1..] {
                let score = similarity(father, mother);
                total += score;
                pairs += 1;
                if score >= self.config.crossover_similarity {
                    candidates.push((score, father, mother));
                }
            }
        }

        self.stats.similarity = if pairs > 0 { total / pairs as f64 } else { 0.0 };

        candidates.sort_unstable_by(|a, b| b.0.total_cmp(&a.0));
        for (_, father, mother) in candidates {
            if self.stats.crossed >= self.config.operations_per_tick {
                break;
            }
            let child = self.generator.crossover(father, mother, &mut self.rng)?;
            if self.insert(child) {
                self.stats.crossed += 1;
            }
        }

        trace!("crossed {} children", self.stats.crossed);
        Ok(())
    }
}
