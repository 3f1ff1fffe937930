//! Tournament selection interface.
//!
//! The population does not judge genomes itself. Each tick it opens
//! tournaments through a [`Tournament`] implementation, fills them with
//! sampled genomes, and asks for one leader per tournament.

use std::collections::HashMap;

use crate::schema::Genome;

/// Identifier of an open tournament, unique within a tick.
pub type TournamentId = usize;

/// Selection capability injected into a population.
pub trait Tournament {
    /// Open a new tournament.
    fn create_tournament(&mut self) -> TournamentId;

    /// Register a candidate. Called `tournament_size` times per tournament,
    /// with distinct genomes.
    fn add_genome(&mut self, id: TournamentId, genome: &Genome);

    /// Close the tournament and return its leader, which must be one of the
    /// genomes added to it. Called exactly once per tournament.
    fn get_result(&mut self, id: TournamentId) -> Genome;
}

/// Tournament that keeps the candidate with the highest fitness score.
///
/// Ties go to the earliest-added candidate.
pub struct FitnessTournament<F> {
    fitness: F,
    next_id: TournamentId,
    open: HashMap<TournamentId, Vec<Genome>>,
}

impl<F> FitnessTournament<F>
where
    F: FnMut(&Genome) -> f64,
{
    /// Create with a fitness function.
    pub fn new(fitness: F) -> Self {
        Self {
            fitness,
            next_id: 0,
            open: HashMap::new(),
        }
    }

    /// Number of tournaments created but not yet resolved.
    pub fn open_count(&self) -> usize {
        self.open.len()
    }
}

impl<F> Tournament for FitnessTournament<F>
where
    F: FnMut(&Genome) -> f64,
{
    fn create_tournament(&mut self) -> TournamentId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.open.insert(id, Vec::new());
        id
    }

    fn add_genome(&mut self, id: TournamentId, genome: &Genome) {
        self.open
            .get_mut(&id)
            .unwrap_or_else(|| panic!("tournament {id} is not open"))
            .push(genome.clone());
    }

    /// # Panics
    ///
    /// Panics if the tournament is unknown or has no candidates.
    fn get_result(&mut self, id: TournamentId) -> Genome {
        let candidates = self
            .open
            .remove(&id)
            .unwrap_or_else(|| panic!("tournament {id} is not open"));

        let mut best: Option<(f64, Genome)> = None;
        for genome in candidates {
            let score = (self.fitness)(&genome);
            if best
                .as_ref()
                .is_none_or(|(best_score, _)| score > *best_score)
            {
                best = Some((score, genome));
            }
        }

        best.map(|(_, genome)| genome)
            .unwrap_or_else(|| panic!("tournament {id} has no candidates"))
    }
}
