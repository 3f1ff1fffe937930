//! Genome generation and variation operators.
//!
//! Provides random creation, point mutations, and diff-guided crossover.
//! Every operator draws from an explicitly passed random source so runs can
//! be reproduced from a seed.

use rand::Rng;

use crate::schema::{ConfigError, Gene, GenePool, Genome};

use super::diff::{DiffError, MappedGenome, generate_diffs};

/// Point mutation operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Insert one random gene.
    Add,
    /// Remove one gene.
    Delete,
    /// Overwrite one gene with a random one.
    Replace,
}

impl MutationKind {
    /// Pick an operator uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.gen_range(0..3) {
            0 => Self::Add,
            1 => Self::Delete,
            _ => Self::Replace,
        }
    }
}

/// Samples genes uniformly from a fixed pool.
#[derive(Debug, Clone)]
pub struct Generator {
    genes: Vec<Gene>,
}

impl Generator {
    /// Create from a non-empty gene pool.
    pub fn new(gene_pool: &GenePool) -> Result<Self, ConfigError> {
        if gene_pool.is_empty() {
            return Err(ConfigError::EmptyGenePool);
        }
        Ok(Self {
            genes: gene_pool.iter().copied().collect(),
        })
    }

    /// Genes available for sampling, in pool order.
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Gene {
        self.genes[rng.gen_range(0..self.genes.len())]
    }

    /// Random genome of `size` genes drawn with replacement.
    pub fn create<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Genome {
        (0..size).map(|_| self.sample(rng)).collect()
    }

    /// Insert a random gene at a random point, ends included.
    pub fn add_mutation<R: Rng + ?Sized>(&self, genome: &[Gene], rng: &mut R) -> Genome {
        let mut output = genome.to_vec();
        let gene = self.sample(rng);
        let pos = rng.gen_range(0..=output.len());
        output.insert(pos, gene);
        output
    }

    /// Remove the gene at a random index. Empty input is returned as is.
    pub fn delete_mutation<R: Rng + ?Sized>(&self, genome: &[Gene], rng: &mut R) -> Genome {
        let mut output = genome.to_vec();
        if !output.is_empty() {
            let pos = rng.gen_range(0..output.len());
            output.remove(pos);
        }
        output
    }

    /// Overwrite a random index with a fresh gene. Empty input is returned as is.
    pub fn replace_mutation<R: Rng + ?Sized>(&self, genome: &[Gene], rng: &mut R) -> Genome {
        let mut output = genome.to_vec();
        if !output.is_empty() {
            let gene = self.sample(rng);
            let pos = rng.gen_range(0..output.len());
            output[pos] = gene;
        }
        output
    }

    /// Apply one uniformly chosen point mutation.
    pub fn mutate<R: Rng + ?Sized>(&self, genome: &[Gene], rng: &mut R) -> Genome {
        match MutationKind::random(rng) {
            MutationKind::Add => self.add_mutation(genome, rng),
            MutationKind::Delete => self.delete_mutation(genome, rng),
            MutationKind::Replace => self.replace_mutation(genome, rng),
        }
    }

    /// Recombine two parents along their alignment.
    ///
    /// Each diff segment turning `father` into `mother` is applied on a fair
    /// coin flip, so the child keeps the father's structure where segments
    /// are skipped and takes the mother's where they are applied.
    pub fn crossover<R: Rng + ?Sized>(
        &self,
        father: &[Gene],
        mother: &[Gene],
        rng: &mut R,
    ) -> Result<Genome, DiffError> {
        let diffs = generate_diffs(father, mother);
        if diffs.is_empty() {
            return Ok(father.to_vec());
        }

        let mut mapped = MappedGenome::new(father);
        for diff in &diffs {
            if rng.gen_bool(0.5) {
                mapped.apply(diff)?;
            }
        }
        Ok(mapped.assemble())
    }
}
