//! Genome representation types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Atomic symbol drawn from the gene pool.
pub type Gene = u32;

/// Ordered sequence of genes. Order is significant for alignment, mutation
/// and equality.
pub type Genome = Vec<Gene>;

/// Fixed universe of distinct genes available for sampling.
pub type GenePool = BTreeSet<Gene>;

/// A positional replace-range edit between two genomes.
///
/// Replaces `remove_count` consecutive genes starting at `position` in the
/// source genome with `added_genes`. Insertion-only segments have
/// `remove_count == 0`, deletion-only segments have no added genes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeDiff {
    /// Position in the source genome where the edit is anchored.
    pub position: usize,
    /// Number of source genes removed starting at `position`.
    pub remove_count: usize,
    /// Genes inserted in place of the removed range.
    pub added_genes: Genome,
}

impl GenomeDiff {
    /// Change in genome length caused by applying this segment.
    pub fn length_delta(&self) -> isize {
        self.added_genes.len() as isize - self.remove_count as isize
    }

    /// One past the last source position touched by this segment.
    pub fn end(&self) -> usize {
        self.position + self.remove_count
    }
}
