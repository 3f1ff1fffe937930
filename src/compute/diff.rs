//! Alignment-based genome diffing.
//!
//! Genomes are aligned with Myers' O((N+M)D) shortest edit script algorithm.
//! The edit script is folded into positional [`GenomeDiff`] segments which
//! can be applied selectively to a [`MappedGenome`] to recombine two parents.

use std::collections::VecDeque;

use crate::schema::{Gene, Genome, GenomeDiff};

/// Single step of an edit script transforming one genome into another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// Gene present only in the source genome.
    Delete(Gene),
    /// Gene present only in the target genome.
    Insert(Gene),
    /// Gene shared by both genomes.
    Common(Gene),
}

/// Errors raised when a diff segment is applied outside its contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    #[error(
        "Diff segment at {position} removing {remove_count} genes exceeds source genome of length {len}"
    )]
    OutOfRange {
        position: usize,
        remove_count: usize,
        len: usize,
    },
    #[error("Diff segment at position {position} was already applied")]
    AlreadyApplied { position: usize },
    #[error("Slot {position} has no gene left to remove")]
    DrainedSlot { position: usize },
}

/// Runs the forward pass of Myers' algorithm and returns the edit distance.
///
/// When `trace` is given, the furthest-reaching x of diagonals `-d-1..=d+1`
/// is recorded before each round `d` for backtracking.
fn myers(a: &[Gene], b: &[Gene], mut trace: Option<&mut Vec<Vec<isize>>>) -> usize {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let max = n + m;
    let offset = max + 1;
    let mut v = vec![0isize; (2 * max + 3) as usize];

    for d in 0..=max {
        if let Some(trace) = trace.as_deref_mut() {
            trace.push(v[(offset - d - 1) as usize..=(offset + d + 1) as usize].to_vec());
        }

        let mut k = -d;
        while k <= d {
            let idx = (offset + k) as usize;
            let mut x = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
                v[idx + 1]
            } else {
                v[idx - 1] + 1
            };
            let mut y = x - k;

            while x < n && y >= 0 && y < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }
            v[idx] = x;

            if x >= n && y >= m {
                return d as usize;
            }
            k += 2;
        }
    }

    max as usize
}

/// Compute the shortest edit script transforming `a` into `b`.
///
/// # Panics
///
/// Panics if the backtracked script does not consume both genomes exactly,
/// which indicates a defect in the alignment itself.
pub fn shortest_edit_script(a: &[Gene], b: &[Gene]) -> Vec<Edit> {
    let mut trace = Vec::new();
    myers(a, b, Some(&mut trace));

    let mut script = Vec::with_capacity(a.len().max(b.len()));
    let mut x = a.len() as isize;
    let mut y = b.len() as isize;

    for (d, v) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let at = |k: isize| v[(k + d + 1) as usize];

        let k = x - y;
        let prev_k = if k == -d || (k != d && at(k - 1) < at(k + 1)) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = at(prev_k);
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            script.push(Edit::Common(a[(x - 1) as usize]));
            x -= 1;
            y -= 1;
        }

        if d > 0 {
            if x == prev_x {
                script.push(Edit::Insert(b[(y - 1) as usize]));
            } else {
                script.push(Edit::Delete(a[(x - 1) as usize]));
            }
        }

        x = prev_x;
        y = prev_y;
    }

    script.reverse();

    let consumed = script
        .iter()
        .filter(|edit| !matches!(edit, Edit::Insert(_)))
        .count();
    let produced = script
        .iter()
        .filter(|edit| !matches!(edit, Edit::Delete(_)))
        .count();
    assert!(
        consumed == a.len() && produced == b.len(),
        "alignment defect: script covers {consumed}/{} source and {produced}/{} target genes",
        a.len(),
        b.len()
    );

    script
}

/// Length of the longest common subsequence of two genomes.
pub fn lcs_len(a: &[Gene], b: &[Gene]) -> usize {
    let distance = myers(a, b, None);
    (a.len() + b.len() - distance) / 2
}

/// Similarity in `[0, 1]`: LCS length over the longer genome's length.
///
/// Two empty genomes are treated as identical and score `1.0`.
pub fn similarity(a: &[Gene], b: &[Gene]) -> f64 {
    let total = a.len().max(b.len());
    if total == 0 {
        return 1.0;
    }
    lcs_len(a, b) as f64 / total as f64
}

/// Fold the edit script between `a` and `b` into positional diff segments.
///
/// Segments are ordered by position, never overlap, and never cover a gene
/// common to both genomes.
pub fn generate_diffs(a: &[Gene], b: &[Gene]) -> Vec<GenomeDiff> {
    let mut diffs = Vec::new();
    let mut position = 0;
    let mut open: Option<GenomeDiff> = None;

    for edit in shortest_edit_script(a, b) {
        match edit {
            Edit::Delete(_) => {
                open.get_or_insert_with(|| GenomeDiff {
                    position,
                    ..Default::default()
                })
                .remove_count += 1;
                position += 1;
            }
            Edit::Insert(gene) => {
                open.get_or_insert_with(|| GenomeDiff {
                    position,
                    ..Default::default()
                })
                .added_genes
                .push(gene);
            }
            Edit::Common(_) => {
                if let Some(diff) = open.take() {
                    diffs.push(diff);
                }
                position += 1;
            }
        }
    }

    diffs.extend(open);
    diffs
}

/// Source genome laid out as one slot per original position.
///
/// Each slot holds the genes currently occupying that position, so segments
/// from a single alignment can be applied in any subset and order without
/// shifting the positions of the others. A trailing empty slot anchors
/// insertions past the end of the source.
#[derive(Debug, Clone)]
pub struct MappedGenome {
    slots: Vec<VecDeque<Gene>>,
    applied: Vec<bool>,
}

impl MappedGenome {
    /// Map a source genome, one singleton slot per gene.
    pub fn new(source: &[Gene]) -> Self {
        let mut slots: Vec<VecDeque<Gene>> = source
            .iter()
            .map(|&gene| VecDeque::from([gene]))
            .collect();
        slots.push(VecDeque::new());

        Self {
            applied: vec![false; slots.len()],
            slots,
        }
    }

    /// Length of the source genome this mapping was built from.
    pub fn source_len(&self) -> usize {
        self.slots.len() - 1
    }

    /// Current number of genes across all slots.
    pub fn len(&self) -> usize {
        self.slots.iter().map(VecDeque::len).sum()
    }

    /// True if no genes remain in any slot.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(VecDeque::is_empty)
    }

    /// Apply one diff segment. On error the mapping is left unchanged.
    pub fn apply(&mut self, diff: &GenomeDiff) -> Result<(), DiffError> {
        let len = self.source_len();
        if diff.end() > len {
            return Err(DiffError::OutOfRange {
                position: diff.position,
                remove_count: diff.remove_count,
                len,
            });
        }
        if self.applied[diff.position] {
            return Err(DiffError::AlreadyApplied {
                position: diff.position,
            });
        }
        if let Some(position) = (diff.position..diff.end()).find(|&i| self.slots[i].is_empty()) {
            return Err(DiffError::DrainedSlot { position });
        }

        for slot in &mut self.slots[diff.position..diff.end()] {
            slot.pop_front();
        }

        let slot = &mut self.slots[diff.position];
        for &gene in diff.added_genes.iter().rev() {
            slot.push_front(gene);
        }

        self.applied[diff.position] = true;
        Ok(())
    }

    /// Linearize the slots back into a genome.
    pub fn assemble(&self) -> Genome {
        self.slots.iter().flatten().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(a: &[Gene], diffs: &[GenomeDiff]) -> Genome {
        let mut mapped = MappedGenome::new(a);
        for diff in diffs {
            mapped.apply(diff).unwrap();
        }
        mapped.assemble()
    }

    #[test]
    fn test_single_replacement() {
        let father = vec![1, 2, 3];
        let mother = vec![1, 9, 3];

        let diffs = generate_diffs(&father, &mother);
        assert_eq!(
            diffs,
            vec![GenomeDiff {
                position: 1,
                remove_count: 1,
                added_genes: vec![9],
            }]
        );
        assert!((similarity(&father, &mother) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity(&[1, 2, 3], &[1, 2, 3]), 1.0);
        assert_eq!(similarity(&[1, 2, 3], &[4, 5]), 0.0);
        assert_eq!(similarity(&[], &[]), 1.0);
        assert_eq!(similarity(&[], &[1]), 0.0);
        assert_eq!(similarity(&[1, 2], &[2, 1]), 0.5);
        assert_eq!(
            similarity(&[1, 2, 3, 4], &[2, 4]),
            similarity(&[2, 4], &[1, 2, 3, 4])
        );
    }

    #[test]
    fn test_lcs_len() {
        assert_eq!(lcs_len(&[1, 2, 3, 4, 5], &[2, 9, 4, 5]), 3);
        assert_eq!(lcs_len(&[], &[1, 2]), 0);
        assert_eq!(lcs_len(&[7, 7, 7], &[7]), 1);
    }

    #[test]
    fn test_edit_script_consumes_both() {
        let a = vec![1, 2, 3, 4, 5, 6];
        let b = vec![0, 2, 3, 7, 6, 8];
        let script = shortest_edit_script(&a, &b);

        let source: Genome = script
            .iter()
            .filter_map(|e| match e {
                Edit::Delete(g) | Edit::Common(g) => Some(*g),
                Edit::Insert(_) => None,
            })
            .collect();
        let target: Genome = script
            .iter()
            .filter_map(|e| match e {
                Edit::Insert(g) | Edit::Common(g) => Some(*g),
                Edit::Delete(_) => None,
            })
            .collect();

        assert_eq!(source, a);
        assert_eq!(target, b);
        let commons = script
            .iter()
            .filter(|e| matches!(e, Edit::Common(_)))
            .count();
        assert_eq!(commons, lcs_len(&a, &b));
    }

    #[test]
    fn test_identical_genomes_have_no_diffs() {
        assert!(generate_diffs(&[4, 5, 6], &[4, 5, 6]).is_empty());
        assert!(generate_diffs(&[], &[]).is_empty());
    }

    #[test]
    fn test_insertion_and_deletion_segments() {
        let diffs = generate_diffs(&[1, 2, 3], &[1, 3, 4]);
        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs[0].position, 1);
        assert_eq!(diffs[0].remove_count, 1);
        assert!(diffs[0].added_genes.is_empty());
        assert_eq!(diffs[1].position, 3);
        assert_eq!(diffs[1].remove_count, 0);
        assert_eq!(diffs[1].added_genes, vec![4]);
    }

    #[test]
    fn test_full_patch_reproduces_target() {
        let cases: [(&[Gene], &[Gene]); 6] = [
            (&[1, 2, 3], &[1, 9, 3]),
            (&[], &[1, 2, 3]),
            (&[1, 2, 3], &[]),
            (&[1, 2, 3, 4, 5], &[5, 4, 3, 2, 1]),
            (&[0, 0, 1, 1], &[1, 0, 1, 0, 0]),
            (&[3, 1, 4, 1, 5, 9, 2, 6], &[2, 7, 1, 8, 2, 8]),
        ];

        for (a, b) in cases {
            assert_eq!(patch(a, &generate_diffs(a, b)), b, "{a:?} -> {b:?}");
        }
    }

    #[test]
    fn test_partial_patch_length() {
        let a = vec![1, 2, 3, 4, 5, 6];
        let b = vec![0, 2, 3, 7, 7, 6, 8];
        let diffs = generate_diffs(&a, &b);
        assert!(diffs.len() >= 2);

        // Apply every other segment, back to front.
        let subset: Vec<&GenomeDiff> = diffs.iter().step_by(2).rev().collect();
        let mut mapped = MappedGenome::new(&a);
        for diff in &subset {
            mapped.apply(diff).unwrap();
        }

        let expected = a.len() as isize + subset.iter().map(|d| d.length_delta()).sum::<isize>();
        assert_eq!(mapped.assemble().len() as isize, expected);
        assert_eq!(mapped.len() as isize, expected);
    }

    #[test]
    fn test_empty_mapping() {
        let mapped = MappedGenome::new(&[]);
        assert!(mapped.is_empty());
        assert_eq!(mapped.source_len(), 0);
        assert!(mapped.assemble().is_empty());
    }

    #[test]
    fn test_reapply_is_rejected() {
        let diff = GenomeDiff {
            position: 1,
            remove_count: 1,
            added_genes: vec![9],
        };
        let mut mapped = MappedGenome::new(&[1, 2, 3]);
        mapped.apply(&diff).unwrap();

        assert_eq!(
            mapped.apply(&diff),
            Err(DiffError::AlreadyApplied { position: 1 })
        );
        assert_eq!(mapped.assemble(), vec![1, 9, 3]);
    }

    #[test]
    fn test_overlapping_segment_is_rejected() {
        let mut mapped = MappedGenome::new(&[1, 2, 3]);
        mapped
            .apply(&GenomeDiff {
                position: 0,
                remove_count: 2,
                added_genes: vec![],
            })
            .unwrap();

        let result = mapped.apply(&GenomeDiff {
            position: 1,
            remove_count: 1,
            added_genes: vec![5],
        });
        assert_eq!(result, Err(DiffError::DrainedSlot { position: 1 }));
        assert_eq!(mapped.assemble(), vec![3]);
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut mapped = MappedGenome::new(&[1, 2]);
        let result = mapped.apply(&GenomeDiff {
            position: 1,
            remove_count: 2,
            added_genes: vec![],
        });
        assert_eq!(
            result,
            Err(DiffError::OutOfRange {
                position: 1,
                remove_count: 2,
                len: 2
            })
        );

        // Appending at the end is in range.
        mapped
            .apply(&GenomeDiff {
                position: 2,
                remove_count: 0,
                added_genes: vec![7, 8],
            })
            .unwrap();
        assert_eq!(mapped.assemble(), vec![1, 2, 7, 8]);
    }
}
