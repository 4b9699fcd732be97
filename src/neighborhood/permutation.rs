//! Delta evaluation for the permutation flow shop.
//!
//! Removing the job at source `t` leaves a partial sequence `P` of length
//! `L`. Three `(L + 2) × (M + 2)` tables over `P` answer every insertion of
//! the removed job back into `P`:
//!
//! ```text
//! E[i][j] = max(E[i][j-1], E[i-1][j]) + p(P[i-1], j-1)     head, rows 1..=L
//! Q[i][j] = max(Q[i][j+1], Q[i+1][j]) + p(P[i-1], j-1)     tail, rows L..=1
//! F[i][j] = max(F[i][j-1], E[i-1][j]) + p(job,    j-1)     insertion before P[i-1]
//! ```
//!
//! with zero borders. Inserting at position `h` gives
//! `C_max = max_j (F[h+1][j] + Q[h+1][j])`, so all `L + 1` destinations of a
//! source cost `O(L · M)` together. Total flowtime reuses the head prefix up
//! to `h` and sweeps only the jobs after the insertion point.
//!
//! # Reference
//! Taillard (1990), "Some efficient heuristic methods for the flow shop
//! sequencing problem", EJOR 47(1)

use std::sync::Arc;

use crate::models::{InstanceData, Objective, ObjectiveValue};

use super::{common_prefix, remove_into, Move};

/// Tables for one source position.
#[derive(Debug, Clone)]
struct SourceTables {
    /// Sequence the tables were built for; empty until first use.
    snapshot: Vec<usize>,
    /// `snapshot` without the source job.
    partial: Vec<usize>,
    head: Vec<i64>,
    tail: Vec<i64>,
    insertion: Vec<i64>,
    /// Makespan per insertion point `0..=L`.
    makespans: Vec<i64>,
    /// `Σ_{i ≤ h} E[i][M]` per insertion point `0..=L`.
    head_flow: Vec<i64>,
    #[cfg(test)]
    rebuilds: usize,
}

impl SourceTables {
    fn new(no_jobs: usize, no_machines: usize) -> Self {
        let size = (no_jobs + 1) * (no_machines + 2);
        Self {
            snapshot: Vec::with_capacity(no_jobs),
            partial: Vec::with_capacity(no_jobs),
            head: vec![0; size],
            tail: vec![0; size],
            insertion: vec![0; size],
            makespans: Vec::with_capacity(no_jobs),
            head_flow: Vec::with_capacity(no_jobs),
            #[cfg(test)]
            rebuilds: 0,
        }
    }
}

/// Incremental shift evaluator for the permutation flow shop.
#[derive(Debug, Clone)]
pub struct PermutationNeighborEvaluator {
    data: Arc<InstanceData>,
    objective: Objective,
    caches: Vec<SourceTables>,
    scratch_partial: Vec<usize>,
    row: Vec<i64>,
    next_row: Vec<i64>,
}

impl PermutationNeighborEvaluator {
    /// Creates an evaluator with one table set per source position.
    pub fn new(data: Arc<InstanceData>, objective: Objective) -> Self {
        let n = data.no_jobs();
        let m = data.no_machines();
        Self {
            caches: (0..n).map(|_| SourceTables::new(n, m)).collect(),
            scratch_partial: Vec::with_capacity(n),
            row: vec![0; m + 2],
            next_row: vec![0; m + 2],
            objective,
            data,
        }
    }

    /// Objective of `seq` after moving the job at `mv.first` to `mv.second`.
    ///
    /// # Panics
    /// Panics if a move position is outside `seq`.
    pub fn evaluate(&mut self, seq: &[usize], mv: Move) -> ObjectiveValue {
        assert!(
            mv.first < seq.len() && mv.second < seq.len(),
            "move {mv:?} outside sequence of length {}",
            seq.len()
        );
        let width = self.data.no_machines() + 2;
        let tables = &mut self.caches[mv.first];
        if tables.snapshot != seq {
            log::trace!("permutation delta: rebuilding tables for source {}", mv.first);
            #[cfg(test)]
            {
                tables.rebuilds += 1;
            }
            rebuild(
                &self.data,
                self.objective,
                tables,
                &mut self.scratch_partial,
                seq,
                mv.first,
            );
        }

        let h = mv.second;
        match self.objective {
            Objective::Makespan => tables.makespans[h],
            Objective::Flowtime => {
                let data = &*self.data;
                let m = data.no_machines();
                let ins = (h + 1) * width;
                let mut total = tables.head_flow[h] + tables.insertion[ins + m];

                let (row, next) = (&mut self.row, &mut self.next_row);
                row.copy_from_slice(&tables.insertion[ins..ins + width]);
                for &job in &tables.partial[h..] {
                    next[0] = 0;
                    for j in 1..=m {
                        next[j] = next[j - 1].max(row[j]) + data.pt(job, j - 1);
                    }
                    total += next[m];
                    std::mem::swap(row, next);
                }
                total
            }
        }
    }
    #[cfg(test)]
    fn rebuilds(&self, source: usize) -> usize {
        self.caches[source].rebuilds
    }
}

fn rebuild(
    data: &InstanceData,
    objective: Objective,
    tables: &mut SourceTables,
    scratch: &mut Vec<usize>,
    seq: &[usize],
    source: usize,
) {
    let m = data.no_machines();
    let width = m + 2;
    let job = seq[source];

    remove_into(seq, source, scratch);
    let valid_rows = common_prefix(&tables.partial, scratch);
    std::mem::swap(&mut tables.partial, scratch);
    tables.snapshot.clear();
    tables.snapshot.extend_from_slice(seq);

    let partial = &tables.partial;
    let len = partial.len();

    // Head: rows 0..=valid_rows depend only on the unchanged prefix.
    let e = &mut tables.head;
    for i in (valid_rows + 1)..=len {
        let p = partial[i - 1];
        for j in 1..=m {
            e[i * width + j] =
                e[i * width + j - 1].max(e[(i - 1) * width + j]) + data.pt(p, j - 1);
        }
    }

    // Insertion rows 1..=L+1.
    let f = &mut tables.insertion;
    for i in 1..=len + 1 {
        for j in 1..=m {
            f[i * width + j] =
                f[i * width + j - 1].max(e[(i - 1) * width + j]) + data.pt(job, j - 1);
        }
    }

    match objective {
        Objective::Makespan => {
            let q = &mut tables.tail;
            q[(len + 1) * width..(len + 2) * width].fill(0);
            for i in (1..=len).rev() {
                let p = partial[i - 1];
                for j in (1..=m).rev() {
                    q[i * width + j] =
                        q[i * width + j + 1].max(q[(i + 1) * width + j]) + data.pt(p, j - 1);
                }
            }
            tables.makespans.clear();
            tables.makespans.extend((1..=len + 1).map(|i| {
                (1..=m)
                    .map(|j| f[i * width + j] + q[i * width + j])
                    .max()
                    .unwrap_or(0)
            }));
        }
        Objective::Flowtime => {
            tables.head_flow.clear();
            let mut acc = 0;
            tables.head_flow.push(acc);
            for i in 1..=len {
                acc += e[i * width + m];
                tables.head_flow.push(acc);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand::rngs::SmallRng;

    use crate::models::{Permutation, Variant};
    use crate::neighborhood::testing::brute_force;
    use crate::neighborhood::ShiftNeighborhood;

    fn example() -> Arc<InstanceData> {
        Arc::new(
            InstanceData::from_machine_rows(&[
                vec![19, 44, 85, 59, 87, 51],
                vec![46, 63, 56, 68, 66, 4],
                vec![65, 12, 98, 25, 53, 63],
            ])
            .unwrap(),
        )
    }

    fn check_all_moves(data: &Arc<InstanceData>, objective: Objective, seq: &[usize]) {
        let mut eval = PermutationNeighborEvaluator::new(data.clone(), objective);
        for mv in ShiftNeighborhood::by_source(seq.len()) {
            let expected = brute_force(Variant::Permutation, data, objective, seq, mv);
            assert_eq!(eval.evaluate(seq, mv), expected, "{mv:?} on {seq:?}");
        }
    }

    #[test]
    fn test_example_move() {
        let data = example();
        let seq = [0, 1, 2, 3, 4, 5];
        let mut eval = PermutationNeighborEvaluator::new(data.clone(), Objective::Makespan);
        let mv = Move::new(0, 3);
        assert_eq!(
            eval.evaluate(&seq, mv),
            brute_force(Variant::Permutation, &data, Objective::Makespan, &seq, mv)
        );
    }

    #[test]
    fn test_all_moves_both_objectives() {
        let data = example();
        for objective in [Objective::Makespan, Objective::Flowtime] {
            check_all_moves(&data, objective, &[0, 1, 2, 3, 4, 5]);
            check_all_moves(&data, objective, &[5, 3, 1, 0, 2, 4]);
        }
    }

    #[test]
    fn test_random_instances() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let n = rng.random_range(4..=12);
            let m = rng.random_range(3..=8);
            let data = Arc::new(InstanceData::random(n, m, 99, &mut rng));
            let perm = Permutation::random(n, &mut rng);
            for objective in [Objective::Makespan, Objective::Flowtime] {
                check_all_moves(&data, objective, perm.jobs());
            }
        }
    }

    #[test]
    fn test_tables_follow_sequence_changes() {
        let mut rng = SmallRng::seed_from_u64(42);
        let data = Arc::new(InstanceData::random(10, 5, 50, &mut rng));
        for objective in [Objective::Makespan, Objective::Flowtime] {
            let mut eval = PermutationNeighborEvaluator::new(data.clone(), objective);
            let mut seq: Vec<usize> = (0..10).collect();
            for _ in 0..40 {
                let mv = Move::new(rng.random_range(0..10), rng.random_range(0..10));
                if mv.is_noop() {
                    continue;
                }
                let expected = brute_force(Variant::Permutation, &data, objective, &seq, mv);
                assert_eq!(eval.evaluate(&seq, mv), expected);
                mv.apply_slice(&mut seq);
            }
        }
    }

    #[test]
    fn test_partial_sequences() {
        let mut rng = SmallRng::seed_from_u64(42);
        let data = Arc::new(InstanceData::random(9, 4, 30, &mut rng));
        let perm = Permutation::random(9, &mut rng);
        for len in 2..=9 {
            for objective in [Objective::Makespan, Objective::Flowtime] {
                check_all_moves(&data, objective, &perm.jobs()[..len]);
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_move_panics() {
        let mut eval = PermutationNeighborEvaluator::new(example(), Objective::Makespan);
        eval.evaluate(&[0, 1, 2], Move::new(0, 3));
    }

    #[test]
    fn test_tables_built_once_per_source() {
        let mut rng = SmallRng::seed_from_u64(42);
        let data = Arc::new(InstanceData::random(8, 4, 30, &mut rng));
        for objective in [Objective::Makespan, Objective::Flowtime] {
            let mut eval = PermutationNeighborEvaluator::new(data.clone(), objective);
            let mut seq: Vec<usize> = (0..8).collect();
            for second in 0..8 {
                eval.evaluate(&seq, Move::new(2, second));
            }
            assert_eq!(eval.rebuilds(2), 1);

            // Other sources keep their own tables.
            for second in 0..8 {
                eval.evaluate(&seq, Move::new(5, second));
            }
            assert_eq!(eval.rebuilds(5), 1);
            eval.evaluate(&seq, Move::new(2, 0));
            assert_eq!(eval.rebuilds(2), 1);

            Move::new(6, 1).apply_slice(&mut seq);
            for second in 0..8 {
                let mv = Move::new(2, second);
                let expected = brute_force(Variant::Permutation, &data, objective, &seq, mv);
                assert_eq!(eval.evaluate(&seq, mv), expected);
            }
            assert_eq!(eval.rebuilds(2), 2);
        }
    }
}
