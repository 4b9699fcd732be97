//! Delta evaluation for the no-idle flow shop.
//!
//! For every adjacent machine pair `(k, k+1)` a sub-sequence `X` has a
//! forward gap `F_X(k)` (end on `k+1` minus end on `k`) and a backward gap
//! `E_X(k)` (start on `k+1` minus start on `k`). Concatenation composes as
//!
//! ```text
//! F_{AB}(k) = max(F_A(k) − E_B(k), 0) + F_B(k)
//! ```
//!
//! and the makespan of a sequence `S` is `Σ_k F_S(k) + Σ_{j∈S} p(j, 0)`.
//! With the source job removed, the partial sequence `P` gets prefix forward
//! gaps `F`, suffix backward gaps `E` and suffix forward gaps `Ff`. Inserting
//! the job at `h` is then two compositions per machine pair: prefix with the
//! job, and the result with the suffix starting at `P[h]`. Each destination
//! costs `O(M)` once the tables for its source exist.
//!
//! Flowtime follows from the makespan: on a no-idle last machine
//! `C(π_i) = C_max − Σ_{l>i} p(π_l, M-1)`.
//!
//! # Reference
//! Pan & Wang (2008), "A novel differential evolution algorithm for no-idle
//! permutation flow-shop scheduling problems"

use std::sync::Arc;

use crate::models::{InstanceData, Objective, ObjectiveValue};

use super::{common_prefix, remove_into, Move};

#[derive(Debug, Clone)]
struct SourceTables {
    snapshot: Vec<usize>,
    partial: Vec<usize>,
    /// `forward[i * K + k]`: forward gap of `P[..=i]`.
    forward: Vec<i64>,
    /// `backward[i * K + k]`: backward gap of `P[i..]`.
    backward: Vec<i64>,
    /// `suffix_forward[i * K + k]`: forward gap of `P[i..]`.
    suffix_forward: Vec<i64>,
    /// `Σ p(j, 0)` over every job of the snapshot, source included.
    head: i64,
    #[cfg(test)]
    rebuilds: usize,
}

impl SourceTables {
    fn new(no_jobs: usize, pairs: usize) -> Self {
        let size = no_jobs * pairs;
        Self {
            snapshot: Vec::with_capacity(no_jobs),
            partial: Vec::with_capacity(no_jobs),
            forward: vec![0; size],
            backward: vec![0; size],
            suffix_forward: vec![0; size],
            head: 0,
            #[cfg(test)]
            rebuilds: 0,
        }
    }
}

/// Incremental shift evaluator for the no-idle flow shop.
#[derive(Debug, Clone)]
pub struct NoIdleNeighborEvaluator {
    data: Arc<InstanceData>,
    objective: Objective,
    caches: Vec<SourceTables>,
    scratch_partial: Vec<usize>,
}

impl NoIdleNeighborEvaluator {
    /// Creates an evaluator with one table set per source position.
    pub fn new(data: Arc<InstanceData>, objective: Objective) -> Self {
        let n = data.no_jobs();
        let pairs = data.no_machines() - 1;
        Self {
            caches: (0..n).map(|_| SourceTables::new(n, pairs)).collect(),
            scratch_partial: Vec::with_capacity(n),
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
        let tables = &mut self.caches[mv.first];
        if tables.snapshot != seq {
            log::trace!("no-idle delta: rebuilding tables for source {}", mv.first);
            #[cfg(test)]
            {
                tables.rebuilds += 1;
            }
            rebuild(&self.data, tables, &mut self.scratch_partial, seq, mv.first);
        }

        let cmax = inserted_makespan(&self.data, tables, seq[mv.first], mv.second);
        match self.objective {
            Objective::Makespan => cmax,
            Objective::Flowtime => {
                let last = self.data.no_machines() - 1;
                let n = seq.len() as i64;
                let weighted: i64 = (1..seq.len())
                    .map(|pos| pos as i64 * self.data.pt(seq[mv.source_index(pos)], last))
                    .sum();
                n * cmax - weighted
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
    tables: &mut SourceTables,
    scratch: &mut Vec<usize>,
    seq: &[usize],
    source: usize,
) {
    let pairs = data.no_machines() - 1;

    remove_into(seq, source, scratch);
    let valid_rows = common_prefix(&tables.partial, scratch);
    std::mem::swap(&mut tables.partial, scratch);
    tables.snapshot.clear();
    tables.snapshot.extend_from_slice(seq);
    tables.head = seq.iter().map(|&j| data.pt(j, 0)).sum();

    let partial = &tables.partial;
    let len = partial.len();
    if len == 0 || pairs == 0 {
        return;
    }

    let f = &mut tables.forward;
    for i in valid_rows..len {
        let p = partial[i];
        for k in 0..pairs {
            f[i * pairs + k] = if i == 0 {
                data.pt(p, k + 1)
            } else {
                (f[(i - 1) * pairs + k] - data.pt(p, k)).max(0) + data.pt(p, k + 1)
            };
        }
    }

    let e = &mut tables.backward;
    let ff = &mut tables.suffix_forward;
    let tail = partial[len - 1];
    for k in 0..pairs {
        e[(len - 1) * pairs + k] = data.pt(tail, k);
        ff[(len - 1) * pairs + k] = data.pt(tail, k + 1);
    }
    for i in (0..len - 1).rev() {
        let p = partial[i];
        for k in 0..pairs {
            let e_next = e[(i + 1) * pairs + k];
            e[i * pairs + k] = (e_next - data.pt(p, k + 1)).max(0) + data.pt(p, k);
            ff[i * pairs + k] =
                (data.pt(p, k + 1) - e_next).max(0) + ff[(i + 1) * pairs + k];
        }
    }
}

/// Makespan of the partial sequence with `job` inserted at position `h`.
fn inserted_makespan(data: &InstanceData, tables: &SourceTables, job: usize, h: usize) -> i64 {
    let pairs = data.no_machines() - 1;
    let len = tables.partial.len();
    let mut gaps = 0;
    for k in 0..pairs {
        let with_job = if h == 0 {
            data.pt(job, k + 1)
        } else {
            (tables.forward[(h - 1) * pairs + k] - data.pt(job, k)).max(0) + data.pt(job, k + 1)
        };
        gaps += if h == len {
            with_job
        } else {
            let idx = h * pairs + k;
            (with_job - tables.backward[idx]).max(0) + tables.suffix_forward[idx]
        };
    }
    gaps + tables.head
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
            InstanceData::from_job_rows(&[
                vec![3, 3, 2],
                vec![4, 1, 3],
                vec![2, 3, 3],
                vec![2, 2, 3],
            ])
            .unwrap(),
        )
    }

    fn check_all_moves(data: &Arc<InstanceData>, objective: Objective, seq: &[usize]) {
        let mut eval = NoIdleNeighborEvaluator::new(data.clone(), objective);
        for mv in ShiftNeighborhood::by_source(seq.len()) {
            let expected = brute_force(Variant::NoIdle, data, objective, seq, mv);
            assert_eq!(eval.evaluate(seq, mv), expected, "{mv:?} on {seq:?}");
        }
    }

    #[test]
    fn test_example_moves() {
        let mut eval = NoIdleNeighborEvaluator::new(example(), Objective::Makespan);
        let seq = [0, 1, 2, 3];
        assert_eq!(eval.evaluate(&seq, Move::new(0, 1)), 19);
        assert_eq!(eval.evaluate(&seq, Move::new(0, 2)), 17);
        assert_eq!(eval.evaluate(&seq, Move::new(0, 3)), 17);
    }

    #[test]
    fn test_example_all_moves() {
        for objective in [Objective::Makespan, Objective::Flowtime] {
            check_all_moves(&example(), objective, &[0, 1, 2, 3]);
            check_all_moves(&example(), objective, &[3, 1, 0, 2]);
        }
    }

    #[test]
    fn test_random_instances() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let n = rng.random_range(4..=12);
            let m = rng.random_range(1..=8);
            let data = Arc::new(InstanceData::random(n, m, 99, &mut rng));
            let perm = Permutation::random(n, &mut rng);
            for objective in [Objective::Makespan, Objective::Flowtime] {
                check_all_moves(&data, objective, perm.jobs());
            }
        }
    }

    #[test]
    fn test_partial_sequences_grow_and_shrink() {
        let mut rng = SmallRng::seed_from_u64(42);
        let data = Arc::new(InstanceData::random(8, 5, 40, &mut rng));
        let perm = Permutation::random(8, &mut rng);
        let mut eval = NoIdleNeighborEvaluator::new(data.clone(), Objective::Makespan);
        // One evaluator across lengths: a shorter sequence with a shared
        // prefix must not be mistaken for the cached one.
        for len in (2..=8).chain((2..8).rev()) {
            let seq = &perm.jobs()[..len];
            for mv in ShiftNeighborhood::by_source(len) {
                let expected = brute_force(Variant::NoIdle, &data, Objective::Makespan, seq, mv);
                assert_eq!(eval.evaluate(seq, mv), expected, "len {len} {mv:?}");
            }
        }
    }

    #[test]
    fn test_append_at_end_of_partial() {
        let data = example();
        let mut eval = NoIdleNeighborEvaluator::new(data.clone(), Objective::Makespan);
        let seq = [2, 0, 3];
        let mv = Move::new(0, 2);
        let expected = brute_force(Variant::NoIdle, &data, Objective::Makespan, &seq, mv);
        assert_eq!(eval.evaluate(&seq, mv), expected);
    }

    #[test]
    fn test_tables_built_once_per_source() {
        let mut rng = SmallRng::seed_from_u64(42);
        let data = Arc::new(InstanceData::random(8, 4, 30, &mut rng));
        for objective in [Objective::Makespan, Objective::Flowtime] {
            let mut eval = NoIdleNeighborEvaluator::new(data.clone(), objective);
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
                let expected = brute_force(Variant::NoIdle, &data, objective, &seq, mv);
                assert_eq!(eval.evaluate(&seq, mv), expected);
            }
            assert_eq!(eval.rebuilds(2), 2);
        }
    }
}
