//! Delta evaluation for the no-wait flow shop.
//!
//! The no-wait makespan is `Σ d(π_{i-1}, π_i) + T(π_last)`, a sum over
//! adjacent pairs. A shift breaks at most three adjacencies and creates at
//! most three, so the new makespan follows from the current one in `O(1)`:
//! first remove the job (bridging its neighbours), then insert it at the
//! destination (splitting the pair it lands between). When the last
//! position changes hands the trailing `T` term is swapped too.
//!
//! Total flowtime has no such closed form; it is recomputed by walking the
//! moved order through the delay matrix in `O(n)` without materialising it.
//!
//! # Reference
//! Framinan & Nagano (2008), "Evaluating the performance for makespan
//! minimisation in no-wait flowshop sequencing"

use std::sync::Arc;

use crate::models::{InstanceData, Objective, ObjectiveValue};
use crate::scheduler::DelayMatrix;

use super::Move;

/// Incremental shift evaluator for the no-wait flow shop.
#[derive(Debug, Clone)]
pub struct NoWaitNeighborEvaluator {
    data: Arc<InstanceData>,
    delays: Arc<DelayMatrix>,
    objective: Objective,
}

impl NoWaitNeighborEvaluator {
    /// Creates an evaluator sharing a delay matrix.
    pub fn new(data: Arc<InstanceData>, delays: Arc<DelayMatrix>, objective: Objective) -> Self {
        Self {
            data,
            delays,
            objective,
        }
    }

    /// Objective of `seq` after moving the job at `mv.first` to `mv.second`.
    ///
    /// `current` is the objective value of `seq`; for makespan it seeds the
    /// constant-time update, otherwise it is recomputed.
    ///
    /// # Panics
    /// Panics if a move position is outside `seq`.
    pub fn evaluate(
        &self,
        seq: &[usize],
        mv: Move,
        current: Option<ObjectiveValue>,
    ) -> ObjectiveValue {
        assert!(
            mv.first < seq.len() && mv.second < seq.len(),
            "move {mv:?} outside sequence of length {}",
            seq.len()
        );
        match self.objective {
            Objective::Makespan => {
                let cmax = current.unwrap_or_else(|| self.makespan(seq));
                if mv.is_noop() {
                    cmax
                } else {
                    self.shifted_makespan(seq, mv, cmax)
                }
            }
            Objective::Flowtime => self.shifted_flowtime(seq, mv),
        }
    }

    /// Makespan of `seq` in `O(n)`.
    pub fn makespan(&self, seq: &[usize]) -> ObjectiveValue {
        let Some(&last) = seq.last() else {
            return 0;
        };
        let bridges: i64 = seq
            .windows(2)
            .map(|w| self.delays.delay(w[0], w[1]))
            .sum();
        bridges + self.data.job_total(last)
    }

    /// Makespan of `seq` with position `j` removed, given the makespan of `seq`.
    fn removed_makespan(&self, seq: &[usize], j: usize, cmax: i64) -> i64 {
        let d = |a: usize, b: usize| self.delays.delay(seq[a], seq[b]);
        let last = seq.len() - 1;
        if j == 0 {
            cmax - d(0, 1)
        } else if j == last {
            cmax - d(j - 1, j) - self.data.job_total(seq[j]) + self.data.job_total(seq[j - 1])
        } else {
            cmax - d(j - 1, j) - d(j, j + 1) + d(j - 1, j + 1)
        }
    }

    fn shifted_makespan(&self, seq: &[usize], mv: Move, cmax: i64) -> i64 {
        let (j, k) = (mv.first, mv.second);
        let job = seq[j];
        let last = seq.len() - 1;
        // Position `i` of the sequence without `job`.
        let rest = |i: usize| if i < j { seq[i] } else { seq[i + 1] };
        let d = |a: usize, b: usize| self.delays.delay(a, b);

        let partial = self.removed_makespan(seq, j, cmax);
        if k == 0 {
            return partial + d(job, rest(0));
        }
        let pred = rest(k - 1);
        if k == last {
            partial + d(pred, job) - self.data.job_total(pred) + self.data.job_total(job)
        } else {
            let succ = rest(k);
            partial + d(pred, job) + d(job, succ) - d(pred, succ)
        }
    }

    fn shifted_flowtime(&self, seq: &[usize], mv: Move) -> i64 {
        let mut total = 0;
        let mut start = 0;
        let mut prev: Option<usize> = None;
        for pos in 0..seq.len() {
            let job = seq[mv.source_index(pos)];
            if let Some(p) = prev {
                start += self.delays.delay(p, job);
            }
            total += start + self.data.job_total(job);
            prev = Some(job);
        }
        total
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
                vec![20, 25, 25, 10, 17],
                vec![30, 20, 25, 25, 28],
            ])
            .unwrap(),
        )
    }

    fn evaluator(data: &Arc<InstanceData>, objective: Objective) -> NoWaitNeighborEvaluator {
        NoWaitNeighborEvaluator::new(data.clone(), Arc::new(DelayMatrix::new(data)), objective)
    }

    #[test]
    fn test_example_moves() {
        let data = example();
        let eval = evaluator(&data, Objective::Makespan);
        let seq = [0, 1, 2, 3, 4];
        let cmax = eval.makespan(&seq);
        assert_eq!(eval.evaluate(&seq, Move::new(2, 0), Some(cmax)), 153);
        assert_eq!(eval.evaluate(&seq, Move::new(2, 4), Some(cmax)), 148);
        assert_eq!(eval.evaluate(&seq, Move::new(2, 1), Some(cmax)), 148);
    }

    #[test]
    fn test_without_known_makespan() {
        let data = example();
        let eval = evaluator(&data, Objective::Makespan);
        let seq = [0, 1, 2, 3, 4];
        assert_eq!(eval.evaluate(&seq, Move::new(2, 0), None), 153);
        assert_eq!(eval.evaluate(&seq, Move::new(3, 3), None), eval.makespan(&seq));
    }

    #[test]
    fn test_all_moves_match_brute_force() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..30 {
            let n = rng.random_range(4..=15);
            let m = rng.random_range(3..=8);
            let data = Arc::new(InstanceData::random(n, m, 99, &mut rng));
            let perm = Permutation::random(n, &mut rng);
            for objective in [Objective::Makespan, Objective::Flowtime] {
                let eval = evaluator(&data, objective);
                let current = match objective {
                    Objective::Makespan => Some(eval.makespan(perm.jobs())),
                    Objective::Flowtime => None,
                };
                for mv in ShiftNeighborhood::new(n) {
                    let expected = brute_force(Variant::NoWait, &data, objective, perm.jobs(), mv);
                    assert_eq!(eval.evaluate(perm.jobs(), mv, current), expected, "{mv:?}");
                }
            }
        }
    }

    #[test]
    fn test_partial_sequence() {
        let data = example();
        let eval = evaluator(&data, Objective::Makespan);
        let seq = [4, 1, 3];
        for mv in ShiftNeighborhood::new(3) {
            let expected = brute_force(Variant::NoWait, &data, Objective::Makespan, &seq, mv);
            assert_eq!(eval.evaluate(&seq, mv, None), expected);
        }
    }

    #[test]
    fn test_empty_makespan() {
        let eval = evaluator(&example(), Objective::Makespan);
        assert_eq!(eval.makespan(&[]), 0);
    }
}
