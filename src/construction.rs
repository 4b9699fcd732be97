//! NEH constructive heuristic.
//!
//! Jobs are taken in order of decreasing total processing time. Each job is
//! appended to the partial sequence and then shifted to the position with
//! the best objective, using the shift delta evaluator on the growing
//! partial sequence.
//!
//! # Reference
//! Nawaz, Enscore & Ham (1983), "A heuristic algorithm for the m-machine,
//! n-job flow-shop sequencing problem", Omega 11(1)

use crate::evaluation::FlowShopEval;
use crate::models::{InstanceData, ObjectiveValue, Permutation};
use crate::neighborhood::Move;

/// Which of several equally good insertion positions wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreaking {
    /// Earliest position.
    #[default]
    First,
    /// Latest position.
    Last,
}

/// NEH constructor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Neh {
    tie_breaking: TieBreaking,
}

impl Neh {
    /// Creates a constructor with first-best tie-breaking.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tie-breaking rule.
    pub fn with_tie_breaking(mut self, tie_breaking: TieBreaking) -> Self {
        self.tie_breaking = tie_breaking;
        self
    }

    /// Jobs by decreasing total processing time, ties by index.
    pub fn initial_order(data: &InstanceData) -> Vec<usize> {
        let mut order: Vec<usize> = (0..data.no_jobs()).collect();
        order.sort_by(|&a, &b| data.job_total(b).cmp(&data.job_total(a)));
        order
    }

    /// Builds a complete permutation with a valid fitness.
    pub fn construct<E: FlowShopEval>(&self, data: &InstanceData, eval: &mut E) -> Permutation {
        let mut perm = Permutation::with_capacity(data.no_jobs());
        for job in Self::initial_order(data) {
            self.insert_job(&mut perm, job, eval);
        }
        log::debug!(
            "NEH ({:?}): {} jobs, objective {:?}",
            self.tie_breaking,
            perm.len(),
            perm.fitness()
        );
        perm
    }

    /// Appends `job` and moves it to its best position in `perm`.
    ///
    /// Returns the objective of the extended sequence, which is also stored
    /// as its fitness.
    pub fn insert_job<E: FlowShopEval>(
        &self,
        perm: &mut Permutation,
        job: usize,
        eval: &mut E,
    ) -> ObjectiveValue {
        perm.push(job);
        if perm.len() == 1 {
            return eval.compile(perm);
        }

        let last = perm.len() - 1;
        let mut best = Move::new(last, 0);
        let mut best_value = eval.evaluate_move(perm, best);
        for position in 1..perm.len() {
            let mv = Move::new(last, position);
            let value = eval.evaluate_move(perm, mv);
            let better = match self.tie_breaking {
                TieBreaking::First => value < best_value,
                TieBreaking::Last => value <= best_value,
            };
            if better {
                best = mv;
                best_value = value;
            }
        }

        best.apply(perm);
        perm.set_fitness(best_value);
        best_value
    }
}
