//! Shift neighborhood and incremental (delta) evaluation.
//!
//! Local search explores the `(n - 1)²` sequences reachable from the
//! current one by relocating a single job. Re-simulating each of them costs
//! `O(n · M)`; the evaluators in this module answer "what would the objective
//! be after this move" from tables built once per source position and reused
//! for every destination of that source.
//!
//! # Evaluators
//!
//! | Variant | Evaluator | Per-source tables | Per-move cost (makespan) |
//! |---------|-----------|-------------------|---------------|
//! | Permutation | [`PermutationNeighborEvaluator`] | head `E`, tail `Q`, insertion `F` | `O(1)` |
//! | No-wait | [`NoWaitNeighborEvaluator`] | none (delay matrix) | `O(1)` |
//! | No-idle | [`NoIdleNeighborEvaluator`] | forward `F`, backward `E`, suffix `Ff` | `O(M)` |
//!
//! Tables are keyed by the full sequence they were built for; a call with a
//! different sequence rebuilds them. Evaluate moves grouped by source
//! ([`ShiftNeighborhood::by_source`]) to get the amortised cost.
//!
//! # References
//!
//! - Taillard (1990), "Some efficient heuristic methods for the flow shop
//!   sequencing problem"
//! - Li, Wang & Wu (2009), "Composite heuristic algorithm for the
//!   permutation flowshop scheduling problem with total flowtime"

mod no_idle;
mod no_wait;
mod permutation;
mod shift;

use std::sync::Arc;

pub use no_idle::NoIdleNeighborEvaluator;
pub use no_wait::NoWaitNeighborEvaluator;
pub use permutation::PermutationNeighborEvaluator;
pub use shift::{keys_from, keys_to, neighborhood_size, Move, ShiftNeighborhood};

use crate::models::{InstanceData, Objective, ObjectiveValue, Variant};
use crate::scheduler::DelayMatrix;

/// Delta evaluator for one scheduling variant.
#[derive(Debug, Clone)]
pub enum NeighborEvaluator {
    /// Classic permutation flow shop.
    Permutation(PermutationNeighborEvaluator),
    /// No-wait flow shop.
    NoWait(NoWaitNeighborEvaluator),
    /// No-idle flow shop.
    NoIdle(NoIdleNeighborEvaluator),
}

impl NeighborEvaluator {
    /// Creates the evaluator for `variant`.
    ///
    /// `delays` is reused for the no-wait variant when given; otherwise a
    /// delay matrix is tabulated on demand.
    pub fn new(
        variant: Variant,
        data: Arc<InstanceData>,
        objective: Objective,
        delays: Option<Arc<DelayMatrix>>,
    ) -> Self {
        match variant {
            Variant::Permutation => {
                Self::Permutation(PermutationNeighborEvaluator::new(data, objective))
            }
            Variant::NoWait => {
                let delays = delays.unwrap_or_else(|| Arc::new(DelayMatrix::new(&data)));
                Self::NoWait(NoWaitNeighborEvaluator::new(data, delays, objective))
            }
            Variant::NoIdle => Self::NoIdle(NoIdleNeighborEvaluator::new(data, objective)),
        }
    }

    /// The variant this evaluator implements.
    pub fn variant(&self) -> Variant {
        match self {
            Self::Permutation(_) => Variant::Permutation,
            Self::NoWait(_) => Variant::NoWait,
            Self::NoIdle(_) => Variant::NoIdle,
        }
    }

    /// Objective value of `seq` after applying `mv`.
    ///
    /// `current` is the known objective value of `seq` itself, if any; the
    /// no-wait evaluator derives makespan deltas from it.
    ///
    /// # Panics
    /// Panics if a move position is outside `seq`.
    pub fn evaluate(
        &mut self,
        seq: &[usize],
        mv: Move,
        current: Option<ObjectiveValue>,
    ) -> ObjectiveValue {
        match self {
            Self::Permutation(e) => e.evaluate(seq, mv),
            Self::NoWait(e) => e.evaluate(seq, mv, current),
            Self::NoIdle(e) => e.evaluate(seq, mv),
        }
    }
}

/// Length of the common prefix of two sequences.
pub(crate) fn common_prefix(a: &[usize], b: &[usize]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Writes `seq` without position `skip` into `out`.
pub(crate) fn remove_into(seq: &[usize], skip: usize, out: &mut Vec<usize>) {
    out.clear();
    out.extend_from_slice(&seq[..skip]);
    out.extend_from_slice(&seq[skip + 1..]);
}

#[cfg(test)]
pub(crate) mod testing {
    //! Reference simulations used by the evaluator tests.

    use crate::models::{InstanceData, Objective, ObjectiveValue, Variant};
    use crate::scheduler::ScheduleCompiler;
    use std::sync::Arc;

    use super::Move;

    /// Objective of `seq` after `mv`, by building the moved sequence and
    /// compiling it from scratch.
    pub(crate) fn brute_force(
        variant: Variant,
        data: &Arc<InstanceData>,
        objective: Objective,
        seq: &[usize],
        mv: Move,
    ) -> ObjectiveValue {
        let mut moved = seq.to_vec();
        mv.apply_slice(&mut moved);
        let mut ct = Vec::new();
        ScheduleCompiler::new(variant, data.clone()).compile(&moved, &mut ct);
        objective.value(&ct)
    }
}
