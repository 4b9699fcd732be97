//! Evaluation facade used by search drivers.
//!
//! [`FlowShopEvaluator`] pairs the full compiler and the delta evaluator of
//! one variant under one objective. The pair is chosen once at construction
//! and never changes. [`EvaluationCounter`] wraps any [`FlowShopEval`] and
//! counts calls, which is what drivers use as their stopping criterion.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use u_flowshop::evaluation::{apply_move, FlowShopEval, FlowShopEvaluator};
//! use u_flowshop::models::{InstanceData, Objective, Permutation, Variant};
//! use u_flowshop::neighborhood::Move;
//!
//! let data = Arc::new(
//!     InstanceData::from_machine_rows(&[vec![20, 25, 25, 10, 17], vec![30, 20, 25, 25, 28]])
//!         .unwrap(),
//! );
//! let mut eval = FlowShopEvaluator::new(data, Variant::NoWait, Objective::Makespan);
//! let mut perm = Permutation::identity(5);
//! eval.compile(&mut perm);
//!
//! let mv = Move::new(2, 4);
//! assert_eq!(eval.evaluate_move(&perm, mv), 148);
//! apply_move(&mut perm, mv);
//! assert_eq!(eval.compile(&mut perm), 148);
//! ```

use std::sync::Arc;

use crate::models::{InstanceData, Objective, ObjectiveValue, Permutation, Variant};
use crate::neighborhood::{Move, NeighborEvaluator};
use crate::scheduler::{
    DelayMatrix, NoIdleCompiler, NoWaitCompiler, PermutationCompiler, ScheduleCompiler,
    ScheduleKpi,
};
use crate::validation::{validate_move, validate_permutation};

/// Cost oracle consumed by search drivers.
pub trait FlowShopEval {
    /// Full evaluation. Stores the result as the permutation's fitness.
    fn compile(&mut self, perm: &mut Permutation) -> ObjectiveValue;

    /// Objective of `perm` after `mv`, without modifying `perm`.
    ///
    /// A no-op move returns the current fitness.
    fn evaluate_move(&mut self, perm: &Permutation, mv: Move) -> ObjectiveValue;
}

/// Applies `mv` to `perm` in place and invalidates its fitness.
pub fn apply_move(perm: &mut Permutation, mv: Move) {
    mv.apply(perm);
}

/// Full and delta evaluation for one variant and objective.
#[derive(Debug, Clone)]
pub struct FlowShopEvaluator {
    data: Arc<InstanceData>,
    variant: Variant,
    objective: Objective,
    compiler: ScheduleCompiler,
    neighbor: NeighborEvaluator,
    completion_times: Vec<i64>,
}

impl FlowShopEvaluator {
    /// Creates the evaluator pair for `variant` under `objective`.
    pub fn new(data: Arc<InstanceData>, variant: Variant, objective: Objective) -> Self {
        log::debug!(
            "evaluator: {} / {} on {} jobs x {} machines",
            variant,
            objective,
            data.no_jobs(),
            data.no_machines()
        );
        let (compiler, delays) = match variant {
            Variant::Permutation => (
                ScheduleCompiler::Permutation(PermutationCompiler::new(data.clone())),
                None,
            ),
            Variant::NoWait => {
                let delays = Arc::new(DelayMatrix::new(&data));
                (
                    ScheduleCompiler::NoWait(NoWaitCompiler::new(data.clone(), delays.clone())),
                    Some(delays),
                )
            }
            Variant::NoIdle => (ScheduleCompiler::NoIdle(NoIdleCompiler::new(data.clone())), None),
        };
        let neighbor = NeighborEvaluator::new(variant, data.clone(), objective, delays);
        Self {
            completion_times: Vec::with_capacity(data.no_jobs()),
            data,
            variant,
            objective,
            compiler,
            neighbor,
        }
    }

    /// Instance being evaluated.
    pub fn data(&self) -> &Arc<InstanceData> {
        &self.data
    }

    /// Scheduling variant.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Objective.
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Last-machine completion times from the most recent full evaluation.
    pub fn completion_times(&self) -> &[i64] {
        &self.completion_times
    }

    /// Compiles `perm` and summarises the resulting schedule.
    pub fn kpi(&mut self, perm: &Permutation) -> ScheduleKpi {
        self.compile_sequence(perm);
        ScheduleKpi::calculate(&self.data, perm.jobs(), &self.completion_times)
    }

    fn compile_sequence(&mut self, perm: &Permutation) -> ObjectiveValue {
        debug_assert!(
            validate_permutation(perm, self.data.no_jobs()).is_ok(),
            "invalid permutation {:?}",
            perm.jobs()
        );
        self.compiler.compile(perm.jobs(), &mut self.completion_times);
        self.objective.value(&self.completion_times)
    }
}

impl FlowShopEval for FlowShopEvaluator {
    fn compile(&mut self, perm: &mut Permutation) -> ObjectiveValue {
        let value = self.compile_sequence(perm);
        perm.set_fitness(value);
        value
    }

    fn evaluate_move(&mut self, perm: &Permutation, mv: Move) -> ObjectiveValue {
        assert!(
            validate_move(mv, perm.len()).is_ok(),
            "move {mv:?} outside sequence of length {}",
            perm.len()
        );
        debug_assert!(
            validate_permutation(perm, self.data.no_jobs()).is_ok(),
            "invalid permutation {:?}",
            perm.jobs()
        );
        if mv.is_noop() {
            return match perm.fitness() {
                Some(fitness) => fitness,
                None => self.compile_sequence(perm),
            };
        }
        self.neighbor.evaluate(perm.jobs(), mv, perm.fitness())
    }
}

/// Counts full and delta evaluations of an inner evaluator.
#[derive(Debug, Clone)]
pub struct EvaluationCounter<E> {
    inner: E,
    full_evals: u64,
    neighbor_evals: u64,
}

impl<E: FlowShopEval> EvaluationCounter<E> {
    /// Wraps `inner` with zeroed counters.
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            full_evals: 0,
            neighbor_evals: 0,
        }
    }

    /// Number of `compile` calls.
    pub fn full_evals(&self) -> u64 {
        self.full_evals
    }

    /// Number of `evaluate_move` calls.
    pub fn neighbor_evals(&self) -> u64 {
        self.neighbor_evals
    }

    /// Total evaluations of either kind.
    pub fn no_evals(&self) -> u64 {
        self.full_evals + self.neighbor_evals
    }

    /// Zeroes both counters.
    pub fn reset(&mut self) {
        self.full_evals = 0;
        self.neighbor_evals = 0;
    }

    /// The wrapped evaluator.
    pub fn inner(&self) -> &E {
        &self.inner
    }

    /// Unwraps the evaluator.
    pub fn into_inner(self) -> E {
        self.inner
    }
}

impl<E: FlowShopEval> FlowShopEval for EvaluationCounter<E> {
    fn compile(&mut self, perm: &mut Permutation) -> ObjectiveValue {
        self.full_evals += 1;
        self.inner.compile(perm)
    }

    fn evaluate_move(&mut self, perm: &Permutation, mv: Move) -> ObjectiveValue {
        self.neighbor_evals += 1;
        self.inner.evaluate_move(perm, mv)
    }
}
