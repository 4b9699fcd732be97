//! Problem setup: instance plus variant, objective and budget selection.
//!
//! A [`FlowShopProblem`] owns the counted evaluator for its configuration and
//! exposes the bounds search drivers derive their stopping criteria and
//! acceptance thresholds from.
//!
//! # Example
//! ```
//! use u_flowshop::models::{Budget, Objective, Variant};
//! use u_flowshop::problem::ProblemConfig;
//!
//! let config = ProblemConfig::from_strs("NOWAIT", "FLOWTIME", "low").unwrap();
//! assert_eq!(config.variant, Variant::NoWait);
//! assert_eq!(config.objective, Objective::Flowtime);
//! assert_eq!(config.budget, Budget::Low);
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::evaluation::{EvaluationCounter, FlowShopEvaluator};
use crate::models::{Budget, InstanceData, Objective, ObjectiveValue, Variant};
use crate::parser::read_instance;

/// Variant, objective and budget for one experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProblemConfig {
    /// Scheduling variant.
    pub variant: Variant,
    /// Optimisation criterion.
    pub objective: Objective,
    /// Evaluation budget class.
    #[serde(default)]
    pub budget: Budget,
}

impl ProblemConfig {
    /// Creates a configuration with the default budget.
    pub fn new(variant: Variant, objective: Objective) -> Self {
        Self {
            variant,
            objective,
            budget: Budget::default(),
        }
    }

    /// Sets the variant.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Sets the objective.
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    /// Sets the budget.
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    /// Parses the three selectors from their command-line spellings.
    ///
    /// # Errors
    /// Returns the error of the first selector that is not recognised.
    pub fn from_strs(variant: &str, objective: &str, budget: &str) -> Result<Self> {
        Ok(Self {
            variant: variant.parse()?,
            objective: objective.parse()?,
            budget: budget.parse()?,
        })
    }
}

/// An instance bound to a configuration and its counted evaluator.
#[derive(Debug, Clone)]
pub struct FlowShopProblem {
    data: Arc<InstanceData>,
    config: ProblemConfig,
    eval: EvaluationCounter<FlowShopEvaluator>,
}

impl FlowShopProblem {
    /// Builds the evaluator pair for `config` over `data`.
    pub fn new(data: Arc<InstanceData>, config: ProblemConfig) -> Self {
        log::info!(
            "problem: {} / {} budget {:?}, {} jobs x {} machines",
            config.variant,
            config.objective,
            config.budget,
            data.no_jobs(),
            data.no_machines()
        );
        let eval = EvaluationCounter::new(FlowShopEvaluator::new(
            data.clone(),
            config.variant,
            config.objective,
        ));
        Self { data, config, eval }
    }

    /// Reads an instance file and builds the problem.
    pub fn from_file(path: impl AsRef<Path>, config: ProblemConfig) -> Result<Self> {
        let data = read_instance(path)?;
        Ok(Self::new(Arc::new(data), config))
    }

    /// Instance data.
    pub fn data(&self) -> &Arc<InstanceData> {
        &self.data
    }

    /// Selected configuration.
    pub fn config(&self) -> ProblemConfig {
        self.config
    }

    /// The counted evaluator.
    pub fn eval(&mut self) -> &mut EvaluationCounter<FlowShopEvaluator> {
        &mut self.eval
    }

    /// Trivial upper bound on the objective of any complete sequence.
    ///
    /// Every job completes no later than the sum of all processing times,
    /// so flowtime is bounded by `N` times that sum.
    pub fn upper_bound(&self) -> ObjectiveValue {
        let max_ct = self.data.max_completion_time();
        match self.config.objective {
            Objective::Makespan => max_ct,
            Objective::Flowtime => self.data.no_jobs() as i64 * max_ct,
        }
    }

    /// Evaluation limit for the configured budget: `N · M · multiplier`.
    pub fn max_evaluations(&self) -> u64 {
        (self.data.no_jobs() * self.data.no_machines()) as u64 * self.config.budget.multiplier()
    }

    /// Evaluations spent so far.
    pub fn no_evals(&self) -> u64 {
        self.eval.no_evals()
    }
}
