//! Problem selectors: scheduling variant, objective and evaluation budget.
//!
//! These are chosen once per problem setup and never change for the
//! lifetime of an evaluator. Parsing accepts the historical spellings used
//! by experiment scripts (`PERM`, `NOWAIT`, `NOIDLE`, `low`/`med`/`high`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FlowShopError;

/// Scalar objective value (makespan or total flowtime).
pub type ObjectiveValue = i64;

/// Flow-shop scheduling variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Variant {
    /// Classic permutation flow shop: jobs may wait between machines.
    #[default]
    Permutation,
    /// Jobs run through all machines without waiting between stages.
    NoWait,
    /// Machines never idle between consecutive jobs.
    NoIdle,
}

/// Optimisation criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Objective {
    /// Completion time of the last job on the last machine.
    #[default]
    Makespan,
    /// Sum of completion times of all jobs.
    Flowtime,
}

/// Evaluation budget class used to derive stopping criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Budget {
    /// `10 · N · M` evaluations.
    Low,
    /// `100 · N · M` evaluations.
    #[default]
    Med,
    /// `1000 · N · M` evaluations.
    High,
}

impl Variant {
    /// Short tag used in logs and experiment output.
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Permutation => "PERM",
            Variant::NoWait => "NOWAIT",
            Variant::NoIdle => "NOIDLE",
        }
    }
}

impl Objective {
    /// Short tag used in logs and experiment output.
    pub fn name(&self) -> &'static str {
        match self {
            Objective::Makespan => "MAKESPAN",
            Objective::Flowtime => "FLOWTIME",
        }
    }

    /// Folds per-position completion times into the objective value.
    ///
    /// An empty sequence has value 0 under both objectives.
    pub fn value(&self, completion_times: &[i64]) -> ObjectiveValue {
        match self {
            Objective::Makespan => completion_times.last().copied().unwrap_or(0),
            Objective::Flowtime => completion_times.iter().sum(),
        }
    }
}

impl Budget {
    /// Multiplier applied to `N · M`.
    pub fn multiplier(&self) -> u64 {
        match self {
            Budget::Low => 10,
            Budget::Med => 100,
            Budget::High => 1000,
        }
    }
}

impl FromStr for Variant {
    type Err = FlowShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PERM" | "PERMUTATION" => Ok(Variant::Permutation),
            "NOWAIT" | "NO_WAIT" | "NO-WAIT" => Ok(Variant::NoWait),
            "NOIDLE" | "NO_IDLE" | "NO-IDLE" => Ok(Variant::NoIdle),
            _ => Err(FlowShopError::UnknownVariant(s.to_string())),
        }
    }
}

impl FromStr for Objective {
    type Err = FlowShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MAKESPAN" => Ok(Objective::Makespan),
            "FLOWTIME" => Ok(Objective::Flowtime),
            _ => Err(FlowShopError::UnknownObjective(s.to_string())),
        }
    }
}

impl FromStr for Budget {
    type Err = FlowShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Budget::Low),
            "med" | "medium" => Ok(Budget::Med),
            "high" => Ok(Budget::High),
            _ => Err(FlowShopError::UnknownBudget(s.to_string())),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
