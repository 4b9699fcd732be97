//! Permutation flow-shop evaluation engine for the U-Engine ecosystem.
//!
//! Computes makespan and total flowtime of job permutations for the
//! permutation, no-wait and no-idle flow shop, and evaluates shift moves
//! incrementally so local search can scan the whole neighborhood at a
//! fraction of the cost of re-simulating each neighbor. Search drivers
//! (local search, iterated greedy, annealing) live in `u-metaheur` and
//! consume this crate through [`evaluation::FlowShopEval`].
//!
//! # Modules
//!
//! - **`models`**: `InstanceData`, `Permutation`, `Variant`, `Objective`, `Budget`
//! - **`scheduler`**: Full compilers per variant, `DelayMatrix`, `ScheduleKpi`
//! - **`neighborhood`**: Shift `Move`, key bijection, delta evaluators
//! - **`evaluation`**: `FlowShopEvaluator` facade and `EvaluationCounter`
//! - **`construction`**: NEH insertion heuristic
//! - **`problem`**: `ProblemConfig` and `FlowShopProblem`
//! - **`parser`**: Benchmark instance reader
//! - **`validation`**: Sequence and move integrity checks
//!
//! # References
//!
//! - Taillard (1990), "Some efficient heuristic methods for the flow shop
//!   sequencing problem"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Ruiz & Maroto (2005), "A comprehensive review and evaluation of
//!   permutation flowshop heuristics"

pub mod construction;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod neighborhood;
pub mod parser;
pub mod problem;
pub mod scheduler;
pub mod validation;

pub use error::{FlowShopError, Result};
pub use evaluation::{apply_move, EvaluationCounter, FlowShopEval, FlowShopEvaluator};
pub use models::{InstanceData, Objective, ObjectiveValue, Permutation, Variant};
pub use neighborhood::Move;
