//! Full schedule compilers and KPI evaluation.
//!
//! A compiler turns a (possibly partial) job sequence into the completion
//! time of every position on the last machine. One compiler exists per
//! scheduling variant; [`ScheduleCompiler`] dispatches over them.
//!
//! # Algorithms
//!
//! | Variant | Compiler | Cost |
//! |---------|----------|------|
//! | Permutation | [`PermutationCompiler`] | `O(n · M)`, reuses the common prefix |
//! | No-wait | [`NoWaitCompiler`] | `O(n)` over a precomputed [`DelayMatrix`] |
//! | No-idle | [`NoIdleCompiler`] | `O(n · M)` |
//!
//! # KPI
//!
//! [`ScheduleKpi`] summarises compiled completion times: makespan, total and
//! mean flow time, and machine utilization.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 6
//! - Framinan, Gupta & Leisten (2004), "A review and classification of
//!   heuristics for permutation flow-shop scheduling with makespan objective"

mod kpi;
mod no_idle;
mod no_wait;
mod permutation;

use std::sync::Arc;

pub use kpi::ScheduleKpi;
pub use no_idle::{NoIdleCompiler, NoIdleFormulation};
pub use no_wait::{DelayMatrix, NoWaitCompiler};
pub use permutation::PermutationCompiler;

use crate::models::{InstanceData, Variant};

/// Compiler for one scheduling variant.
#[derive(Debug, Clone)]
pub enum ScheduleCompiler {
    /// Classic permutation flow shop.
    Permutation(PermutationCompiler),
    /// No-wait flow shop.
    NoWait(NoWaitCompiler),
    /// No-idle flow shop.
    NoIdle(NoIdleCompiler),
}

impl ScheduleCompiler {
    /// Creates the compiler for `variant`.
    pub fn new(variant: Variant, data: Arc<InstanceData>) -> Self {
        match variant {
            Variant::Permutation => Self::Permutation(PermutationCompiler::new(data)),
            Variant::NoWait => Self::NoWait(NoWaitCompiler::from_instance(data)),
            Variant::NoIdle => Self::NoIdle(NoIdleCompiler::new(data)),
        }
    }

    /// The variant this compiler implements.
    pub fn variant(&self) -> Variant {
        match self {
            Self::Permutation(_) => Variant::Permutation,
            Self::NoWait(_) => Variant::NoWait,
            Self::NoIdle(_) => Variant::NoIdle,
        }
    }

    /// Writes the last-machine completion time of every position of `seq`
    /// into `ct`, replacing its contents.
    pub fn compile(&mut self, seq: &[usize], ct: &mut Vec<i64>) {
        match self {
            Self::Permutation(c) => c.compile(seq, ct),
            Self::NoWait(c) => c.compile(seq, ct),
            Self::NoIdle(c) => c.compile(seq, ct),
        }
    }
}
