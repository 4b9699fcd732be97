//! Schedule quality metrics (KPIs).
//!
//! Summarises the completion times produced by a compiler. In a flow shop
//! every job is released at time zero, so a job's flow time equals its
//! completion time on the last machine.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Completion time of the last position |
//! | Total Flow Time (ΣC_j) | Sum of completion times |
//! | Avg Flow Time | Mean completion time |
//! | Avg Utilization | Σ work / (M · C_max) |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use crate::models::{InstanceData, Objective, ObjectiveValue};

/// Schedule performance indicators for one compiled sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleKpi {
    /// Completion time of the last job on the last machine.
    pub makespan: i64,
    /// Sum of last-machine completion times.
    pub total_flow_time: i64,
    /// Mean last-machine completion time.
    pub avg_flow_time: f64,
    /// Fraction of machine capacity up to the makespan spent processing (0.0..1.0).
    pub avg_utilization: f64,
    /// Number of scheduled jobs.
    pub no_scheduled: usize,
}

impl ScheduleKpi {
    /// Computes KPIs for `seq` from its per-position completion times.
    ///
    /// # Arguments
    /// * `data` - The instance (for the processed work).
    /// * `seq` - The compiled job sequence.
    /// * `completion_times` - Last-machine completion time per position.
    pub fn calculate(data: &InstanceData, seq: &[usize], completion_times: &[i64]) -> Self {
        debug_assert_eq!(seq.len(), completion_times.len());
        let makespan = Objective::Makespan.value(completion_times);
        let total_flow_time = Objective::Flowtime.value(completion_times);
        let no_scheduled = completion_times.len();

        let avg_flow_time = if no_scheduled == 0 {
            0.0
        } else {
            total_flow_time as f64 / no_scheduled as f64
        };

        let work: i64 = seq.iter().map(|&j| data.job_total(j)).sum();
        let avg_utilization = if makespan == 0 {
            0.0
        } else {
            work as f64 / (data.no_machines() as f64 * makespan as f64)
        };

        Self {
            makespan,
            total_flow_time,
            avg_flow_time,
            avg_utilization,
            no_scheduled,
        }
    }

    /// Value of the given objective.
    pub fn objective_value(&self, objective: Objective) -> ObjectiveValue {
        match objective {
            Objective::Makespan => self.makespan,
            Objective::Flowtime => self.total_flow_time,
        }
    }
}
