//! Flow-shop instance data.
//!
//! An instance is an immutable `N × M` processing-time matrix plus derived
//! aggregates. It is built once (from a file, from literal rows, or from a
//! seeded generator) and then shared read-only by every evaluator working on
//! it, typically behind an `Arc`.
//!
//! # Layout
//!
//! Processing times are stored machine-major: `proc_times[m * N + j]`.
//! The compilers walk one machine row at a time, so this keeps their inner
//! loops contiguous.
//!
//! # Reference
//! Taillard (1993), "Benchmarks for basic scheduling problems"

use rand::Rng;

use crate::error::{FlowShopError, Result};

/// Orientation of a flat processing-time vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixLayout {
    /// `data[m * N + j]`, one machine row after another.
    #[default]
    MachineMajor,
    /// `data[j * M + m]`, one job row after another.
    JobMajor,
}

/// Processing-time matrix for `N` jobs on `M` machines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceData {
    no_jobs: usize,
    no_machines: usize,
    /// Machine-major processing times.
    proc_times: Vec<i64>,
    /// Σ over machines, per job.
    job_total_proc_times: Vec<i64>,
    /// Σ over jobs, per machine.
    machine_total_proc_times: Vec<i64>,
    /// Σ of all processing times; a trivial makespan upper bound.
    max_completion_time: i64,
}

impl InstanceData {
    /// Creates an instance from a machine-major flat vector
    /// (`proc_times[m * no_jobs + j]`).
    ///
    /// # Errors
    /// Fails if the dimensions are zero, the vector length does not match,
    /// any processing time is not positive, or the sum of all processing
    /// times does not fit in an `i64`.
    pub fn new(no_jobs: usize, no_machines: usize, proc_times: Vec<i64>) -> Result<Self> {
        if no_jobs == 0 || no_machines == 0 {
            return Err(FlowShopError::InvalidInstance(format!(
                "instance needs at least one job and one machine (got {no_jobs} x {no_machines})"
            )));
        }
        check_len(no_jobs, no_machines, proc_times.len())?;
        if let Some(pos) = proc_times.iter().position(|&p| p <= 0) {
            return Err(FlowShopError::InvalidInstance(format!(
                "processing time of job {} on machine {} must be positive, got {}",
                pos % no_jobs,
                pos / no_jobs,
                proc_times[pos]
            )));
        }
        // Aggregates are partial sums of positive terms.
        if proc_times.iter().try_fold(0i64, |acc, &p| acc.checked_add(p)).is_none() {
            return Err(FlowShopError::InvalidInstance(
                "sum of processing times overflows i64".to_string(),
            ));
        }

        Ok(Self::from_parts(no_jobs, no_machines, proc_times))
    }

    /// Builds the aggregates for already validated data.
    fn from_parts(no_jobs: usize, no_machines: usize, proc_times: Vec<i64>) -> Self {
        let mut job_total_proc_times = vec![0; no_jobs];
        let mut machine_total_proc_times = vec![0; no_machines];
        for m in 0..no_machines {
            for j in 0..no_jobs {
                let p = proc_times[m * no_jobs + j];
                job_total_proc_times[j] += p;
                machine_total_proc_times[m] += p;
            }
        }
        let max_completion_time = job_total_proc_times.iter().sum();

        Self {
            no_jobs,
            no_machines,
            proc_times,
            job_total_proc_times,
            machine_total_proc_times,
            max_completion_time,
        }
    }

    /// Creates an instance from a flat vector in either orientation.
    pub fn from_flat(
        no_jobs: usize,
        no_machines: usize,
        data: Vec<i64>,
        layout: MatrixLayout,
    ) -> Result<Self> {
        match layout {
            MatrixLayout::MachineMajor => Self::new(no_jobs, no_machines, data),
            MatrixLayout::JobMajor => {
                check_len(no_jobs, no_machines, data.len())?;
                let mut proc_times = vec![0; data.len()];
                for j in 0..no_jobs {
                    for m in 0..no_machines {
                        proc_times[m * no_jobs + j] = data[j * no_machines + m];
                    }
                }
                Self::new(no_jobs, no_machines, proc_times)
            }
        }
    }

    /// Creates an instance from rows indexed by machine (`rows[m][j]`).
    ///
    /// This is the orientation of the on-disk benchmark matrices.
    pub fn from_machine_rows(rows: &[Vec<i64>]) -> Result<Self> {
        let no_machines = rows.len();
        let no_jobs = rows.first().map_or(0, |r| r.len());
        if let Some(m) = rows.iter().position(|r| r.len() != no_jobs) {
            return Err(FlowShopError::InvalidInstance(format!(
                "machine row {m} has {} entries, expected {no_jobs}",
                rows[m].len()
            )));
        }
        Self::new(no_jobs, no_machines, rows.concat())
    }

    /// Creates an instance from rows indexed by job (`rows[j][m]`).
    pub fn from_job_rows(rows: &[Vec<i64>]) -> Result<Self> {
        let no_jobs = rows.len();
        let no_machines = rows.first().map_or(0, |r| r.len());
        if let Some(j) = rows.iter().position(|r| r.len() != no_machines) {
            return Err(FlowShopError::InvalidInstance(format!(
                "job row {j} has {} entries, expected {no_machines}",
                rows[j].len()
            )));
        }
        let mut proc_times = vec![0; no_jobs * no_machines];
        for (j, row) in rows.iter().enumerate() {
            for (m, &p) in row.iter().enumerate() {
                proc_times[m * no_jobs + j] = p;
            }
        }
        Self::new(no_jobs, no_machines, proc_times)
    }

    /// Generates a random instance with processing times uniform in `1..=max_time`.
    ///
    /// The generator is passed in explicitly so experiments stay reproducible.
    pub fn random<R: Rng>(no_jobs: usize, no_machines: usize, max_time: i64, rng: &mut R) -> Self {
        let no_jobs = no_jobs.max(1);
        let no_machines = no_machines.max(1);
        let cells = i64::try_from(no_jobs.saturating_mul(no_machines)).unwrap_or(i64::MAX);
        let max_time = max_time.clamp(1, (i64::MAX / cells).max(1));
        let proc_times = (0..no_jobs * no_machines)
            .map(|_| rng.random_range(1..=max_time))
            .collect();
        Self::from_parts(no_jobs, no_machines, proc_times)
    }

    /// Number of jobs `N`.
    #[inline]
    pub fn no_jobs(&self) -> usize {
        self.no_jobs
    }

    /// Number of machines `M`.
    #[inline]
    pub fn no_machines(&self) -> usize {
        self.no_machines
    }

    /// Processing time of `job` on `machine`.
    #[inline]
    pub fn pt(&self, job: usize, machine: usize) -> i64 {
        self.proc_times[machine * self.no_jobs + job]
    }

    /// Processing times of all jobs on `machine`.
    #[inline]
    pub fn machine_row(&self, machine: usize) -> &[i64] {
        let start = machine * self.no_jobs;
        &self.proc_times[start..start + self.no_jobs]
    }

    /// Total processing time of `job` across all machines.
    #[inline]
    pub fn job_total(&self, job: usize) -> i64 {
        self.job_total_proc_times[job]
    }

    /// Per-job totals.
    pub fn job_totals(&self) -> &[i64] {
        &self.job_total_proc_times
    }

    /// Total processing time on `machine` across all jobs.
    #[inline]
    pub fn machine_total(&self, machine: usize) -> i64 {
        self.machine_total_proc_times[machine]
    }

    /// Per-machine totals.
    pub fn machine_totals(&self) -> &[i64] {
        &self.machine_total_proc_times
    }

    /// Sum of all processing times (trivial makespan upper bound).
    pub fn max_completion_time(&self) -> i64 {
        self.max_completion_time
    }
}

/// Checks that `len` equals `no_jobs * no_machines` without overflowing.
fn check_len(no_jobs: usize, no_machines: usize, len: usize) -> Result<()> {
    let expected = no_jobs.checked_mul(no_machines).ok_or_else(|| {
        FlowShopError::InvalidInstance(format!(
            "{no_jobs} jobs x {no_machines} machines overflows the matrix size"
        ))
    })?;
    if len != expected {
        return Err(FlowShopError::InvalidInstance(format!(
            "expected {expected} processing times for {no_jobs} jobs x {no_machines} machines, \
             got {len}"
        )));
    }
    Ok(())
}
