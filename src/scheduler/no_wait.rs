//! No-wait flow-shop compiler.
//!
//! A job, once started, runs through every machine without waiting. Its
//! schedule is therefore a rigid block, and the only decision is how far
//! the next job's block must be shifted after the previous one. That shift
//! is the start-to-start delay `d(a, b)`, which depends on the pair of jobs
//! only and is tabulated once per instance.
//!
//! ```text
//! d(a, b) = max_k ( Σ_{h≤k} p(a, h) − Σ_{h<k} p(b, h) )
//! C(π_0)  = T(π_0)
//! C(π_i)  = Σ_{l=1..i} d(π_{l-1}, π_l) + T(π_i)
//! ```
//!
//! where `T(j)` is the total processing time of job `j`.
//!
//! # Reference
//! Reddi & Ramamoorthy (1972), "On the flow-shop sequencing problem with
//! no wait in process"

use std::sync::Arc;

use crate::models::InstanceData;

/// Start-to-start delays between every ordered pair of jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayMatrix {
    no_jobs: usize,
    /// `delays[a * N + b]`.
    delays: Vec<i64>,
}

impl DelayMatrix {
    /// Tabulates the delays of an instance in `O(N² · M)`.
    pub fn new(data: &InstanceData) -> Self {
        let n = data.no_jobs();
        let mut delays = vec![0; n * n];
        for a in 0..n {
            for b in 0..n {
                if a == b {
                    continue;
                }
                let mut best = 0;
                let mut done_a = 0;
                let mut started_b = 0;
                for m in 0..data.no_machines() {
                    done_a += data.pt(a, m);
                    best = best.max(done_a - started_b);
                    started_b += data.pt(b, m);
                }
                delays[a * n + b] = best;
            }
        }
        Self { no_jobs: n, delays }
    }

    /// Minimum distance between the start of `a` and the start of `b`
    /// when `b` directly follows `a`. Zero on the diagonal.
    #[inline]
    pub fn delay(&self, a: usize, b: usize) -> i64 {
        self.delays[a * self.no_jobs + b]
    }

    /// Number of jobs covered.
    pub fn no_jobs(&self) -> usize {
        self.no_jobs
    }
}

/// Completion-time compiler for the no-wait flow shop.
#[derive(Debug, Clone)]
pub struct NoWaitCompiler {
    data: Arc<InstanceData>,
    delays: Arc<DelayMatrix>,
}

impl NoWaitCompiler {
    /// Creates a compiler that shares an already tabulated delay matrix.
    pub fn new(data: Arc<InstanceData>, delays: Arc<DelayMatrix>) -> Self {
        Self { data, delays }
    }

    /// Creates a compiler and tabulates its own delay matrix.
    pub fn from_instance(data: Arc<InstanceData>) -> Self {
        let delays = Arc::new(DelayMatrix::new(&data));
        Self::new(data, delays)
    }

    /// The delay matrix in use.
    pub fn delays(&self) -> &Arc<DelayMatrix> {
        &self.delays
    }

    /// Writes the completion time of every position of `seq` into `ct`.
    pub fn compile(&self, seq: &[usize], ct: &mut Vec<i64>) {
        ct.clear();
        let mut start = 0;
        let mut prev: Option<usize> = None;
        for &job in seq {
            if let Some(p) = prev {
                start += self.delays.delay(p, job);
            }
            ct.push(start + self.data.job_total(job));
            prev = Some(job);
        }
    }
}
