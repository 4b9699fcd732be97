//! Permutation flow-shop compiler.
//!
//! Standard completion-time recurrence over the `M × n` table:
//!
//! ```text
//! C(m, i) = max(C(m-1, i), C(m, i-1)) + p(π_i, m)
//! ```
//!
//! with `C(-1, ·) = C(·, -1) = 0`. The table and the sequence it was built
//! for are kept between calls; a new sequence that shares a prefix with the
//! previous one only recomputes the columns from the first differing
//! position onward.
//!
//! # Reference
//! Johnson (1954), "Optimal two- and three-stage production schedules"

use std::sync::Arc;

use crate::models::InstanceData;

/// Completion-time compiler for the classic permutation flow shop.
#[derive(Debug, Clone)]
pub struct PermutationCompiler {
    data: Arc<InstanceData>,
    /// `part_ct[m * N + i]`: completion of position `i` on machine `m`.
    part_ct: Vec<i64>,
    last_compiled: Vec<usize>,
}

impl PermutationCompiler {
    /// Creates a compiler with an empty table.
    pub fn new(data: Arc<InstanceData>) -> Self {
        let size = data.no_jobs() * data.no_machines();
        Self {
            part_ct: vec![0; size],
            last_compiled: Vec::with_capacity(data.no_jobs()),
            data,
        }
    }

    /// Writes the last-machine completion time of every position of `seq`
    /// into `ct` (resized to `seq.len()`).
    pub fn compile(&mut self, seq: &[usize], ct: &mut Vec<i64>) {
        let n = self.data.no_jobs();
        let no_machines = self.data.no_machines();
        let from = self
            .last_compiled
            .iter()
            .zip(seq)
            .take_while(|(a, b)| a == b)
            .count();

        for (i, &job) in seq.iter().enumerate().skip(from) {
            let mut above = 0;
            for m in 0..no_machines {
                let left = if i == 0 { 0 } else { self.part_ct[m * n + i - 1] };
                above = above.max(left) + self.data.pt(job, m);
                self.part_ct[m * n + i] = above;
            }
        }

        self.last_compiled.clear();
        self.last_compiled.extend_from_slice(seq);

        let last_row = (no_machines - 1) * n;
        ct.clear();
        ct.extend_from_slice(&self.part_ct[last_row..last_row + seq.len()]);
    }

    /// Completion times on `machine` for the last compiled sequence.
    pub fn machine_completion_times(&self, machine: usize) -> &[i64] {
        let n = self.data.no_jobs();
        &self.part_ct[machine * n..machine * n + self.last_compiled.len()]
    }

    /// The sequence the table currently describes.
    pub fn last_compiled(&self) -> &[usize] {
        &self.last_compiled
    }
}
