//! No-idle flow-shop compiler.
//!
//! Every machine, once started, processes its jobs back to back. Machine
//! `k` therefore runs one contiguous block starting at some offset `S_k`,
//! and job `π_i` completes on it at `S_k + H_k(i)` where `H_k(i)` is the
//! running sum of processing times on `k`. Three equivalent formulations
//! are provided; all produce identical completion times.
//!
//! | Formulation | Idea |
//! |-------------|------|
//! | [`NoIdleFormulation::MachineOffsets`] | `S_k − S_{k-1} = max_i (H_{k-1}(i) − H_k(i-1))` |
//! | [`NoIdleFormulation::Forward`] | per-machine-pair gap `F(j,k)` swept left to right |
//! | [`NoIdleFormulation::Backward`] | per-machine-pair gap `E(j,k)` swept right to left |
//!
//! The forward and backward gaps satisfy
//!
//! ```text
//! F(0, k)   = p(π_0, k+1)
//! F(j, k)   = max(F(j-1, k) − p(π_j, k), 0) + p(π_j, k+1)
//! E(n-1, k) = p(π_{n-1}, k)
//! E(j, k)   = max(E(j+1, k) − p(π_j, k+1), 0) + p(π_j, k)
//! ```
//!
//! and give `C_last = Σ_k F(n-1, k) + Σ_i p(π_i, 0)` and
//! `C(π_0) = Σ_k E(0, k) + p(π_0, M-1)`.
//!
//! # Reference
//! Pan & Ruiz (2014), "An effective iterated greedy algorithm for the
//! mixed no-idle permutation flowshop scheduling problem"

use std::sync::Arc;

use crate::models::InstanceData;

/// Which recurrence the no-idle compiler evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoIdleFormulation {
    /// Per-machine start offsets from running sums.
    #[default]
    MachineOffsets,
    /// Forward gap sweep, completion times recovered backwards from `C_last`.
    Forward,
    /// Backward gap sweep, completion times recovered forwards from `C(π_0)`.
    Backward,
}

/// Completion-time compiler for the no-idle flow shop.
#[derive(Debug, Clone)]
pub struct NoIdleCompiler {
    data: Arc<InstanceData>,
    formulation: NoIdleFormulation,
    /// One gap per adjacent machine pair.
    gaps: Vec<i64>,
}

impl NoIdleCompiler {
    /// Creates a compiler using the machine-offset formulation.
    pub fn new(data: Arc<InstanceData>) -> Self {
        Self::with_formulation(data, NoIdleFormulation::default())
    }

    /// Creates a compiler using the given formulation.
    pub fn with_formulation(data: Arc<InstanceData>, formulation: NoIdleFormulation) -> Self {
        let pairs = data.no_machines() - 1;
        Self {
            data,
            formulation,
            gaps: vec![0; pairs],
        }
    }

    /// The formulation in use.
    pub fn formulation(&self) -> NoIdleFormulation {
        self.formulation
    }

    /// Writes the completion time of every position of `seq` into `ct`.
    pub fn compile(&mut self, seq: &[usize], ct: &mut Vec<i64>) {
        ct.clear();
        if seq.is_empty() {
            return;
        }
        match self.formulation {
            NoIdleFormulation::MachineOffsets => self.compile_offsets(seq, ct),
            NoIdleFormulation::Forward => self.compile_forward(seq, ct),
            NoIdleFormulation::Backward => self.compile_backward(seq, ct),
        }
    }

    fn compile_offsets(&self, seq: &[usize], ct: &mut Vec<i64>) {
        let data = &*self.data;
        let mut offset = 0;
        for k in 1..data.no_machines() {
            let mut prev = 0;
            let mut cur = 0;
            let mut shift = i64::MIN;
            for &job in seq {
                prev += data.pt(job, k - 1);
                shift = shift.max(prev - cur);
                cur += data.pt(job, k);
            }
            offset += shift;
        }
        let last = data.no_machines() - 1;
        let mut running = offset;
        for &job in seq {
            running += data.pt(job, last);
            ct.push(running);
        }
    }

    fn compile_forward(&mut self, seq: &[usize], ct: &mut Vec<i64>) {
        let data = &*self.data;
        let first = seq[0];
        for (k, gap) in self.gaps.iter_mut().enumerate() {
            *gap = data.pt(first, k + 1);
        }
        for &job in &seq[1..] {
            for (k, gap) in self.gaps.iter_mut().enumerate() {
                *gap = (*gap - data.pt(job, k)).max(0) + data.pt(job, k + 1);
            }
        }

        let head: i64 = seq.iter().map(|&j| data.pt(j, 0)).sum();
        let last = data.no_machines() - 1;
        ct.resize(seq.len(), 0);
        let mut c = self.gaps.iter().sum::<i64>() + head;
        for i in (0..seq.len()).rev() {
            ct[i] = c;
            c -= data.pt(seq[i], last);
        }
    }

    fn compile_backward(&mut self, seq: &[usize], ct: &mut Vec<i64>) {
        let data = &*self.data;
        let (&tail, rest) = match seq.split_last() {
            Some(split) => split,
            None => return,
        };
        for (k, gap) in self.gaps.iter_mut().enumerate() {
            *gap = data.pt(tail, k);
        }
        for &job in rest.iter().rev() {
            for (k, gap) in self.gaps.iter_mut().enumerate() {
                *gap = (*gap - data.pt(job, k + 1)).max(0) + data.pt(job, k);
            }
        }

        let last = data.no_machines() - 1;
        let mut c = self.gaps.iter().sum::<i64>();
        for &job in seq {
            c += data.pt(job, last);
            ct.push(c);
        }
    }
}
