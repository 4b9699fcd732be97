//! Job permutation (the solution representation).
//!
//! A permutation is an ordered sequence of distinct job ids. It may be a
//! partial sequence (fewer than `N` jobs) while a constructive heuristic is
//! still inserting jobs. The cached fitness is cleared by every mutating
//! operation, so a stale objective value can never be read back.

use std::ops::Index;

use rand::Rng;
use rand::seq::SliceRandom;

use super::ObjectiveValue;

/// Job sequence with a cached objective value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permutation {
    jobs: Vec<usize>,
    fitness: Option<ObjectiveValue>,
}

impl Permutation {
    /// Creates a permutation from a job sequence. Fitness starts invalid.
    pub fn new(jobs: Vec<usize>) -> Self {
        Self { jobs, fitness: None }
    }

    /// The sequence `0, 1, …, n-1`.
    pub fn identity(n: usize) -> Self {
        Self::new((0..n).collect())
    }

    /// A uniformly random ordering of `0..n`.
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        let mut jobs: Vec<usize> = (0..n).collect();
        jobs.shuffle(rng);
        Self::new(jobs)
    }

    /// Empty sequence with room for `capacity` jobs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(Vec::with_capacity(capacity))
    }

    /// Job ids in sequence order.
    #[inline]
    pub fn jobs(&self) -> &[usize] {
        &self.jobs
    }

    /// Number of scheduled jobs.
    #[inline]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether no jobs are scheduled.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Cached objective value, if computed since the last change.
    #[inline]
    pub fn fitness(&self) -> Option<ObjectiveValue> {
        self.fitness
    }

    /// Stores the objective value of the current sequence.
    #[inline]
    pub fn set_fitness(&mut self, fitness: ObjectiveValue) {
        self.fitness = Some(fitness);
    }

    /// Whether the cached fitness must be recomputed.
    #[inline]
    pub fn is_invalid(&self) -> bool {
        self.fitness.is_none()
    }

    /// Drops the cached fitness.
    #[inline]
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    /// Mutable access to the sequence. Invalidates the fitness.
    pub fn jobs_mut(&mut self) -> &mut Vec<usize> {
        self.fitness = None;
        &mut self.jobs
    }

    /// Appends a job at the end.
    pub fn push(&mut self, job: usize) {
        self.jobs.push(job);
        self.fitness = None;
    }

    /// Inserts a job at `position`.
    pub fn insert(&mut self, position: usize, job: usize) {
        self.jobs.insert(position, job);
        self.fitness = None;
    }

    /// Removes and returns the job at `position`.
    pub fn remove(&mut self, position: usize) -> usize {
        self.fitness = None;
        self.jobs.remove(position)
    }

    /// Keeps only the first `len` jobs.
    pub fn truncate(&mut self, len: usize) {
        if len < self.jobs.len() {
            self.jobs.truncate(len);
            self.fitness = None;
        }
    }

    /// Iterates over job ids in sequence order.
    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.jobs.iter()
    }
}

impl Index<usize> for Permutation {
    type Output = usize;

    #[inline]
    fn index(&self, index: usize) -> &usize {
        &self.jobs[index]
    }
}

impl From<Vec<usize>> for Permutation {
    fn from(jobs: Vec<usize>) -> Self {
        Self::new(jobs)
    }
}

impl<'a> IntoIterator for &'a Permutation {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.iter()
    }
}
