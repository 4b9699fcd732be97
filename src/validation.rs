//! Integrity checks for permutations and moves.
//!
//! The evaluators assume their inputs are well formed: a sequence of
//! distinct, in-range job ids and move positions inside the sequence.
//! Violations are caller bugs that would silently corrupt the cached DP
//! tables, so the evaluators run these checks in debug builds. Detects:
//! - Job ids outside `[0, N)`
//! - Duplicate job ids
//! - Sequences longer than the instance
//! - Move positions outside the sequence

use crate::models::Permutation;
use crate::neighborhood::Move;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A job id appears more than once.
    DuplicateJob,
    /// A job id is not below the instance job count.
    JobOutOfRange,
    /// The sequence holds more jobs than the instance.
    SequenceTooLong,
    /// A move position lies outside the sequence.
    MoveOutOfBounds,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a job sequence against an instance with `no_jobs` jobs.
///
/// Checks:
/// 1. The sequence is not longer than `no_jobs`
/// 2. Every job id is in `[0, no_jobs)`
/// 3. No job id repeats
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_sequence(jobs: &[usize], no_jobs: usize) -> ValidationResult {
    let mut errors = Vec::new();

    if jobs.len() > no_jobs {
        errors.push(ValidationError::new(
            ValidationErrorKind::SequenceTooLong,
            format!("Sequence has {} jobs, instance has {}", jobs.len(), no_jobs),
        ));
    }

    let mut seen = vec![false; no_jobs];
    for (position, &job) in jobs.iter().enumerate() {
        if job >= no_jobs {
            errors.push(ValidationError::new(
                ValidationErrorKind::JobOutOfRange,
                format!("Job {job} at position {position} is not below {no_jobs}"),
            ));
        } else if seen[job] {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateJob,
                format!("Job {job} repeats at position {position}"),
            ));
        } else {
            seen[job] = true;
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a permutation against an instance with `no_jobs` jobs.
pub fn validate_permutation(perm: &Permutation, no_jobs: usize) -> ValidationResult {
    validate_sequence(perm.jobs(), no_jobs)
}

/// Validates that both move positions address a sequence of length `len`.
pub fn validate_move(mv: Move, len: usize) -> ValidationResult {
    let mut errors = Vec::new();
    for (name, position) in [("first", mv.first), ("second", mv.second)] {
        if position >= len {
            errors.push(ValidationError::new(
                ValidationErrorKind::MoveOutOfBounds,
                format!("Move {name} position {position} outside sequence of length {len}"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
