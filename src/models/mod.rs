//! Flow-shop domain models.
//!
//! Provides the data types shared by the compilers and the neighbor
//! evaluators: the immutable instance, the job permutation with its cached
//! fitness, and the selectors that fix variant and objective.
//!
//! # Domain Mappings
//!
//! | u-flowshop | Manufacturing | Literature |
//! |------------|---------------|------------|
//! | Job | Order / lot | `J_j` |
//! | Machine | Processing stage | `M_k` |
//! | Permutation | Release sequence | `π` |
//! | Makespan | Plan length | `C_max` |
//! | Flowtime | Total lead time | `ΣC_j` |

mod instance;
mod objective;
mod permutation;

pub use instance::{InstanceData, MatrixLayout};
pub use objective::{Budget, Objective, ObjectiveValue, Variant};
pub use permutation::Permutation;
