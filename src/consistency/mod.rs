//! Constraint propagation and the domain-splitting search space.
//!
//! - [`ArcConsistency`]: prunes a domain snapshot to an arc-consistent
//!   fixpoint, or reports the variable whose domain was wiped out
//! - [`DomainSplitting`]: a [`SearchProblem`](crate::search::SearchProblem)
//!   whose nodes are arc-consistent snapshots and whose successors split one
//!   variable's domain in two
//!
//! Arc consistency alone is incomplete (every value has support, yet no
//! solution may exist); splitting closes the gap.

mod ac;
mod splitting;

pub use ac::{ArcConsistency, ArcSeed, Propagation, PropagationStatus};
pub use splitting::{DomainSplitting, SplitStats, VariableOrder};
