//! Finite-domain constraint satisfaction model.
//!
//! # Key Components
//!
//! - [`Domain`] / [`Domains`]: sorted integer value sets and per-node snapshots
//! - [`Constraint`]: an ordered scope plus a predicate of any arity
//! - [`Csp`] / [`CspBuilder`]: the immutable model and its builder
//!
//! The model only stores structure and evaluates predicates. Pruning lives
//! in [`crate::consistency`], search in [`crate::search`].
//!
//! # References
//!
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

mod domain;
mod model;

pub use domain::{Domain, Domains};
pub use model::{Constraint, Csp, CspBuilder, Predicate, VarId};
