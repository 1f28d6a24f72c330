//! Temporal interval planning on a finite-domain constraint engine.
//!
//! The crate is layered bottom-up:
//!
//! - **CSP model** ([`csp`]): named integer variables with finite domains
//!   and n-ary predicate constraints.
//! - **Arc consistency and domain splitting** ([`consistency`]): a
//!   generalized AC-3 propagator and the search space obtained by halving
//!   domains and re-propagating.
//! - **Best-first search** ([`search`]): a generic frontier engine over
//!   any [`search::SearchProblem`], ordered by a caller-supplied priority.
//! - **Temporal planning** ([`temporal`]): tasks with durations,
//!   interval relations and time-window bounds compiled into a CSP and
//!   solved greedily under a cost heuristic.
//!
//! # Architecture
//!
//! The lower layers know nothing about time. `search` knows nothing
//! about constraints: the temporal layer composes a [`csp::Csp`], a
//! [`consistency::DomainSplitting`] space and a
//! [`temporal::CostHeuristic`] priority and hands them to
//! [`search::BestFirstRunner`].

pub mod consistency;
pub mod csp;
pub mod error;
pub mod search;
pub mod temporal;
