//! Generic best-first search.
//!
//! A frontier-based explorer over any [`SearchProblem`], ordered by a
//! caller-supplied [`Priority`]. Lower priorities are expanded first and,
//! among equal priorities, the most recently pushed path, so runs are
//! reproducible and dive depth-first along ties.
//!
//! The engine knows nothing about constraints: the CSP search space lives
//! in [`crate::consistency::DomainSplitting`] and the temporal heuristic in
//! [`crate::temporal::CostHeuristic`].
//!
//! # References
//!
//! - Pearl, J. (1984). *Heuristics: Intelligent Search Strategies for
//!   Computer Problem Solving*. Addison-Wesley.
//! - Poole, D. & Mackworth, A. (2017). *Artificial Intelligence: Foundations
//!   of Computational Agents*, 2nd ed., ch. 3-4.

mod config;
mod runner;
mod types;

pub use config::SearchConfig;
pub use runner::{BestFirstRunner, SearchResult, SearchStatus};
pub use types::{Path, Priority, SearchProblem};
