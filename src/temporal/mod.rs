//! Temporal planning over interval relations.
//!
//! Tasks have a name and a fixed duration. Qualitative relations between
//! tasks (`before`, `meets`, `during`, ...) and absolute bounds
//! (`starts-after 3`, `between 2 10`, ...) are compiled into a CSP whose
//! variables are each task's start time and its duration, then solved by
//! greedy best-first search over domain splits ordered by [`CostHeuristic`].
//!
//! - [`TemporalProblem`]: tasks, relations and bounds
//! - [`TemporalPlanner`]: compiles and solves, yielding a [`PlanOutcome`]
//! - [`loader`]: the line-oriented text format
//!
//! # Example
//!
//! ```
//! use u_tempo::temporal::{loader, PlannerConfig, TemporalPlanner};
//!
//! let problem = loader::parse_problem(
//!     "task A 3\ntask B 2\nconstraint A meets B\ndomain A starts-after 0\n",
//! )
//! .unwrap();
//! let outcome = TemporalPlanner::solve(&problem, &PlannerConfig::default()).unwrap();
//! assert_eq!(outcome.to_string(), "A:0\nB:3\ncost:6");
//! ```

mod config;
mod heuristic;
pub mod loader;
mod planner;
mod problem;
mod relation;

pub use config::{PlannerConfig, DEFAULT_HORIZON, MAX_HORIZON};
pub use heuristic::CostHeuristic;
pub use planner::{PlanOutcome, TemporalPlanner};
pub use problem::{
    Schedule, Task, TaskBound, TaskRelation, TemporalModel, TemporalProblem, MAX_DURATION,
};
pub use relation::{cost_var, Bound, BoundKind, Relation};
