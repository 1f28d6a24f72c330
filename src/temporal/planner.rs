//! Temporal planning runner.
//!
//! # Algorithm
//!
//! 1. Without any relation or bound, place every task at 0 and stop
//! 2. Compile tasks, relations and bounds into a CSP over start and cost
//!    variables
//! 3. Establish arc consistency on the root (a wipe-out means no solution)
//! 4. Greedy best-first search over domain splits, ordered by
//!    [`CostHeuristic`](super::CostHeuristic)
//! 5. Read the schedule off the first fully fixed snapshot
//!
//! The first schedule found is returned. Greedy ordering favors early
//! starts but does not prove the cost minimal.

use std::fmt;

use log::info;

use super::config::PlannerConfig;
use super::problem::{Schedule, TemporalProblem};
use crate::consistency::DomainSplitting;
use crate::error::{PlanError, PlanResult};
use crate::search::{BestFirstRunner, SearchStatus};

/// Result of planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    /// A schedule satisfying every relation and bound.
    Scheduled(Schedule),
    /// The constraints admit no schedule within the horizon.
    NoSolution,
    /// The expansion budget ran out before a schedule was found.
    Interrupted { expansions: usize },
}

impl PlanOutcome {
    pub fn schedule(&self) -> Option<&Schedule> {
        match self {
            PlanOutcome::Scheduled(schedule) => Some(schedule),
            _ => None,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, PlanOutcome::Scheduled(_))
    }
}

impl fmt::Display for PlanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanOutcome::Scheduled(schedule) => write!(f, "{schedule}"),
            PlanOutcome::NoSolution => f.write_str("No solution"),
            PlanOutcome::Interrupted { expansions } => {
                write!(f, "No solution (search stopped after {expansions} expansions)")
            }
        }
    }
}

/// Temporal planner.
pub struct TemporalPlanner;

impl TemporalPlanner {
    /// Plans `problem`.
    ///
    /// # Errors
    ///
    /// [`PlanError::InvalidConfig`] for an invalid `config`, and any error
    /// from [`TemporalProblem::compile`].
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tempo::temporal::{PlannerConfig, Relation, TemporalPlanner, TemporalProblem};
    ///
    /// let mut problem = TemporalProblem::new();
    /// problem.add_task("A", 3).unwrap();
    /// problem.add_task("B", 2).unwrap();
    /// problem.add_relation("A", Relation::Before, "B");
    ///
    /// let outcome = TemporalPlanner::solve(&problem, &PlannerConfig::default()).unwrap();
    /// let schedule = outcome.schedule().unwrap();
    /// assert!(schedule.start_of("A").unwrap() + 3 <= schedule.start_of("B").unwrap());
    /// ```
    pub fn solve(problem: &TemporalProblem, config: &PlannerConfig) -> PlanResult<PlanOutcome> {
        config.validate().map_err(PlanError::InvalidConfig)?;
        let verbose = config.search.verbosity >= 1;

        if !problem.has_constraints() {
            if verbose {
                info!(
                    "{} tasks and no constraints, every task starts at 0",
                    problem.tasks().len()
                );
            }
            return Ok(PlanOutcome::Scheduled(problem.trivial_schedule()));
        }

        let model = problem.compile(config.horizon)?;
        if verbose {
            info!(
                "compiled {} tasks into {} variables and {} constraints (horizon {}, {} order)",
                problem.tasks().len(),
                model.csp().variable_count(),
                model.csp().constraint_count(),
                config.horizon,
                config.variable_order
            );
        }

        let space = DomainSplitting::new(model.csp()).with_order(config.variable_order);
        let result = BestFirstRunner::run(&space, model.heuristic(), &config.search);

        if verbose {
            let stats = space.stats();
            info!(
                "{} splits, {} dead children, {} arc revisions",
                stats.splits, stats.dead_children, stats.revisions
            );
        }

        let outcome = match result.solution.as_ref().and_then(|p| p.end().assignment()) {
            Some(values) => PlanOutcome::Scheduled(model.schedule(&values)),
            None if result.status == SearchStatus::LimitReached => PlanOutcome::Interrupted {
                expansions: result.expansions,
            },
            None => PlanOutcome::NoSolution,
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consistency::VariableOrder;
    use crate::search::SearchConfig;
    use crate::temporal::{Bound, Relation};

    fn problem(tasks: &[(&str, i64)]) -> TemporalProblem {
        let mut p = TemporalProblem::new();
        for &(name, duration) in tasks {
            p.add_task(name, duration).unwrap();
        }
        p
    }

    fn solve(p: &TemporalProblem) -> PlanOutcome {
        TemporalPlanner::solve(p, &PlannerConfig::default()).unwrap()
    }

    #[test]
    fn test_fast_path_without_constraints() {
        let p = problem(&[("A", 5), ("B", 3), ("C", 1)]);
        let outcome = solve(&p);
        let schedule = outcome.schedule().unwrap();
        assert!(schedule.iter().all(|(_, start)| start == 0));
        assert_eq!(schedule.cost(), 4 + 2);
        assert_eq!(outcome.to_string(), "A:0\nB:0\nC:0\ncost:6");
    }

    #[test]
    fn test_fast_path_ignores_horizon() {
        let p = problem(&[("A", 500)]);
        let config = PlannerConfig::default().with_horizon(1);
        let outcome = TemporalPlanner::solve(&p, &config).unwrap();
        assert_eq!(outcome.schedule().unwrap().cost(), 499);
    }

    #[test]
    fn test_before_orders_tasks() {
        let mut p = problem(&[("A", 3), ("B", 2)]);
        p.add_relation("A", Relation::Before, "B");
        let outcome = solve(&p);
        let s = outcome.schedule().unwrap();
        let (a, b) = (s.start_of("A").unwrap(), s.start_of("B").unwrap());
        assert!(a + 3 <= b, "A={a} B={b}");
        assert!(p.is_satisfied_by(s));
    }

    #[test]
    fn test_cyclic_before_has_no_solution() {
        let mut p = problem(&[("A", 5), ("B", 5)]);
        p.add_relation("A", Relation::Before, "B");
        p.add_relation("B", Relation::Before, "A");
        let outcome = solve(&p);
        assert_eq!(outcome, PlanOutcome::NoSolution);
        assert_eq!(outcome.to_string(), "No solution");
    }

    #[test]
    fn test_meets_chain_schedule_and_cost() {
        let mut p = problem(&[("A", 3), ("B", 2)]);
        p.add_relation("A", Relation::Meets, "B");
        p.add_bound("A", Bound::StartsAfter(0));
        let outcome = solve(&p);
        let s = outcome.schedule().unwrap();
        assert_eq!(s.start_of("A"), Some(0));
        assert_eq!(s.start_of("B"), Some(3));
        // (0 + 3 - 1) + (3 + 2 - 1)
        assert_eq!(s.cost(), 6);
        assert_eq!(outcome.to_string(), "A:0\nB:3\ncost:6");
    }

    #[test]
    fn test_between_window() {
        let mut p = problem(&[("A", 4)]);
        p.add_bound("A", Bound::Between(2, 10));
        let outcome = solve(&p);
        let start = outcome.schedule().unwrap().start_of("A").unwrap();
        assert!((2..=7).contains(&start), "start {start} outside 2..=7");
        assert_eq!(start, 2);
        assert_eq!(outcome.schedule().unwrap().cost(), 5);
    }

    #[test]
    fn test_all_relations_produce_valid_schedules() {
        for rel in Relation::ALL {
            let mut p = problem(&[("A", 2), ("B", 4)]);
            p.add_relation("A", rel, "B");
            let outcome = solve(&p);
            match rel {
                // durations differ
                Relation::Equals => assert_eq!(outcome, PlanOutcome::NoSolution),
                _ => {
                    let s = outcome.schedule().unwrap_or_else(|| panic!("{rel}: {outcome}"));
                    assert!(p.is_satisfied_by(s), "{rel} violated by\n{s}");
                }
            }
        }
    }

    #[test]
    fn test_horizon_too_short() {
        let mut p = problem(&[("A", 3), ("B", 3)]);
        p.add_relation("A", Relation::Before, "B");
        let config = PlannerConfig::default().with_horizon(3);
        let outcome = TemporalPlanner::solve(&p, &config).unwrap();
        assert_eq!(outcome, PlanOutcome::NoSolution);

        let config = PlannerConfig::default().with_horizon(4);
        let outcome = TemporalPlanner::solve(&p, &config).unwrap();
        assert_eq!(outcome.schedule().unwrap().start_of("B"), Some(3));
    }

    #[test]
    fn test_orders_agree_on_feasibility() {
        let mut p = problem(&[("A", 3), ("B", 2), ("C", 4)]);
        p.add_relation("A", Relation::Before, "B");
        p.add_relation("C", Relation::During, "A");
        p.add_bound("B", Bound::EndsBefore(30));
        // C(4) cannot fit strictly inside A(3).
        for order in [VariableOrder::FirstUnfixed, VariableOrder::SmallestDomain] {
            let config = PlannerConfig::default().with_variable_order(order);
            let outcome = TemporalPlanner::solve(&p, &config).unwrap();
            assert_eq!(outcome, PlanOutcome::NoSolution, "{order}");
        }
    }

    #[test]
    fn test_budget_interrupts() {
        // Feasible, but fixing three starts takes many splits.
        let mut p = problem(&[("A", 2), ("B", 2), ("C", 2)]);
        p.add_relation("A", Relation::Before, "B");
        p.add_relation("C", Relation::After, "B");
        let config = PlannerConfig::default()
            .with_search(SearchConfig::default().with_max_expansions(1));
        let outcome = TemporalPlanner::solve(&p, &config).unwrap();
        assert_eq!(outcome, PlanOutcome::Interrupted { expansions: 1 });
        assert!(outcome.to_string().contains("after 1 expansions"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut p = problem(&[("A", 1)]);
        p.add_bound("A", Bound::StartsBefore(3));
        let config = PlannerConfig::default().with_horizon(0);
        assert!(matches!(
            TemporalPlanner::solve(&p, &config),
            Err(PlanError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_unknown_task_surfaces() {
        let mut p = problem(&[("A", 1)]);
        p.add_relation("A", Relation::Starts, "Z");
        assert!(matches!(
            TemporalPlanner::solve(&p, &PlannerConfig::default()),
            Err(PlanError::UnknownTask(name)) if name == "Z"
        ));
    }

    #[test]
    fn test_verbosity_does_not_change_outcome() {
        let mut p = problem(&[("A", 3), ("B", 2), ("C", 1)]);
        p.add_relation("A", Relation::Before, "B");
        p.add_relation("C", Relation::During, "A");
        let quiet = solve(&p);
        let loud =
            TemporalPlanner::solve(&p, &PlannerConfig::default().with_verbosity(3)).unwrap();
        assert_eq!(quiet, loud);
        assert!(p.is_satisfied_by(quiet.schedule().unwrap()));
    }
}
