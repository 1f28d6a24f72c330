//! Best-first search execution engine.
//!
//! # Algorithm
//!
//! 1. Push the start path onto the frontier
//! 2. Pop the path with the lowest priority (most recently pushed among
//!    equal priorities)
//! 3. If its end state is a goal, return it
//! 4. Otherwise push every successor path, scored by the caller's priority
//! 5. An empty frontier means there is no solution
//!
//! With zero edge costs and a heuristic priority this is greedy best-first
//! search; with `path.cost() + h` as priority it is A*.
//!
//! # Reference
//!
//! Hart, P. E., Nilsson, N. J. & Raphael, B. (1968). "A Formal Basis for the
//! Heuristic Determination of Minimum Cost Paths", *IEEE Transactions on
//! Systems Science and Cybernetics* 4(2), 100-107.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use log::{debug, info, trace};

use super::config::SearchConfig;
use super::types::{Path, Priority, SearchProblem};

/// Why a search run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// A goal was reached.
    Solved,
    /// The frontier ran empty: no goal is reachable.
    Exhausted,
    /// The expansion budget ran out first.
    LimitReached,
}

/// Result of a best-first search run.
#[derive(Debug, Clone)]
pub struct SearchResult<S> {
    /// Path to the goal, if one was reached.
    pub solution: Option<Path<S>>,
    /// How the run ended.
    pub status: SearchStatus,
    /// Paths popped and expanded (goal pop excluded).
    pub expansions: usize,
    /// Paths pushed onto the frontier, start included.
    pub generated: usize,
    /// Largest frontier size observed.
    pub max_frontier: usize,
}

impl<S> SearchResult<S> {
    /// Whether a goal was reached.
    pub fn is_solved(&self) -> bool {
        self.status == SearchStatus::Solved
    }
}

struct FrontierEntry<S> {
    priority: i64,
    seq: u64,
    path: Arc<Path<S>>,
}

impl<S> PartialEq for FrontierEntry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl<S> Eq for FrontierEntry<S> {}

impl<S> PartialOrd for FrontierEntry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for FrontierEntry<S> {
    // Priority reversed (BinaryHeap is a max-heap); newest first on ties.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Min-priority queue of paths, LIFO among equal priorities.
struct Frontier<S> {
    heap: BinaryHeap<FrontierEntry<S>>,
    next_seq: u64,
}

impl<S> Frontier<S> {
    fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    fn push(&mut self, path: Arc<Path<S>>, priority: i64) {
        self.heap.push(FrontierEntry {
            priority,
            seq: self.next_seq,
            path,
        });
        self.next_seq += 1;
    }

    fn pop(&mut self) -> Option<(Arc<Path<S>>, i64)> {
        self.heap.pop().map(|e| (e.path, e.priority))
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Best-first search runner.
pub struct BestFirstRunner;

impl BestFirstRunner {
    /// Explores `problem` in order of `priority` until a goal is popped or
    /// the frontier is exhausted.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tempo::search::{BestFirstRunner, Path, SearchConfig, SearchProblem};
    ///
    /// // Count from 0 to 5 by +1 or +2 steps.
    /// struct Counter;
    /// impl SearchProblem for Counter {
    ///     type State = u32;
    ///     fn start(&self) -> Option<u32> { Some(0) }
    ///     fn is_goal(&self, s: &u32) -> bool { *s == 5 }
    ///     fn successors(&self, s: &u32) -> Vec<u32> {
    ///         [s + 1, s + 2].into_iter().filter(|&n| n <= 5).collect()
    ///     }
    ///     fn edge_cost(&self, _: &u32, _: &u32) -> i64 { 1 }
    /// }
    ///
    /// let remaining = |p: &Path<u32>| p.cost() + i64::from((5 - *p.end() + 1) / 2);
    /// let result = BestFirstRunner::run(&Counter, &remaining, &SearchConfig::default());
    /// assert_eq!(result.solution.unwrap().cost(), 3);
    /// ```
    pub fn run<P, H>(problem: &P, priority: &H, config: &SearchConfig) -> SearchResult<P::State>
    where
        P: SearchProblem,
        H: Priority<P::State>,
    {
        let mut frontier = Frontier::new();
        let mut expansions = 0;
        let mut generated = 0;

        let finish = |solution: Option<Path<P::State>>,
                      status: SearchStatus,
                      expansions: usize,
                      generated: usize,
                      max_frontier: usize| {
            if config.verbosity >= 1 {
                info!(
                    "search {:?}: {} expansions, {} paths generated, peak frontier {}",
                    status, expansions, generated, max_frontier
                );
            }
            SearchResult {
                solution,
                status,
                expansions,
                generated,
                max_frontier,
            }
        };

        let Some(start) = problem.start() else {
            if config.verbosity >= 2 {
                debug!("no start state");
            }
            return finish(None, SearchStatus::Exhausted, 0, 0, 0);
        };
        let root = Path::root(start);
        let root_priority = priority.priority(&root);
        frontier.push(Arc::new(root), root_priority);
        generated += 1;
        let mut max_frontier = 1;

        while let Some((path, value)) = frontier.pop() {
            if problem.is_goal(path.end()) {
                if config.verbosity >= 2 {
                    debug!("goal at depth {} with priority {}", path.depth(), value);
                }
                let solution = Arc::try_unwrap(path).unwrap_or_else(|shared| (*shared).clone());
                return finish(
                    Some(solution),
                    SearchStatus::Solved,
                    expansions,
                    generated,
                    max_frontier,
                );
            }

            if config.max_expansions.is_some_and(|limit| expansions >= limit) {
                return finish(
                    None,
                    SearchStatus::LimitReached,
                    expansions,
                    generated,
                    max_frontier,
                );
            }

            expansions += 1;
            if config.verbosity >= 2 {
                debug!(
                    "expanding depth {} priority {} (frontier {})",
                    path.depth(),
                    value,
                    frontier.len()
                );
            }

            for next in problem.successors(path.end()) {
                let edge = problem.edge_cost(path.end(), &next);
                let child = Path::extend(&path, next, edge);
                let child_priority = priority.priority(&child);
                if config.verbosity >= 3 {
                    trace!(
                        "  push depth {} priority {}",
                        child.depth(),
                        child_priority
                    );
                }
                frontier.push(Arc::new(child), child_priority);
                generated += 1;
            }
            max_frontier = max_frontier.max(frontier.len());
        }

        finish(
            None,
            SearchStatus::Exhausted,
            expansions,
            generated,
            max_frontier,
        )
    }
}
