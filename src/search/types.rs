//! Core traits and the path type for best-first search.

use std::sync::Arc;

/// A search space explored by [`BestFirstRunner`](super::BestFirstRunner).
///
/// Users implement this trait to specify:
/// - The start state (or `None` when there is none, e.g. the root is
///   already known to be infeasible)
/// - The goal test
/// - Successor generation
/// - Optionally, the cost of an edge (defaults to zero)
pub trait SearchProblem {
    /// The node type.
    type State: Clone;

    /// Returns the start state, if any.
    fn start(&self) -> Option<Self::State>;

    /// Whether `state` is a goal.
    fn is_goal(&self, state: &Self::State) -> bool;

    /// Generates the successors of a non-goal state.
    ///
    /// Dead states should be filtered out here; anything returned enters
    /// the frontier.
    fn successors(&self, state: &Self::State) -> Vec<Self::State>;

    /// Cost of moving from `from` to `to`.
    fn edge_cost(&self, _from: &Self::State, _to: &Self::State) -> i64 {
        0
    }
}

/// Orders the frontier. Lower values are expanded first.
///
/// Closures `Fn(&Path<S>) -> i64` implement this trait, so a priority can
/// be given inline:
///
/// ```
/// use u_tempo::search::{Path, Priority};
///
/// let depth_first = |p: &Path<u32>| -(p.depth() as i64);
/// assert_eq!(depth_first.priority(&Path::root(7)), 0);
/// ```
pub trait Priority<S> {
    /// Computes the priority of a path.
    fn priority(&self, path: &Path<S>) -> i64;
}

impl<S, F> Priority<S> for F
where
    F: Fn(&Path<S>) -> i64,
{
    fn priority(&self, path: &Path<S>) -> i64 {
        self(path)
    }
}

/// A path from the start state, stored as a parent-linked chain.
///
/// Extending a path shares the prefix with its parent, so a frontier of
/// many siblings does not copy the states above them.
#[derive(Debug, Clone)]
pub struct Path<S> {
    state: S,
    cost: i64,
    depth: usize,
    parent: Option<Arc<Path<S>>>,
}

impl<S> Path<S> {
    /// A path consisting of the start state only.
    pub fn root(state: S) -> Self {
        Self {
            state,
            cost: 0,
            depth: 0,
            parent: None,
        }
    }

    /// Extends `parent` by one edge to `state`.
    pub fn extend(parent: &Arc<Path<S>>, state: S, edge_cost: i64) -> Self {
        Self {
            state,
            cost: parent.cost + edge_cost,
            depth: parent.depth + 1,
            parent: Some(Arc::clone(parent)),
        }
    }

    /// The last state of the path.
    pub fn end(&self) -> &S {
        &self.state
    }

    /// Accumulated edge cost.
    pub fn cost(&self) -> i64 {
        self.cost
    }

    /// Number of edges.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parent(&self) -> Option<&Path<S>> {
        self.parent.as_deref()
    }

    /// States from the start to the end.
    pub fn states(&self) -> Vec<&S> {
        let mut states = Vec::with_capacity(self.depth + 1);
        let mut node = Some(self);
        while let Some(path) = node {
            states.push(&path.state);
            node = path.parent();
        }
        states.reverse();
        states
    }
}
