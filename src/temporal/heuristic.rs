//! Cost heuristic over domain snapshots.

use crate::csp::{Domains, VarId};
use crate::search::{Path, Priority};

/// Sum of the earliest possible last time point of every task.
///
/// For each task with start variable `s` and duration `c` the term is
/// `min(dom(s)) + c - 1`. A start variable whose domain is empty contributes
/// 0. On a fully fixed snapshot the score is the schedule's cost.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostHeuristic {
    terms: Vec<(VarId, i64)>,
}

impl CostHeuristic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task's start variable and duration.
    pub fn with_term(mut self, start: VarId, duration: i64) -> Self {
        self.terms.push((start, duration));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn score(&self, domains: &Domains) -> i64 {
        self.terms
            .iter()
            .map(|&(var, duration)| match domains[var].min() {
                Some(earliest) => earliest.saturating_add(duration.saturating_sub(1)),
                None => 0,
            })
            .fold(0, i64::saturating_add)
    }
}

impl FromIterator<(VarId, i64)> for CostHeuristic {
    fn from_iter<I: IntoIterator<Item = (VarId, i64)>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

impl Priority<Domains> for CostHeuristic {
    fn priority(&self, path: &Path<Domains>) -> i64 {
        self.score(path.end())
    }
}
