//! Domain splitting: CSP solving as a search problem.
//!
//! Nodes are arc-consistent domain snapshots. A node is expanded by picking
//! one unfixed variable, cutting its domain in two halves by value order and
//! re-establishing arc consistency in each half. Children that wipe out a
//! domain are dropped, so every node in the frontier is alive.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::trace;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ac::{ArcConsistency, ArcSeed};
use crate::csp::{Csp, Domains, VarId};
use crate::search::SearchProblem;

/// Rule choosing which unfixed variable to split.
///
/// Both rules are deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VariableOrder {
    /// First variable in declaration order with more than one value.
    #[default]
    FirstUnfixed,
    /// Variable with the fewest values (ties by declaration order).
    SmallestDomain,
}

impl VariableOrder {
    /// Picks the variable to split, or `None` when every domain is fixed
    /// (or empty).
    pub fn select(self, domains: &Domains) -> Option<VarId> {
        let mut open = domains.iter().filter(|(_, d)| d.len() > 1);
        match self {
            VariableOrder::FirstUnfixed => open.next().map(|(v, _)| v),
            VariableOrder::SmallestDomain => open.min_by_key(|(_, d)| d.len()).map(|(v, _)| v),
        }
    }
}

impl fmt::Display for VariableOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableOrder::FirstUnfixed => write!(f, "first-unfixed"),
            VariableOrder::SmallestDomain => write!(f, "smallest-domain"),
        }
    }
}

impl FromStr for VariableOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-unfixed" => Ok(VariableOrder::FirstUnfixed),
            "smallest-domain" => Ok(VariableOrder::SmallestDomain),
            other => Err(format!(
                "unknown variable order `{other}` (expected first-unfixed or smallest-domain)"
            )),
        }
    }
}

/// Counters accumulated while the search runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SplitStats {
    /// Domain splits performed.
    pub splits: usize,
    /// Children discarded because propagation wiped out a domain.
    pub dead_children: usize,
    /// Arc revisions over all propagation passes.
    pub revisions: usize,
}

/// The search space of a CSP under domain splitting.
///
/// # Examples
///
/// ```
/// use u_tempo::consistency::DomainSplitting;
/// use u_tempo::csp::{Csp, Domain, Domains};
/// use u_tempo::search::{BestFirstRunner, Path, SearchConfig};
///
/// let mut b = Csp::builder();
/// b.add_variable("x", Domain::range(0, 8)).unwrap();
/// b.add_variable("y", Domain::range(0, 8)).unwrap();
/// b.add_constraint("x+y=7", &["x", "y"], |v| v[0] + v[1] == 7);
/// b.add_constraint("x>y", &["x", "y"], |v| v[0] > v[1]);
/// let csp = b.build().unwrap();
///
/// let problem = DomainSplitting::new(&csp);
/// let any = |_: &Path<Domains>| 0_i64;
/// let result = BestFirstRunner::run(&problem, &any, &SearchConfig::default());
///
/// let values = result.solution.unwrap().end().assignment().unwrap();
/// assert!(csp.is_satisfied_by(&values));
/// ```
#[derive(Debug)]
pub struct DomainSplitting<'a> {
    ac: ArcConsistency<'a>,
    order: VariableOrder,
    splits: AtomicUsize,
    dead_children: AtomicUsize,
    revisions: AtomicUsize,
}

impl<'a> DomainSplitting<'a> {
    pub fn new(csp: &'a Csp) -> Self {
        Self {
            ac: ArcConsistency::new(csp),
            order: VariableOrder::default(),
            splits: AtomicUsize::new(0),
            dead_children: AtomicUsize::new(0),
            revisions: AtomicUsize::new(0),
        }
    }

    /// Sets the split-variable rule.
    pub fn with_order(mut self, order: VariableOrder) -> Self {
        self.order = order;
        self
    }

    pub fn csp(&self) -> &'a Csp {
        self.ac.csp()
    }

    pub fn stats(&self) -> SplitStats {
        SplitStats {
            splits: self.splits.load(Ordering::Relaxed),
            dead_children: self.dead_children.load(Ordering::Relaxed),
            revisions: self.revisions.load(Ordering::Relaxed),
        }
    }

    /// The two unpropagated halves of splitting `var` in `domains`.
    ///
    /// Returns `None` when `var` has fewer than two values.
    pub fn split_on(&self, domains: &Domains, var: VarId) -> Option<(Domains, Domains)> {
        let (low, high) = domains[var].split()?;
        Some((domains.with_domain(var, low), domains.with_domain(var, high)))
    }

    /// Re-establishes arc consistency after `var` was narrowed.
    /// Returns `None` for a dead child.
    fn settle(&self, mut child: Domains, var: VarId) -> Option<Domains> {
        let outcome = self.ac.propagate(&mut child, ArcSeed::Changed(var));
        self.revisions
            .fetch_add(outcome.revisions, Ordering::Relaxed);
        if outcome.is_consistent() {
            Some(child)
        } else {
            self.dead_children.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn settle_pair(
        &self,
        low: Domains,
        high: Domains,
        var: VarId,
    ) -> (Option<Domains>, Option<Domains>) {
        (self.settle(low, var), self.settle(high, var))
    }

    #[cfg(feature = "parallel")]
    fn settle_pair(
        &self,
        low: Domains,
        high: Domains,
        var: VarId,
    ) -> (Option<Domains>, Option<Domains>) {
        rayon::join(|| self.settle(low, var), || self.settle(high, var))
    }
}

impl SearchProblem for DomainSplitting<'_> {
    type State = Domains;

    fn start(&self) -> Option<Domains> {
        let mut root = self.csp().initial_domains().clone();
        let outcome = self.ac.propagate(&mut root, ArcSeed::All);
        self.revisions
            .fetch_add(outcome.revisions, Ordering::Relaxed);
        if outcome.is_consistent() {
            Some(root)
        } else {
            trace!("root propagation wiped out {:?}", outcome.status);
            None
        }
    }

    fn is_goal(&self, state: &Domains) -> bool {
        state.is_fixed()
    }

    fn successors(&self, state: &Domains) -> Vec<Domains> {
        let Some(var) = self.order.select(state) else {
            return Vec::new();
        };
        let Some((low, high)) = self.split_on(state, var) else {
            return Vec::new();
        };
        self.splits.fetch_add(1, Ordering::Relaxed);
        trace!(
            "split `{}` {} -> {} | {}",
            self.csp().name(var),
            state[var],
            low[var],
            high[var]
        );

        let (low, high) = self.settle_pair(low, high, var);
        low.into_iter().chain(high).collect()
    }
}
