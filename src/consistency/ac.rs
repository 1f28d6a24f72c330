//! Generalized arc consistency (AC-3 over n-ary predicate constraints).
//!
//! # Algorithm
//!
//! 1. Seed a work queue with arcs `(variable, constraint)`: every arc on a
//!    first run, or only the arcs affected by one narrowed variable.
//! 2. Pop an arc and drop every value of the variable that has no
//!    supporting tuple in the current domains of the other scope entries.
//! 3. If the domain shrank, enqueue the arcs of every *other* constraint on
//!    that variable (for their other variables).
//! 4. Stop at the fixpoint, or as soon as a domain becomes empty.
//!
//! # Reference
//!
//! Mackworth, A. K. (1977). "Consistency in Networks of Relations",
//! *Artificial Intelligence* 8(1), 99-118.

use std::collections::{HashSet, VecDeque};

use log::trace;

use crate::csp::{Constraint, Csp, Domain, Domains, VarId};

/// Which arcs to put on the work queue initially.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcSeed {
    /// Every `(variable, constraint)` pair of the model.
    All,
    /// Only the arcs whose support may have been lost because the given
    /// variable's domain was narrowed from outside.
    Changed(VarId),
}

/// How a propagation pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationStatus {
    /// Queue drained; the snapshot is arc consistent.
    Fixpoint,
    /// The domain of this variable became empty.
    Wipeout(VarId),
}

/// Outcome and counters of one propagation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Propagation {
    pub status: PropagationStatus,
    /// Number of arcs revised.
    pub revisions: usize,
    /// Number of values removed over all domains.
    pub removed: usize,
}

impl Propagation {
    pub fn is_consistent(&self) -> bool {
        self.status == PropagationStatus::Fixpoint
    }
}

type ArcKey = (VarId, usize);

/// Arc consistency engine bound to one model.
///
/// The engine is stateless between calls; each call works on the snapshot
/// it is handed, which the caller owns.
///
/// # Examples
///
/// ```
/// use u_tempo::consistency::{ArcConsistency, ArcSeed};
/// use u_tempo::csp::{Csp, Domain};
///
/// let mut b = Csp::builder();
/// b.add_variable("x", Domain::range(0, 10)).unwrap();
/// b.add_variable("y", Domain::range(0, 10)).unwrap();
/// b.add_constraint("x+3<=y", &["x", "y"], |v| v[0] + 3 <= v[1]);
/// let csp = b.build().unwrap();
///
/// let mut domains = csp.initial_domains().clone();
/// let outcome = ArcConsistency::new(&csp).propagate(&mut domains, ArcSeed::All);
///
/// assert!(outcome.is_consistent());
/// assert_eq!(domains[csp.var("x").unwrap()].max(), Some(6));
/// assert_eq!(domains[csp.var("y").unwrap()].min(), Some(3));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ArcConsistency<'a> {
    csp: &'a Csp,
}

impl<'a> ArcConsistency<'a> {
    pub fn new(csp: &'a Csp) -> Self {
        Self { csp }
    }

    pub fn csp(&self) -> &'a Csp {
        self.csp
    }

    /// Prunes `domains` in place until arc consistent or wiped out.
    ///
    /// On [`PropagationStatus::Wipeout`] the snapshot is left partially
    /// pruned and must be discarded by the caller.
    pub fn propagate(&self, domains: &mut Domains, seed: ArcSeed) -> Propagation {
        let mut queue: VecDeque<ArcKey> = VecDeque::new();
        let mut queued: HashSet<ArcKey> = HashSet::new();

        match seed {
            ArcSeed::All => {
                for (id, constraint) in self.csp.constraints().iter().enumerate() {
                    for var in distinct_vars(constraint) {
                        if queued.insert((var, id)) {
                            queue.push_back((var, id));
                        }
                    }
                }
            }
            ArcSeed::Changed(var) => {
                self.enqueue_dependents(var, None, &mut queue, &mut queued);
            }
        }

        let mut revisions = 0;
        let mut removed = 0;

        while let Some(arc) = queue.pop_front() {
            queued.remove(&arc);
            let (var, id) = arc;
            revisions += 1;

            let dropped = self.revise(domains, var, id);
            if dropped == 0 {
                continue;
            }
            removed += dropped;

            if domains[var].is_empty() {
                trace!(
                    "wipeout of `{}` by constraint `{}`",
                    self.csp.name(var),
                    self.csp.constraint(id).name()
                );
                return Propagation {
                    status: PropagationStatus::Wipeout(var),
                    revisions,
                    removed,
                };
            }

            self.enqueue_dependents(var, Some(id), &mut queue, &mut queued);
        }

        Propagation {
            status: PropagationStatus::Fixpoint,
            revisions,
            removed,
        }
    }

    /// Removes the values of `var` without support in constraint `id`.
    /// Returns how many values were removed.
    pub fn revise(&self, domains: &mut Domains, var: VarId, id: usize) -> usize {
        let constraint = self.csp.constraint(id);
        let scope = constraint.scope();

        let bound: Vec<usize> = (0..scope.len()).filter(|&i| scope[i] == var).collect();
        let free = free_groups(constraint, var);

        let mut tuple = vec![0; scope.len()];
        let mut kept = Vec::with_capacity(domains[var].len());
        for value in domains[var].iter() {
            for &pos in &bound {
                tuple[pos] = value;
            }
            if supported(constraint, domains, &mut tuple, &free, 0) {
                kept.push(value);
            }
        }

        let removed = domains[var].len() - kept.len();
        if removed > 0 {
            domains[var] = Domain::from_values(kept);
        }
        removed
    }

    /// Arcs `(other, c)` for every constraint `c` on `var` except `skip`,
    /// and every other variable `other` in its scope.
    fn enqueue_dependents(
        &self,
        var: VarId,
        skip: Option<usize>,
        queue: &mut VecDeque<ArcKey>,
        queued: &mut HashSet<ArcKey>,
    ) {
        for &id in self.csp.constraints_on(var) {
            if Some(id) == skip {
                continue;
            }
            for other in distinct_vars(self.csp.constraint(id)) {
                if other != var && queued.insert((other, id)) {
                    queue.push_back((other, id));
                }
            }
        }
    }
}

/// Scope variables without repetition, in scope order.
fn distinct_vars(constraint: &Constraint) -> Vec<VarId> {
    let mut vars: Vec<VarId> = Vec::with_capacity(constraint.arity());
    for &v in constraint.scope() {
        if !vars.contains(&v) {
            vars.push(v);
        }
    }
    vars
}

/// Scope positions grouped by variable, excluding `var`.
///
/// A variable repeated in the scope must take one value in every position.
fn free_groups(constraint: &Constraint, var: VarId) -> Vec<(VarId, Vec<usize>)> {
    let mut groups: Vec<(VarId, Vec<usize>)> = Vec::new();
    for (pos, &v) in constraint.scope().iter().enumerate() {
        if v == var {
            continue;
        }
        match groups.iter_mut().find(|(g, _)| *g == v) {
            Some((_, positions)) => positions.push(pos),
            None => groups.push((v, vec![pos])),
        }
    }
    groups
}

/// Depth-first search for one satisfying completion of `tuple`.
fn supported(
    constraint: &Constraint,
    domains: &Domains,
    tuple: &mut [i64],
    free: &[(VarId, Vec<usize>)],
    depth: usize,
) -> bool {
    let Some((var, positions)) = free.get(depth) else {
        return constraint.holds(tuple);
    };
    for value in domains[*var].iter() {
        for &pos in positions {
            tuple[pos] = value;
        }
        if supported(constraint, domains, tuple, free, depth + 1) {
            return true;
        }
    }
    false
}
