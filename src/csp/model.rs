//! Constraint model: variables, predicate constraints and the adjacency index.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::domain::{Domain, Domains};
use crate::error::CspError;

/// Dense identifier of a variable within one [`Csp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Predicate over one value per scope position.
pub type Predicate = Arc<dyn Fn(&[i64]) -> bool + Send + Sync>;

/// A predicate constraint over an ordered scope of variables.
///
/// The i-th value handed to the predicate belongs to the i-th scope entry.
/// Any arity is allowed and a variable may occur more than once in a scope.
#[derive(Clone)]
pub struct Constraint {
    name: String,
    scope: Vec<VarId>,
    predicate: Predicate,
}

impl Constraint {
    /// Creates a constraint over already-resolved variables.
    pub fn new<F>(name: impl Into<String>, scope: Vec<VarId>, predicate: F) -> Self
    where
        F: Fn(&[i64]) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            scope,
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> &[VarId] {
        &self.scope
    }

    pub fn arity(&self) -> usize {
        self.scope.len()
    }

    pub fn involves(&self, var: VarId) -> bool {
        self.scope.contains(&var)
    }

    /// Evaluates the predicate on a tuple aligned with the scope.
    pub fn holds(&self, values: &[i64]) -> bool {
        debug_assert_eq!(values.len(), self.scope.len(), "tuple/scope mismatch");
        (self.predicate)(values)
    }

    /// Evaluates the constraint against a domain snapshot.
    ///
    /// Returns `None` while some scope variable still has several values
    /// (or none).
    pub fn evaluate(&self, domains: &Domains) -> Option<bool> {
        let values: Option<Vec<i64>> = self.scope.iter().map(|&v| domains[v].value()).collect();
        values.map(|vals| self.holds(&vals))
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// A finite-domain constraint satisfaction problem.
///
/// The structure (variables, constraints, adjacency) is fixed once built.
/// Search works on [`Domains`] snapshots derived from
/// [`initial_domains`](Csp::initial_domains).
///
/// # Examples
///
/// ```
/// use u_tempo::csp::{Csp, Domain};
///
/// let mut builder = Csp::builder();
/// builder.add_variable("x", Domain::range(0, 5)).unwrap();
/// builder.add_variable("y", Domain::range(0, 5)).unwrap();
/// builder.add_constraint("x<y", &["x", "y"], |v| v[0] < v[1]);
/// let csp = builder.build().unwrap();
///
/// assert_eq!(csp.variable_count(), 2);
/// assert!(csp.is_satisfied_by(&[1, 3]));
/// assert!(!csp.is_satisfied_by(&[3, 1]));
/// ```
#[derive(Debug, Clone)]
pub struct Csp {
    names: Vec<String>,
    index: HashMap<String, VarId>,
    domains: Domains,
    constraints: Vec<Constraint>,
    adjacency: Vec<Vec<usize>>,
}

impl Csp {
    pub fn builder() -> CspBuilder {
        CspBuilder::default()
    }

    pub fn variable_count(&self) -> usize {
        self.names.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Name of a variable.
    pub fn name(&self, var: VarId) -> &str {
        &self.names[var.index()]
    }

    /// Looks a variable up by name.
    pub fn var(&self, name: &str) -> Option<VarId> {
        self.index.get(name).copied()
    }

    /// All variables in declaration order.
    pub fn variables(&self) -> impl Iterator<Item = VarId> + '_ {
        (0..self.names.len()).map(VarId::new)
    }

    /// Domains as declared, before any propagation.
    pub fn initial_domains(&self) -> &Domains {
        &self.domains
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraint(&self, id: usize) -> &Constraint {
        &self.constraints[id]
    }

    /// Indices of the constraints whose scope mentions `var`.
    pub fn constraints_on(&self, var: VarId) -> &[usize] {
        &self.adjacency[var.index()]
    }

    /// Checks a complete assignment (one value per variable) against
    /// every constraint.
    pub fn is_satisfied_by(&self, assignment: &[i64]) -> bool {
        let mut tuple = Vec::new();
        self.constraints.iter().all(|c| {
            tuple.clear();
            tuple.extend(c.scope().iter().map(|v| assignment[v.index()]));
            c.holds(&tuple)
        })
    }
}

struct PendingConstraint {
    name: String,
    scope: Vec<String>,
    predicate: Predicate,
}

/// Incremental builder for [`Csp`].
///
/// Constraint scopes are given by variable name and resolved in
/// [`build`](CspBuilder::build), so a constraint may be added before the
/// variables it mentions.
#[derive(Default)]
pub struct CspBuilder {
    names: Vec<String>,
    index: HashMap<String, VarId>,
    domains: Vec<Domain>,
    pending: Vec<PendingConstraint>,
}

impl CspBuilder {
    /// Declares a variable with its initial domain.
    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        domain: Domain,
    ) -> Result<VarId, CspError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(CspError::DuplicateVariable(name));
        }
        let id = VarId::new(self.names.len());
        self.index.insert(name.clone(), id);
        self.names.push(name);
        self.domains.push(domain);
        Ok(id)
    }

    /// Adds a constraint whose scope is given by variable names.
    pub fn add_constraint<F>(&mut self, name: impl Into<String>, scope: &[&str], predicate: F)
    where
        F: Fn(&[i64]) -> bool + Send + Sync + 'static,
    {
        self.pending.push(PendingConstraint {
            name: name.into(),
            scope: scope.iter().map(|s| s.to_string()).collect(),
            predicate: Arc::new(predicate),
        });
    }

    pub fn variable_count(&self) -> usize {
        self.names.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.pending.len()
    }

    /// Resolves scopes and builds the adjacency index.
    pub fn build(self) -> Result<Csp, CspError> {
        let mut constraints = Vec::with_capacity(self.pending.len());
        let mut adjacency = vec![Vec::new(); self.names.len()];

        for pending in self.pending {
            if pending.scope.is_empty() {
                return Err(CspError::EmptyScope(pending.name));
            }
            let mut scope = Vec::with_capacity(pending.scope.len());
            for var_name in &pending.scope {
                match self.index.get(var_name) {
                    Some(&id) => scope.push(id),
                    None => {
                        return Err(CspError::UnknownVariable {
                            constraint: pending.name,
                            variable: var_name.clone(),
                        })
                    }
                }
            }

            let id = constraints.len();
            for &var in &scope {
                let touching = &mut adjacency[var.index()];
                if !touching.contains(&id) {
                    touching.push(id);
                }
            }
            constraints.push(Constraint {
                name: pending.name,
                scope,
                predicate: pending.predicate,
            });
        }

        Ok(Csp {
            names: self.names,
            index: self.index,
            domains: Domains::new(self.domains),
            constraints,
            adjacency,
        })
    }
}
