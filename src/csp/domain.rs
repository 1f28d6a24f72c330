//! Finite integer domains and per-node domain snapshots.

use std::fmt;
use std::ops::{Index, IndexMut};

use super::model::VarId;

/// A finite set of candidate values for one variable.
///
/// Values are kept sorted and distinct, so the minimum, the maximum and
/// the midpoint split are all cheap.
///
/// # Examples
///
/// ```
/// use u_tempo::csp::Domain;
///
/// let d = Domain::range(0, 10);
/// assert_eq!(d.len(), 10);
/// assert_eq!(d.min(), Some(0));
/// assert_eq!(d.max(), Some(9));
///
/// let (low, high) = d.split().unwrap();
/// assert_eq!(low.values(), &[0, 1, 2, 3, 4]);
/// assert_eq!(high.values(), &[5, 6, 7, 8, 9]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Domain {
    values: Vec<i64>,
}

impl Domain {
    /// Half-open integer range `[start, end)`.
    pub fn range(start: i64, end: i64) -> Self {
        Self {
            values: (start..end).collect(),
        }
    }

    /// A domain holding exactly one value.
    pub fn singleton(value: i64) -> Self {
        Self {
            values: vec![value],
        }
    }

    /// Builds a domain from arbitrary values; duplicates are dropped.
    pub fn from_values(values: impl IntoIterator<Item = i64>) -> Self {
        let mut values: Vec<i64> = values.into_iter().collect();
        values.sort_unstable();
        values.dedup();
        Self { values }
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the domain is wiped out.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether exactly one value remains.
    pub fn is_singleton(&self) -> bool {
        self.values.len() == 1
    }

    /// The single remaining value, if fixed.
    pub fn value(&self) -> Option<i64> {
        match self.values.as_slice() {
            [v] => Some(*v),
            _ => None,
        }
    }

    pub fn min(&self) -> Option<i64> {
        self.values.first().copied()
    }

    pub fn max(&self) -> Option<i64> {
        self.values.last().copied()
    }

    pub fn contains(&self, value: i64) -> bool {
        self.values.binary_search(&value).is_ok()
    }

    /// Sorted values.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.values.iter().copied()
    }

    /// Keeps only the values accepted by `keep`. Returns the number removed.
    pub fn retain(&mut self, mut keep: impl FnMut(i64) -> bool) -> usize {
        let before = self.values.len();
        self.values.retain(|&v| keep(v));
        before - self.values.len()
    }

    /// Splits into two non-empty halves by value order.
    ///
    /// The first half holds the `len / 2` smallest values. Returns `None`
    /// when fewer than two values remain.
    pub fn split(&self) -> Option<(Domain, Domain)> {
        if self.values.len() < 2 {
            return None;
        }
        let mid = self.values.len() / 2;
        let (low, high) = self.values.split_at(mid);
        Some((
            Domain {
                values: low.to_vec(),
            },
            Domain {
                values: high.to_vec(),
            },
        ))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min(), self.max()) {
            (None, _) | (_, None) => write!(f, "{{}}"),
            (Some(lo), Some(hi)) if lo == hi => write!(f, "{{{lo}}}"),
            (Some(lo), Some(hi)) if hi.abs_diff(lo) == self.len() as u64 - 1 => {
                write!(f, "[{lo}..{hi}]")
            }
            (Some(lo), Some(hi)) => write!(f, "{{{lo}..{hi}; {} values}}", self.len()),
        }
    }
}

/// One domain per variable, indexed by [`VarId`].
///
/// Every search node owns its own snapshot; a split clones it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Domains {
    domains: Vec<Domain>,
}

impl Domains {
    pub fn new(domains: Vec<Domain>) -> Self {
        Self { domains }
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn get(&self, var: VarId) -> &Domain {
        &self.domains[var.index()]
    }

    /// Iterates `(variable, domain)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (VarId, &Domain)> + '_ {
        self.domains
            .iter()
            .enumerate()
            .map(|(i, d)| (VarId::new(i), d))
    }

    /// Copy of this snapshot with `var` narrowed to `domain`.
    pub fn with_domain(&self, var: VarId, domain: Domain) -> Self {
        let mut next = self.clone();
        next.domains[var.index()] = domain;
        next
    }

    /// Whether any variable has lost all of its values.
    pub fn has_wipeout(&self) -> bool {
        self.domains.iter().any(Domain::is_empty)
    }

    /// Whether every variable is fixed to a single value.
    pub fn is_fixed(&self) -> bool {
        self.domains.iter().all(Domain::is_singleton)
    }

    /// The full assignment, if every variable is fixed.
    pub fn assignment(&self) -> Option<Vec<i64>> {
        self.domains.iter().map(Domain::value).collect()
    }

    /// Product of domain sizes, saturating. Useful for trace output.
    pub fn search_space(&self) -> u128 {
        self.domains
            .iter()
            .fold(1u128, |acc, d| acc.saturating_mul(d.len() as u128))
    }
}

impl Index<VarId> for Domains {
    type Output = Domain;

    fn index(&self, var: VarId) -> &Domain {
        &self.domains[var.index()]
    }
}

impl IndexMut<VarId> for Domains {
    fn index_mut(&mut self, var: VarId) -> &mut Domain {
        &mut self.domains[var.index()]
    }
}
