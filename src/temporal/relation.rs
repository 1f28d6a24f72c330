//! Interval relations and absolute bounds, compiled to primitive constraints.
//!
//! Every task `t` owns two variables: its start `t` and its cost `t_cost`,
//! the latter fixed to the task's duration. A task with start `s` and
//! duration `c` occupies the time points `s ..= s + c - 1`.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::csp::CspBuilder;
use crate::error::PlanError;

/// Name of the cost variable paired with a task.
pub fn cost_var(task: &str) -> String {
    format!("{task}_cost")
}

/// A qualitative relation between two tasks.
///
/// | Relation | Meaning (starts `s`, durations `c`) |
/// |---|---|
/// | `before` | s1 + c1 <= s2 |
/// | `after` | s2 + c2 <= s1 |
/// | `starts` | s1 = s2 |
/// | `ends` | s1 + c1 = s2 + c2 |
/// | `meets` | s1 + c1 = s2 |
/// | `overlaps` | s1 < s2 < s1 + c1 < s2 + c2 |
/// | `during` | s1 > s2 and s1 + c1 < s2 + c2 |
/// | `equals` | s1 = s2 and c1 = c2 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Relation {
    Before,
    After,
    Starts,
    Ends,
    Meets,
    Overlaps,
    During,
    Equals,
}

impl Relation {
    pub const ALL: [Relation; 8] = [
        Relation::Before,
        Relation::After,
        Relation::Starts,
        Relation::Ends,
        Relation::Meets,
        Relation::Overlaps,
        Relation::During,
        Relation::Equals,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Relation::Before => "before",
            Relation::After => "after",
            Relation::Starts => "starts",
            Relation::Ends => "ends",
            Relation::Meets => "meets",
            Relation::Overlaps => "overlaps",
            Relation::During => "during",
            Relation::Equals => "equals",
        }
    }

    /// Whether two placed tasks are in this relation.
    pub fn holds(self, s1: i64, c1: i64, s2: i64, c2: i64) -> bool {
        match self {
            Relation::Before => s1 + c1 <= s2,
            Relation::After => s2 + c2 <= s1,
            Relation::Starts => s1 == s2,
            Relation::Ends => s1 + c1 == s2 + c2,
            Relation::Meets => s1 + c1 == s2,
            Relation::Overlaps => s1 < s2 && s1 + c1 > s2 && s1 + c1 < s2 + c2,
            Relation::During => s1 > s2 && s1 + c1 < s2 + c2,
            Relation::Equals => s1 == s2 && c1 == c2,
        }
    }

    /// Adds the constraint for `t1 <relation> t2` to `builder`.
    ///
    /// Scopes only mention the variables the relation actually reads.
    pub fn post(self, builder: &mut CspBuilder, t1: &str, t2: &str) {
        let name = format!("{}({t1},{t2})", self.keyword());
        let (c1, c2) = (cost_var(t1), cost_var(t2));
        let (c1, c2) = (c1.as_str(), c2.as_str());
        match self {
            Relation::Before => {
                builder.add_constraint(name, &[t1, c1, t2], |v| v[0] + v[1] <= v[2])
            }
            Relation::After => {
                builder.add_constraint(name, &[t2, c2, t1], |v| v[0] + v[1] <= v[2])
            }
            Relation::Starts => builder.add_constraint(name, &[t1, t2], |v| v[0] == v[1]),
            Relation::Ends => builder.add_constraint(name, &[t1, c1, t2, c2], |v| {
                v[0] + v[1] == v[2] + v[3]
            }),
            Relation::Meets => {
                builder.add_constraint(name, &[t1, c1, t2], |v| v[0] + v[1] == v[2])
            }
            Relation::Overlaps => builder.add_constraint(name, &[t1, c1, t2, c2], |v| {
                v[0] < v[2] && v[0] + v[1] > v[2] && v[0] + v[1] < v[2] + v[3]
            }),
            Relation::During => builder.add_constraint(name, &[t1, c1, t2, c2], |v| {
                v[0] > v[2] && v[0] + v[1] < v[2] + v[3]
            }),
            Relation::Equals => builder.add_constraint(name, &[t1, c1, t2, c2], |v| {
                v[0] == v[2] && v[1] == v[3]
            }),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Relation {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Relation::ALL
            .into_iter()
            .find(|r| r.keyword() == s)
            .ok_or_else(|| PlanError::UnknownRelation(s.to_string()))
    }
}

/// Keyword of an absolute bound, before its numbers are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundKind {
    StartsBefore,
    StartsAfter,
    EndsBefore,
    EndsAfter,
    StartsIn,
    EndsIn,
    Between,
}

impl BoundKind {
    pub const ALL: [BoundKind; 7] = [
        BoundKind::StartsBefore,
        BoundKind::StartsAfter,
        BoundKind::EndsBefore,
        BoundKind::EndsAfter,
        BoundKind::StartsIn,
        BoundKind::EndsIn,
        BoundKind::Between,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            BoundKind::StartsBefore => "starts-before",
            BoundKind::StartsAfter => "starts-after",
            BoundKind::EndsBefore => "ends-before",
            BoundKind::EndsAfter => "ends-after",
            BoundKind::StartsIn => "starts-in",
            BoundKind::EndsIn => "ends-in",
            BoundKind::Between => "between",
        }
    }

    /// How many time points the bound takes.
    pub fn arity(self) -> usize {
        match self {
            BoundKind::StartsBefore
            | BoundKind::StartsAfter
            | BoundKind::EndsBefore
            | BoundKind::EndsAfter => 1,
            BoundKind::StartsIn | BoundKind::EndsIn | BoundKind::Between => 2,
        }
    }

    /// Attaches time points. Returns `None` on an arity mismatch.
    pub fn with_points(self, points: &[i64]) -> Option<Bound> {
        let bound = match (self, points) {
            (BoundKind::StartsBefore, &[d]) => Bound::StartsBefore(d),
            (BoundKind::StartsAfter, &[d]) => Bound::StartsAfter(d),
            (BoundKind::EndsBefore, &[d]) => Bound::EndsBefore(d),
            (BoundKind::EndsAfter, &[d]) => Bound::EndsAfter(d),
            (BoundKind::StartsIn, &[lo, hi]) => Bound::StartsIn(lo, hi),
            (BoundKind::EndsIn, &[lo, hi]) => Bound::EndsIn(lo, hi),
            (BoundKind::Between, &[lo, hi]) => Bound::Between(lo, hi),
            _ => return None,
        };
        Some(bound)
    }
}

impl FromStr for BoundKind {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BoundKind::ALL
            .into_iter()
            .find(|k| k.keyword() == s)
            .ok_or_else(|| PlanError::UnknownBound(s.to_string()))
    }
}

/// An absolute time-window bound on one task.
///
/// The end of a task is its last occupied time point, `s + c - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Bound {
    StartsBefore(i64),
    StartsAfter(i64),
    EndsBefore(i64),
    EndsAfter(i64),
    StartsIn(i64, i64),
    EndsIn(i64, i64),
    Between(i64, i64),
}

impl Bound {
    pub fn kind(&self) -> BoundKind {
        match self {
            Bound::StartsBefore(_) => BoundKind::StartsBefore,
            Bound::StartsAfter(_) => BoundKind::StartsAfter,
            Bound::EndsBefore(_) => BoundKind::EndsBefore,
            Bound::EndsAfter(_) => BoundKind::EndsAfter,
            Bound::StartsIn(..) => BoundKind::StartsIn,
            Bound::EndsIn(..) => BoundKind::EndsIn,
            Bound::Between(..) => BoundKind::Between,
        }
    }

    /// Whether a task starting at `start` with `duration` respects the bound.
    pub fn holds(&self, start: i64, duration: i64) -> bool {
        let end = start + duration - 1;
        match *self {
            Bound::StartsBefore(d) => start <= d,
            Bound::StartsAfter(d) => start >= d,
            Bound::EndsBefore(d) => end <= d,
            Bound::EndsAfter(d) => end >= d,
            Bound::StartsIn(lo, hi) => lo <= start && start <= hi,
            Bound::EndsIn(lo, hi) => lo <= end && end <= hi,
            Bound::Between(lo, hi) => start >= lo && end <= hi,
        }
    }

    /// Adds the constraint for `task <bound>` to `builder`.
    pub fn post(&self, builder: &mut CspBuilder, task: &str) {
        let name = format!("{task} {self}");
        let cost = cost_var(task);
        let cost = cost.as_str();
        match *self {
            Bound::StartsBefore(d) => builder.add_constraint(name, &[task], move |v| v[0] <= d),
            Bound::StartsAfter(d) => builder.add_constraint(name, &[task], move |v| v[0] >= d),
            Bound::EndsBefore(d) => {
                builder.add_constraint(name, &[task, cost], move |v| v[0] + v[1] - 1 <= d)
            }
            Bound::EndsAfter(d) => {
                builder.add_constraint(name, &[task, cost], move |v| v[0] + v[1] - 1 >= d)
            }
            Bound::StartsIn(lo, hi) => {
                builder.add_constraint(name, &[task], move |v| lo <= v[0] && v[0] <= hi)
            }
            Bound::EndsIn(lo, hi) => builder.add_constraint(name, &[task, cost], move |v| {
                let end = v[0] + v[1] - 1;
                lo <= end && end <= hi
            }),
            Bound::Between(lo, hi) => builder.add_constraint(name, &[task, cost], move |v| {
                v[0] >= lo && v[0] + v[1] - 1 <= hi
            }),
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind().keyword();
        match *self {
            Bound::StartsBefore(d)
            | Bound::StartsAfter(d)
            | Bound::EndsBefore(d)
            | Bound::EndsAfter(d) => write!(f, "{kind} {d}"),
            Bound::StartsIn(lo, hi) | Bound::EndsIn(lo, hi) | Bound::Between(lo, hi) => {
                write!(f, "{kind} {lo} {hi}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csp::{Csp, Domain};

    /// Two tasks with pinned starts; returns whether the compiled
    /// constraint accepts them.
    fn compiled_relation_holds(rel: Relation, s1: i64, c1: i64, s2: i64, c2: i64) -> bool {
        let mut b = Csp::builder();
        b.add_variable("a", Domain::singleton(s1)).unwrap();
        b.add_variable("a_cost", Domain::singleton(c1)).unwrap();
        b.add_variable("b", Domain::singleton(s2)).unwrap();
        b.add_variable("b_cost", Domain::singleton(c2)).unwrap();
        rel.post(&mut b, "a", "b");
        let csp = b.build().unwrap();
        csp.is_satisfied_by(&[s1, c1, s2, c2])
    }

    #[test]
    fn test_relation_table() {
        // (relation, s1, c1, s2, c2, expected)
        let cases = [
            (Relation::Before, 0, 3, 3, 2, true),
            (Relation::Before, 0, 3, 2, 2, false),
            (Relation::After, 5, 1, 0, 5, true),
            (Relation::After, 4, 1, 0, 5, false),
            (Relation::Starts, 4, 1, 4, 9, true),
            (Relation::Starts, 4, 1, 5, 9, false),
            (Relation::Ends, 0, 5, 2, 3, true),
            (Relation::Ends, 0, 5, 2, 4, false),
            (Relation::Meets, 0, 3, 3, 2, true),
            (Relation::Meets, 0, 3, 4, 2, false),
            (Relation::Overlaps, 0, 4, 2, 4, true),
            (Relation::Overlaps, 0, 2, 2, 4, false),
            (Relation::Overlaps, 0, 6, 2, 4, false),
            (Relation::During, 2, 2, 0, 6, true),
            (Relation::During, 0, 2, 0, 6, false),
            (Relation::Equals, 1, 3, 1, 3, true),
            (Relation::Equals, 1, 3, 1, 4, false),
        ];
        for (rel, s1, c1, s2, c2, expected) in cases {
            assert_eq!(
                rel.holds(s1, c1, s2, c2),
                expected,
                "{rel} with a=({s1},{c1}) b=({s2},{c2})"
            );
            assert_eq!(
                compiled_relation_holds(rel, s1, c1, s2, c2),
                expected,
                "compiled {rel} with a=({s1},{c1}) b=({s2},{c2})"
            );
        }
    }

    #[test]
    fn test_relation_scopes() {
        let mut b = Csp::builder();
        for name in ["a", "a_cost", "b", "b_cost"] {
            b.add_variable(name, Domain::singleton(1)).unwrap();
        }
        for rel in Relation::ALL {
            rel.post(&mut b, "a", "b");
        }
        let csp = b.build().unwrap();
        let arities: Vec<usize> = csp.constraints().iter().map(|c| c.arity()).collect();
        assert_eq!(arities, vec![3, 3, 2, 4, 3, 4, 4, 4]);
        assert_eq!(csp.constraint(0).name(), "before(a,b)");
        assert_eq!(csp.constraint(1).scope()[0], csp.var("b").unwrap());
    }

    #[test]
    fn test_relation_parse() {
        for rel in Relation::ALL {
            assert_eq!(rel.keyword().parse::<Relation>().unwrap(), rel);
        }
        assert!(matches!(
            "precedes".parse::<Relation>(),
            Err(PlanError::UnknownRelation(k)) if k == "precedes"
        ));
    }

    #[test]
    fn test_bound_semantics() {
        // start 2, duration 4 occupies 2..=5
        assert!(Bound::StartsBefore(2).holds(2, 4));
        assert!(!Bound::StartsBefore(1).holds(2, 4));
        assert!(Bound::StartsAfter(2).holds(2, 4));
        assert!(!Bound::StartsAfter(3).holds(2, 4));
        assert!(Bound::EndsBefore(5).holds(2, 4));
        assert!(!Bound::EndsBefore(4).holds(2, 4));
        assert!(Bound::EndsAfter(5).holds(2, 4));
        assert!(!Bound::EndsAfter(6).holds(2, 4));
        assert!(Bound::StartsIn(0, 2).holds(2, 4));
        assert!(!Bound::StartsIn(3, 9).holds(2, 4));
        assert!(Bound::EndsIn(5, 9).holds(2, 4));
        assert!(!Bound::EndsIn(0, 4).holds(2, 4));
        assert!(Bound::Between(2, 5).holds(2, 4));
        assert!(!Bound::Between(2, 4).holds(2, 4));
    }

    #[test]
    fn test_bound_between_prunes_start_window() {
        let mut b = Csp::builder();
        b.add_variable("a", Domain::range(0, 100)).unwrap();
        b.add_variable("a_cost", Domain::singleton(4)).unwrap();
        Bound::Between(2, 10).post(&mut b, "a");
        let csp = b.build().unwrap();

        let a = csp.var("a").unwrap();
        let mut domains = csp.initial_domains().clone();
        crate::consistency::ArcConsistency::new(&csp)
            .propagate(&mut domains, crate::consistency::ArcSeed::All);
        assert_eq!(domains[a].min(), Some(2));
        assert_eq!(domains[a].max(), Some(7));
    }

    #[test]
    fn test_bound_kind_points() {
        assert_eq!(
            BoundKind::StartsIn.with_points(&[1, 5]),
            Some(Bound::StartsIn(1, 5))
        );
        assert_eq!(BoundKind::StartsIn.with_points(&[1]), None);
        assert_eq!(BoundKind::EndsAfter.with_points(&[1, 2]), None);
        for kind in BoundKind::ALL {
            assert_eq!(kind.keyword().parse::<BoundKind>().unwrap(), kind);
            let points = vec![3; kind.arity()];
            assert_eq!(kind.with_points(&points).map(|b| b.kind()), Some(kind));
        }
        assert!("ends-at".parse::<BoundKind>().is_err());
    }

    #[test]
    fn test_bound_display() {
        assert_eq!(Bound::EndsBefore(9).to_string(), "ends-before 9");
        assert_eq!(Bound::Between(2, 10).to_string(), "between 2 10");
    }

    #[test]
    fn test_cost_var_name() {
        assert_eq!(cost_var("load"), "load_cost");
    }
}
