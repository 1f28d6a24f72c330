//! Temporal problems, their compiled constraint models, and schedules.

use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::MAX_HORIZON;
use super::heuristic::CostHeuristic;
use super::relation::{cost_var, Bound, Relation};
use crate::csp::{Csp, Domain, VarId};
use crate::error::{PlanError, PlanResult};

/// Longest accepted task duration.
///
/// With starts below [`MAX_HORIZON`], every end point and schedule cost
/// stays far inside `i64`.
pub const MAX_DURATION: i64 = i32::MAX as i64;

/// A named activity with a fixed duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub duration: i64,
}

/// `first <relation> second`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRelation {
    pub first: String,
    pub relation: Relation,
    pub second: String,
}

/// An absolute bound on one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskBound {
    pub task: String,
    pub bound: Bound,
}

/// Tasks plus the relations and bounds between them.
///
/// Tasks are validated as they are added. Relations and bounds may name
/// tasks that are declared later; names are resolved by
/// [`compile`](TemporalProblem::compile).
///
/// # Examples
///
/// ```
/// use u_tempo::temporal::{Relation, TemporalProblem};
///
/// let mut problem = TemporalProblem::new();
/// problem.add_task("dig", 3).unwrap();
/// problem.add_task("pour", 2).unwrap();
/// problem.add_relation("dig", Relation::Meets, "pour");
///
/// let model = problem.compile(100).unwrap();
/// assert_eq!(model.csp().variable_count(), 4);
/// assert_eq!(model.csp().constraint_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemporalProblem {
    tasks: Vec<Task>,
    index: HashMap<String, usize>,
    relations: Vec<TaskRelation>,
    bounds: Vec<TaskBound>,
}

impl TemporalProblem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a task.
    ///
    /// # Errors
    ///
    /// [`PlanError::DuplicateTask`] for a name already in use and
    /// [`PlanError::InvalidDuration`] for durations outside
    /// `1..=MAX_DURATION`.
    pub fn add_task(&mut self, name: impl Into<String>, duration: i64) -> PlanResult<()> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(PlanError::DuplicateTask(name));
        }
        if !(1..=MAX_DURATION).contains(&duration) {
            return Err(PlanError::InvalidDuration {
                task: name,
                duration,
                max: MAX_DURATION,
            });
        }
        self.index.insert(name.clone(), self.tasks.len());
        self.tasks.push(Task { name, duration });
        Ok(())
    }

    pub fn add_relation(
        &mut self,
        first: impl Into<String>,
        relation: Relation,
        second: impl Into<String>,
    ) {
        self.relations.push(TaskRelation {
            first: first.into(),
            relation,
            second: second.into(),
        });
    }

    pub fn add_bound(&mut self, task: impl Into<String>, bound: Bound) {
        self.bounds.push(TaskBound {
            task: task.into(),
            bound,
        });
    }

    /// Tasks in declaration order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        self.index.get(name).map(|&i| &self.tasks[i])
    }

    pub fn relations(&self) -> &[TaskRelation] {
        &self.relations
    }

    pub fn bounds(&self) -> &[TaskBound] {
        &self.bounds
    }

    /// Whether any relation or bound was stated.
    pub fn has_constraints(&self) -> bool {
        !self.relations.is_empty() || !self.bounds.is_empty()
    }

    /// Every referenced task name that was never declared, in statement order.
    pub fn undeclared_tasks(&self) -> impl Iterator<Item = &str> + '_ {
        self.relations
            .iter()
            .flat_map(|r| [r.first.as_str(), r.second.as_str()])
            .chain(self.bounds.iter().map(|b| b.task.as_str()))
            .filter(move |name| !self.index.contains_key(*name))
    }

    /// Compiles the problem into a constraint model with start times in
    /// `0..horizon`.
    ///
    /// # Errors
    ///
    /// [`PlanError::InvalidConfig`] for a horizon outside
    /// `1..=MAX_HORIZON`, [`PlanError::UnknownTask`] when a relation or
    /// bound names an undeclared task, and [`PlanError::Model`] when a task
    /// name clashes with another task's cost variable.
    pub fn compile(&self, horizon: i64) -> PlanResult<TemporalModel> {
        if !(1..=MAX_HORIZON).contains(&horizon) {
            return Err(PlanError::InvalidConfig(format!(
                "horizon must lie in 1..={MAX_HORIZON}, got {horizon}"
            )));
        }
        if let Some(name) = self.undeclared_tasks().next() {
            return Err(PlanError::UnknownTask(name.to_string()));
        }

        let mut builder = Csp::builder();
        let mut starts = Vec::with_capacity(self.tasks.len());
        for task in &self.tasks {
            starts.push(builder.add_variable(task.name.as_str(), Domain::range(0, horizon))?);
            builder.add_variable(cost_var(&task.name), Domain::singleton(task.duration))?;
        }
        for r in &self.relations {
            r.relation.post(&mut builder, &r.first, &r.second);
        }
        for b in &self.bounds {
            b.bound.post(&mut builder, &b.task);
        }

        let heuristic = starts
            .iter()
            .zip(&self.tasks)
            .map(|(&var, task)| (var, task.duration))
            .collect();
        Ok(TemporalModel {
            csp: builder.build()?,
            tasks: self.tasks.clone(),
            starts,
            heuristic,
        })
    }

    /// The schedule used when nothing is constrained: every task at 0.
    pub fn trivial_schedule(&self) -> Schedule {
        Schedule::new(self.tasks.iter().map(|t| (t, 0)))
    }

    /// Whether `schedule` places every task and respects every relation
    /// and bound.
    pub fn is_satisfied_by(&self, schedule: &Schedule) -> bool {
        let placed = |name: &str| {
            let task = self.task(name)?;
            Some((schedule.start_of(name)?, task.duration))
        };
        let relations_hold = self.relations.iter().all(|r| {
            match (placed(&r.first), placed(&r.second)) {
                (Some((s1, c1)), Some((s2, c2))) => r.relation.holds(s1, c1, s2, c2),
                _ => false,
            }
        });
        let bounds_hold = self.bounds.iter().all(|b| match placed(&b.task) {
            Some((s, c)) => b.bound.holds(s, c),
            None => false,
        });
        self.tasks.iter().all(|t| schedule.start_of(&t.name).is_some())
            && relations_hold
            && bounds_hold
    }
}

/// A compiled temporal problem.
#[derive(Debug)]
pub struct TemporalModel {
    csp: Csp,
    tasks: Vec<Task>,
    starts: Vec<VarId>,
    heuristic: CostHeuristic,
}

impl TemporalModel {
    pub fn csp(&self) -> &Csp {
        &self.csp
    }

    pub fn heuristic(&self) -> &CostHeuristic {
        &self.heuristic
    }

    /// Start variable of each task, in declaration order.
    pub fn start_vars(&self) -> &[VarId] {
        &self.starts
    }

    /// Reads a schedule off a full assignment of the model's variables.
    pub fn schedule(&self, assignment: &[i64]) -> Schedule {
        Schedule::new(
            self.tasks
                .iter()
                .zip(&self.starts)
                .map(|(task, var)| (task, assignment[var.index()])),
        )
    }
}

/// Start times in task declaration order, with the total cost.
///
/// The cost of a task starting at `s` with duration `c` is `s + c - 1`, its
/// last occupied time point; the schedule's cost is the sum over tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schedule {
    starts: Vec<(String, i64)>,
    cost: i64,
}

impl Schedule {
    fn new<'a>(placed: impl Iterator<Item = (&'a Task, i64)>) -> Self {
        let mut cost = 0;
        let starts = placed
            .map(|(task, start)| {
                cost += start + task.duration - 1;
                (task.name.clone(), start)
            })
            .collect();
        Self { starts, cost }
    }

    pub fn cost(&self) -> i64 {
        self.cost
    }

    pub fn start_of(&self, task: &str) -> Option<i64> {
        self.starts
            .iter()
            .find(|(name, _)| name == task)
            .map(|&(_, start)| start)
    }

    /// `(task, start)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.starts.iter().map(|(name, start)| (name.as_str(), *start))
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, start) in self.iter() {
            writeln!(f, "{name}:{start}")?;
        }
        write!(f, "cost:{}", self.cost)
    }
}
