//! Plain-text problem format.
//!
//! One statement per line, tokens separated by whitespace:
//!
//! ```text
//! # comment
//! task <name> <duration>
//! constraint <t1> <relation> <t2>
//! domain <t> starts-before|starts-after|ends-before|ends-after <d>
//! domain <t> starts-in|ends-in|between <d1> <d2>
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. A task may be used
//! before the line that declares it.

use std::fs;
use std::path::Path;

use super::problem::TemporalProblem;
use super::relation::{BoundKind, Relation};
use crate::error::{PlanError, PlanResult};

/// Reads and parses a problem file.
pub fn read_problem(path: impl AsRef<Path>) -> PlanResult<TemporalProblem> {
    let text = fs::read_to_string(path)?;
    parse_problem(&text)
}

/// Parses a problem from text.
///
/// Errors carry the 1-based number of the offending line.
///
/// # Examples
///
/// ```
/// use u_tempo::temporal::loader::parse_problem;
///
/// let problem = parse_problem("task A 3\ntask B 2\nconstraint A meets B\n").unwrap();
/// assert_eq!(problem.tasks().len(), 2);
/// assert!(parse_problem("task A three").is_err());
/// ```
pub fn parse_problem(text: &str) -> PlanResult<TemporalProblem> {
    let mut problem = TemporalProblem::new();
    let mut references: Vec<(usize, &str)> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        match tokens.as_slice() {
            [] => {}
            [first, ..] if first.starts_with('#') => {}
            ["task", name, duration] => {
                let duration = parse_number(duration, line)?;
                problem
                    .add_task(*name, duration)
                    .map_err(|e| e.at_line(line))?;
            }
            ["task", ..] => return Err(PlanError::parse(line, "expected `task <name> <duration>`")),
            ["constraint", first, relation, second] => {
                let relation: Relation = relation.parse().map_err(|e: PlanError| e.at_line(line))?;
                problem.add_relation(*first, relation, *second);
                references.push((line, first));
                references.push((line, second));
            }
            ["constraint", ..] => {
                return Err(PlanError::parse(
                    line,
                    "expected `constraint <task> <relation> <task>`",
                ))
            }
            ["domain", task, kind, points @ ..] => {
                let kind: BoundKind = kind.parse().map_err(|e: PlanError| e.at_line(line))?;
                if points.len() != kind.arity() {
                    return Err(PlanError::parse(
                        line,
                        format!(
                            "`{}` takes {} time point(s), got {}",
                            kind.keyword(),
                            kind.arity(),
                            points.len()
                        ),
                    ));
                }
                let points = points
                    .iter()
                    .map(|p| parse_number(p, line))
                    .collect::<PlanResult<Vec<i64>>>()?;
                let bound = kind.with_points(&points).ok_or_else(|| {
                    PlanError::parse(line, format!("malformed `{}` bound", kind.keyword()))
                })?;
                problem.add_bound(*task, bound);
                references.push((line, task));
            }
            ["domain", ..] => {
                return Err(PlanError::parse(
                    line,
                    "expected `domain <task> <bound> <time>...`",
                ))
            }
            [keyword, ..] => {
                return Err(PlanError::parse(
                    line,
                    format!("unknown statement `{keyword}`"),
                ))
            }
        }
    }

    if let Some(&(line, name)) = references
        .iter()
        .find(|(_, name)| problem.task(name).is_none())
    {
        return Err(PlanError::UnknownTask(name.to_string()).at_line(line));
    }
    Ok(problem)
}

fn parse_number(token: &str, line: usize) -> PlanResult<i64> {
    token
        .parse()
        .map_err(|_| PlanError::parse(line, format!("`{token}` is not an integer")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::Bound;

    fn line_of(err: PlanError) -> usize {
        match err {
            PlanError::Parse { line, .. } => line,
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_full_problem() {
        let text = "\
# bridge works
task dig 3
task pour 2

constraint dig meets pour
domain dig starts-after 0
domain pour between 2 40
";
        let problem = parse_problem(text).unwrap();
        assert_eq!(problem.tasks().len(), 2);
        assert_eq!(problem.task("pour").map(|t| t.duration), Some(2));
        assert_eq!(problem.relations()[0].relation, Relation::Meets);
        assert_eq!(problem.bounds()[1].bound, Bound::Between(2, 40));
    }

    #[test]
    fn test_forward_reference_accepted() {
        let text = "constraint a before b\ntask a 1\ntask b 1\n";
        assert!(parse_problem(text).is_ok());
    }

    #[test]
    fn test_undeclared_task_reported_at_use() {
        let text = "task a 1\n\nconstraint a before ghost\n";
        let err = parse_problem(text).unwrap_err();
        assert!(err.to_string().contains("ghost"), "{err}");
        assert_eq!(line_of(err), 3);
    }

    #[test]
    fn test_bad_tokens_report_line() {
        assert_eq!(line_of(parse_problem("task a").unwrap_err()), 1);
        assert_eq!(line_of(parse_problem("task a 1\ntask b x").unwrap_err()), 2);
        assert_eq!(line_of(parse_problem("task a 1\nconstraint a a").unwrap_err()), 2);
        assert_eq!(line_of(parse_problem("domain a").unwrap_err()), 1);
        assert_eq!(line_of(parse_problem("\n\nresource r 4").unwrap_err()), 3);
    }

    #[test]
    fn test_unknown_keywords() {
        let err = parse_problem("task a 1\ntask b 1\nconstraint a precedes b").unwrap_err();
        assert!(err.to_string().contains("unknown relation `precedes`"), "{err}");

        let err = parse_problem("task a 1\ndomain a ends-at 4").unwrap_err();
        assert!(err.to_string().contains("unknown bound kind `ends-at`"), "{err}");
        assert_eq!(line_of(err), 2);
    }

    #[test]
    fn test_bound_arity_checked() {
        let err = parse_problem("task a 1\ndomain a starts-in 4").unwrap_err();
        assert!(err.to_string().contains("takes 2"), "{err}");
        assert!(parse_problem("task a 1\ndomain a ends-before 4 5").is_err());
    }

    #[test]
    fn test_task_errors_carry_line() {
        let err = parse_problem("task a 1\ntask a 2").unwrap_err();
        assert!(err.to_string().contains("declared twice"), "{err}");
        assert_eq!(line_of(err), 2);
        assert_eq!(line_of(parse_problem("task a 0").unwrap_err()), 1);
    }

    #[test]
    fn test_huge_duration_rejected_at_load() {
        let text = format!("task A {}\ntask B 1\nconstraint B before A\n", i64::MAX);
        let err = parse_problem(&text).unwrap_err();
        assert!(err.to_string().contains("durations must lie in"), "{err}");
        assert_eq!(line_of(err), 1);

        let text = format!("task A {}\ntask B 2\n", i64::MAX);
        assert_eq!(line_of(parse_problem(&text).unwrap_err()), 1);
    }

    #[test]
    fn test_longest_duration_solves() {
        use crate::temporal::{PlannerConfig, TemporalPlanner, MAX_DURATION};

        let text = format!("task A {MAX_DURATION}\ntask B 1\nconstraint B before A\n");
        let problem = parse_problem(&text).unwrap();
        let outcome = TemporalPlanner::solve(&problem, &PlannerConfig::default()).unwrap();
        let schedule = outcome.schedule().unwrap();
        assert_eq!(schedule.start_of("B"), Some(0));
        assert_eq!(schedule.start_of("A"), Some(1));
        assert_eq!(schedule.cost(), MAX_DURATION);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_problem("/nonexistent/plan.txt").unwrap_err();
        assert!(matches!(err, PlanError::Io(_)));
    }
}
