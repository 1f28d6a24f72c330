//! Error types.
//!
//! Only configuration and load problems are errors. A wiped-out domain
//! during propagation and an exhausted search frontier are ordinary
//! outcomes and are reported through return values instead.

use thiserror::Error;

/// Errors raised while assembling a constraint model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CspError {
    #[error("variable `{0}` is declared twice")]
    DuplicateVariable(String),
    #[error("constraint `{constraint}` references unknown variable `{variable}`")]
    UnknownVariable { constraint: String, variable: String },
    #[error("constraint `{0}` has an empty scope")]
    EmptyScope(String),
}

pub type PlanResult<T> = Result<T, PlanError>;

/// Errors raised while loading or compiling a temporal planning problem.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("IO error, more details: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("unknown relation `{0}`")]
    UnknownRelation(String),
    #[error("unknown bound kind `{0}`")]
    UnknownBound(String),
    #[error("task `{0}` is declared twice")]
    DuplicateTask(String),
    #[error("task `{task}` has duration {duration}, durations must lie in 1..={max}")]
    InvalidDuration { task: String, duration: i64, max: i64 },
    #[error("`{0}` is not a declared task")]
    UnknownTask(String),
    #[error("invalid model: {0}")]
    Model(#[from] CspError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PlanError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Attaches a line number to a keyword error raised while parsing.
    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            PlanError::Parse { .. } | PlanError::Io(_) => self,
            other => Self::parse(line, other.to_string()),
        }
    }
}
