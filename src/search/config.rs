//! Best-first search configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration parameters for best-first search.
///
/// # Examples
///
/// ```
/// use u_tempo::search::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_verbosity(2)
///     .with_max_expansions(10_000);
/// assert_eq!(config.verbosity, 2);
/// assert_eq!(config.max_expansions, Some(10_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchConfig {
    /// Trace level emitted through `log`.
    ///
    /// 0 = silent, 1 = summary, 2 = every expansion, 3 = every generated
    /// path. Never changes the result.
    pub verbosity: u8,
    /// Stop after this many expansions (None = run until the frontier is
    /// exhausted).
    pub max_expansions: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            verbosity: 0,
            max_expansions: None,
        }
    }
}

impl SearchConfig {
    /// Sets the trace level.
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Sets an expansion budget.
    pub fn with_max_expansions(mut self, n: usize) -> Self {
        self.max_expansions = Some(n);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_expansions == Some(0) {
            return Err("max_expansions must be positive or None".into());
        }
        Ok(())
    }
}
