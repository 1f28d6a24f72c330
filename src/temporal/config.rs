//! Temporal planner configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::consistency::VariableOrder;
use crate::search::SearchConfig;

/// Default planning horizon: start times range over `0..100`.
pub const DEFAULT_HORIZON: i64 = 100;

/// Largest accepted horizon. Every task holds one start domain of this size.
pub const MAX_HORIZON: i64 = 100_000;

/// Configuration parameters for [`TemporalPlanner`](super::TemporalPlanner).
///
/// # Examples
///
/// ```
/// use u_tempo::consistency::VariableOrder;
/// use u_tempo::temporal::PlannerConfig;
///
/// let config = PlannerConfig::default()
///     .with_horizon(48)
///     .with_variable_order(VariableOrder::SmallestDomain);
/// assert_eq!(config.horizon, 48);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlannerConfig {
    /// Start times range over `0..horizon`.
    pub horizon: i64,
    /// Which unfixed start variable to split next.
    pub variable_order: VariableOrder,
    /// Search engine parameters.
    pub search: SearchConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            variable_order: VariableOrder::default(),
            search: SearchConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Sets the planning horizon.
    pub fn with_horizon(mut self, horizon: i64) -> Self {
        self.horizon = horizon;
        self
    }

    /// Sets the split-variable rule.
    pub fn with_variable_order(mut self, order: VariableOrder) -> Self {
        self.variable_order = order;
        self
    }

    /// Replaces the search configuration.
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Sets the trace level of the search.
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.search.verbosity = verbosity;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_HORIZON).contains(&self.horizon) {
            return Err(format!(
                "horizon must lie in 1..={MAX_HORIZON}, got {}",
                self.horizon
            ));
        }
        self.search.validate()
    }
}
