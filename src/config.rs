//! Search configuration parameters.

use std::time::Duration;

use serde::Deserialize;

use crate::backup::BackupStrategy;
use crate::error::SearchError;
use crate::selection::DEFAULT_EXPLORATION;

/// Which root child is recommended once the budget is spent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalMoveSelection {
    /// The most visited child. Robust against lucky, rarely visited children.
    #[default]
    RobustChild,
    /// The child with the highest mean value.
    MaxChild,
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MctsConfig {
    /// Exploration constant `C` of the UCT formula.
    /// Higher values encourage exploration, lower values favor exploitation.
    pub exploration_constant: f64,

    /// How simulation results are written back into the tree.
    pub backup: BackupStrategy,

    /// How the recommended move is picked from the root's children.
    pub final_move: FinalMoveSelection,

    /// Expand only game-ending moves at nodes that have any. Assumes ending
    /// the game is never worse for the mover than playing on.
    pub early_end: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration_constant: DEFAULT_EXPLORATION,
            backup: BackupStrategy::Classic,
            final_move: FinalMoveSelection::RobustChild,
            early_end: false,
        }
    }
}

impl MctsConfig {
    /// Parses a configuration from TOML. Missing keys keep their defaults.
    ///
    /// ```toml
    /// exploration_constant = 1.0
    /// backup = "outcome"
    /// final_move = "max_child"
    /// early_end = true
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, SearchError> {
        let config: Self =
            toml::from_str(content).map_err(|e| SearchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can drive a search.
    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(SearchError::Config(format!(
                "exploration constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        Ok(())
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration_constant(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Builder pattern: set the backup strategy.
    pub fn with_backup(mut self, backup: BackupStrategy) -> Self {
        self.backup = backup;
        self
    }

    /// Builder pattern: set the final move selection.
    pub fn with_final_move(mut self, final_move: FinalMoveSelection) -> Self {
        self.final_move = final_move;
        self
    }

    /// Builder pattern: enable or disable early-end expansion.
    pub fn with_early_end(mut self, early_end: bool) -> Self {
        self.early_end = early_end;
        self
    }
}

/// Limits of a single search. Whichever limit is reached first ends it.
///
/// Limits are checked between iterations only, so a time limit may be
/// overshot by up to one iteration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    pub iterations: Option<u32>,
    pub time_limit: Option<Duration>,
}

impl Budget {
    /// A budget of `n` iterations.
    pub fn iterations(n: u32) -> Self {
        Self {
            iterations: Some(n),
            time_limit: None,
        }
    }

    /// A budget of wall-clock time.
    pub fn time_limit(limit: Duration) -> Self {
        Self {
            iterations: None,
            time_limit: Some(limit),
        }
    }

    pub fn with_iterations(mut self, n: u32) -> Self {
        self.iterations = Some(n);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// At least one limit must be set, and an iteration limit must allow an iteration.
    pub fn validate(&self) -> Result<(), SearchError> {
        match (self.iterations, self.time_limit) {
            (None, None) => Err(SearchError::Config(
                "budget needs an iteration or time limit".into(),
            )),
            (Some(0), _) => Err(SearchError::Config(
                "iteration limit must be positive".into(),
            )),
            _ => Ok(()),
        }
    }

    /// Whether a search that ran `iterations` iterations for `elapsed` must stop.
    pub fn is_exhausted(&self, iterations: u32, elapsed: Duration) -> bool {
        self.iterations.is_some_and(|limit| iterations >= limit)
            || self.time_limit.is_some_and(|limit| elapsed >= limit)
    }
}
