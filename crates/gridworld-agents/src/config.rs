//! Configuration constants and defaults for agent construction.
//!
//! These values correspond to the `agents` key of `gridworld-config.yaml`.
//! The [`AgentConfig`] struct bundles every tunable so that callers (the
//! simulation runner, tests) can override defaults.

use gridworld_types::INITIAL_ENERGY;
use serde::Deserialize;

/// Configuration applied when an agent is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentConfig {
    /// Starting energy for new agents (default: 100).
    #[serde(default = "default_starting_energy")]
    pub starting_energy: u32,

    /// Extra energy lost when deciding while standing on a hazard (default: 4).
    ///
    /// The penalty never takes energy below 1.
    #[serde(default = "default_hazard_penalty")]
    pub hazard_penalty: u32,

    /// How many recent actions are kept in the action history (default: 100).
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Seed for the tie-breaking random source.
    ///
    /// `None` seeds from the thread-local generator, so runs differ. Set it
    /// to make decisions reproducible.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            starting_energy: default_starting_energy(),
            hazard_penalty: default_hazard_penalty(),
            history_capacity: default_history_capacity(),
            rng_seed: None,
        }
    }
}

impl AgentConfig {
    /// Copy of this config with a different starting energy.
    #[must_use]
    pub fn with_starting_energy(&self, starting_energy: u32) -> Self {
        Self {
            starting_energy,
            ..self.clone()
        }
    }

    /// Copy of this config with a fixed random seed.
    #[must_use]
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            rng_seed: Some(seed),
            ..self.clone()
        }
    }
}

const fn default_starting_energy() -> u32 {
    INITIAL_ENERGY
}

const fn default_hazard_penalty() -> u32 {
    4
}

const fn default_history_capacity() -> usize {
    100
}
