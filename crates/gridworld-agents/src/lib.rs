//! Agent lifecycle and policies for the Gridworld simulation.
//!
//! This crate holds everything an agent does without touching the grid
//! itself. It sits between `gridworld-types` (the data structures) and
//! `gridworld-world` (the environment that perceives for and applies the
//! actions of agents).
//!
//! # Modules
//!
//! - [`agent`] -- The [`Agent`] trait and shared bookkeeping ([`AgentCore`])
//! - [`config`] -- Tunables applied at construction ([`AgentConfig`])
//! - [`costs`] -- Energy cost per action
//! - [`world_model`] -- The belief map ([`WorldModel`])
//! - [`pathing`] -- One-step path heuristic over the belief map
//! - [`model_based`] -- The model-based reflex policy ([`ModelBasedReflexAgent`])

pub mod agent;
pub mod config;
pub mod costs;
pub mod model_based;
pub mod pathing;
pub mod world_model;

// Re-export primary types at crate root for convenience.
pub use agent::{Agent, AgentCore, Decision};
pub use config::AgentConfig;
pub use costs::energy_cost;
pub use model_based::{DecisionTier, ModelBasedReflexAgent};
pub use world_model::{ModelStatistics, WorldModel};
