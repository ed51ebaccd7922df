//! Configuration and orchestration for the Gridworld simulation.
//!
//! This crate wires the pieces together: it loads `gridworld-config.yaml`
//! and a JSON layout, builds a [`GridWorld`](gridworld_world::GridWorld)
//! with its agents, and drives the perceive, decide, apply turn loop.
//!
//! # Modules
//!
//! - [`config`] -- Typed YAML configuration ([`SimulationConfig`]) and layout loading
//! - [`runner`] -- The turn loop ([`Simulation`]) and run reports

pub mod config;
pub mod runner;

pub use config::{ConfigError, SimulationConfig};
pub use runner::{
    AgentReport, AgentTurn, EndReason, RunnerError, Simulation, SimulationResult, TurnSummary,
    log_simulation_end,
};
