//! Grid environment for the Gridworld simulation.
//!
//! This crate owns the ground truth the agents only ever see through their
//! perception window: the cells, where each agent stands, and the messages
//! waiting for them.
//!
//! # Modules
//!
//! - [`error`] -- Layout validation and registration errors ([`WorldError`])
//! - [`layout`] -- Serializable scenario descriptions ([`GridLayout`])
//! - [`grid`] -- The environment itself ([`GridWorld`]) and action outcomes

pub mod error;
pub mod grid;
pub mod layout;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use grid::{GridWorld, MAILBOX_CAPACITY, StepOutcome};
pub use layout::{AgentSpawn, GridLayout};
