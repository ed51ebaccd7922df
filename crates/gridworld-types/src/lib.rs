//! Shared value types for the Gridworld simulation.
//!
//! This crate is the single source of truth for the data that flows between
//! the environment and the agents. It holds no behavior beyond small
//! accessors: the policies live in `gridworld-agents`, the grid itself in
//! `gridworld-world`.
//!
//! # Modules
//!
//! - [`position`] -- Integer grid coordinates with Manhattan distance
//! - [`enums`] -- Cell classification and agent actions
//! - [`perception`] -- Per-turn perception payload and the [`PerceptionSource`] trait
//! - [`structs`] -- Agent state projection, performance metrics, statistics

pub mod enums;
pub mod perception;
pub mod position;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Action, CellType};
pub use perception::{Perception, PerceptionSource};
pub use position::Position;
pub use structs::{AgentState, PerformanceMetrics, StatisticsSummary};

/// Chebyshev radius of the sensor window (2 gives a 5x5 view).
pub const PERCEPTION_RANGE: i32 = 2;

/// Energy a freshly constructed agent starts with.
pub const INITIAL_ENERGY: u32 = 100;
