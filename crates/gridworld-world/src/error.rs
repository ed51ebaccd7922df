//! Error types for the `gridworld-world` crate.
//!
//! Layout validation and agent registration return [`WorldError`]. Action
//! resolution never fails for a registered agent: a blocked move or an
//! impossible pickup is a soft refusal reported through the step outcome.

use gridworld_types::Position;

/// Errors that can occur while building or driving a grid.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The layout declares a grid with a zero or negative dimension.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Declared width.
        width: i32,
        /// Declared height.
        height: i32,
    },

    /// An entity lies outside the grid.
    #[error("{entity} at {position} is outside the grid")]
    OutOfBounds {
        /// Which kind of entity (`wall`, `goal`, agent id, ...).
        entity: String,
        /// The offending position.
        position: Position,
    },

    /// Two layout entries claim the same cell.
    #[error("cell {position} is listed more than once in the layout")]
    DuplicateCell {
        /// The contested cell.
        position: Position,
    },

    /// An agent id is used twice.
    #[error("duplicate agent id: {0}")]
    DuplicateAgent(String),

    /// An agent would start inside a wall.
    #[error("agent {agent} cannot start on wall {position}")]
    AgentOnWall {
        /// The agent.
        agent: String,
        /// The wall cell.
        position: Position,
    },

    /// An agent would start on a cell another agent already holds.
    #[error("agent {agent} cannot start at {position}: occupied by {occupant}")]
    CellOccupied {
        /// The agent being placed.
        agent: String,
        /// The contested cell.
        position: Position,
        /// The agent already there.
        occupant: String,
    },

    /// The agent was never registered with this grid.
    #[error("unknown agent: {0}")]
    UnknownAgent(String),
}
