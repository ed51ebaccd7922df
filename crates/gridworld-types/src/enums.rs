//! Enumeration types for the Gridworld simulation.
//!
//! [`CellType`] classifies a single grid cell and [`Action`] is the full set
//! of things an agent can ask the environment to do in one turn.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cell classification
// ---------------------------------------------------------------------------

/// What occupies a grid cell. The variants are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    /// Open floor.
    Empty,
    /// Impassable obstacle.
    Wall,
    /// Delivery point for carried resources.
    Goal,
    /// A collectable resource.
    Resource,
    /// Harmful terrain; standing here drains energy.
    Hazard,
}

impl CellType {
    /// Whether an agent may not stand on this cell.
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Wall)
    }

    /// Wall or hazard: cells an escaping agent must not step into.
    pub const fn is_unsafe(self) -> bool {
        matches!(self, Self::Wall | Self::Hazard)
    }

    /// Lowercase label used in logs and reason strings.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Wall => "wall",
            Self::Goal => "goal",
            Self::Resource => "resource",
            Self::Hazard => "hazard",
        }
    }
}

impl core::fmt::Display for CellType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// A single-turn action requested by an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Step to `(x, y - 1)`.
    MoveNorth,
    /// Step to `(x, y + 1)`.
    MoveSouth,
    /// Step to `(x + 1, y)`.
    MoveEast,
    /// Step to `(x - 1, y)`.
    MoveWest,
    /// Pick up the resource on the current cell.
    Pickup,
    /// Drop the carried resource on the current cell.
    Drop,
    /// Do nothing this turn.
    Wait,
    /// Broadcast a message to other agents.
    Communicate,
}

impl Action {
    /// The movement actions in canonical enumeration order.
    ///
    /// Every neighbor scan in the workspace walks this array, so ties between
    /// equally scored moves resolve north, south, east, west.
    pub const MOVES: [Self; 4] = [Self::MoveNorth, Self::MoveSouth, Self::MoveEast, Self::MoveWest];

    /// The `(dx, dy)` offset of a movement action, or `None` for the rest.
    pub const fn offset(self) -> Option<(i32, i32)> {
        match self {
            Self::MoveNorth => Some((0, -1)),
            Self::MoveSouth => Some((0, 1)),
            Self::MoveEast => Some((1, 0)),
            Self::MoveWest => Some((-1, 0)),
            Self::Pickup | Self::Drop | Self::Wait | Self::Communicate => None,
        }
    }

    /// Whether this is one of the four directional moves.
    pub const fn is_move(self) -> bool {
        self.offset().is_some()
    }

    /// Lowercase label used in logs and summaries.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MoveNorth => "move_north",
            Self::MoveSouth => "move_south",
            Self::MoveEast => "move_east",
            Self::MoveWest => "move_west",
            Self::Pickup => "pickup",
            Self::Drop => "drop",
            Self::Wait => "wait",
            Self::Communicate => "communicate",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
