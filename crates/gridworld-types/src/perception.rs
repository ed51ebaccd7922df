//! Perception payload delivered to agents each turn.
//!
//! The perception is the **only** information an agent receives about the
//! world. Cells outside the sensor window are simply absent from
//! [`Perception::visible_cells`]; whatever an agent knows beyond that it has
//! to remember itself.

use std::collections::BTreeMap;

use crate::enums::{Action, CellType};
use crate::position::Position;
use crate::structs::AgentState;

/// Snapshot of the world as seen by one agent for one decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Perception {
    /// Where the agent currently stands.
    pub current_position: Position,
    /// Every cell inside the sensor window and its classification.
    pub visible_cells: BTreeMap<Position, CellType>,
    /// Positions of the other agents inside the sensor window.
    pub visible_agents: Vec<Position>,
    /// The agent's energy at the time of observation.
    pub energy_level: u32,
    /// Whether the agent is carrying a resource.
    pub carrying_resource: bool,
    /// Messages waiting for the agent.
    pub messages: Vec<String>,
}

impl Perception {
    /// Classification of the cell the agent stands on, if visible.
    pub fn current_cell(&self) -> Option<CellType> {
        self.cell_at(self.current_position)
    }

    /// Classification of `pos`, or `None` when it is outside the window.
    pub fn cell_at(&self, pos: Position) -> Option<CellType> {
        self.visible_cells.get(&pos).copied()
    }

    /// All visible positions holding `kind`, in position order.
    pub fn cells_of_type(&self, kind: CellType) -> Vec<Position> {
        self.visible_cells
            .iter()
            .filter(|&(_, &cell)| cell == kind)
            .map(|(&pos, _)| pos)
            .collect()
    }

    /// Each movement action paired with the neighbor it leads to, in
    /// north, south, east, west order.
    pub const fn adjacent_moves(&self) -> [(Action, Position); 4] {
        let [north, south, east, west] = self.current_position.neighbors();
        let [mn, ms, me, mw] = Action::MOVES;
        [(mn, north), (ms, south), (me, east), (mw, west)]
    }

    /// Whether another visible agent stands on `pos`.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.visible_agents.contains(&pos)
    }

    /// The visible position of `kind` closest to the agent, not counting the
    /// cell it stands on.
    ///
    /// Distance ties resolve to the smallest position.
    pub fn nearest_of_type(&self, kind: CellType) -> Option<Position> {
        let origin = self.current_position;
        self.cells_of_type(kind)
            .into_iter()
            .filter(|&pos| pos != origin)
            .min_by_key(|&pos| (origin.distance_to(pos), pos))
    }
}

/// Anything that can produce a [`Perception`] for an agent.
///
/// This is the opaque environment handle an agent receives in `perceive`.
/// The agent hands over its own public state and gets back the window of
/// the world it can currently see.
pub trait PerceptionSource {
    /// Build the perception for the agent described by `state`.
    fn perceive_for(&self, state: &AgentState) -> Perception;
}
