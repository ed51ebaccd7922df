//! Serializable grid layouts.
//!
//! A layout is the JSON document a scenario is described in:
//!
//! ```json
//! {
//!   "grid_size": [5, 5],
//!   "walls": [[2, 1]],
//!   "goals": [[4, 4]],
//!   "resources": [[1, 3]],
//!   "hazards": [[3, 2]],
//!   "agents": [{ "id": "A1", "position": [0, 0], "energy": 100 }]
//! }
//! ```
//!
//! Every cell not listed is empty. Entity lists may be omitted.

use gridworld_types::{CellType, Position};
use serde::{Deserialize, Serialize};

/// Initial placement of one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpawn {
    /// Agent identifier.
    pub id: String,
    /// Starting cell.
    pub position: Position,
    /// Starting energy; `None` falls back to the configured default.
    #[serde(default)]
    pub energy: Option<u32>,
}

/// A complete scenario description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    /// `[width, height]`.
    pub grid_size: (i32, i32),
    /// Impassable cells.
    #[serde(default)]
    pub walls: Vec<Position>,
    /// Delivery points.
    #[serde(default)]
    pub goals: Vec<Position>,
    /// Collectable resources.
    #[serde(default)]
    pub resources: Vec<Position>,
    /// Harmful cells.
    #[serde(default)]
    pub hazards: Vec<Position>,
    /// Agents placed at the start of a run.
    #[serde(default)]
    pub agents: Vec<AgentSpawn>,
}

impl GridLayout {
    /// An empty `width` x `height` layout with no entities.
    pub const fn empty(width: i32, height: i32) -> Self {
        Self {
            grid_size: (width, height),
            walls: Vec::new(),
            goals: Vec::new(),
            resources: Vec::new(),
            hazards: Vec::new(),
            agents: Vec::new(),
        }
    }

    /// Every listed non-empty cell paired with its classification.
    pub fn cells(&self) -> impl Iterator<Item = (Position, CellType)> + '_ {
        [
            (CellType::Wall, &self.walls),
            (CellType::Goal, &self.goals),
            (CellType::Resource, &self.resources),
            (CellType::Hazard, &self.hazards),
        ]
        .into_iter()
        .flat_map(|(kind, list)| list.iter().map(move |&pos| (pos, kind)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_layout() {
        let json = r#"{
            "grid_size": [5, 4],
            "walls": [[2, 1]],
            "goals": [[4, 3]],
            "resources": [[1, 3], [0, 2]],
            "hazards": [[3, 2]],
            "agents": [{"id": "A1", "position": [0, 0], "energy": 80}]
        }"#;
        let layout: GridLayout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.grid_size, (5, 4));
        assert_eq!(layout.resources.len(), 2);
        assert_eq!(layout.agents[0].position, Position::new(0, 0));
        assert_eq!(layout.agents[0].energy, Some(80));

        let cells: Vec<_> = layout.cells().collect();
        assert_eq!(cells.len(), 5);
        assert!(cells.contains(&(Position::new(2, 1), CellType::Wall)));
        assert!(cells.contains(&(Position::new(3, 2), CellType::Hazard)));
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let json = r#"{"grid_size": [3, 3], "agents": [{"id": "B", "position": [1, 1]}]}"#;
        let layout: GridLayout = serde_json::from_str(json).unwrap();
        assert!(layout.walls.is_empty());
        assert!(layout.hazards.is_empty());
        assert_eq!(layout.agents[0].energy, None);
    }
}
