//! The belief map: what an agent remembers about the grid.
//!
//! One classification per observed cell plus the set of cells the agent has
//! stood on. The six belief sets used by the policy (visited, resources,
//! goals, hazards, walls, empty) are views over these two collections, so a
//! cell can never be believed to be two things at once: every observation
//! overwrites what was believed before. An `empty` observation therefore
//! clears a stale resource, goal or hazard belief at that coordinate.
//!
//! Visited cells only accumulate. Nothing is forgotten except through
//! [`WorldModel::reset`].

use std::collections::{BTreeMap, BTreeSet};

use gridworld_types::{CellType, Perception, Position};
use serde::Serialize;

/// Sizes of the belief sets.
///
/// `total_known_cells` is the plain sum of the six sizes; visited cells are
/// also classified, so it counts them twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ModelStatistics {
    /// Cells the agent has stood on.
    pub visited_positions: usize,
    /// Cells believed to hold a resource.
    pub known_resources: usize,
    /// Cells believed to be goals.
    pub known_goals: usize,
    /// Cells believed to be hazards.
    pub known_hazards: usize,
    /// Cells believed to be walls.
    pub known_walls: usize,
    /// Cells believed to be empty.
    pub known_empty: usize,
    /// Sum of all of the above.
    pub total_known_cells: usize,
}

/// Persistent belief map owned by one agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldModel {
    beliefs: BTreeMap<Position, CellType>,
    visited: BTreeSet<Position>,
}

impl WorldModel {
    /// Create a model that only knows the starting cell was visited.
    pub fn new(start: Position) -> Self {
        let mut model = Self::default();
        model.visited.insert(start);
        model
    }

    /// Fold one perception into the model.
    ///
    /// Every visible cell's classification replaces the previous belief, and
    /// the current position is marked visited whatever it holds.
    pub fn update(&mut self, perception: &Perception) {
        self.visited.insert(perception.current_position);
        for (&pos, &cell) in &perception.visible_cells {
            self.beliefs.insert(pos, cell);
        }
    }

    /// Current belief about `pos`, or `None` if never observed.
    pub fn belief(&self, pos: Position) -> Option<CellType> {
        self.beliefs.get(&pos).copied()
    }

    /// Whether `pos` is believed to hold `kind`.
    pub fn is_known(&self, pos: Position, kind: CellType) -> bool {
        self.belief(pos) == Some(kind)
    }

    /// Whether the agent has stood on `pos`.
    pub fn is_visited(&self, pos: Position) -> bool {
        self.visited.contains(&pos)
    }

    /// Mark `pos` as visited.
    pub fn mark_visited(&mut self, pos: Position) {
        self.visited.insert(pos);
    }

    /// Every position believed to hold `kind`, in position order.
    pub fn known(&self, kind: CellType) -> impl Iterator<Item = Position> + '_ {
        self.beliefs
            .iter()
            .filter(move |&(_, &cell)| cell == kind)
            .map(|(&pos, _)| pos)
    }

    /// The remembered position of `kind` closest to `origin`, excluding
    /// `origin` itself. Distance ties resolve to the smallest position.
    pub fn nearest_known(&self, origin: Position, kind: CellType) -> Option<Position> {
        self.known(kind)
            .filter(|&pos| pos != origin)
            .min_by_key(|&pos| (origin.distance_to(pos), pos))
    }

    /// Number of cells believed to hold `kind`.
    pub fn count(&self, kind: CellType) -> usize {
        self.known(kind).count()
    }

    /// Sizes of every belief set.
    pub fn statistics(&self) -> ModelStatistics {
        let visited_positions = self.visited.len();
        let known_resources = self.count(CellType::Resource);
        let known_goals = self.count(CellType::Goal);
        let known_hazards = self.count(CellType::Hazard);
        let known_walls = self.count(CellType::Wall);
        let known_empty = self.count(CellType::Empty);
        let total_known_cells = [
            visited_positions,
            known_resources,
            known_goals,
            known_hazards,
            known_walls,
            known_empty,
        ]
        .iter()
        .fold(0_usize, |acc, &n| acc.saturating_add(n));

        ModelStatistics {
            visited_positions,
            known_resources,
            known_goals,
            known_hazards,
            known_walls,
            known_empty,
            total_known_cells,
        }
    }

    /// Forget everything; only `current` remains, as visited.
    pub fn reset(&mut self, current: Position) {
        self.beliefs.clear();
        self.visited.clear();
        self.visited.insert(current);
    }
}
