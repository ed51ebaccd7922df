//! The grid environment.
//!
//! [`GridWorld`] owns the ground truth: cell classifications, where every
//! registered agent stands, per-agent mailboxes and the cells each agent has
//! had in view. Agents never touch it directly. They receive a
//! [`Perception`] through [`PerceptionSource`] and hand their chosen action
//! back to [`GridWorld::apply_action`].
//!
//! Only non-empty cells are stored; anything inside the bounds and absent
//! from the map is empty.

use std::collections::{BTreeMap, BTreeSet};

use gridworld_agents::Agent;
use gridworld_types::{
    Action, AgentState, CellType, PERCEPTION_RANGE, Perception, PerceptionSource, Position,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::WorldError;
use crate::layout::{AgentSpawn, GridLayout};

/// Messages kept per mailbox; the oldest is dropped first.
pub const MAILBOX_CAPACITY: usize = 32;

/// What happened when the grid applied an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The agent moved.
    Moved {
        /// Cell left.
        from: Position,
        /// Cell entered.
        to: Position,
    },
    /// The move hit the edge, a wall or another agent. A collision was
    /// recorded and the agent stayed put.
    Collision {
        /// The cell the agent tried to enter.
        target: Position,
    },
    /// A resource was lifted and its cell became empty.
    PickedUp {
        /// Where.
        at: Position,
    },
    /// A carried resource was delivered to a goal.
    Delivered {
        /// The goal cell.
        at: Position,
    },
    /// Pickup or drop was not possible here; nothing changed.
    Refused,
    /// A position report was queued for the other agents.
    Broadcast {
        /// Number of mailboxes the message went to.
        recipients: usize,
    },
    /// The agent waited.
    Waited,
}

/// Ground truth for one simulation run.
#[derive(Debug, Clone)]
pub struct GridWorld {
    width: i32,
    height: i32,
    cells: BTreeMap<Position, CellType>,
    spawns: Vec<AgentSpawn>,
    agents: BTreeMap<String, Position>,
    mailboxes: BTreeMap<String, Vec<String>>,
    explored: BTreeMap<String, BTreeSet<Position>>,
    steps: u32,
}

impl GridWorld {
    /// Build a grid from a layout.
    ///
    /// The layout's agents are validated (inside the grid, not on a wall,
    /// unique ids) and kept as spawn points; they are placed on the grid only
    /// when registered with [`register_agent`](Self::register_agent).
    pub fn from_layout(layout: &GridLayout) -> Result<Self, WorldError> {
        let (width, height) = layout.grid_size;
        if width <= 0 || height <= 0 {
            return Err(WorldError::InvalidDimensions { width, height });
        }

        let mut world = Self {
            width,
            height,
            cells: BTreeMap::new(),
            spawns: Vec::new(),
            agents: BTreeMap::new(),
            mailboxes: BTreeMap::new(),
            explored: BTreeMap::new(),
            steps: 0,
        };

        for (position, kind) in layout.cells() {
            if !world.in_bounds(position) {
                return Err(WorldError::OutOfBounds {
                    entity: kind.to_string(),
                    position,
                });
            }
            if world.cells.insert(position, kind).is_some() {
                return Err(WorldError::DuplicateCell { position });
            }
        }

        let mut ids = BTreeSet::new();
        for spawn in &layout.agents {
            if !ids.insert(spawn.id.as_str()) {
                return Err(WorldError::DuplicateAgent(spawn.id.clone()));
            }
            world.check_placement(&spawn.id, spawn.position)?;
        }
        world.spawns.clone_from(&layout.agents);

        debug!(
            width,
            height,
            cells = world.cells.len(),
            agents = world.spawns.len(),
            "grid built from layout"
        );
        Ok(world)
    }

    /// Place an agent on the grid and give it a mailbox.
    ///
    /// The starting window counts as explored.
    pub fn register_agent(&mut self, agent_id: &str, position: Position) -> Result<(), WorldError> {
        if self.agents.contains_key(agent_id) {
            return Err(WorldError::DuplicateAgent(agent_id.to_owned()));
        }
        self.check_placement(agent_id, position)?;
        if let Some(occupant) = self.occupant(position) {
            return Err(WorldError::CellOccupied {
                agent: agent_id.to_owned(),
                position,
                occupant: occupant.to_owned(),
            });
        }

        self.agents.insert(agent_id.to_owned(), position);
        self.mailboxes.insert(agent_id.to_owned(), Vec::new());
        self.record_exploration(agent_id, position);
        Ok(())
    }

    fn check_placement(&self, agent_id: &str, position: Position) -> Result<(), WorldError> {
        if !self.in_bounds(position) {
            return Err(WorldError::OutOfBounds {
                entity: agent_id.to_owned(),
                position,
            });
        }
        if self.cell(position) == Some(CellType::Wall) {
            return Err(WorldError::AgentOnWall {
                agent: agent_id.to_owned(),
                position,
            });
        }
        Ok(())
    }

    /// Grid width.
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Grid height.
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Whether `pos` lies on the grid.
    pub const fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Classification of `pos`, or `None` off the grid.
    pub fn cell(&self, pos: Position) -> Option<CellType> {
        self.in_bounds(pos)
            .then(|| self.cells.get(&pos).copied().unwrap_or(CellType::Empty))
    }

    /// How many cells currently hold `kind`. Not meaningful for `Empty`.
    pub fn count(&self, kind: CellType) -> usize {
        self.cells.values().filter(|&&cell| cell == kind).count()
    }

    /// The layout's agents, in file order.
    pub fn agent_spawns(&self) -> &[AgentSpawn] {
        &self.spawns
    }

    /// Where a registered agent stands.
    pub fn agent_position(&self, agent_id: &str) -> Option<Position> {
        self.agents.get(agent_id).copied()
    }

    /// Messages waiting for an agent.
    pub fn pending_messages(&self, agent_id: &str) -> &[String] {
        self.mailboxes
            .get(agent_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Actions applied so far, across all agents.
    pub const fn step_count(&self) -> u32 {
        self.steps
    }

    /// Number of cells on the grid.
    pub const fn total_cells(&self) -> u32 {
        self.width
            .unsigned_abs()
            .saturating_mul(self.height.unsigned_abs())
    }

    /// Number of distinct cells that have been inside an agent's window.
    pub fn explored_cells(&self, agent_id: &str) -> u32 {
        self.explored
            .get(agent_id)
            .map_or(0, |seen| u32::try_from(seen.len()).unwrap_or(u32::MAX))
    }

    /// Every on-grid cell within Chebyshev distance [`PERCEPTION_RANGE`] of
    /// `center`, with its classification.
    pub fn window(&self, center: Position) -> BTreeMap<Position, CellType> {
        let mut visible = BTreeMap::new();
        for dy in -PERCEPTION_RANGE..=PERCEPTION_RANGE {
            for dx in -PERCEPTION_RANGE..=PERCEPTION_RANGE {
                let pos = center.translated(dx, dy);
                if let Some(cell) = self.cell(pos) {
                    visible.insert(pos, cell);
                }
            }
        }
        visible
    }

    fn occupant(&self, pos: Position) -> Option<&str> {
        self.agents
            .iter()
            .find(|&(_, &at)| at == pos)
            .map(|(id, _)| id.as_str())
    }

    fn record_exploration(&mut self, agent_id: &str, center: Position) {
        let window: Vec<Position> = self.window(center).into_keys().collect();
        self.explored
            .entry(agent_id.to_owned())
            .or_default()
            .extend(window);
    }

    /// Resolve `action` for `agent` against the grid, then let the agent
    /// execute it (paying its energy cost).
    ///
    /// Blocked moves record a collision on the agent. Pickup succeeds only
    /// on a resource while empty-handed, drop only on a goal while
    /// carrying; otherwise the action is refused but still executed. The
    /// acting agent's mailbox is emptied afterwards, or dropped for good
    /// once the agent runs out of energy.
    pub fn apply_action(
        &mut self,
        agent: &mut dyn Agent,
        action: Action,
    ) -> Result<StepOutcome, WorldError> {
        let agent_id = agent.agent_id().to_owned();
        let from = self
            .agent_position(&agent_id)
            .ok_or_else(|| WorldError::UnknownAgent(agent_id.clone()))?;

        let outcome = match action {
            Action::MoveNorth | Action::MoveSouth | Action::MoveEast | Action::MoveWest => {
                self.resolve_move(agent, &agent_id, from, action)
            }
            Action::Pickup => {
                if self.cell(from) == Some(CellType::Resource) && agent.pickup_resource() {
                    self.cells.remove(&from);
                    StepOutcome::PickedUp { at: from }
                } else {
                    warn!(agent_id = %agent_id, position = %from, "pickup refused");
                    StepOutcome::Refused
                }
            }
            Action::Drop => {
                if self.cell(from) == Some(CellType::Goal) && agent.drop_resource() {
                    agent.reach_goal();
                    StepOutcome::Delivered { at: from }
                } else {
                    warn!(agent_id = %agent_id, position = %from, "drop refused");
                    StepOutcome::Refused
                }
            }
            Action::Communicate => {
                let message = format!("{agent_id} at {from}");
                let mut recipients = 0_usize;
                for (other, inbox) in &mut self.mailboxes {
                    if *other != agent_id {
                        if inbox.len() >= MAILBOX_CAPACITY {
                            inbox.remove(0);
                        }
                        inbox.push(message.clone());
                        recipients = recipients.saturating_add(1);
                    }
                }
                StepOutcome::Broadcast { recipients }
            }
            Action::Wait => StepOutcome::Waited,
        };

        let still_active = agent.execute(action);
        self.steps = self.steps.saturating_add(1);
        if still_active {
            if let Some(inbox) = self.mailboxes.get_mut(&agent_id) {
                inbox.clear();
            }
        } else {
            // Exhausted agents never perceive again.
            self.mailboxes.remove(&agent_id);
        }
        let now = self.agent_position(&agent_id).unwrap_or(from);
        self.record_exploration(&agent_id, now);

        debug!(
            agent_id = %agent_id,
            action = action.as_str(),
            outcome = ?outcome,
            "action applied"
        );
        Ok(outcome)
    }

    fn resolve_move(
        &mut self,
        agent: &mut dyn Agent,
        agent_id: &str,
        from: Position,
        action: Action,
    ) -> StepOutcome {
        let Some((dx, dy)) = action.offset() else {
            return StepOutcome::Waited;
        };
        let target = from.translated(dx, dy);

        let blocked_by = match self.cell(target) {
            None => Some("edge"),
            Some(CellType::Wall) => Some("wall"),
            Some(_) => self.occupant(target).map(|_| "agent"),
        };
        if let Some(obstacle) = blocked_by {
            agent.record_collision();
            warn!(agent_id = %agent_id, target = %target, obstacle, "move blocked");
            return StepOutcome::Collision { target };
        }

        self.agents.insert(agent_id.to_owned(), target);
        agent.update_position(target);
        StepOutcome::Moved { from, to: target }
    }
}

impl PerceptionSource for GridWorld {
    fn perceive_for(&self, state: &AgentState) -> Perception {
        let visible_cells = self.window(state.position);
        let visible_agents = self
            .agents
            .iter()
            .filter(|&(id, pos)| *id != state.agent_id && visible_cells.contains_key(pos))
            .map(|(_, &pos)| pos)
            .collect();

        Perception {
            current_position: state.position,
            visible_cells,
            visible_agents,
            energy_level: state.energy,
            carrying_resource: state.carrying_resource,
            messages: self.pending_messages(&state.agent_id).to_vec(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gridworld_agents::{AgentConfig, ModelBasedReflexAgent};

    use super::*;

    fn layout() -> GridLayout {
        GridLayout {
            walls: vec![Position::new(2, 0)],
            goals: vec![Position::new(4, 4)],
            resources: vec![Position::new(1, 0)],
            hazards: vec![Position::new(0, 2)],
            agents: vec![
                AgentSpawn {
                    id: String::from("A1"),
                    position: Position::new(0, 0),
                    energy: None,
                },
                AgentSpawn {
                    id: String::from("A2"),
                    position: Position::new(0, 1),
                    energy: Some(30),
                },
            ],
            ..GridLayout::empty(5, 5)
        }
    }

    fn agent(id: &str, at: Position) -> ModelBasedReflexAgent {
        ModelBasedReflexAgent::new(id, at, &AgentConfig::default().with_seed(7))
    }

    fn world_with(agents: &[(&str, Position)]) -> GridWorld {
        let mut world = GridWorld::from_layout(&layout()).unwrap();
        for &(id, at) in agents {
            world.register_agent(id, at).unwrap();
        }
        world
    }

    #[test]
    fn layout_validation() {
        let bad = GridLayout::empty(0, 3);
        assert!(matches!(
            GridWorld::from_layout(&bad),
            Err(WorldError::InvalidDimensions { .. })
        ));

        let mut off_grid = layout();
        off_grid.goals.push(Position::new(5, 0));
        assert!(matches!(
            GridWorld::from_layout(&off_grid),
            Err(WorldError::OutOfBounds { .. })
        ));

        let mut twice = layout();
        twice.hazards.push(Position::new(2, 0));
        assert!(matches!(
            GridWorld::from_layout(&twice),
            Err(WorldError::DuplicateCell { .. })
        ));

        let mut on_wall = layout();
        on_wall.agents.push(AgentSpawn {
            id: String::from("A3"),
            position: Position::new(2, 0),
            energy: None,
        });
        assert!(matches!(
            GridWorld::from_layout(&on_wall),
            Err(WorldError::AgentOnWall { .. })
        ));

        let mut same_id = layout();
        same_id.agents.push(AgentSpawn {
            id: String::from("A1"),
            position: Position::new(3, 3),
            energy: None,
        });
        assert!(matches!(
            GridWorld::from_layout(&same_id),
            Err(WorldError::DuplicateAgent(_))
        ));
    }

    #[test]
    fn registration_rejects_clashes() {
        let mut world = world_with(&[("A1", Position::new(0, 0))]);
        assert!(matches!(
            world.register_agent("A1", Position::new(3, 3)),
            Err(WorldError::DuplicateAgent(_))
        ));
        assert!(matches!(
            world.register_agent("A2", Position::new(0, 0)),
            Err(WorldError::CellOccupied { .. })
        ));
        assert_eq!(world.agent_spawns().len(), 2);
    }

    #[test]
    fn window_is_clipped_to_grid() {
        let world = world_with(&[]);
        assert_eq!(world.window(Position::new(0, 0)).len(), 9);
        assert_eq!(world.window(Position::new(2, 2)).len(), 25);
        assert_eq!(world.window(Position::new(4, 2)).len(), 15);
        assert_eq!(world.total_cells(), 25);
    }

    #[test]
    fn perception_reports_cells_agents_and_messages() {
        let mut world = world_with(&[("A1", Position::new(0, 0)), ("A2", Position::new(0, 1))]);
        let mut a2 = agent("A2", Position::new(0, 1));
        world.apply_action(&mut a2, Action::Communicate).unwrap();

        let a1 = agent("A1", Position::new(0, 0));
        let p = world.perceive_for(&a1.state());
        assert_eq!(p.cell_at(Position::new(1, 0)), Some(CellType::Resource));
        assert_eq!(p.cell_at(Position::new(2, 0)), Some(CellType::Wall));
        assert_eq!(p.cell_at(Position::new(0, 2)), Some(CellType::Hazard));
        assert_eq!(p.cell_at(Position::new(3, 0)), None);
        assert_eq!(p.visible_agents, vec![Position::new(0, 1)]);
        assert_eq!(p.messages, vec![String::from("A2 at (0, 1)")]);
        assert_eq!(p.energy_level, 100);
    }

    #[test]
    fn moves_and_collisions() {
        let mut world = world_with(&[("A1", Position::new(0, 0)), ("A2", Position::new(0, 1))]);
        let mut a1 = agent("A1", Position::new(0, 0));

        let edge = world.apply_action(&mut a1, Action::MoveNorth).unwrap();
        assert_eq!(edge, StepOutcome::Collision { target: Position::new(0, -1) });

        let bump = world.apply_action(&mut a1, Action::MoveSouth).unwrap();
        assert_eq!(bump, StepOutcome::Collision { target: Position::new(0, 1) });

        let moved = world.apply_action(&mut a1, Action::MoveEast).unwrap();
        assert_eq!(
            moved,
            StepOutcome::Moved {
                from: Position::new(0, 0),
                to: Position::new(1, 0)
            }
        );
        assert_eq!(a1.position(), Position::new(1, 0));
        assert_eq!(world.agent_position("A1"), Some(Position::new(1, 0)));

        let wall = world.apply_action(&mut a1, Action::MoveEast).unwrap();
        assert_eq!(wall, StepOutcome::Collision { target: Position::new(2, 0) });

        let summary = a1.statistics_summary();
        assert_eq!(summary.collisions, 3);
        assert_eq!(summary.actions_taken, 4);
        assert_eq!(summary.energy_remaining, 96);
        assert_eq!(world.step_count(), 4);
    }

    #[test]
    fn pickup_and_delivery() {
        let mut world = world_with(&[("A1", Position::new(1, 0))]);
        let mut a1 = agent("A1", Position::new(1, 0));

        let picked = world.apply_action(&mut a1, Action::Pickup).unwrap();
        assert_eq!(picked, StepOutcome::PickedUp { at: Position::new(1, 0) });
        assert!(a1.core().carrying_resource());
        assert_eq!(world.cell(Position::new(1, 0)), Some(CellType::Empty));
        assert_eq!(world.count(CellType::Resource), 0);

        // Nothing left to pick up; not a goal either.
        assert_eq!(
            world.apply_action(&mut a1, Action::Pickup).unwrap(),
            StepOutcome::Refused
        );
        assert_eq!(
            world.apply_action(&mut a1, Action::Drop).unwrap(),
            StepOutcome::Refused
        );
        assert!(a1.core().carrying_resource());

        let mut world = world_with(&[("A1", Position::new(4, 4))]);
        let mut carrier = agent("A1", Position::new(4, 4));
        carrier.pickup_resource();
        let delivered = world.apply_action(&mut carrier, Action::Drop).unwrap();
        assert_eq!(delivered, StepOutcome::Delivered { at: Position::new(4, 4) });
        let summary = carrier.statistics_summary();
        assert_eq!(summary.goals_reached, 1);
        assert!(!summary.carrying_resource);
        assert_eq!(summary.energy_remaining, 98);
    }

    #[test]
    fn unknown_agent_is_an_error() {
        let mut world = world_with(&[]);
        let mut stranger = agent("ZZ", Position::new(3, 3));
        assert!(matches!(
            world.apply_action(&mut stranger, Action::Wait),
            Err(WorldError::UnknownAgent(_))
        ));
        assert_eq!(world.step_count(), 0);
    }

    #[test]
    fn exploration_grows_with_movement() {
        let mut world = world_with(&[("A1", Position::new(4, 4))]);
        assert_eq!(world.explored_cells("A1"), 9);

        let mut a1 = agent("A1", Position::new(4, 4));
        world.apply_action(&mut a1, Action::MoveWest).unwrap();
        assert_eq!(world.explored_cells("A1"), 12);
        world.apply_action(&mut a1, Action::MoveEast).unwrap();
        assert_eq!(world.explored_cells("A1"), 12);
        assert_eq!(world.explored_cells("nobody"), 0);
    }

    #[test]
    fn mailbox_cleared_after_acting() {
        let mut world = world_with(&[("A1", Position::new(0, 0)), ("A2", Position::new(4, 0))]);
        let mut a1 = agent("A1", Position::new(0, 0));
        let mut a2 = agent("A2", Position::new(4, 0));

        let sent = world.apply_action(&mut a1, Action::Communicate).unwrap();
        assert_eq!(sent, StepOutcome::Broadcast { recipients: 1 });
        assert_eq!(world.pending_messages("A2").len(), 1);
        assert!(world.pending_messages("A1").is_empty());

        world.apply_action(&mut a2, Action::Wait).unwrap();
        assert!(world.pending_messages("A2").is_empty());
    }

    #[test]
    fn exhausted_agents_stop_receiving_messages() {
        let mut world = world_with(&[("A1", Position::new(0, 0)), ("A2", Position::new(4, 0))]);
        let mut a1 = agent("A1", Position::new(0, 0));
        let mut tired = ModelBasedReflexAgent::new(
            "A2",
            Position::new(4, 0),
            &AgentConfig::default().with_starting_energy(1).with_seed(7),
        );

        world.apply_action(&mut tired, Action::MoveSouth).unwrap();
        assert!(!tired.is_active());

        let sent = world.apply_action(&mut a1, Action::Communicate).unwrap();
        assert_eq!(sent, StepOutcome::Broadcast { recipients: 0 });
        assert!(world.pending_messages("A2").is_empty());
    }

    #[test]
    fn mailbox_keeps_only_newest_messages() {
        let mut world = world_with(&[("A1", Position::new(0, 0)), ("A2", Position::new(4, 0))]);
        let mut a1 = agent("A1", Position::new(0, 0));
        for _ in 0..40 {
            world.apply_action(&mut a1, Action::Communicate).unwrap();
        }
        assert_eq!(world.pending_messages("A2").len(), MAILBOX_CAPACITY);
    }
}
