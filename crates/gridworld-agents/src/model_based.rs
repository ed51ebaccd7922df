//! Model-based reflex agent.
//!
//! Keeps a [`WorldModel`] built from every perception it has received and
//! picks one action per turn by walking a fixed priority list. The first
//! tier that produces an action wins.
//!
//! # Tiers (in priority order)
//!
//! 1. **Emergency response**: standing on a hazard. Pay the hazard penalty
//!    and step onto a safe visible neighbor, preferring one that also makes
//!    progress (a remembered goal, a remembered resource when empty-handed,
//!    or the step the navigation heuristic would take). Wait if boxed in.
//! 2. **Opportunistic collection**: empty-handed on a resource -- pick up.
//! 3. **Strategic goal completion**: carrying -- drop on a goal, otherwise
//!    head for the nearest visible goal, then the nearest remembered one.
//! 4. **Informed resource acquisition**: empty-handed -- head for the
//!    nearest visible resource, then the nearest remembered one.
//! 5. **Intelligent exploration**: a random unvisited safe neighbor, else
//!    any safe neighbor, else wait.
//!
//! Random choices come from a per-agent [`SmallRng`], seeded from
//! [`AgentConfig::rng_seed`] when set.

use std::collections::BTreeMap;

use gridworld_types::{Action, CellType, Perception, PerceptionSource, Position};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::agent::{Agent, AgentCore, Decision};
use crate::config::AgentConfig;
use crate::pathing::select_step;
use crate::world_model::{ModelStatistics, WorldModel};

/// One rule of the decision hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DecisionTier {
    /// Escape from a hazard cell.
    EmergencyResponse,
    /// Pick up a resource underfoot.
    OpportunisticCollection,
    /// Deliver a carried resource.
    StrategicGoalCompletion,
    /// Move toward a resource.
    InformedResourceAcquisition,
    /// Explore the neighborhood.
    IntelligentExploration,
}

impl DecisionTier {
    /// Every tier, highest priority first.
    pub const ALL: [Self; 5] = [
        Self::EmergencyResponse,
        Self::OpportunisticCollection,
        Self::StrategicGoalCompletion,
        Self::InformedResourceAcquisition,
        Self::IntelligentExploration,
    ];

    /// Snake-case key used in statistics and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmergencyResponse => "emergency_response",
            Self::OpportunisticCollection => "opportunistic_collection",
            Self::StrategicGoalCompletion => "strategic_goal_completion",
            Self::InformedResourceAcquisition => "informed_resource_acquisition",
            Self::IntelligentExploration => "intelligent_exploration",
        }
    }

    /// Title used as the prefix of reason strings.
    pub const fn title(self) -> &'static str {
        match self {
            Self::EmergencyResponse => "Emergency Response",
            Self::OpportunisticCollection => "Opportunistic Collection",
            Self::StrategicGoalCompletion => "Strategic Goal Completion",
            Self::InformedResourceAcquisition => "Informed Resource Acquisition",
            Self::IntelligentExploration => "Intelligent Exploration",
        }
    }
}

/// Agent that layers a remembered world model over raw perception.
#[derive(Debug, Clone)]
pub struct ModelBasedReflexAgent {
    core: AgentCore,
    model: WorldModel,
    decision_counts: BTreeMap<DecisionTier, u32>,
    hazard_penalty: u32,
    rng: SmallRng,
}

impl ModelBasedReflexAgent {
    /// Create an agent at `position`. Its model starts with only that cell,
    /// marked visited.
    pub fn new(agent_id: impl Into<String>, position: Position, config: &AgentConfig) -> Self {
        let rng = config.rng_seed.map_or_else(
            || SmallRng::from_rng(&mut rand::rng()),
            SmallRng::seed_from_u64,
        );
        Self {
            core: AgentCore::new(agent_id, position, config),
            model: WorldModel::new(position),
            decision_counts: zeroed_counts(),
            hazard_penalty: config.hazard_penalty,
            rng,
        }
    }

    /// The agent's belief map.
    pub const fn world_model(&self) -> &WorldModel {
        &self.model
    }

    /// Fold `perception` into the belief map.
    pub fn update_world_model(&mut self, perception: &Perception) {
        self.model.update(perception);
    }

    /// Sizes of every belief set.
    pub fn model_stats(&self) -> ModelStatistics {
        self.model.statistics()
    }

    /// Copy of the per-tier firing counts. Every tier is present.
    pub fn decision_counts(&self) -> BTreeMap<DecisionTier, u32> {
        self.decision_counts.clone()
    }

    /// Forget the belief map (keeping the current cell as visited) and zero
    /// the decision counters.
    pub fn reset_model(&mut self) {
        self.model.reset(self.core.position());
        self.decision_counts = zeroed_counts();
    }

    /// Walk the tiers and return the first one that produces an action.
    fn select(&mut self, perception: &Perception) -> (DecisionTier, Action, String) {
        let current = perception.current_cell();

        if current == Some(CellType::Hazard) {
            self.core.apply_hazard_penalty(self.hazard_penalty);
            let (action, detail) = self.emergency_escape(perception);
            return (DecisionTier::EmergencyResponse, action, detail);
        }

        if !perception.carrying_resource && current == Some(CellType::Resource) {
            return (
                DecisionTier::OpportunisticCollection,
                Action::Pickup,
                format!("Picking up resource at {}", perception.current_position),
            );
        }

        if perception.carrying_resource {
            if current == Some(CellType::Goal) {
                return (
                    DecisionTier::StrategicGoalCompletion,
                    Action::Drop,
                    format!("Dropping resource at goal {}", perception.current_position),
                );
            }
            if let Some((action, detail)) = self.navigate(perception, CellType::Goal) {
                return (DecisionTier::StrategicGoalCompletion, action, detail);
            }
        } else if let Some((action, detail)) = self.navigate(perception, CellType::Resource) {
            return (DecisionTier::InformedResourceAcquisition, action, detail);
        }

        let (action, detail) = self.explore(perception);
        (DecisionTier::IntelligentExploration, action, detail)
    }

    /// Head for the nearest visible `kind`, falling back to the nearest
    /// remembered one.
    fn navigate(&self, perception: &Perception, kind: CellType) -> Option<(Action, String)> {
        let origin = perception.current_position;

        if let Some(target) = perception.nearest_of_type(kind)
            && let Some(action) = select_step(&self.model, perception, target)
        {
            return Some((action, format!("Moving toward visible {kind} at {target}")));
        }

        let remembered = self.model.nearest_known(origin, kind)?;
        let action = select_step(&self.model, perception, remembered)?;
        Some((action, format!("Moving toward known {kind} at {remembered}")))
    }

    /// The move the active navigation tier would make right now.
    fn progress_step(&self, perception: &Perception) -> Option<Action> {
        let kind = if perception.carrying_resource {
            CellType::Goal
        } else {
            CellType::Resource
        };
        self.navigate(perception, kind).map(|(action, _)| action)
    }

    /// Choose a way off a hazard cell.
    fn emergency_escape(&mut self, perception: &Perception) -> (Action, String) {
        let progress = self.progress_step(perception);
        let mut safe = Vec::new();
        let mut preferred = Vec::new();

        for (action, pos) in perception.adjacent_moves() {
            let Some(cell) = perception.cell_at(pos) else {
                continue;
            };
            if cell.is_unsafe() || perception.is_occupied(pos) {
                continue;
            }
            safe.push(action);

            let makes_progress = match self.model.belief(pos) {
                Some(CellType::Goal) => true,
                Some(CellType::Resource) => !perception.carrying_resource,
                _ => false,
            };
            if makes_progress || progress == Some(action) {
                preferred.push(action);
            }
        }

        if let Some(&action) = preferred.choose(&mut self.rng) {
            return (action, String::from("Escaping hazard toward goal or resource"));
        }
        if let Some(&action) = safe.choose(&mut self.rng) {
            return (action, String::from("Moving to safe adjacent cell"));
        }
        (Action::Wait, String::from("No safe escape route available"))
    }

    /// Pick a neighbor to explore, preferring cells never stood on.
    fn explore(&mut self, perception: &Perception) -> (Action, String) {
        let mut candidates = Vec::new();
        let mut unvisited = Vec::new();

        for (action, pos) in perception.adjacent_moves() {
            let Some(cell) = perception.cell_at(pos) else {
                continue;
            };
            if cell.is_blocking()
                || perception.is_occupied(pos)
                || self.model.is_known(pos, CellType::Hazard)
            {
                continue;
            }
            candidates.push(action);
            if !self.model.is_visited(pos) {
                unvisited.push(action);
            }
        }

        if let Some(&action) = unvisited.choose(&mut self.rng) {
            return (action, String::from("Exploring unvisited area"));
        }
        if let Some(&action) = candidates.choose(&mut self.rng) {
            return (action, String::from("Exploring safe area"));
        }
        (Action::Wait, String::from("No safe exploration options available"))
    }
}

impl Agent for ModelBasedReflexAgent {
    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AgentCore {
        &mut self.core
    }

    fn perceive(&mut self, environment: &dyn PerceptionSource) -> Perception {
        let mut perception = environment.perceive_for(&self.core.state());
        perception.carrying_resource = self.core.carrying_resource();
        self.update_world_model(&perception);
        perception
    }

    fn decide(&mut self, perception: &Perception) -> Decision {
        let (tier, action, detail) = self.select(perception);

        let count = self.decision_counts.entry(tier).or_insert(0);
        *count = count.saturating_add(1);

        debug!(
            agent_id = self.core.agent_id(),
            position = %perception.current_position,
            tier = tier.as_str(),
            action = action.as_str(),
            "model-based decision"
        );

        Decision::new(action, format!("{}: {detail}", tier.title()))
    }

    fn model_statistics(&self) -> Option<ModelStatistics> {
        Some(self.model_stats())
    }

    fn decision_statistics(&self) -> BTreeMap<&'static str, u32> {
        self.decision_counts
            .iter()
            .map(|(tier, &count)| (tier.as_str(), count))
            .collect()
    }
}

fn zeroed_counts() -> BTreeMap<DecisionTier, u32> {
    DecisionTier::ALL.into_iter().map(|tier| (tier, 0)).collect()
}
