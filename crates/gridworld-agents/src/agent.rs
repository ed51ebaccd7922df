//! Agent lifecycle contract.
//!
//! Every agent archetype presents the same shape to the environment: the
//! [`Agent`] trait. Archetypes supply only perception and decision; all
//! policy-independent bookkeeping (position, energy, carrying flag, counters,
//! action history) lives in [`AgentCore`], which the trait's provided methods
//! delegate to.
//!
//! Energy is owned by [`AgentCore`] and only its methods change it:
//! [`AgentCore::execute`] debits action costs and
//! [`AgentCore::apply_hazard_penalty`] models harm from standing on a hazard.

use std::collections::{BTreeMap, VecDeque};

use gridworld_types::{
    Action, AgentState, Perception, PerceptionSource, PerformanceMetrics, Position,
    StatisticsSummary,
};

use crate::config::AgentConfig;
use crate::costs::energy_cost;
use crate::world_model::ModelStatistics;

// ---------------------------------------------------------------------------
// Efficiency score weights
// ---------------------------------------------------------------------------

/// Weight of the resource-collection rate in the efficiency score.
const RESOURCE_WEIGHT: f64 = 0.3;

/// Weight of the goal rate in the efficiency score.
const GOAL_WEIGHT: f64 = 0.3;

/// Weight of the remaining-energy term in the efficiency score.
const ENERGY_WEIGHT: f64 = 0.2;

/// Weight of the collision term in the efficiency score.
const COLLISION_WEIGHT: f64 = 0.2;

/// Collision term lost per recorded collision.
const COLLISION_PENALTY: f64 = 0.1;

/// An action chosen by a policy together with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// The action to execute this turn.
    pub action: Action,
    /// Why the policy chose it.
    pub reason: String,
}

impl Decision {
    /// Build a decision from an action and a reason.
    pub fn new(action: Action, reason: impl Into<String>) -> Self {
        Self {
            action,
            reason: reason.into(),
        }
    }
}

/// Policy-independent state shared by every agent archetype.
#[derive(Debug, Clone)]
pub struct AgentCore {
    agent_id: String,
    position: Position,
    energy: u32,
    starting_energy: u32,
    carrying_resource: bool,
    last_action: Option<Action>,

    actions_taken: u32,
    resources_collected: u32,
    goals_reached: u32,
    energy_consumed: u32,
    collisions: u32,

    action_history: VecDeque<Action>,
    history_capacity: usize,
}

impl AgentCore {
    /// Create the core for a new agent at `position`.
    ///
    /// Energy starts at `config.starting_energy`; every counter starts at 0.
    pub fn new(agent_id: impl Into<String>, position: Position, config: &AgentConfig) -> Self {
        Self {
            agent_id: agent_id.into(),
            position,
            energy: config.starting_energy,
            starting_energy: config.starting_energy,
            carrying_resource: false,
            last_action: None,
            actions_taken: 0,
            resources_collected: 0,
            goals_reached: 0,
            energy_consumed: 0,
            collisions: 0,
            action_history: VecDeque::with_capacity(config.history_capacity),
            history_capacity: config.history_capacity,
        }
    }

    /// The agent's identifier.
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Current cell.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Remaining energy.
    pub const fn energy(&self) -> u32 {
        self.energy
    }

    /// Energy the agent was constructed with.
    pub const fn starting_energy(&self) -> u32 {
        self.starting_energy
    }

    /// Whether a resource is being carried.
    pub const fn carrying_resource(&self) -> bool {
        self.carrying_resource
    }

    /// Actions executed since the last statistics reset.
    pub const fn actions_taken(&self) -> u32 {
        self.actions_taken
    }

    /// Most recent actions, oldest first.
    pub const fn action_history(&self) -> &VecDeque<Action> {
        &self.action_history
    }

    /// Execute `action`: count it, remember it, and pay its energy cost.
    ///
    /// Energy is clamped at 0. Returns whether the agent still has energy.
    pub fn execute(&mut self, action: Action) -> bool {
        self.actions_taken = self.actions_taken.saturating_add(1);
        self.last_action = Some(action);

        if self.history_capacity > 0 {
            if self.action_history.len() >= self.history_capacity {
                self.action_history.pop_front();
            }
            self.action_history.push_back(action);
        }

        let cost = energy_cost(action);
        let paid = cost.min(self.energy);
        self.energy = self.energy.saturating_sub(cost);
        self.energy_consumed = self.energy_consumed.saturating_add(paid);

        self.energy > 0
    }

    /// Lose up to `penalty` energy for standing on a hazard.
    ///
    /// Energy never drops below 1 this way, and an agent already at 0 or 1
    /// is left unchanged.
    pub fn apply_hazard_penalty(&mut self, penalty: u32) {
        if self.energy > 1 {
            self.energy = self.energy.saturating_sub(penalty).max(1);
        }
    }

    /// Overwrite the position. Callers validate the move.
    pub const fn update_position(&mut self, new_position: Position) {
        self.position = new_position;
    }

    /// Start carrying a resource. Returns `false` if already carrying.
    pub const fn pickup_resource(&mut self) -> bool {
        if self.carrying_resource {
            return false;
        }
        self.carrying_resource = true;
        self.resources_collected = self.resources_collected.saturating_add(1);
        true
    }

    /// Stop carrying a resource. Returns `false` if nothing was carried.
    pub const fn drop_resource(&mut self) -> bool {
        if !self.carrying_resource {
            return false;
        }
        self.carrying_resource = false;
        true
    }

    /// Count a goal completion. Reaching a goal always delivers whatever was
    /// carried; returns whether a resource was delivered.
    pub const fn reach_goal(&mut self) -> bool {
        self.goals_reached = self.goals_reached.saturating_add(1);
        let delivered = self.carrying_resource;
        self.carrying_resource = false;
        delivered
    }

    /// Count a collision reported by the environment.
    pub const fn record_collision(&mut self) {
        self.collisions = self.collisions.saturating_add(1);
    }

    /// Project the externally observable state.
    pub fn state(&self) -> AgentState {
        AgentState {
            agent_id: self.agent_id.clone(),
            position: self.position,
            energy: self.energy,
            carrying_resource: self.carrying_resource,
            last_action: self.last_action,
        }
    }

    /// Whether the agent still has energy to act.
    pub const fn is_active(&self) -> bool {
        self.energy > 0
    }

    /// Compute performance metrics from the running counters.
    ///
    /// `total_steps` is the number of simulation steps so far;
    /// `explored_cells` / `total_cells` give exploration coverage.
    pub fn performance_metrics(
        &self,
        total_steps: u32,
        explored_cells: u32,
        total_cells: u32,
    ) -> PerformanceMetrics {
        let exploration_coverage = if total_cells == 0 {
            0.0
        } else {
            ratio(explored_cells, total_cells)
        };

        PerformanceMetrics {
            success_rate: ratio(self.goals_reached, self.actions_taken),
            efficiency_score: self.efficiency_score(),
            task_completion_time: ratio(self.actions_taken, self.goals_reached),
            energy_utilization: ratio(self.energy_consumed, self.starting_energy) * 100.0,
            collision_frequency: ratio(self.collisions, total_steps),
            exploration_coverage,
        }
    }

    /// Weighted blend of collection rate, goal rate, remaining energy and
    /// collision avoidance, each in `[0, 1]`, scaled to `[0, 100]`.
    fn efficiency_score(&self) -> f64 {
        let resource_rate = ratio(self.resources_collected, self.actions_taken).clamp(0.0, 1.0);
        let goal_rate = ratio(self.goals_reached, self.actions_taken).clamp(0.0, 1.0);
        let energy_term = (1.0 - ratio(self.energy_consumed, self.starting_energy)).clamp(0.0, 1.0);
        let collision_term =
            COLLISION_PENALTY.mul_add(-f64::from(self.collisions), 1.0).clamp(0.0, 1.0);

        let blended = RESOURCE_WEIGHT.mul_add(
            resource_rate,
            GOAL_WEIGHT.mul_add(
                goal_rate,
                ENERGY_WEIGHT.mul_add(energy_term, COLLISION_WEIGHT * collision_term),
            ),
        );
        blended * 100.0
    }

    /// Zero every counter and clear the action history.
    ///
    /// Position, energy, carrying flag and last action are kept.
    pub fn reset_statistics(&mut self) {
        self.actions_taken = 0;
        self.resources_collected = 0;
        self.goals_reached = 0;
        self.energy_consumed = 0;
        self.collisions = 0;
        self.action_history.clear();
    }

    /// Snapshot of the raw counters.
    pub fn statistics_summary(&self) -> StatisticsSummary {
        StatisticsSummary {
            agent_id: self.agent_id.clone(),
            actions_taken: self.actions_taken,
            resources_collected: self.resources_collected,
            goals_reached: self.goals_reached,
            energy_remaining: self.energy,
            energy_consumed: self.energy_consumed,
            collisions: self.collisions,
            carrying_resource: self.carrying_resource,
            last_action: self.last_action,
        }
    }
}

/// `num / max(1, den)` as a float.
fn ratio(num: u32, den: u32) -> f64 {
    f64::from(num) / f64::from(den.max(1))
}

/// The contract every agent archetype presents to the environment.
///
/// Implementors provide [`perceive`](Agent::perceive) and
/// [`decide`](Agent::decide) plus access to their [`AgentCore`]; everything
/// else has a default that delegates to the core.
pub trait Agent {
    /// Shared lifecycle state.
    fn core(&self) -> &AgentCore;

    /// Shared lifecycle state, mutably.
    fn core_mut(&mut self) -> &mut AgentCore;

    /// Request a fresh perception from `environment`.
    fn perceive(&mut self, environment: &dyn PerceptionSource) -> Perception;

    /// Choose this turn's action.
    fn decide(&mut self, perception: &Perception) -> Decision;

    /// Execute an action after the environment has applied it.
    fn execute(&mut self, action: Action) -> bool {
        self.core_mut().execute(action)
    }

    /// The agent's identifier.
    fn agent_id(&self) -> &str {
        self.core().agent_id()
    }

    /// Current cell.
    fn position(&self) -> Position {
        self.core().position()
    }

    /// Overwrite the position.
    fn update_position(&mut self, new_position: Position) {
        self.core_mut().update_position(new_position);
    }

    /// Start carrying a resource.
    fn pickup_resource(&mut self) -> bool {
        self.core_mut().pickup_resource()
    }

    /// Stop carrying a resource.
    fn drop_resource(&mut self) -> bool {
        self.core_mut().drop_resource()
    }

    /// Count a goal completion.
    fn reach_goal(&mut self) -> bool {
        self.core_mut().reach_goal()
    }

    /// Count a collision.
    fn record_collision(&mut self) {
        self.core_mut().record_collision();
    }

    /// Project the externally observable state.
    fn state(&self) -> AgentState {
        self.core().state()
    }

    /// Whether the agent still has energy to act.
    fn is_active(&self) -> bool {
        self.core().is_active()
    }

    /// Compute performance metrics.
    fn performance_metrics(
        &self,
        total_steps: u32,
        explored_cells: u32,
        total_cells: u32,
    ) -> PerformanceMetrics {
        self.core()
            .performance_metrics(total_steps, explored_cells, total_cells)
    }

    /// Zero counters and clear history.
    fn reset_statistics(&mut self) {
        self.core_mut().reset_statistics();
    }

    /// Snapshot of the raw counters.
    fn statistics_summary(&self) -> StatisticsSummary {
        self.core().statistics_summary()
    }

    /// Sizes of the internal world model, for archetypes that keep one.
    fn model_statistics(&self) -> Option<ModelStatistics> {
        None
    }

    /// How often each decision rule fired, keyed by rule name.
    fn decision_statistics(&self) -> BTreeMap<&'static str, u32> {
        BTreeMap::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core_with_energy(energy: u32) -> AgentCore {
        let config = AgentConfig::default().with_starting_energy(energy);
        AgentCore::new("A1", Position::new(0, 0), &config)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn new_core_starts_clean() {
        let core = core_with_energy(100);
        assert_eq!(core.agent_id(), "A1");
        assert_eq!(core.energy(), 100);
        assert!(!core.carrying_resource());
        assert_eq!(core.actions_taken(), 0);
        assert!(core.action_history().is_empty());
        assert!(core.state().last_action.is_none());
    }

    #[test]
    fn execute_debits_action_cost() {
        let mut core = core_with_energy(20);
        assert!(core.execute(Action::MoveEast));
        assert_eq!(core.energy(), 19);
        assert!(core.execute(Action::Pickup));
        assert_eq!(core.energy(), 17);
        assert!(core.execute(Action::Wait));
        assert_eq!(core.energy(), 17);
        assert!(core.execute(Action::Communicate));
        assert_eq!(core.energy(), 16);
        assert_eq!(core.actions_taken(), 4);
        assert_eq!(core.state().last_action, Some(Action::Communicate));
    }

    #[test]
    fn execute_clamps_at_zero_and_reports_inactive() {
        let mut core = core_with_energy(1);
        assert!(!core.execute(Action::Drop));
        assert_eq!(core.energy(), 0);
        assert!(!core.is_active());
        assert_eq!(core.statistics_summary().energy_consumed, 1);

        // Further calls are allowed; energy stays at the floor.
        assert!(!core.execute(Action::MoveNorth));
        assert_eq!(core.energy(), 0);
    }

    #[test]
    fn energy_after_execute_is_saturating_difference() {
        for start in 0..5_u32 {
            for action in [Action::MoveSouth, Action::Pickup, Action::Wait] {
                let mut core = core_with_energy(start);
                let active = core.execute(action);
                assert_eq!(core.energy(), start.saturating_sub(energy_cost(action)));
                assert_eq!(active, core.energy() > 0);
            }
        }
    }

    #[test]
    fn history_is_bounded() {
        let config = AgentConfig {
            history_capacity: 3,
            ..AgentConfig::default()
        };
        let mut core = AgentCore::new("A1", Position::new(0, 0), &config);
        for action in [
            Action::MoveNorth,
            Action::MoveSouth,
            Action::MoveEast,
            Action::MoveWest,
        ] {
            core.execute(action);
        }
        let history: Vec<Action> = core.action_history().iter().copied().collect();
        assert_eq!(history, vec![Action::MoveSouth, Action::MoveEast, Action::MoveWest]);
    }

    #[test]
    fn pickup_and_drop_are_soft_refusals() {
        let mut core = core_with_energy(10);
        assert!(!core.drop_resource());
        assert!(core.pickup_resource());
        assert!(!core.pickup_resource());
        assert_eq!(core.statistics_summary().resources_collected, 1);
        assert!(core.drop_resource());
        assert!(!core.carrying_resource());
    }

    #[test]
    fn reach_goal_clears_carrying() {
        let mut core = core_with_energy(10);
        core.pickup_resource();
        assert!(core.reach_goal());
        assert!(!core.carrying_resource());
        assert!(!core.reach_goal());
        assert_eq!(core.statistics_summary().goals_reached, 2);
    }

    #[test]
    fn hazard_penalty_never_below_one() {
        let mut core = core_with_energy(10);
        core.apply_hazard_penalty(4);
        assert_eq!(core.energy(), 6);

        let mut low = core_with_energy(3);
        low.apply_hazard_penalty(4);
        assert_eq!(low.energy(), 1);
        low.apply_hazard_penalty(4);
        assert_eq!(low.energy(), 1);

        let mut empty = core_with_energy(0);
        empty.apply_hazard_penalty(4);
        assert_eq!(empty.energy(), 0);
    }

    #[test]
    fn metrics_from_counters() {
        let mut core = core_with_energy(100);
        core.pickup_resource();
        core.execute(Action::Pickup);
        core.execute(Action::MoveEast);
        core.drop_resource();
        core.reach_goal();
        core.execute(Action::Drop);
        core.record_collision();

        let m = core.performance_metrics(10, 25, 100);
        assert!(close(m.success_rate, 1.0 / 3.0));
        assert!(close(m.task_completion_time, 3.0));
        assert!(close(m.energy_utilization, 5.0));
        assert!(close(m.collision_frequency, 0.1));
        assert!(close(m.exploration_coverage, 0.25));
        // 100 * (0.3/3 + 0.3/3 + 0.2*0.95 + 0.2*0.9)
        assert!(close(m.efficiency_score, 57.0));
    }

    #[test]
    fn metrics_guard_zero_denominators() {
        let core = core_with_energy(100);
        let m = core.performance_metrics(0, 0, 0);
        assert!(close(m.success_rate, 0.0));
        assert!(close(m.task_completion_time, 0.0));
        assert!(close(m.exploration_coverage, 0.0));
        // Fresh agent: full energy and collision terms only.
        assert!(close(m.efficiency_score, 40.0));
    }

    #[test]
    fn collision_term_floors_at_zero() {
        let mut core = core_with_energy(100);
        for _ in 0..15 {
            core.record_collision();
        }
        let m = core.performance_metrics(1, 0, 1);
        assert!(close(m.efficiency_score, 20.0));
    }

    #[test]
    fn reset_statistics_keeps_state() {
        let mut core = core_with_energy(50);
        core.pickup_resource();
        core.execute(Action::Pickup);
        core.record_collision();
        core.update_position(Position::new(3, 4));
        core.reset_statistics();

        let summary = core.statistics_summary();
        assert_eq!(summary.actions_taken, 0);
        assert_eq!(summary.resources_collected, 0);
        assert_eq!(summary.collisions, 0);
        assert_eq!(summary.energy_consumed, 0);
        assert!(core.action_history().is_empty());
        assert_eq!(core.energy(), 48);
        assert!(core.carrying_resource());
        assert_eq!(core.position(), Position::new(3, 4));
    }
}
