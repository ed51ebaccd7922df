//! Read-only agent snapshots and derived performance summaries.
//!
//! None of these structs is primary state. [`AgentState`] is projected from
//! the agent on demand, and [`PerformanceMetrics`] / [`StatisticsSummary`]
//! are computed from the agent's running counters when requested.

use serde::{Deserialize, Serialize};

use crate::enums::Action;
use crate::position::Position;

// ---------------------------------------------------------------------------
// AgentState
// ---------------------------------------------------------------------------

/// Externally observable state of one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentState {
    /// Identifier from the layout (e.g. `"A1"`).
    pub agent_id: String,
    /// Current cell.
    pub position: Position,
    /// Remaining energy.
    pub energy: u32,
    /// Whether a resource is being carried.
    pub carrying_resource: bool,
    /// The most recently executed action.
    pub last_action: Option<Action>,
}

impl AgentState {
    /// Whether the agent still has energy to act.
    pub const fn is_active(&self) -> bool {
        self.energy > 0
    }
}

impl core::fmt::Display for AgentState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Agent {} at {} (Energy: {}, Carrying: {})",
            self.agent_id, self.position, self.energy, self.carrying_resource
        )
    }
}

// ---------------------------------------------------------------------------
// PerformanceMetrics
// ---------------------------------------------------------------------------

/// Derived performance summary for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Goals reached per action taken.
    pub success_rate: f64,
    /// Weighted composite score on a 0--100 scale.
    pub efficiency_score: f64,
    /// Actions taken per goal reached.
    pub task_completion_time: f64,
    /// Percentage of the starting energy spent on actions.
    pub energy_utilization: f64,
    /// Collisions per simulation step.
    pub collision_frequency: f64,
    /// Fraction of the grid the agent has seen.
    pub exploration_coverage: f64,
}

impl core::fmt::Display for PerformanceMetrics {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Performance Metrics:")?;
        writeln!(f, "  Success Rate: {:.2}", self.success_rate)?;
        writeln!(f, "  Efficiency Score: {:.2}", self.efficiency_score)?;
        writeln!(f, "  Completion Time: {:.1}", self.task_completion_time)?;
        writeln!(f, "  Energy Utilization: {:.1}%", self.energy_utilization)?;
        writeln!(f, "  Collision Frequency: {:.3}", self.collision_frequency)?;
        write!(f, "  Exploration Coverage: {:.2}", self.exploration_coverage)
    }
}

// ---------------------------------------------------------------------------
// StatisticsSummary
// ---------------------------------------------------------------------------

/// Raw counters of one agent, for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    /// Identifier of the agent.
    pub agent_id: String,
    /// Actions executed since the last statistics reset.
    pub actions_taken: u32,
    /// Successful pickups.
    pub resources_collected: u32,
    /// Deliveries at a goal.
    pub goals_reached: u32,
    /// Energy left.
    pub energy_remaining: u32,
    /// Energy spent on action costs.
    pub energy_consumed: u32,
    /// Collisions recorded by the environment.
    pub collisions: u32,
    /// Whether a resource is being carried.
    pub carrying_resource: bool,
    /// The most recently executed action.
    pub last_action: Option<Action>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(energy: u32) -> AgentState {
        AgentState {
            agent_id: String::from("A1"),
            position: Position::new(2, 3),
            energy,
            carrying_resource: true,
            last_action: Some(Action::Pickup),
        }
    }

    #[test]
    fn active_iff_energy_positive() {
        assert!(state(1).is_active());
        assert!(!state(0).is_active());
    }

    #[test]
    fn state_display() {
        assert_eq!(
            state(40).to_string(),
            "Agent A1 at (2, 3) (Energy: 40, Carrying: true)"
        );
    }
}
