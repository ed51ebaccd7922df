//! Turn loop over a grid and its agents.
//!
//! A [`Simulation`] owns one [`GridWorld`] and the agents registered on it.
//! Each turn every agent that still has energy, in registration order:
//!
//! 1. **Perceive**: asks the grid for its window.
//! 2. **Decide**: runs its policy.
//! 3. **Apply**: the grid resolves the action and the agent pays for it.
//!
//! [`Simulation::run`] repeats turns until the step limit is reached or no
//! agent is active, then reports every agent's counters and metrics.

use std::collections::BTreeMap;

use gridworld_agents::{Agent, AgentConfig, ModelBasedReflexAgent, ModelStatistics};
use gridworld_types::{Action, PerformanceMetrics, StatisticsSummary};
use gridworld_world::{GridLayout, GridWorld, StepOutcome, WorldError};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{ConfigError, SimulationConfig};

/// Errors that can occur while setting up or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The grid rejected a layout, a registration or an action.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// Configuration or layout could not be loaded.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The configured number of turns ran.
    MaxStepsReached,
    /// Every agent ran out of energy (or there were none).
    AllAgentsInactive,
}

/// One agent's part of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentTurn {
    /// Who acted.
    pub agent_id: String,
    /// What it chose.
    pub action: Action,
    /// Why it chose it.
    pub reason: String,
    /// What the grid made of it.
    pub outcome: StepOutcome,
}

/// Summary of one completed turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnSummary {
    /// Turn number, starting at 1.
    pub turn: u32,
    /// Agents with energy left after the turn.
    pub active_agents: usize,
    /// Every action taken this turn, in acting order.
    pub actions: Vec<AgentTurn>,
}

/// Final report for one agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentReport {
    /// Raw counters.
    pub summary: StatisticsSummary,
    /// Derived metrics.
    pub metrics: PerformanceMetrics,
    /// Belief map sizes, for agents that keep one.
    pub model: Option<ModelStatistics>,
    /// How often each decision rule fired.
    pub decisions: BTreeMap<&'static str, u32>,
}

/// Result of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: EndReason,
    /// Total number of turns executed.
    pub total_steps: u32,
    /// One report per agent, in registration order.
    pub agents: Vec<AgentReport>,
}

/// A grid plus the agents acting on it.
pub struct Simulation {
    world: GridWorld,
    agents: Vec<Box<dyn Agent>>,
    turn: u32,
}

impl Simulation {
    /// Register `agents` on `world` at their current positions.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::World`] if an agent id is reused or an agent
    /// cannot stand where it claims to be.
    pub fn new(mut world: GridWorld, agents: Vec<Box<dyn Agent>>) -> Result<Self, RunnerError> {
        for agent in &agents {
            world.register_agent(agent.agent_id(), agent.position())?;
        }
        Ok(Self {
            world,
            agents,
            turn: 0,
        })
    }

    /// Build a grid from `layout` and one model-based agent per spawn.
    ///
    /// A spawn's own energy overrides `agent_config.starting_energy`. With
    /// a `seed`, the agent at index `i` is seeded with `seed + i`.
    pub fn from_layout(
        layout: &GridLayout,
        agent_config: &AgentConfig,
        seed: Option<u64>,
    ) -> Result<Self, RunnerError> {
        let world = GridWorld::from_layout(layout)?;

        let agents = (0_u64..)
            .zip(world.agent_spawns())
            .map(|(index, spawn)| {
                let mut config = spawn.energy.map_or_else(
                    || agent_config.clone(),
                    |energy| agent_config.with_starting_energy(energy),
                );
                if let Some(base) = seed {
                    config = config.with_seed(base.wrapping_add(index));
                }
                Box::new(ModelBasedReflexAgent::new(
                    spawn.id.as_str(),
                    spawn.position,
                    &config,
                )) as Box<dyn Agent>
            })
            .collect();

        Self::new(world, agents)
    }

    /// Load the configured layout and build the simulation from it.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, RunnerError> {
        let layout = config.load_layout()?;
        info!(
            layout = %config.simulation.layout.display(),
            width = layout.grid_size.0,
            height = layout.grid_size.1,
            agents = layout.agents.len(),
            "Layout loaded"
        );
        Self::from_layout(&layout, &config.agents, config.simulation.seed)
    }

    /// The grid.
    pub const fn world(&self) -> &GridWorld {
        &self.world
    }

    /// The agents, in acting order.
    pub fn agents(&self) -> &[Box<dyn Agent>] {
        &self.agents
    }

    /// Turns completed so far.
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Whether any agent can still act.
    pub fn any_active(&self) -> bool {
        self.agents.iter().any(|agent| agent.is_active())
    }

    /// Run one turn.
    ///
    /// Agents without energy are skipped.
    pub fn step(&mut self) -> Result<TurnSummary, RunnerError> {
        self.turn = self.turn.saturating_add(1);
        let mut actions = Vec::with_capacity(self.agents.len());

        for agent in &mut self.agents {
            if !agent.is_active() {
                continue;
            }
            let perception = agent.perceive(&self.world);
            let decision = agent.decide(&perception);
            let outcome = self.world.apply_action(agent.as_mut(), decision.action)?;
            actions.push(AgentTurn {
                agent_id: agent.agent_id().to_owned(),
                action: decision.action,
                reason: decision.reason,
                outcome,
            });
        }

        let active_agents = self.agents.iter().filter(|agent| agent.is_active()).count();
        debug!(
            turn = self.turn,
            actions = actions.len(),
            active_agents,
            "Turn complete"
        );
        Ok(TurnSummary {
            turn: self.turn,
            active_agents,
            actions,
        })
    }

    /// Run turns until `max_steps` have completed or no agent is active.
    ///
    /// Counting continues from previous calls; a simulation that has already
    /// run `max_steps` turns returns immediately.
    pub fn run(&mut self, max_steps: u32) -> Result<SimulationResult, RunnerError> {
        info!(
            agents = self.agents.len(),
            max_steps,
            width = self.world.width(),
            height = self.world.height(),
            "Simulation starting"
        );

        let end_reason = loop {
            if !self.any_active() {
                info!(turn = self.turn, "No active agents left");
                break EndReason::AllAgentsInactive;
            }
            if self.turn >= max_steps {
                info!(turn = self.turn, max_steps, "Step limit reached");
                break EndReason::MaxStepsReached;
            }
            self.step()?;
        };

        Ok(SimulationResult {
            end_reason,
            total_steps: self.turn,
            agents: self.reports(),
        })
    }

    /// Current report for every agent.
    pub fn reports(&self) -> Vec<AgentReport> {
        let total_cells = self.world.total_cells();
        self.agents
            .iter()
            .map(|agent| {
                let explored = self.world.explored_cells(agent.agent_id());
                AgentReport {
                    summary: agent.statistics_summary(),
                    metrics: agent.performance_metrics(self.turn, explored, total_cells),
                    model: agent.model_statistics(),
                    decisions: agent.decision_statistics(),
                }
            })
            .collect()
    }
}

/// Log the outcome of a run, one line overall and one per agent.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_steps = result.total_steps,
        agents = result.agents.len(),
        "Simulation ended"
    );
    for report in &result.agents {
        info!(
            agent_id = %report.summary.agent_id,
            resources_collected = report.summary.resources_collected,
            goals_reached = report.summary.goals_reached,
            energy_remaining = report.summary.energy_remaining,
            collisions = report.summary.collisions,
            efficiency_score = report.metrics.efficiency_score,
            "Agent final statistics"
        );
    }
}
