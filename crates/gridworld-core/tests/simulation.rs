//! End-to-end runs of the turn loop on small layouts.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::path::PathBuf;

use gridworld_agents::AgentConfig;
use gridworld_core::{EndReason, Simulation, SimulationConfig};
use gridworld_types::{Action, Position};
use gridworld_world::{AgentSpawn, GridLayout, StepOutcome};

fn single_agent(layout: GridLayout, energy: Option<u32>) -> GridLayout {
    GridLayout {
        agents: vec![AgentSpawn {
            id: String::from("A1"),
            position: Position::new(0, 0),
            energy,
        }],
        ..layout
    }
}

#[test]
fn collects_and_delivers_adjacent_resource() {
    let layout = single_agent(
        GridLayout {
            resources: vec![Position::new(1, 0)],
            goals: vec![Position::new(2, 0)],
            ..GridLayout::empty(5, 5)
        },
        None,
    );
    let mut sim = Simulation::from_layout(&layout, &AgentConfig::default(), Some(42)).unwrap();

    let actions: Vec<Action> = (0..4)
        .map(|_| sim.step().unwrap().actions[0].action)
        .collect();
    assert_eq!(
        actions,
        vec![Action::MoveEast, Action::Pickup, Action::MoveEast, Action::Drop]
    );

    let result = sim.run(4).unwrap();
    assert_eq!(result.end_reason, EndReason::MaxStepsReached);
    assert_eq!(result.total_steps, 4);

    let report = &result.agents[0];
    assert_eq!(report.summary.resources_collected, 1);
    assert_eq!(report.summary.goals_reached, 1);
    assert_eq!(report.summary.energy_remaining, 94);
    assert!(!report.summary.carrying_resource);
    assert_eq!(report.decisions["informed_resource_acquisition"], 1);
    assert_eq!(report.decisions["opportunistic_collection"], 1);
    assert_eq!(report.decisions["strategic_goal_completion"], 2);
    assert_eq!(report.decisions["emergency_response"], 0);
    assert!(report.model.unwrap().known_goals >= 1);
    assert!(report.metrics.exploration_coverage > 0.0);
}

#[test]
fn run_stops_when_energy_runs_out() {
    let layout = single_agent(GridLayout::empty(3, 3), Some(3));
    let mut sim = Simulation::from_layout(&layout, &AgentConfig::default(), Some(9)).unwrap();

    let result = sim.run(100).unwrap();
    assert_eq!(result.end_reason, EndReason::AllAgentsInactive);
    assert_eq!(result.total_steps, 3);

    let report = &result.agents[0];
    assert_eq!(report.summary.energy_remaining, 0);
    assert_eq!(report.summary.collisions, 0);
    assert_eq!(report.decisions["intelligent_exploration"], 3);
    assert!((report.metrics.energy_utilization - 100.0).abs() < 1e-9);
}

#[test]
fn agent_leaves_hazard_toward_goal() {
    let layout = single_agent(
        GridLayout {
            hazards: vec![Position::new(0, 0)],
            goals: vec![Position::new(0, 1)],
            walls: vec![Position::new(1, 0)],
            ..GridLayout::empty(4, 4)
        },
        None,
    );
    let mut sim = Simulation::from_layout(&layout, &AgentConfig::default(), Some(1)).unwrap();

    let turn = sim.step().unwrap();
    let taken = &turn.actions[0];
    assert_eq!(taken.action, Action::MoveSouth);
    assert!(taken.reason.starts_with("Emergency Response"));
    assert_eq!(
        taken.outcome,
        StepOutcome::Moved {
            from: Position::new(0, 0),
            to: Position::new(0, 1)
        }
    );
    // Hazard penalty 4 plus the move.
    assert_eq!(sim.agents()[0].core().energy(), 95);
}

#[test]
fn sample_config_runs_to_completion() {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..");
    let mut config = SimulationConfig::parse("simulation:\n  max_steps: 30\n  seed: 42\n").unwrap();
    config.simulation.layout = root.join("data/simple_collection.json");

    let mut sim = Simulation::from_config(&config).unwrap();
    let result = sim.run(config.simulation.max_steps).unwrap();

    assert!(result.total_steps <= 30);
    assert_eq!(result.agents.len(), 2);
    for report in &result.agents {
        assert!(report.summary.actions_taken <= 30);
        assert!(report.summary.goals_reached <= report.summary.resources_collected);
        assert_eq!(report.decisions.values().sum::<u32>(), report.summary.actions_taken);
    }

    let json = serde_json::to_value(&result).unwrap();
    assert!(json["agents"][0]["metrics"]["efficiency_score"].is_number());
}
