//! Engine binary for the Gridworld simulation.
//!
//! Loads configuration, builds the grid and its agents from the configured
//! layout, runs the turn loop and prints the final [`SimulationResult`] as
//! JSON on stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! gridworld-engine [CONFIG_PATH]
//! ```
//!
//! `CONFIG_PATH` defaults to `gridworld-config.yaml`; when that file is
//! missing, built-in defaults are used.
//!
//! # Startup Sequence
//!
//! 1. Load configuration
//! 2. Initialize structured logging (tracing)
//! 3. Load the layout and create the agents
//! 4. Run the simulation loop
//! 5. Log and print the result
//!
//! [`SimulationResult`]: gridworld_core::SimulationResult

mod error;

use std::path::{Path, PathBuf};

use gridworld_core::config::LoggingConfig;
use gridworld_core::{Simulation, SimulationConfig, log_simulation_end};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Config file read when no path is given on the command line.
const DEFAULT_CONFIG_PATH: &str = "gridworld-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, layout loading, the run or the
/// result serialization fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, from_file) = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!("gridworld-engine starting");
    info!(
        path = %config_path.display(),
        from_file,
        layout = %config.simulation.layout.display(),
        max_steps = config.simulation.max_steps,
        seed = ?config.simulation.seed,
        "Configuration loaded"
    );

    // 3. Build the grid and agents.
    let mut simulation = Simulation::from_config(&config).map_err(EngineError::from)?;
    info!(
        agents = simulation.agents().len(),
        total_cells = simulation.world().total_cells(),
        "Simulation initialized"
    );

    // 4. Run.
    let result = simulation
        .run(config.simulation.max_steps)
        .map_err(EngineError::from)?;

    // 5. Report.
    log_simulation_end(&result);
    let json = serde_json::to_string_pretty(&result).map_err(EngineError::from)?;
    println!("{json}");

    Ok(())
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over `logging.level`; `logging.json` switches to JSON
/// lines.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist. The flag reports whether the file was read.
fn load_config(path: &Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        let config = SimulationConfig::from_file(path)?;
        Ok((config, true))
    } else {
        let mut config = SimulationConfig::default();
        config.simulation.apply_env_overrides();
        Ok((config, false))
    }
}
