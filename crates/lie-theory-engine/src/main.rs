//! Headless engine for the Lie Theory theory.
//!
//! Plays the host's role without a UI: loads the balance and simulation
//! settings, drives the theory with a purchase strategy until a stop
//! condition is met, and writes the final [`TheorySnapshot`] for the host's
//! save system.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `lie-theory-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create and initialise the theory
//! 4. Build the purchase strategy
//! 5. Run the simulation loop
//! 6. Log the result and write the snapshot
//!
//! [`TheorySnapshot`]: lie_theory_types::TheorySnapshot

mod error;

use std::path::Path;

use lie_theory_core::config::TheoryConfig;
use lie_theory_core::runner::{self, NoOpCallback};
use lie_theory_core::strategy;
use lie_theory_core::theory::{LieTheory, Theory};
use lie_theory_types::TheorySnapshot;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Default location of the configuration file.
const CONFIG_PATH: &str = "lie-theory-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration, the simulation, or snapshot output
/// fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration. Logging is not up yet, so the fallback is
    //    reported right after the subscriber starts.
    let config_file_found = Path::new(CONFIG_PATH).exists();
    let config = load_config(Path::new(CONFIG_PATH))?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("lie-theory-engine starting");
    if !config_file_found {
        info!("Config file not found, using defaults");
    }
    info!(
        tick_seconds = %config.simulation.tick_seconds,
        speed_multiplier = %config.simulation.speed_multiplier,
        max_ticks = config.simulation.max_ticks,
        strategy = ?config.simulation.strategy,
        "Configuration loaded"
    );

    // 3. Create the theory.
    let mut theory = LieTheory::new(config.theory.clone());
    info!(
        id = theory.id(),
        name = theory.name(),
        version = theory.version(),
        run_id = %theory.run_id(),
        "Theory created"
    );

    // 4. Build the purchase strategy.
    let mut strategy = strategy::from_config(&config.simulation);

    // 5. Run the simulation loop.
    let result =
        runner::run_simulation(&mut theory, strategy.as_mut(), &config, &mut NoOpCallback).await?;

    // 6. Log the result and write the snapshot.
    runner::log_simulation_end(&result);
    if let Some(path) = &config.output.snapshot_path {
        write_snapshot(path, &theory.snapshot())?;
        info!(path = %path.display(), "Snapshot written");
    }

    Ok(())
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist.
fn load_config(path: &Path) -> Result<TheoryConfig, EngineError> {
    if path.exists() {
        Ok(TheoryConfig::from_file(path)?)
    } else {
        let mut config = TheoryConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}

/// Serialize `snapshot` as pretty JSON to `path`, creating parent
/// directories as needed.
fn write_snapshot(path: &Path, snapshot: &TheorySnapshot) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    let io_error = |source| EngineError::Output {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, json).map_err(io_error)
}
