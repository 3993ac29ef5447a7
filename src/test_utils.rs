//! Shared test utilities.
//!
//! This module provides helpers for setting up in-memory databases, scratch
//! directories for the runner and sample results with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    api::AppState,
    core::{
        energy::{DataSource, EnergyByType, FallbackReason, SimulationResults},
        simulation::RunnerConfig,
    },
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all database tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Scratch `idf/` and `output/` directories that live as long as the value.
pub struct TestDirs {
    root: TempDir,
}

impl TestDirs {
    /// Directories without a default input file.
    pub fn empty() -> Self {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("idf")).unwrap();
        std::fs::create_dir_all(root.path().join("output")).unwrap();
        Self { root }
    }

    /// Directories with a minimal `idf/default.idf`.
    pub fn with_default_idf() -> Self {
        let dirs = Self::empty();
        std::fs::write(dirs.idf_dir().join("default.idf"), "Version,\n  24.1;\n").unwrap();
        dirs
    }

    /// Root of the scratch tree.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Where the default input file lives.
    pub fn idf_dir(&self) -> PathBuf {
        self.root.path().join("idf")
    }

    /// Parent of the per-run output directories.
    pub fn output_dir(&self) -> PathBuf {
        self.root.path().join("output")
    }
}

/// Runner configuration over `dirs` with no executable lookups, so every run
/// falls back to mock data.
pub fn test_runner_config(dirs: &TestDirs) -> RunnerConfig {
    RunnerConfig {
        idf_dir: dirs.idf_dir(),
        output_dir: dirs.output_dir(),
        default_idf: "default.idf".to_string(),
        timeout: Duration::from_secs(30),
        locators: Vec::new(),
    }
}

/// Application state over an in-memory database and `dirs`.
pub async fn setup_test_state(dirs: &TestDirs) -> Result<AppState> {
    let db = setup_test_db().await?;
    Ok(AppState::new(db, Arc::new(test_runner_config(dirs))))
}

/// Fixed results for persistence tests.
///
/// # Defaults
/// * `energy_by_type`: 20000 / 15000 / 9000 / 6000 / 4000
/// * `idf_file`: `"default.idf"`
pub fn sample_results(simulation_id: &str, used_mock_data: bool) -> SimulationResults {
    let energy = EnergyByType {
        cooling: 20_000.0,
        heating: 15_000.0,
        lighting: 9_000.0,
        equipment: 6_000.0,
        ventilation: 4_000.0,
    };
    let source = if used_mock_data {
        DataSource::MockFallback {
            reason: FallbackReason::ExecutableNotFound,
        }
    } else {
        DataSource::Simulator {
            executable: PathBuf::from("/usr/local/EnergyPlusV24-1-0/energyplus"),
        }
    };
    SimulationResults::new(
        simulation_id.to_string(),
        "default.idf".to_string(),
        energy,
        None,
        source,
    )
}

/// Writes an executable `/bin/sh` script standing in for the simulator.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
