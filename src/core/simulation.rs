//! Simulation runner - turns a run request into a [`SimulationResults`].
//!
//! The runner resolves the input definition file, looks for the EnergyPlus
//! executable and runs it under a timeout. Anything that keeps the simulator
//! from delivering figures (no executable, timeout, crash, unreadable output)
//! is absorbed and replaced by mock data, tagged with a [`FallbackReason`].
//! Only a missing input file or an unexpected I/O failure reaches the caller.

use crate::core::energy::{DataSource, FallbackReason, SimulationResults};
use crate::core::executable::{LocatorStrategy, locate_executable};
use crate::core::mock::generate_mock_energy;
use crate::core::output::{ParsedOutput, collect_artifacts, parse_artifacts};
use crate::errors::{Error, Result};
use serde_json::json;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// File name used for caller-supplied input definitions.
pub const CUSTOM_IDF_NAME: &str = "input.idf";

/// File written into each run directory with the final results.
pub const RESULTS_FILE_NAME: &str = "results.json";

/// How long to wait for stderr after a failed exit before logging what was read.
const STDERR_GRACE: Duration = Duration::from_millis(500);

/// Everything a runner needs to know about the host.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Directory holding the default input definition file
    pub idf_dir: PathBuf,
    /// Parent of the per-run output directories
    pub output_dir: PathBuf,
    /// File name of the default input definition
    pub default_idf: String,
    /// Upper bound on a simulator run
    pub timeout: Duration,
    /// Ordered executable lookups
    pub locators: Vec<LocatorStrategy>,
}

/// Generates a run id of the form `sim_1a2b3c4d`.
#[must_use]
pub fn new_simulation_id() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("sim_{}", &hex[..8])
}

fn unexpected(e: impl Display) -> Error {
    Error::Simulation {
        message: e.to_string(),
    }
}

/// Runs one simulation. Cheap to build, meant to be created per request.
#[derive(Debug, Clone)]
pub struct SimulationRunner {
    config: Arc<RunnerConfig>,
}

impl SimulationRunner {
    /// Creates a runner over shared configuration.
    #[must_use]
    pub const fn new(config: Arc<RunnerConfig>) -> Self {
        Self { config }
    }

    /// Runs a simulation and returns its results.
    ///
    /// `idf_content`, when present and not blank, is written to the run
    /// directory and used instead of the default input file.
    ///
    /// # Errors
    /// * [`Error::InputNotFound`] if no content was given and the default file is missing
    /// * [`Error::Simulation`] for any other failure (directory creation, writing results)
    #[instrument(skip(self, message, idf_content), fields(custom_idf = idf_content.is_some()))]
    pub async fn run(&self, message: &str, idf_content: Option<&str>) -> Result<SimulationResults> {
        let simulation_id = new_simulation_id();
        info!(%simulation_id, request = message, "starting simulation");

        let output_path = std::path::absolute(self.config.output_dir.join(&simulation_id))
            .map_err(unexpected)?;
        tokio::fs::create_dir_all(&output_path)
            .await
            .map_err(unexpected)?;

        let idf_file = self.resolve_input(&output_path, idf_content).await?;

        let results = match self.simulate(&idf_file, &output_path).await {
            Ok((executable, parsed)) => {
                info!(%simulation_id, executable = %executable.display(), "using simulator output");
                let info = json!({
                    "source": "EnergyPlus",
                    "output_files": parsed
                        .source_files
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>(),
                });
                SimulationResults::new(
                    simulation_id,
                    idf_file.display().to_string(),
                    parsed.energy_by_type,
                    Some(info),
                    DataSource::Simulator { executable },
                )
            }
            Err(reason) => {
                warn!(%simulation_id, ?reason, "falling back to mock data");
                let (energy, info) = generate_mock_energy();
                SimulationResults::new(
                    simulation_id,
                    idf_file.display().to_string(),
                    energy,
                    Some(info),
                    DataSource::MockFallback { reason },
                )
            }
        };

        let results_path = output_path.join(RESULTS_FILE_NAME);
        let body = serde_json::to_string_pretty(&results).map_err(unexpected)?;
        tokio::fs::write(&results_path, body)
            .await
            .map_err(unexpected)?;
        debug!(path = %results_path.display(), "results written");

        Ok(results)
    }

    async fn resolve_input(&self, output_path: &Path, idf_content: Option<&str>) -> Result<PathBuf> {
        if let Some(content) = idf_content.filter(|c| !c.trim().is_empty()) {
            let path = output_path.join(CUSTOM_IDF_NAME);
            tokio::fs::write(&path, content)
                .await
                .map_err(unexpected)?;
            return Ok(path);
        }

        let default = std::path::absolute(self.config.idf_dir.join(&self.config.default_idf))
            .map_err(unexpected)?;
        match tokio::fs::metadata(&default).await {
            Ok(meta) if meta.is_file() => Ok(default),
            _ => Err(Error::InputNotFound { path: default }),
        }
    }

    /// Attempts a real run. `Err` carries the reason mock data must be used.
    async fn simulate(
        &self,
        idf_file: &Path,
        output_path: &Path,
    ) -> std::result::Result<(PathBuf, ParsedOutput), FallbackReason> {
        let executable =
            locate_executable(&self.config.locators).ok_or(FallbackReason::ExecutableNotFound)?;
        let status = self.invoke(&executable, idf_file, output_path).await?;

        let artifacts = collect_artifacts(output_path).await.unwrap_or_default();
        if !status.success() {
            if artifacts.is_empty() {
                return Err(FallbackReason::ExitedWithoutOutput {
                    exit_code: status.code(),
                });
            }
            warn!(?status, artifacts = artifacts.len(), "simulator failed but left output, parsing anyway");
        }

        parse_artifacts(&artifacts)
            .await
            .map(|parsed| (executable, parsed))
            .ok_or(FallbackReason::NoUsableOutput {
                artifacts: artifacts.len(),
            })
    }

    async fn invoke(
        &self,
        executable: &Path,
        idf_file: &Path,
        output_path: &Path,
    ) -> std::result::Result<ExitStatus, FallbackReason> {
        let workdir = idf_file.parent().unwrap_or_else(|| Path::new("."));

        let mut cmd = Command::new(executable);
        cmd.arg("-d")
            .arg(output_path)
            .arg("--output-directory")
            .arg(output_path)
            .arg(idf_file)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(executable = %executable.display(), idf = %idf_file.display(), "spawning simulator");

        let mut child = cmd.spawn().map_err(|e| FallbackReason::LaunchFailed {
            message: e.to_string(),
        })?;

        // Pipes are drained on their own tasks so a chatty simulator never blocks
        // on a full pipe, and completion is judged by the process exit alone:
        // a backgrounded grandchild holding the pipes open does not delay it.
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let stdout_handle = tokio::spawn(async move {
            if let Some(mut pipe) = stdout_pipe {
                let _ = tokio::io::copy(&mut pipe, &mut tokio::io::sink()).await;
            }
        });
        let stderr_handle = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut pipe) = stderr_pipe {
                let _ = pipe.read_to_end(&mut buf).await;
            }
            buf
        });

        let result = tokio::select! {
            status = child.wait() => status.map_err(|e| FallbackReason::LaunchFailed {
                message: e.to_string(),
            }),
            () = tokio::time::sleep(self.config.timeout) => {
                let _ = child.kill().await;
                Err(FallbackReason::TimedOut {
                    after_secs: self.config.timeout.as_secs(),
                })
            }
        };
        stdout_handle.abort();

        match result {
            Ok(status) if !status.success() => {
                let stderr = tokio::time::timeout(STDERR_GRACE, stderr_handle)
                    .await
                    .ok()
                    .and_then(std::result::Result::ok)
                    .unwrap_or_default();
                debug!(
                    ?status,
                    stderr = %String::from_utf8_lossy(&stderr),
                    "simulator exited with failure"
                );
                Ok(status)
            }
            other => {
                stderr_handle.abort();
                other
            }
        }
    }
}
