//! Simulation run, history and detail handlers.

use crate::api::{ApiError, AppState};
use crate::core::energy::SimulationResults;
use crate::core::history::{self, HistoryQuery, clamp_history_limit};
use crate::core::simulation::SimulationRunner;
use crate::entities::simulation_run;
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

const DEFAULT_MESSAGE: &str = "Run simulation";

/// Body of `POST /simulation/run`. Both fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct RunSimulationRequest {
    /// Free-text description of the request
    pub message: Option<String>,
    /// Custom input definition to simulate instead of the default file
    pub idf_content: Option<String>,
}

impl RunSimulationRequest {
    /// Parses a request body; an empty body counts as `{}`.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| ApiError::bad_request(format!("Invalid request body: {e}")))
    }

    fn message(&self) -> &str {
        self.message.as_deref().unwrap_or(DEFAULT_MESSAGE)
    }
}

/// Body returned by `POST /simulation/run`.
#[derive(Debug, Serialize)]
pub struct RunSimulationResponse {
    /// Always `"success"`
    pub status: &'static str,
    /// Id of the new run
    pub simulation_id: String,
    /// Human-readable summary
    pub message: &'static str,
    /// Full results, as written to `results.json`
    pub results: SimulationResults,
}

/// POST /simulation/run
pub async fn run_simulation(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RunSimulationResponse>, ApiError> {
    let request = RunSimulationRequest::from_body(&body)?;
    let message = request.message();

    let runner = SimulationRunner::new(Arc::clone(&state.runner_config));
    let results = runner.run(message, request.idf_content.as_deref()).await?;
    history::record_run(&state.db, message, &results).await?;

    info!(
        simulation_id = %results.simulation_id,
        used_mock_data = results.used_mock_data,
        "simulation completed"
    );

    Ok(Json(RunSimulationResponse {
        status: "success",
        simulation_id: results.simulation_id.clone(),
        message: "Simulation completed successfully",
        results,
    }))
}

/// Body returned by `GET /simulation/history`.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Number of rows in `results`
    pub count: usize,
    /// Runs, newest first
    pub results: Vec<simulation_run::Model>,
}

/// Reads `true/false`, `1/0`, `yes/no`; anything else means no filter.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// GET /simulation/history?limit=N&used_mock_data=B&search=S
///
/// Bad parameters are clamped or ignored, never rejected.
pub async fn simulation_history(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let query = HistoryQuery {
        limit: clamp_history_limit(params.get("limit").map(String::as_str)),
        used_mock_data: params.get("used_mock_data").and_then(|v| parse_flag(v)),
        search: params.get("search").cloned(),
    };

    let results = history::recent_runs(&state.db, &query).await?;
    Ok(Json(HistoryResponse {
        count: results.len(),
        results,
    }))
}

/// Body returned by `GET /simulation/{simulation_id}`.
#[derive(Debug, Serialize)]
pub struct RunDetailResponse {
    /// Always `"success"`
    pub status: &'static str,
    /// The stored run
    pub result: simulation_run::Model,
}

/// GET /simulation/{simulation_id}
pub async fn get_simulation(
    State(state): State<AppState>,
    Path(simulation_id): Path<String>,
) -> Result<Json<RunDetailResponse>, ApiError> {
    let run = history::get_run(&state.db, &simulation_id).await?;
    Ok(Json(RunDetailResponse {
        status: "success",
        result: run,
    }))
}
