//! Run history - persisting simulation results and querying past runs.
//!
//! Runs are insert-only. Listing is always newest-first, with the id as a
//! tie-breaker for rows created within the same timestamp.

use crate::{
    core::energy::SimulationResults,
    entities::{SimulationRun, simulation_run},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, QuerySelect, Set, prelude::*};
use std::num::IntErrorKind;
use tracing::{debug, instrument};

/// Number of rows returned when no valid limit is given.
pub const DEFAULT_HISTORY_LIMIT: u64 = 20;

/// Largest accepted history limit.
pub const MAX_HISTORY_LIMIT: u64 = 100;

/// Filters for listing past runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Maximum number of rows, already clamped
    pub limit: u64,
    /// Only runs with this mock flag
    pub used_mock_data: Option<bool>,
    /// Substring matched against id, message and input file
    pub search: Option<String>,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
            used_mock_data: None,
            search: None,
        }
    }
}

/// Turns a raw `limit` parameter into a usable row count.
///
/// Missing or non-numeric input gives [`DEFAULT_HISTORY_LIMIT`]; any integer,
/// including one too large for `i64`, is clamped to `1..=MAX_HISTORY_LIMIT`.
#[must_use]
pub fn clamp_history_limit(raw: Option<&str>) -> u64 {
    let Some(value) = raw else {
        return DEFAULT_HISTORY_LIMIT;
    };
    match value.trim().parse::<i64>() {
        Ok(limit) => u64::try_from(limit).map_or(1, |l| l.clamp(1, MAX_HISTORY_LIMIT)),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => MAX_HISTORY_LIMIT,
            IntErrorKind::NegOverflow => 1,
            _ => DEFAULT_HISTORY_LIMIT,
        },
    }
}

/// Persists the outcome of a run.
///
/// The message is stored verbatim. Fails with a database error if the
/// `simulation_id` already exists.
#[instrument(skip(db, message, results), fields(simulation_id = %results.simulation_id))]
pub async fn record_run(
    db: &DatabaseConnection,
    message: &str,
    results: &SimulationResults,
) -> Result<simulation_run::Model> {
    let run = simulation_run::ActiveModel {
        simulation_id: Set(results.simulation_id.clone()),
        message: Set(message.to_string()),
        idf_file: Set(results.idf_file.clone()),
        used_mock_data: Set(results.used_mock_data),
        total_energy: Set(results.total_energy),
        energy_by_type: Set(serde_json::to_value(results.energy_by_type)?),
        energy_breakdown: Set(serde_json::to_value(&results.energy_breakdown)?),
        additional_info: Set(results.additional_info.clone()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = run.insert(db).await?;
    debug!(id = model.id, "simulation run recorded");
    Ok(model)
}

/// Lists recent runs, newest first.
pub async fn recent_runs(
    db: &DatabaseConnection,
    query: &HistoryQuery,
) -> Result<Vec<simulation_run::Model>> {
    let mut condition = Condition::all();
    if let Some(used_mock_data) = query.used_mock_data {
        condition = condition.add(simulation_run::Column::UsedMockData.eq(used_mock_data));
    }
    if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        condition = condition.add(
            Condition::any()
                .add(simulation_run::Column::SimulationId.contains(term))
                .add(simulation_run::Column::Message.contains(term))
                .add(simulation_run::Column::IdfFile.contains(term)),
        );
    }

    SimulationRun::find()
        .filter(condition)
        .order_by_desc(simulation_run::Column::CreatedAt)
        .order_by_desc(simulation_run::Column::Id)
        .limit(query.limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a run by its external id, returning None if it does not exist.
pub async fn find_run(
    db: &DatabaseConnection,
    simulation_id: &str,
) -> Result<Option<simulation_run::Model>> {
    SimulationRun::find()
        .filter(simulation_run::Column::SimulationId.eq(simulation_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`find_run`], but a missing run is an error.
pub async fn get_run(db: &DatabaseConnection, simulation_id: &str) -> Result<simulation_run::Model> {
    find_run(db, simulation_id)
        .await?
        .ok_or_else(|| Error::RunNotFound {
            simulation_id: simulation_id.to_string(),
        })
}
