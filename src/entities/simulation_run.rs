//! Simulation run entity - One row per completed run-simulation request.
//!
//! Rows are written once, right after the runner returns, and never updated.
//! The energy columns hold JSON documents so the stored shape matches what the
//! API returned to the client.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Simulation run database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "simulation_runs")]
pub struct Model {
    /// Surrogate primary key
    #[sea_orm(primary_key)]
    pub id: i64,
    /// External identifier of the run (e.g. `sim_1a2b3c4d`)
    #[sea_orm(unique)]
    pub simulation_id: String,
    /// Free-text message supplied with the request
    #[sea_orm(column_type = "Text")]
    pub message: String,
    /// Input definition file used for the run, empty if unknown
    pub idf_file: String,
    /// Whether synthesized figures replaced a real simulator run
    pub used_mock_data: bool,
    /// Sum of all category values
    pub total_energy: f64,
    /// Category name to consumption mapping
    pub energy_by_type: Json,
    /// Ordered `{name, value, color}` entries for charting
    pub energy_breakdown: Json,
    /// Free-form extra details (floor area, EUI, ...)
    pub additional_info: Option<Json>,
    /// When the run was recorded
    pub created_at: DateTimeUtc,
}

/// `SimulationRun` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
