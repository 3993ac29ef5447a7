//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod simulation_run;

pub use simulation_run::{
    Column as SimulationRunColumn, Entity as SimulationRun, Model as SimulationRunModel,
};
