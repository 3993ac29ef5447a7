/// Database configuration and connection management
pub mod database;

/// Server and simulator settings loaded from config.toml
pub mod settings;

pub use settings::{AppConfig, ServerConfig, SimulationConfig, load_default_config};
