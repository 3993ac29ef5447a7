//! Application settings loaded from a TOML file.
//!
//! Every field has a default, so a missing file or a partial file is valid.
//! The file location comes from `ENERGYSIM_CONFIG` and falls back to
//! `./config.toml`.

use crate::core::executable::LocatorStrategy;
use crate::core::simulation::RunnerConfig;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "ENERGYSIM_CONFIG";

/// Structure of the whole configuration file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Simulator and file layout settings
    pub simulation: SimulationConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Parses `host:port` into a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config {
                message: format!("Invalid listen address {}:{}: {e}", self.host, self.port),
            })
    }
}

/// Simulator discovery, timeout and directory settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Directory holding the default input definition file
    pub idf_dir: PathBuf,
    /// Directory under which each run gets its own output folder
    pub output_dir: PathBuf,
    /// File name of the default input definition inside `idf_dir`
    pub default_idf: String,
    /// Upper bound on a simulator run, in seconds
    pub timeout_secs: u64,
    /// Explicit executable, tried before any other lookup
    pub executable_path: Option<PathBuf>,
    /// Executable names to look for on `PATH` and in install directories
    pub executable_names: Vec<String>,
    /// Environment variable pointing at an installation directory
    pub home_env_var: String,
    /// Well-known installation directories
    pub install_dirs: Vec<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            idf_dir: PathBuf::from("data/idf"),
            output_dir: PathBuf::from("data/output"),
            default_idf: "default.idf".to_string(),
            timeout_secs: 300,
            executable_path: None,
            executable_names: vec![
                "energyplus".to_string(),
                "EnergyPlus".to_string(),
                "energyplus.exe".to_string(),
            ],
            home_env_var: "ENERGYPLUS_HOME".to_string(),
            install_dirs: vec![
                PathBuf::from("C:/EnergyPlusV24-1-0"),
                PathBuf::from("C:/EnergyPlusV24-0-0"),
                PathBuf::from("/usr/local/EnergyPlusV24-1-0"),
            ],
        }
    }
}

impl SimulationConfig {
    /// Builds the ordered list of executable lookups:
    /// explicit path, `PATH`, the home variable, then install directories.
    #[must_use]
    pub fn locator_strategies(&self) -> Vec<LocatorStrategy> {
        let mut strategies = Vec::with_capacity(4);
        if let Some(path) = &self.executable_path {
            strategies.push(LocatorStrategy::Explicit { path: path.clone() });
        }
        strategies.push(LocatorStrategy::SearchPath {
            names: self.executable_names.clone(),
        });
        strategies.push(LocatorStrategy::HomeVar {
            var: self.home_env_var.clone(),
            names: self.executable_names.clone(),
        });
        strategies.push(LocatorStrategy::InstallDirs {
            dirs: self.install_dirs.clone(),
            names: self.executable_names.clone(),
        });
        strategies
    }

    /// Validates the settings and turns them into a runner configuration.
    pub fn runner_config(&self) -> Result<RunnerConfig> {
        if self.timeout_secs == 0 {
            return Err(Error::Config {
                message: "simulation.timeout_secs must be greater than zero".to_string(),
            });
        }
        if self.default_idf.trim().is_empty() {
            return Err(Error::Config {
                message: "simulation.default_idf cannot be empty".to_string(),
            });
        }

        Ok(RunnerConfig {
            idf_dir: self.idf_dir.clone(),
            output_dir: self.output_dir.clone(),
            default_idf: self.default_idf.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            locators: self.locator_strategies(),
        })
    }
}

/// Loads the configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Loading configuration from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> std::result::Result<AppConfig, toml::de::Error> {
    toml::from_str(contents)
}

/// Loads the configuration named by `ENERGYSIM_CONFIG` (default `config.toml`).
///
/// A missing file is not an error; built-in defaults are used instead.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        load_config(&path)
    } else {
        info!("No configuration file at {}, using defaults", path);
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let toml_str = r#"
            [server]
            port = 9000

            [simulation]
            idf_dir = "/srv/idf"
            timeout_secs = 60
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.simulation.idf_dir, PathBuf::from("/srv/idf"));
        assert_eq!(config.simulation.output_dir, PathBuf::from("data/output"));
        assert_eq!(config.simulation.timeout_secs, 60);
        assert_eq!(config.simulation.executable_names.len(), 3);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.simulation.timeout_secs, 300);
        assert_eq!(config.simulation.default_idf, "default.idf");
        assert_eq!(config.simulation.home_env_var, "ENERGYPLUS_HOME");
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let config = parse_config(include_str!("../../config.example.toml")).unwrap();
        let defaults = SimulationConfig::default();
        assert_eq!(config.simulation.idf_dir, defaults.idf_dir);
        assert_eq!(config.simulation.install_dirs, defaults.install_dirs);
        assert_eq!(config.simulation.executable_names, defaults.executable_names);
        assert!(config.simulation.executable_path.is_none());
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(parse_config("[server\nport = ").is_err());
    }

    #[test]
    fn test_locator_order() {
        let config = SimulationConfig {
            executable_path: Some(PathBuf::from("/opt/eplus/energyplus")),
            ..SimulationConfig::default()
        };
        let strategies = config.locator_strategies();
        assert_eq!(strategies.len(), 4);
        assert!(matches!(strategies[0], LocatorStrategy::Explicit { .. }));
        assert!(matches!(strategies[1], LocatorStrategy::SearchPath { .. }));
        assert!(matches!(strategies[2], LocatorStrategy::HomeVar { .. }));
        assert!(matches!(strategies[3], LocatorStrategy::InstallDirs { .. }));

        let without_explicit = SimulationConfig::default().locator_strategies();
        assert_eq!(without_explicit.len(), 3);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = SimulationConfig {
            timeout_secs: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.runner_config(),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_runner_config_timeout() {
        let runner = SimulationConfig::default().runner_config().unwrap();
        assert_eq!(runner.timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_socket_addr() {
        let addr = ServerConfig::default().socket_addr().unwrap();
        assert_eq!(addr.port(), 8000);

        let bad = ServerConfig {
            host: "not a host".to_string(),
            port: 1,
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("/definitely/not/here/config.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
