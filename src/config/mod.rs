pub mod run_options;

use run_options::Args;
use serde::Deserialize;
use std::{fs, net::SocketAddr, path::PathBuf};
use tracing::warn;

use crate::error::AppError;

pub const CONFIG_FILE: &str = "./agriplan.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebServer {
    pub address: String,
}

impl Default for WebServer {
    fn default() -> Self {
        Self { address: "0.0.0.0:5000".to_owned() }
    }
}

impl WebServer {
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        self.address
            .parse()
            .map_err(|e| AppError::ConfigError(format!("Invalid web server address '{}': {}", self.address, e)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Planner {
    /// TOML coefficient table; the built-in table is used when absent
    pub coefficients_file: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Schedule {
    /// moisture percentage at which the amended soil needs watering
    pub critical_moisture: u32,
    /// number of upcoming watering dates to list
    pub events: usize,
}

impl Default for Schedule {
    fn default() -> Self {
        Self { critical_moisture: 40, events: 4 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web_server: WebServer,
    pub planner: Planner,
    pub schedule: Schedule,
}

impl Config {
    pub fn load(args: &Args) -> Result<Self, AppError> {
        if let Some(cfg_str) = &args.cfg_str {
            return Self::load_from_str(cfg_str);
        }
        if !args.cfg_file.exists() {
            warn!("Config file '{}' does not exist. Proceeding with defaults.", args.cfg_file.display());
            return Ok(Self::default());
        }
        let config_content = fs::read_to_string(&args.cfg_file)?;
        Self::load_from_str(&config_content)
    }

    pub fn load_from_str(config_str: &str) -> Result<Self, AppError> {
        let config: Config = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        self.web_server.socket_addr()?;
        if self.schedule.critical_moisture >= 100 {
            return Err(AppError::ConfigError(format!(
                "schedule.critical_moisture must be below 100, got {}",
                self.schedule.critical_moisture
            )));
        }
        Ok(())
    }
}
