use std::env;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};
use tokio::fs;

const DEFAULT_CONFIG_PATH: &str = ".docker-here";
const DEFAULT_RUNTIME: &str = "docker";

pub const CONFIG_ENV: &str = "DOCKER_HERE_CONFIG";
pub const RUNTIME_ENV: &str = "DOCKER_HERE_RUNTIME";

#[derive(serde::Deserialize, Default, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub engine: Option<EngineConfig>,
}

#[derive(serde::Deserialize, Default, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Runtime binary, e.g. "podman".
    pub runtime: Option<String>,
    pub sudo: Option<bool>,
    // Put in front of the options forwarded from the command line, so those
    // still win for runtimes where the last option counts.
    pub args: Option<Vec<String>>,
}

/// Runtime settings after defaults and environment overrides are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub runtime: String,
    pub sudo: bool,
    pub extra_args: Vec<String>,
}

impl Config {
    pub fn runtime_options(&self, runtime_override: Option<String>) -> RuntimeOptions {
        let engine = self.engine.clone().unwrap_or_default();
        RuntimeOptions {
            runtime: runtime_override
                .filter(|r| !r.is_empty())
                .or(engine.runtime)
                .unwrap_or_else(|| DEFAULT_RUNTIME.to_string()),
            sudo: engine.sudo.unwrap_or(false),
            extra_args: engine.args.unwrap_or_default(),
        }
    }
}

fn config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    let home_dir = env::var("HOME").unwrap_or_else(|_| String::from("/"));
    Path::new(&home_dir).join(DEFAULT_CONFIG_PATH)
}

pub async fn load() -> Config {
    load_from(&config_path()).await
}

pub async fn load_from(config_path: &Path) -> Config {
    let config_literal = match fs::read_to_string(config_path).await {
        Ok(config) => config,
        Err(err) if err.kind() == ErrorKind::NotFound => return Config::default(),
        Err(err) => {
            warn!("ignoring unreadable config {}: {}", config_path.display(), err);
            return Config::default();
        }
    };
    info!("using config {}", config_path.display());

    match toml::from_str(&config_literal) {
        Ok(config) => config,
        Err(err) => {
            warn!("ignoring invalid config {}: {}", config_path.display(), err);
            Config::default()
        }
    }
}
