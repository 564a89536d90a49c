//! Configuration file management for ahara.
//!
//! Provides a TOML-based config file at `~/.config/ahara/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use ahara_core::oracle::{DEFAULT_MODEL_TYPE, GenerationParams};
use ahara_core::planner::PlannerOptions;

pub const ENV_KNOWLEDGE_BASE: &str = "AHARA_KNOWLEDGE_BASE";
pub const ENV_MODEL_DIR: &str = "AHARA_MODEL_DIR";
pub const ENV_ORACLE_COMMAND: &str = "AHARA_ORACLE_COMMAND";

const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_LOG_LEVEL: &str = "info";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Knowledge-base TOML file; the built-in sample is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base: Option<PathBuf>,
    #[serde(default)]
    pub oracle: OracleSection,
    #[serde(default)]
    pub generation: GenerationSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleSection {
    pub model_type: String,
    /// Generator executable. Without one, plans come from the fallbacks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_dir: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for OracleSection {
    fn default() -> Self {
        Self {
            model_type: DEFAULT_MODEL_TYPE.to_string(),
            command: None,
            args: Vec::new(),
            model_dir: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Sampling overrides applied to both the weekly and daily presets.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_beams: Option<u32>,
    pub use_knowledge_graph: bool,
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            temperature: None,
            top_k: None,
            top_p: None,
            num_beams: None,
            use_knowledge_graph: true,
        }
    }
}

impl GenerationSection {
    fn apply(&self, mut params: GenerationParams) -> GenerationParams {
        if let Some(t) = self.temperature {
            params = params.with_temperature(t);
        }
        if let Some(k) = self.top_k {
            params.top_k = k;
        }
        if let Some(p) = self.top_p {
            params.top_p = p;
        }
        if let Some(b) = self.num_beams {
            params.num_beams = b;
        }
        params
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the ahara config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/ahara` or `~/.config/ahara`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("ahara");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("ahara")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns `Ok(None)` if it does not exist.
pub fn load_config() -> Result<Option<ConfigFile>> {
    let path = config_path();
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(Some(config))
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;
    Ok(path)
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line. They win over everything else.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub knowledge_base: Option<PathBuf>,
    pub model_type: Option<String>,
    pub model_dir: Option<PathBuf>,
    pub oracle_command: Option<String>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone)]
pub struct AharaConfig {
    pub knowledge_base: Option<PathBuf>,
    pub model_type: String,
    pub oracle_command: Option<String>,
    pub oracle_args: Vec<String>,
    pub model_dir: Option<PathBuf>,
    pub timeout: Duration,
    pub planner: PlannerOptions,
    pub log_level: String,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl AharaConfig {
    /// Resolve from the CLI, the environment and the config file on disk.
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let file = load_config()?.unwrap_or_default();
        Ok(Self::from_sources(cli, file))
    }

    /// Resolve against an already loaded config file.
    ///
    /// - knowledge base: `--knowledge-base` > `AHARA_KNOWLEDGE_BASE` > `knowledge_base` > sample
    /// - model dir: `--model-dir` > `AHARA_MODEL_DIR` > `oracle.model_dir` > none
    /// - oracle command: `--oracle-command` > `AHARA_ORACLE_COMMAND` > `oracle.command` > none
    /// - model type: `--model-type` > `oracle.model_type` > `t5`
    pub fn from_sources(cli: &CliOverrides, file: ConfigFile) -> Self {
        let knowledge_base = cli
            .knowledge_base
            .clone()
            .or_else(|| env_var(ENV_KNOWLEDGE_BASE).map(PathBuf::from))
            .or(file.knowledge_base);
        let model_dir = cli
            .model_dir
            .clone()
            .or_else(|| env_var(ENV_MODEL_DIR).map(PathBuf::from))
            .or(file.oracle.model_dir);
        let oracle_command = cli
            .oracle_command
            .clone()
            .or_else(|| env_var(ENV_ORACLE_COMMAND))
            .or(file.oracle.command);
        let model_type = cli.model_type.clone().unwrap_or(file.oracle.model_type);

        let planner = PlannerOptions {
            use_knowledge_graph: file.generation.use_knowledge_graph,
            weekly_params: file.generation.apply(GenerationParams::weekly()),
            daily_params: file.generation.apply(GenerationParams::daily()),
        };

        Self {
            knowledge_base,
            model_type,
            oracle_command,
            oracle_args: file.oracle.args,
            model_dir,
            timeout: Duration::from_secs(file.oracle.timeout_secs),
            planner,
            log_level: file.logging.level,
        }
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
