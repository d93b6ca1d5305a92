//! Configuration loading and resolution
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or unreadable TOML file is never fatal: the resolver logs a
//! warning and continues with compiled defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit TOML config file
pub const CONFIG_ENV_VAR: &str = "RQA_CONFIG";

/// Key value shipped in sample deployments; treated as "not configured"
pub const LLM_KEY_PLACEHOLDER: &str = "sk-test-key-placeholder";

/// The three deployable services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Module {
    KnowledgeStore,
    Memory,
    Validation,
}

impl Module {
    /// Binary / module name, also the key under `[modules]` in TOML
    pub fn name(&self) -> &'static str {
        match self {
            Module::KnowledgeStore => "rqa-ks",
            Module::Memory => "rqa-ms",
            Module::Validation => "rqa-va",
        }
    }

    /// Prefix for per-module environment variables (`RQA_KS_PORT`, ...)
    pub fn env_prefix(&self) -> &'static str {
        match self {
            Module::KnowledgeStore => "RQA_KS",
            Module::Memory => "RQA_MS",
            Module::Validation => "RQA_VA",
        }
    }

    pub fn default_host(&self) -> &'static str {
        match self {
            Module::Memory => "0.0.0.0",
            Module::KnowledgeStore | Module::Validation => "127.0.0.1",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Module::KnowledgeStore => 8000,
            Module::Memory => 9000,
            Module::Validation => 9500,
        }
    }
}

/// Resolved listen address for one module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleConfig {
    pub module_name: String,
    pub host: String,
    pub port: u16,
}

impl ModuleConfig {
    /// `host:port` string suitable for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging section of the TOML file
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Per-module host/port override in TOML (`[modules.rqa-va]`)
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ModuleAddress {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Shared TOML configuration file
///
/// ```toml
/// data_folder = "/var/lib/rqa"
/// knowledge_store_url = "http://127.0.0.1:8000"
/// openai_api_key = "sk-..."
///
/// [logging]
/// level = "debug"
///
/// [modules.rqa-va]
/// port = 9600
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TomlConfig {
    #[serde(default)]
    pub data_folder: Option<PathBuf>,
    #[serde(default)]
    pub knowledge_store_url: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub openai_model: Option<String>,
    #[serde(default)]
    pub openai_endpoint: Option<String>,
    #[serde(default)]
    pub ai_memory: Option<bool>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub modules: HashMap<String, ModuleAddress>,
}

/// Compiled-in defaults (lowest priority tier)
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub data_folder: PathBuf,
    pub log_level: String,
    pub knowledge_store_url: String,
    pub openai_endpoint: String,
    pub openai_model: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            data_folder: default_data_folder(),
            log_level: default_log_level(),
            knowledge_store_url: format!(
                "http://127.0.0.1:{}",
                Module::KnowledgeStore.default_port()
            ),
            openai_endpoint: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-3.5-turbo".to_string(),
        }
    }
}

/// Language model settings after resolution
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    /// `None` when no usable key was found
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
}

impl LlmSettings {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// A key counts as configured when it is non-blank and not the sample placeholder
pub fn is_llm_key_configured(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key != LLM_KEY_PLACEHOLDER
}

/// Resolves settings for one module across all configuration tiers
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    module: Module,
    toml: TomlConfig,
    defaults: CompiledDefaults,
}

impl ConfigResolver {
    /// Create a resolver, loading the TOML file gracefully
    ///
    /// `config_path` comes from `--config`; without it the file is located via
    /// `RQA_CONFIG` and then the platform config directories.
    pub fn new(module: Module, config_path: Option<&Path>) -> Self {
        let path = config_path
            .map(Path::to_path_buf)
            .or_else(locate_config_file);

        let toml = match path {
            Some(path) => match load_toml_config(&path) {
                Ok(config) => {
                    debug!("Loaded config file: {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Ignoring config file {}: {} (using defaults)", path.display(), e);
                    TomlConfig::default()
                }
            },
            None => {
                debug!("No config file found, using defaults");
                TomlConfig::default()
            }
        };

        Self::with_toml(module, toml)
    }

    /// Create a resolver from an already-parsed TOML config
    pub fn with_toml(module: Module, toml: TomlConfig) -> Self {
        Self {
            module,
            toml,
            defaults: CompiledDefaults::for_current_platform(),
        }
    }

    pub fn module(&self) -> Module {
        self.module
    }

    pub fn toml(&self) -> &TomlConfig {
        &self.toml
    }

    /// Resolve listen host and port
    pub fn module_config(&self, cli_host: Option<&str>, cli_port: Option<u16>) -> ModuleConfig {
        let prefix = self.module.env_prefix();
        let toml_entry = self.toml.modules.get(self.module.name());

        let host = cli_host
            .map(str::to_string)
            .or_else(|| non_empty_env(&format!("{}_HOST", prefix)))
            .or_else(|| toml_entry.and_then(|m| m.host.clone()))
            .unwrap_or_else(|| self.module.default_host().to_string());

        let port = cli_port
            .or_else(|| {
                let var = format!("{}_PORT", prefix);
                non_empty_env(&var).and_then(|raw| match raw.parse::<u16>() {
                    Ok(port) => Some(port),
                    Err(_) => {
                        warn!("Ignoring {}={:?}: not a valid port", var, raw);
                        None
                    }
                })
            })
            .or_else(|| toml_entry.and_then(|m| m.port))
            .unwrap_or_else(|| self.module.default_port());

        ModuleConfig {
            module_name: self.module.name().to_string(),
            host,
            port,
        }
    }

    /// Resolve the folder holding service data (SQLite files)
    pub fn data_folder(&self, cli_arg: Option<&Path>) -> PathBuf {
        cli_arg
            .map(Path::to_path_buf)
            .or_else(|| non_empty_env("RQA_DATA_FOLDER").map(PathBuf::from))
            .or_else(|| self.toml.data_folder.clone())
            .unwrap_or_else(|| self.defaults.data_folder.clone())
    }

    /// Resolve the knowledge store base URL (no trailing slash)
    pub fn knowledge_store_url(&self, cli_arg: Option<&str>) -> String {
        let url = cli_arg
            .map(str::to_string)
            .or_else(|| non_empty_env("RQA_KNOWLEDGE_STORE_URL"))
            .or_else(|| self.toml.knowledge_store_url.clone())
            .unwrap_or_else(|| self.defaults.knowledge_store_url.clone());
        url.trim_end_matches('/').to_string()
    }

    /// Resolve the log level (`RUST_LOG` is handled by the subscriber itself)
    pub fn log_level(&self) -> String {
        non_empty_env("RQA_LOG_LEVEL").unwrap_or_else(|| self.toml.logging.level.clone())
    }

    /// Resolve language model settings
    ///
    /// Key priority: `OPENAI_API_KEY` → TOML. Placeholder keys are discarded.
    pub fn llm_settings(&self) -> LlmSettings {
        let api_key = non_empty_env("OPENAI_API_KEY")
            .filter(|k| is_llm_key_configured(k))
            .or_else(|| {
                self.toml
                    .openai_api_key
                    .clone()
                    .filter(|k| is_llm_key_configured(k))
            });

        LlmSettings {
            api_key,
            endpoint: self
                .toml
                .openai_endpoint
                .clone()
                .unwrap_or_else(|| self.defaults.openai_endpoint.clone())
                .trim_end_matches('/')
                .to_string(),
            model: self
                .toml
                .openai_model
                .clone()
                .unwrap_or_else(|| self.defaults.openai_model.clone()),
        }
    }

    /// AI memory context is on unless disabled on the command line or in TOML
    pub fn ai_memory_enabled(&self, cli_disabled: bool) -> bool {
        !cli_disabled && self.toml.ai_memory.unwrap_or(true)
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}

/// Locate the TOML config file
///
/// `RQA_CONFIG` → `<config_dir>/rqa/config.toml` → `/etc/rqa/config.toml` (Linux)
pub fn locate_config_file() -> Option<PathBuf> {
    if let Some(path) = non_empty_env(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }

    let user_config = dirs::config_dir().map(|d| d.join("rqa").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/rqa/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default data folder
fn default_data_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("rqa"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/rqa"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("rqa"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/rqa"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("rqa"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\rqa"))
    } else {
        PathBuf::from("./rqa_data")
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
