//! Configuration management for recall.
//!
//! The store file path is resolved from (in priority order):
//! 1. `MEMORY_FILE_PATH` environment variable
//! 2. `RECALL__MEMORY__FILE_PATH` environment variable
//! 3. `[memory] file_path` in the config file (recall.toml)
//! 4. Default: `memory.json`
//!
//! A relative path is resolved next to the running executable.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::RecallError;

/// Environment variable that overrides the store file path.
pub const MEMORY_FILE_ENV: &str = "MEMORY_FILE_PATH";

/// Store location settings, read from the `[memory]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MemoryConfig {
    /// Path of the newline-delimited JSON store file.
    #[serde(default = "default_file_path")]
    pub file_path: String,
}

fn default_file_path() -> String {
    "memory.json".to_string()
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            file_path: default_file_path(),
        }
    }
}

impl MemoryConfig {
    /// Load configuration from `{file_prefix}.toml` (optional) and the environment.
    pub fn load(file_prefix: &str) -> Result<Self, RecallError> {
        let env_override = std::env::var(MEMORY_FILE_ENV)
            .ok()
            .filter(|path| !path.is_empty());
        Self::from_sources(file_prefix, env_override)
    }

    /// Build the configuration with an explicit value for the `MEMORY_FILE_PATH` override.
    pub fn from_sources(
        file_prefix: &str,
        file_path_override: Option<String>,
    ) -> Result<Self, RecallError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("RECALL")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("memory.file_path", file_path_override)?
            .build()?;

        match cfg.get::<MemoryConfig>("memory") {
            Ok(c) => Ok(c),
            Err(config::ConfigError::NotFound(_)) => Ok(MemoryConfig::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve the store path: absolute paths are kept, relative ones join `base_dir`.
    pub fn resolve_memory_path(&self, base_dir: &Path) -> PathBuf {
        let path = Path::new(&self.file_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }
}

/// Directory containing the running executable.
pub fn executable_dir() -> Result<PathBuf, RecallError> {
    let exe = std::env::current_exe().map_err(RecallError::Executable)?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}
