use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = ".codecheck.toml";

/// Top-level configuration from `.codecheck.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,
    /// Per-tool overrides keyed by tool name
    #[serde(default)]
    pub tools: BTreeMap<String, ToolConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        "**/.git/**".to_string(),
        "**/.venv/**".to_string(),
        "**/__pycache__/**".to_string(),
        "**/.tox/**".to_string(),
    ]
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

/// How to launch one checker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Executable name on `PATH` or a path to it
    #[serde(default)]
    pub program: Option<String>,
    /// Extra arguments placed before the file path
    #[serde(default)]
    pub args: Vec<String>,
}

impl Config {
    /// Load configuration from a `.codecheck.toml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse '{}'", path.display()))?;
        Ok(config)
    }

    /// Load from `.codecheck.toml` in the given directory or any ancestor, or return defaults.
    pub fn load_or_default(dir: &Path) -> Self {
        let start = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let start = if start.is_file() {
            start.parent().map(Path::to_path_buf).unwrap_or(start)
        } else {
            start
        };
        let mut current = start.as_path();
        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return match Self::load(&config_path) {
                    Ok(config) => {
                        tracing::debug!(path = %config_path.display(), "loaded config");
                        config
                    }
                    Err(e) => {
                        tracing::warn!(
                            "failed to load config from '{}': {e:#}. Using defaults.",
                            config_path.display()
                        );
                        Self::default()
                    }
                };
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Self::default()
    }

    /// Overrides for `tool`, or an empty entry.
    pub fn tool(&self, tool: &str) -> ToolConfig {
        self.tools.get(tool).cloned().unwrap_or_default()
    }
}
