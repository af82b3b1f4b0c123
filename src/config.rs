//! Configuration management for Courtside

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::chat::context::{DEFAULT_MAX_MESSAGES, DEFAULT_MAX_TOKENS};

/// Upper bound for `context.prune_after_hours` (ten years)
pub const MAX_PRUNE_AFTER_HOURS: u32 = 24 * 365 * 10;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub context: ContextConfig,
    pub ai: AiConfig,
}

/// Conversation history limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub max_messages: usize,
    pub max_tokens: usize,
    pub prune_after_hours: u32,
}

/// Which completion backend answers questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Claude,
    /// Offline echo, no API key needed
    Echo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub provider: ProviderKind,
    pub timeout_secs: u64,
    pub max_response_tokens: u32,
    pub openai: ProviderConfig,
    pub claude: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key_env: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_messages: DEFAULT_MAX_MESSAGES,
            max_tokens: DEFAULT_MAX_TOKENS,
            prune_after_hours: 24,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            timeout_secs: 10,
            max_response_tokens: 1024,
            openai: ProviderConfig {
                api_key_env: "OPENAI_API_KEY".to_string(),
                model: "gpt-4o-mini".to_string(),
                base_url: None,
            },
            claude: ProviderConfig {
                api_key_env: "ANTHROPIC_API_KEY".to_string(),
                model: "claude-sonnet-4-20250514".to_string(),
                base_url: None,
            },
        }
    }
}

impl Config {
    /// Reject limits that would make the assistant unusable
    pub fn validate(&self) -> Result<()> {
        if self.context.max_messages == 0 {
            anyhow::bail!("context.max_messages must be at least 1");
        }
        if self.context.max_tokens == 0 {
            anyhow::bail!("context.max_tokens must be at least 1");
        }
        if self.context.prune_after_hours == 0 {
            anyhow::bail!("context.prune_after_hours must be at least 1");
        }
        if self.context.prune_after_hours > MAX_PRUNE_AFTER_HOURS {
            anyhow::bail!(
                "context.prune_after_hours must be at most {} (got {})",
                MAX_PRUNE_AFTER_HOURS,
                self.context.prune_after_hours
            );
        }
        if self.ai.timeout_secs == 0 {
            anyhow::bail!("ai.timeout_secs must be at least 1");
        }
        Ok(())
    }
}

/// Get the configuration file path
fn config_path() -> Result<PathBuf> {
    let config_dir = directories::ProjectDirs::from("com", "courtside", "courtside")
        .context("Failed to determine config directory")?
        .config_dir()
        .to_path_buf();

    Ok(config_dir.join("config.toml"))
}

fn resolve_path(custom_path: Option<&str>) -> Result<PathBuf> {
    match custom_path {
        Some(p) => Ok(PathBuf::from(p)),
        None => config_path(),
    }
}

/// Load configuration from file or use defaults
pub fn load_config(custom_path: Option<&str>) -> Result<Config> {
    let path = resolve_path(custom_path)?;

    let config = if path.exists() {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {:?}", path))?
    } else {
        Config::default()
    };

    config
        .validate()
        .with_context(|| format!("Invalid configuration in {:?}", path))?;
    Ok(config)
}

/// Initialize configuration file with defaults
pub fn init_config(custom_path: Option<&str>) -> Result<()> {
    let path = resolve_path(custom_path)?;

    if path.exists() {
        println!("Configuration file already exists at {:?}", path);
        return Ok(());
    }

    write_default(&path)?;
    println!("Configuration initialized at {:?}", path);
    Ok(())
}

fn write_default(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {:?}", parent))?;
    }

    let content = toml::to_string_pretty(&Config::default())
        .context("Failed to serialize default config")?;

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config to {:?}", path))
}

/// Show current configuration
pub fn show_config(config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", content);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let content = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(content.contains("provider = \"openai\""));

        let parsed: Config = toml::from_str(&content).unwrap();
        assert_eq!(parsed.context.max_messages, 10);
        assert_eq!(parsed.context.max_tokens, 3000);
        assert_eq!(parsed.ai.openai.model, "gpt-4o-mini");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[context]\nmax_tokens = 500\n").unwrap();
        assert_eq!(config.context.max_tokens, 500);
        assert_eq!(config.context.max_messages, 10);
        assert_eq!(config.ai.provider, ProviderKind::OpenAi);
        assert_eq!(config.ai.timeout_secs, 10);
    }

    #[test]
    fn test_load_rejects_zero_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[context]\nmax_messages = 0\n").unwrap();

        let err = load_config(path.to_str()).unwrap_err();
        assert!(format!("{:#}", err).contains("max_messages"));
    }

    #[test]
    fn test_validate_bounds_prune_window() {
        let mut config = Config::default();
        config.context.prune_after_hours = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("prune_after_hours must be at least 1"));

        config.context.prune_after_hours = u32::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("prune_after_hours must be at most"));

        config.context.prune_after_hours = MAX_PRUNE_AFTER_HOURS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_rejects_huge_prune_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[context]\nprune_after_hours = 4294967295\n").unwrap();

        let err = load_config(path.to_str()).unwrap_err();
        assert!(format!("{:#}", err).contains("prune_after_hours"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.ai.provider, ProviderKind::OpenAi);
    }

    #[test]
    fn test_write_default_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        write_default(&path).unwrap();

        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.ai.claude.api_key_env, "ANTHROPIC_API_KEY");
    }
}
