use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PaperdeskError, Result};

/// Root application configuration, loaded from `~/.config/paperdesk/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub search: SearchConfig,
    pub ai: AiConfig,
    pub context: ContextConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub papers_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub base_url: String,
    pub max_results: u32,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub provider: String,
    pub model: String,
    pub api_key_env: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub paper_limit: usize,
    pub summary_chars: usize,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("paperdesk")
            .join("papers");

        Self {
            papers_dir: data_dir.to_string_lossy().to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "http://export.arxiv.org/api/query".to_string(),
            max_results: 5,
            timeout_secs: 30,
            user_agent: "paperdesk/0.1".to_string(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 1000,
            timeout_secs: 60,
        }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            paper_limit: 3,
            summary_chars: 200,
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/paperdesk/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("PAPERDESK_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("paperdesk")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        if let Ok(dir) = std::env::var("PAPERDESK_PAPERS_DIR") {
            config.storage.papers_dir = dir;
        }
        config.validate()?;
        Ok(config)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage.papers_dir.trim().is_empty() {
            return Err(PaperdeskError::ConfigError(
                "storage.papers_dir must not be empty".to_string(),
            ));
        }
        if self.search.max_results == 0 {
            return Err(PaperdeskError::ConfigError(
                "search.max_results must be at least 1".to_string(),
            ));
        }
        if self.context.summary_chars == 0 {
            return Err(PaperdeskError::ConfigError(
                "context.summary_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    // ─── Derived values ────────────────────────────────────

    /// Root directory holding one sub-directory per topic bucket.
    pub fn papers_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.papers_dir)
    }

    /// Reads the chat API key from the environment variable named in `ai.api_key_env`.
    /// Blank values count as missing.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.ai.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.search.max_results, 5);
        assert_eq!(cfg.context.paper_limit, 3);
        assert_eq!(cfg.context.summary_chars, 200);
        assert_eq!(cfg.ai.api_key_env, "ANTHROPIC_API_KEY");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = AppConfig::default();
        cfg.search.max_results = 12;
        cfg.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.search.max_results, 12);
        assert_eq!(loaded.ai.model, cfg.ai.model);
        assert_eq!(loaded.storage.papers_dir, cfg.storage.papers_dir);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[context]\npaper_limit = 5\n").unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.context.paper_limit, 5);
        assert_eq!(loaded.context.summary_chars, 200);
        assert_eq!(loaded.search.timeout_secs, 30);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let cfg =
            AppConfig::load_from(Path::new("/tmp/nonexistent_paperdesk_config.toml")).unwrap();
        assert_eq!(cfg.search.max_results, 5);
    }

    #[test]
    fn test_validate_rejects_zero_max_results() {
        let mut cfg = AppConfig::default();
        cfg.search.max_results = 0;
        assert!(matches!(cfg.validate(), Err(PaperdeskError::ConfigError(_))));
    }

    #[test]
    fn test_papers_dir_is_derived_from_storage() {
        let mut cfg = AppConfig::default();
        cfg.storage.papers_dir = "/tmp/papers".to_string();
        assert_eq!(cfg.papers_dir(), PathBuf::from("/tmp/papers"));
    }
}
