//! Vitrina configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, VitrinaError};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VitrinaConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub publish: PublishConfig,
}

impl VitrinaConfig {
    /// Load config from the default path (~/.vitrina/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| VitrinaError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| VitrinaError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| VitrinaError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the Vitrina home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".vitrina")
    }
}

/// Telegram channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelegramConfig {
    /// Bot token. Falls back to the TELEGRAM_BOT_TOKEN env var when empty.
    #[serde(default)]
    pub bot_token: String,
    /// Target channel: "@name" or a numeric chat id.
    #[serde(default)]
    pub channel_id: String,
    /// URL for the "order now" button under each post. Empty disables the
    /// button and puts the post text on the media group caption instead.
    #[serde(default)]
    pub call_to_action_url: String,
}

/// Description rewrite (LLM) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
    /// API key. Falls back to the OPENAI_API_KEY env var when empty.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn bool_true() -> bool {
    true
}
fn default_model() -> String {
    "gpt-4o".into()
}
fn default_endpoint() -> String {
    "https://api.openai.com/v1".into()
}
fn default_request_timeout() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: String::new(),
            model: default_model(),
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Publish-time schedule configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// IANA timezone the publish times are interpreted in. Always this
    /// zone, never the host's local one.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "Europe/Kiev".into()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

/// On-disk state locations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Directory holding the catalog CSV and the schedule record.
    /// Empty means ~/.vitrina/data.
    #[serde(default)]
    pub data_dir: String,
}

impl StorageConfig {
    pub fn data_dir(&self) -> PathBuf {
        if self.data_dir.is_empty() {
            VitrinaConfig::home_dir().join("data")
        } else {
            PathBuf::from(&self.data_dir)
        }
    }

    /// Path of the catalog CSV file.
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir().join("goods.csv")
    }

    /// Path of the persisted schedule record.
    pub fn schedule_path(&self) -> PathBuf {
        self.data_dir().join("schedule.json")
    }
}

/// Outbound publishing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Upper bound on one publish call (media group or message).
    #[serde(default = "default_publish_timeout")]
    pub timeout_secs: u64,
}

fn default_publish_timeout() -> u64 {
    60
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_publish_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = VitrinaConfig::default();
        assert!(config.llm.enabled);
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.schedule.timezone, "Europe/Kiev");
        assert!(config.telegram.call_to_action_url.is_empty());
    }

    #[test]
    fn parses_partial_toml() {
        let toml = r#"
            [telegram]
            bot_token = "123:abc"
            channel_id = "@showcase"

            [schedule]
            timezone = "Europe/Warsaw"
        "#;
        let config: VitrinaConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.telegram.bot_token, "123:abc");
        assert_eq!(config.schedule.timezone, "Europe/Warsaw");
        // Unmentioned sections keep their defaults.
        assert_eq!(config.publish.timeout_secs, 60);
    }

    #[test]
    fn storage_paths_derive_from_data_dir() {
        let storage = StorageConfig {
            data_dir: "/tmp/vitrina-test".into(),
        };
        assert_eq!(
            storage.catalog_path(),
            PathBuf::from("/tmp/vitrina-test/goods.csv")
        );
        assert_eq!(
            storage.schedule_path(),
            PathBuf::from("/tmp/vitrina-test/schedule.json")
        );
    }
}
