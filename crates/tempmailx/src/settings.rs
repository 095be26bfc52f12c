//! Persisted preferences.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempmailx_api::MAIL_TM_BASE_URL;

use crate::i18n::Language;

/// Default seconds between inbox polls.
pub const DEFAULT_POLL_SECS: u64 = 10;

/// Application settings that persist across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Display language (serialized as its code).
    #[serde(with = "language_serde")]
    pub language: Language,
    /// Seconds between inbox polls.
    pub poll_interval_secs: u64,
    /// Provider base URL.
    pub api_base_url: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            language: Language::En,
            poll_interval_secs: DEFAULT_POLL_SECS,
            api_base_url: MAIL_TM_BASE_URL.to_string(),
        }
    }
}

/// Serde helpers for `Language`. Unknown codes fall back to English.
mod language_serde {
    use super::Language;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)] // Required by serde with= signature
    pub fn serialize<S>(language: &Language, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(language.code())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Language, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Language::from_code(&s).unwrap_or_default())
    }
}

/// Returns the settings file location.
pub fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tempmailx")
        .join("settings.json")
}

/// Loads settings, returning defaults when the file does not exist.
pub async fn load() -> anyhow::Result<AppSettings> {
    load_from(&settings_path()).await
}

/// Saves settings.
pub async fn save(settings: &AppSettings) -> anyhow::Result<()> {
    save_to(&settings_path(), settings).await
}

async fn load_from(path: &Path) -> anyhow::Result<AppSettings> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }

    let contents = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&contents)?)
}

async fn save_to(path: &Path, settings: &AppSettings) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }

    let contents = serde_json::to_string_pretty(settings)?;
    tokio::fs::write(path, contents).await?;

    tracing::info!("Settings saved to {:?}", path);
    Ok(())
}
