use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::drawing::DEFAULT_STROKE_WIDTH;
use crate::store::DEFAULT_STORAGE_KEY;

#[cfg(not(target_arch = "wasm32"))]
const APP_NAME: &str = "noted";
#[cfg(not(target_arch = "wasm32"))]
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage entry holding the serialized notes.
    pub storage_key: String,
    /// Where native builds keep their storage files.
    pub data_dir: Option<PathBuf>,
    /// Font used by the text tool in place of the bundled one.
    pub font_path: Option<PathBuf>,
    pub default_stroke_width: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: None,
            font_path: None,
            default_stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        use anyhow::Context;
        serde_json::from_str(text).context("Failed to parse config file")
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Config {
    /// Reads `<config dir>/noted/config.json`, falling back to defaults
    /// when the file is missing or broken.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    fn try_load() -> anyhow::Result<Self> {
        use anyhow::Context;

        let path = config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&text)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        use anyhow::Context;

        let path = config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let text = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, text).context("Failed to write config file")?;
        Ok(())
    }

    pub fn resolved_data_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_NAME))
                .ok_or_else(|| anyhow::anyhow!("Could not determine data directory")),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn config_path() -> anyhow::Result<PathBuf> {
    let mut path =
        dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = Config::from_json(r#"{"storage_key":"sticky"}"#).unwrap();
        assert_eq!(config.storage_key, "sticky");
        assert_eq!(config.default_stroke_width, 5);
        assert!(config.font_path.is_none());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = Config::from_json("{").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn explicit_data_dir_wins() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/noted-test")),
            ..Config::default()
        };
        assert_eq!(config.resolved_data_dir().unwrap(), PathBuf::from("/tmp/noted-test"));
    }
}
