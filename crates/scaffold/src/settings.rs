//! User defaults stored in `~/.l2-cli/config.toml`
use crate::{error::ScaffoldError, template::Template};
use l2_primitives::{constants::settings, Network};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use strum::VariantNames;
use tracing::debug;

/// Keys accepted by [get_value](Settings::get_value) and [set_value](Settings::set_value)
pub const SETTINGS_KEYS: [&str; 2] = ["network", "template"];

/// Defaults applied when `init` is run without explicit flags
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub network: Network,
    pub template: Template,
}

/// User settings
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub defaults: Defaults,
}

impl Settings {
    /// `~/.l2-cli/config.toml`
    pub fn default_path() -> Result<PathBuf, ScaffoldError> {
        let home = dirs::home_dir().ok_or(ScaffoldError::NoHomeDirectory)?;
        Ok(home.join(settings::DIR_NAME).join(settings::FILE_NAME))
    }

    /// Loads the settings, falling back to the defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self, ScaffoldError> {
        if !path.exists() {
            debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(ScaffoldError::io(path))?;
        toml::from_str(&contents)
            .map_err(|source| ScaffoldError::Parse { path: path.to_path_buf(), source })
    }

    /// Writes the settings, creating the parent directory if needed
    pub fn save(&self, path: &Path) -> Result<(), ScaffoldError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ScaffoldError::io(parent))?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(ScaffoldError::io(path))?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Result<String, ScaffoldError> {
        match key {
            "network" => Ok(self.defaults.network.to_string()),
            "template" => Ok(self.defaults.template.to_string()),
            _ => Err(ScaffoldError::UnknownKey(key.to_string())),
        }
    }

    /// Sets `key`, rejecting values that are not a known network or template
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ScaffoldError> {
        match key {
            "network" => {
                self.defaults.network = Network::from_str(value).map_err(|_| {
                    ScaffoldError::InvalidValue {
                        key: "network",
                        value: value.to_string(),
                        expected: Network::VARIANTS.join(", "),
                    }
                })?;
            }
            "template" => {
                self.defaults.template = Template::from_str(value).map_err(|_| {
                    ScaffoldError::InvalidValue {
                        key: "template",
                        value: value.to_string(),
                        expected: Template::VARIANTS.join(", "),
                    }
                })?;
            }
            _ => return Err(ScaffoldError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// All keys with their current value
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("network", self.defaults.network.to_string()),
            ("template", self.defaults.template.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings.get_value("network").unwrap(), "base");
        assert_eq!(settings.get_value("template").unwrap(), "javascript");
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".l2-cli").join("config.toml");

        let mut settings = Settings::default();
        settings.set_value("network", "optimism-sepolia").unwrap();
        settings.set_value("template", "aa-base").unwrap();
        settings.save(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[defaults]"));
        assert!(contents.contains("network = \"optimism-sepolia\""));

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.defaults.template, Template::AaBase);
    }

    #[test]
    fn partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[defaults]\nnetwork = \"optimism\"\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.defaults.network, Network::Optimism);
        assert_eq!(settings.defaults.template, Template::Javascript);
    }

    #[test]
    fn invalid_values() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.set_value("network", "arbitrum"),
            Err(ScaffoldError::InvalidValue { key: "network", .. })
        ));
        assert!(matches!(settings.set_value("color", "red"), Err(ScaffoldError::UnknownKey(_))));
        assert!(matches!(settings.get_value("color"), Err(ScaffoldError::UnknownKey(_))));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "defaults = 3").unwrap();
        assert!(matches!(Settings::load(&path), Err(ScaffoldError::Parse { .. })));
    }
}
