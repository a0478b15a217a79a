//! Settings file handling
//!
//! Settings live in `ecl.toml` next to the application:
//!
//! ```toml
//! [scheduler]
//! min_priority = -3
//! max_priority = 3
//!
//! [logging]
//! filter = "info"
//!
//! [tags]
//! names = ["Player", "Enemy"]
//! ```
//!
//! Every section and key is optional.

use anyhow::{Context, Result};
use ecl_core::ecs::{SchedulerConfig, Tag};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up by [`Settings::load_from_dir`]
pub const SETTINGS_FILE: &str = "ecl.toml";

/// Application settings
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub tags: TagsConfig,
}

/// Logging configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

/// Named tags
///
/// A name's position in the list is its tag number.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TagsConfig {
    #[serde(default)]
    pub names: Vec<String>,
}

impl TagsConfig {
    /// Tag declared under `name`
    pub fn get(&self, name: &str) -> Option<Tag> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|index| Tag(index as u32))
    }

    /// Tag declared under `name`, declaring it first if needed
    pub fn declare(&mut self, name: &str) -> Tag {
        match self.get(name) {
            Some(tag) => tag,
            None => {
                self.names.push(name.to_string());
                Tag((self.names.len() - 1) as u32)
            }
        }
    }

    /// Name of a tag
    pub fn name(&self, tag: Tag) -> Option<&str> {
        self.names.get(tag.0 as usize).map(String::as_str)
    }
}

impl Settings {
    /// Load `ecl.toml` from a directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let settings_path = path.join(SETTINGS_FILE);

        if !settings_path.exists() {
            anyhow::bail!("No {} found in {}", SETTINGS_FILE, path.display());
        }

        let content = fs::read_to_string(&settings_path)
            .with_context(|| format!("Failed to read {}", settings_path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", settings_path.display()))
    }

    /// Load `ecl.toml` from a directory, falling back to defaults if absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.join(SETTINGS_FILE).exists() {
            Self::load_from_dir(path)
        } else {
            tracing::debug!(dir = %path.display(), "no settings file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        if settings.scheduler.min_priority > settings.scheduler.max_priority {
            anyhow::bail!(
                "scheduler.min_priority ({}) is greater than scheduler.max_priority ({})",
                settings.scheduler.min_priority,
                settings.scheduler.max_priority
            );
        }
        Ok(settings)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize settings")
    }

    /// Tag declared under `name`
    pub fn tag(&self, name: &str) -> Option<Tag> {
        self.tags.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = Settings::from_toml_str("").unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.scheduler.min_priority, -3);
        assert_eq!(settings.scheduler.max_priority, 3);
        assert_eq!(settings.logging.filter, "info");
    }

    #[test]
    fn test_partial_sections() {
        let settings = Settings::from_toml_str(
            r#"
            [scheduler]
            max_priority = 5

            [tags]
            names = ["Player", "Enemy"]
            "#,
        )
        .unwrap();

        assert_eq!(settings.scheduler.min_priority, -3);
        assert_eq!(settings.scheduler.max_priority, 5);
        assert_eq!(settings.tag("Enemy"), Some(Tag(1)));
        assert_eq!(settings.tag("Boss"), None);
        assert_eq!(settings.tags.name(Tag(0)), Some("Player"));
    }

    #[test]
    fn test_inverted_priority_range_is_rejected() {
        let result = Settings::from_toml_str("[scheduler]\nmin_priority = 2\nmax_priority = 1\n");

        assert!(result.is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut settings = Settings::default();
        settings.tags.declare("Player");
        settings.logging.filter = "ecl_core=debug".into();

        let text = settings.to_toml().unwrap();

        assert_eq!(Settings::from_toml_str(&text).unwrap(), settings);
    }

    #[test]
    fn test_declare_is_idempotent() {
        let mut tags = TagsConfig::default();

        let player = tags.declare("Player");
        let enemy = tags.declare("Enemy");

        assert_eq!(tags.declare("Player"), player);
        assert_ne!(player, enemy);
        assert_eq!(tags.names.len(), 2);
    }

    #[test]
    fn test_missing_dir_file() {
        let dir = std::env::temp_dir().join("ecl-settings-test-missing");

        assert!(Settings::load_from_dir(&dir).is_err());
        assert_eq!(Settings::load_or_default(&dir).unwrap(), Settings::default());
    }
}
