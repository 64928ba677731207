use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const PREFERENCES_FILE: &str = "preferences.json";

/// Persisted UI preferences. Only the theme flag survives restarts.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Preferences {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(skip)]
    file_path: Option<PathBuf>,
}

impl Preferences {
    pub fn load_or_create() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("hacky-news-tui");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        }

        Self::load_from(config_dir.join(PREFERENCES_FILE))
    }

    pub fn load_from(file_path: PathBuf) -> Result<Self> {
        match file_path.exists() {
            true => {
                let content =
                    fs::read_to_string(&file_path).context("Failed to read preferences file")?;
                let mut prefs: Preferences =
                    serde_json::from_str(&content).context("Failed to parse preferences file")?;
                prefs.file_path = Some(file_path);
                Ok(prefs)
            }
            false => Ok(Self {
                dark_mode: false,
                file_path: Some(file_path),
            }),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn save(&self) -> Result<()> {
        if let Some(path) = &self.file_path {
            let content =
                serde_json::to_string_pretty(self).context("Failed to serialize preferences")?;
            fs::write(path, content).context("Failed to write preferences file")?;
            tracing::debug!("Saved preferences to {}", path.display());
        }
        Ok(())
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) -> Result<()> {
        self.dark_mode = dark_mode;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("hacky-news-prefs-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn missing_file_defaults_to_light() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path);
        let prefs = Preferences::load_from(path.clone()).unwrap();
        assert!(!prefs.dark_mode);
        assert_eq!(prefs.path(), Some(path.as_path()));
    }

    #[test]
    fn dark_mode_round_trips_through_disk() {
        let path = temp_path("roundtrip");
        let mut prefs = Preferences::load_from(path.clone()).unwrap();
        prefs.set_dark_mode(true).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"dark_mode\": true"));

        let reloaded = Preferences::load_from(path.clone()).unwrap();
        assert!(reloaded.dark_mode);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        fs::write(&path, "not json").unwrap();
        assert!(Preferences::load_from(path.clone()).is_err());
        let _ = fs::remove_file(path);
    }
}
