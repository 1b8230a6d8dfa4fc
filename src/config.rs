use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::countdown::DEFAULT_COUNTDOWN_SECS;
use crate::sentences::Difficulty;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub difficulty: Difficulty,
    pub countdown_secs: u64,
    pub scores_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            scores_file: None,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> anyhow::Result<()>;

    /// Update the stored difficulty, leaving every other saved field as is
    fn save_difficulty(&self, difficulty: Difficulty) -> anyhow::Result<()> {
        self.save(&Config {
            difficulty,
            ..self.load()
        })
    }
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("typeclock_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) if cfg.countdown_secs > 0 => cfg,
            Ok(cfg) => {
                log::warn!("ignoring zero countdown in {}", self.path.display());
                Config {
                    countdown_secs: DEFAULT_COUNTDOWN_SECS,
                    ..cfg
                }
            }
            Err(e) => {
                log::warn!("unreadable config {}: {}", self.path.display(), e);
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nested").join("config.json"));
        let cfg = Config {
            difficulty: Difficulty::Hard,
            countdown_secs: 30,
            scores_file: Some(PathBuf::from("/tmp/scores.csv")),
        };
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn save_difficulty_keeps_other_fields() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        let cfg = Config {
            difficulty: Difficulty::Easy,
            countdown_secs: 45,
            scores_file: None,
        };
        store.save(&cfg).unwrap();

        store.save_difficulty(Difficulty::Medium).unwrap();
        assert_eq!(
            store.load(),
            Config {
                difficulty: Difficulty::Medium,
                ..cfg
            }
        );
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_and_broken_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);

        fs::write(&path, r#"{"difficulty":"Medium"}"#).unwrap();
        let cfg = store.load();
        assert_eq!(cfg.difficulty, Difficulty::Medium);
        assert_eq!(cfg.countdown_secs, DEFAULT_COUNTDOWN_SECS);

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(store.load(), Config::default());

        fs::write(&path, r#"{"countdown_secs":0}"#).unwrap();
        assert_eq!(store.load().countdown_secs, DEFAULT_COUNTDOWN_SECS);
    }
}
