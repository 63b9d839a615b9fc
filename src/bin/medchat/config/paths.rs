use std::path::{Path, PathBuf};

use super::error::ConfigError;

const CONFIG_FILE: &str = "config.toml";

/// Where the config file and the log directory live.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_file: PathBuf,
    pub config_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl ConfigPaths {
    /// With `--config`, logs sit in a `logs` directory next to the file.
    pub fn resolve(config_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        match config_override {
            Some(path) => Self::beside(path),
            None => Self::in_home(),
        }
    }

    fn beside(config_file: PathBuf) -> Result<Self, ConfigError> {
        if config_file.file_name().is_none() {
            return Err(ConfigError::InvalidConfigPath(config_file));
        }
        let config_dir = match config_file.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(Self {
            logs_dir: config_dir.join("logs"),
            config_dir,
            config_file,
        })
    }

    fn in_home() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(Self::under_home(&home))
    }

    fn under_home(home: &Path) -> Self {
        let config_dir = home.join(".config").join("medchat");
        Self {
            config_file: config_dir.join(CONFIG_FILE),
            config_dir,
            logs_dir: home.join(".local").join("share").join("medchat").join("logs"),
        }
    }
}
