use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::paths::ConfigPaths;
use super::types::AppConfig;

#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub paths: ConfigPaths,
}

/// Reads the config, or defaults when the file does not exist yet.
pub fn load_config(path_override: Option<PathBuf>) -> Result<LoadedConfig, ConfigError> {
    let paths = ConfigPaths::resolve(path_override)?;
    create_dirs(&paths)?;
    let path = &paths.config_file;
    let config = match fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?,
        Err(err) if err.kind() == ErrorKind::NotFound => AppConfig::default(),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.clone(),
                source,
            })
        }
    };
    restrict_to_owner(path)?;
    Ok(LoadedConfig { config, paths })
}

pub fn save_config(config: &AppConfig, paths: &ConfigPaths) -> Result<(), ConfigError> {
    create_dirs(paths)?;
    let contents = toml::to_string_pretty(config)?;
    fs::write(&paths.config_file, contents).map_err(|source| ConfigError::Write {
        path: paths.config_file.clone(),
        source,
    })?;
    restrict_to_owner(&paths.config_file)
}

fn create_dirs(paths: &ConfigPaths) -> Result<(), ConfigError> {
    for dir in [&paths.config_dir, &paths.logs_dir] {
        fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
            path: dir.clone(),
            source,
        })?;
    }
    Ok(())
}

/// The file may hold a session cookie.
fn restrict_to_owner(path: &Path) -> Result<(), ConfigError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let Ok(metadata) = fs::metadata(path) else {
            return Ok(());
        };
        let mut perms = metadata.permissions();
        if perms.mode() & 0o077 != 0 {
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
