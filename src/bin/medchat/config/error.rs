use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read medchat config {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot write medchat config {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("cannot create directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("{} is not a valid medchat config: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("cannot encode medchat config: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("no home directory found; pass --config with an explicit path")]
    NoHomeDir,
    #[error("--config {} does not name a file", .0.display())]
    InvalidConfigPath(PathBuf),
}
