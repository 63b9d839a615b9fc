use std::path::{Path, PathBuf};

use flexi_logger::{detailed_format, Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};

use crate::config::{ConfigPaths, LoggingConfig};

const LOG_STEM: &str = "medchat";

/// Starts the rotated file logger. `RUST_LOG` wins over the configured level.
///
/// Logging stops when the returned handle is dropped.
pub fn init_logging(config: &LoggingConfig, paths: &ConfigPaths) -> anyhow::Result<LoggerHandle> {
    let spec = log_file_spec(config.path.as_deref().map(Path::new), &paths.logs_dir);
    let handle = Logger::try_with_env_or_str(&config.level)?
        .log_to_file(spec)
        .format_for_files(detailed_format)
        .append()
        .rotate(
            Criterion::Size(config.rotate_size),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config.rotate_keep),
        )
        .start()?;
    log::debug!("logging at level {}", config.level);
    Ok(handle)
}

/// An explicit path keeps its directory and stem; otherwise `medchat.log`
/// goes in the logs directory.
fn log_file_spec(explicit: Option<&Path>, logs_dir: &Path) -> FileSpec {
    let (directory, stem) = match explicit {
        Some(path) => (
            path.parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map_or_else(|| logs_dir.to_path_buf(), PathBuf::from),
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or(LOG_STEM)
                .to_string(),
        ),
        None => (logs_dir.to_path_buf(), LOG_STEM.to_string()),
    };
    FileSpec::default()
        .directory(directory)
        .basename(stem)
        .suppress_timestamp()
}
