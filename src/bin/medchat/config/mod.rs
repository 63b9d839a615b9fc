mod error;
mod paths;
mod store;
mod types;

pub use paths::ConfigPaths;
pub use store::{load_config, save_config};
pub use types::{AppConfig, LoggingConfig, ThemeMode};
