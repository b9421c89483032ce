use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirError {
    #[error("Directory not found: {0}")]
    DirNotFound(String),
}

pub type DirResult<T> = Result<T, DirError>;

/// Application name used to namespace directories.
pub static APP_NAME: &str = "post-history";

/// Name of the settings file inside the config directory.
pub static CONFIG_FILE_NAME: &str = "config.toml";

/// Hint shown when no home directory can be resolved.
const CONFIG_DIR_HINT: &str = "~/.config/post-history";

/// Resolve `$XDG_CONFIG_HOME/post-history`, falling back to `~/.config/post-history`.
pub fn config_dir() -> DirResult<PathBuf> {
    resolve_config_dir(
        env::var_os("XDG_CONFIG_HOME"),
        env::home_dir().map(PathBuf::into_os_string),
        env::var_os("USERPROFILE"),
    )
}

/// Path of the settings file. The file itself may not exist.
pub fn config_file() -> DirResult<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

fn resolve_config_dir(
    xdg: Option<OsString>,
    home: Option<OsString>,
    userprofile: Option<OsString>,
) -> DirResult<PathBuf> {
    if let Some(dir) = xdg.filter(|d| !d.is_empty()) {
        Ok(PathBuf::from(dir).join(APP_NAME))
    } else if let Some(home) = home.or(userprofile) {
        Ok(PathBuf::from(home).join(".config").join(APP_NAME))
    } else {
        Err(DirError::DirNotFound(CONFIG_DIR_HINT.to_string()))
    }
}
