//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Config file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory inside the platform config directory.
const APP_DIR_NAME: &str = "reelmark";

/// Config file inside `dir`, or `reelmark/config.toml` under the platform
/// config directory (`$XDG_CONFIG_HOME`, usually `~/.config`, on Linux).
///
/// # Errors
///
/// Returns an error if `dir` is `None` and no config directory can be
/// determined.
pub fn resolve_config_path(dir: Option<&Path>) -> Result<PathBuf> {
    let config_dir = match dir {
        Some(d) => d.to_path_buf(),
        None => dirs::config_dir()
            .context("could not determine the config directory")?
            .join(APP_DIR_NAME),
    };
    Ok(config_dir.join(CONFIG_FILE_NAME))
}
