use crate::{Error, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Shell-like lookup of a script name along a `PATH`-style search path.
///
/// Names that already contain a path separator are returned untouched and the
/// search path is never consulted. Otherwise each listed directory is tried in
/// order and the first `dir/name` that exists wins. When nothing matches the
/// original name comes back unchanged; opening it later is what fails.
pub fn whence_file(name: &str, search_path: Option<&OsStr>) -> PathBuf {
    if has_separator(name) {
        return PathBuf::from(name);
    }

    if let Some(search_path) = search_path {
        for dir in std::env::split_paths(search_path) {
            // An empty entry carries no directory to join with
            if dir.as_os_str().is_empty() {
                continue;
            }
            let candidate = dir.join(name);
            if candidate.exists() {
                return candidate;
            }
        }
    }

    PathBuf::from(name)
}

/// Whether a script name names a location rather than a bare file name.
pub fn has_separator(name: &str) -> bool {
    name.chars().any(std::path::is_separator)
}

/// Locate the script to debug: the literal path when it exists, otherwise a
/// search along `search_path`.
pub fn resolve_script(name: &str, search_path: Option<&OsStr>) -> PathBuf {
    let literal = Path::new(name);
    if literal.exists() {
        return literal.to_path_buf();
    }
    whence_file(name, search_path)
}

/// Make a path absolute against the current directory without touching
/// symlinks. Missing files are fine.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}

/// Expand tilde (~) in paths to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

/// Resolve the config file path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. STEPLINE_CONFIG environment variable (with tilde expansion)
/// 3. System config directory (recommended default)
/// 4. ~/.stepline/config.toml (fallback for systems without a config directory)
pub fn resolve_config_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("STEPLINE_CONFIG") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(config_dir) = dirs::config_dir() {
        return Ok(config_dir.join("stepline").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        return Ok(home.join(".stepline").join("config.toml"));
    }

    Err(Error::Config(
        "Could not determine config path: no HOME directory or system config directory found"
            .to_string(),
    ))
}
