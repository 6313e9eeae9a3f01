use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomeDirError {
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("cannot determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("failed to create home directory '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(target_os = "windows")]
const PLATFORM_BASE_ENV: &str = "APPDATA";
#[cfg(not(target_os = "windows"))]
const PLATFORM_BASE_ENV: &str = "HOME";

fn platform_base() -> Result<PathBuf, HomeDirError> {
    env::var_os(PLATFORM_BASE_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or(HomeDirError::MissingEnv(PLATFORM_BASE_ENV))
}

/// Expand a leading `~` against the user's home directory.
fn expand_tilde(raw: &str) -> Result<PathBuf, HomeDirError> {
    if raw == "~" {
        return platform_base();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_base()?.join(rest));
    }
    Ok(PathBuf::from(raw))
}

fn absolutize(p: PathBuf) -> Result<PathBuf, HomeDirError> {
    if p.is_absolute() {
        return Ok(p);
    }
    let cwd = env::current_dir().map_err(HomeDirError::CurrentDir)?;
    Ok(cwd.join(p))
}

/// Resolve the application home directory.
///
/// - `Some(path)`: `~` is expanded, relative paths are anchored at the cwd.
/// - `None`: `<platform base>/<default_subdir>` (`$HOME` on Unix, `%APPDATA%` on Windows).
///
/// With `create = true` the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf, HomeDirError> {
    let path = match configured {
        Some(raw) => absolutize(expand_tilde(raw.trim())?)?,
        None => platform_base()?.join(default_subdir),
    };

    if create {
        ensure_dir(&path)?;
    }
    Ok(path)
}

fn ensure_dir(path: &Path) -> Result<(), HomeDirError> {
    std::fs::create_dir_all(path).map_err(|source| HomeDirError::Create {
        path: path.to_path_buf(),
        source,
    })
}
